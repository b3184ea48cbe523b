use clap::{Parser, Subcommand};
use marine_fleet::core::balance::DEFAULT_TARGET_GHG;
use marine_fleet::utils::logger;
use marine_fleet::{FleetClient, FleetError};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "fleetctl")]
#[command(about = "Command-line client for the marine-fleet compliance API")]
struct Args {
    /// Base URL of the API, including its prefix
    #[arg(long, default_value = "http://localhost:3001/api")]
    url: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all routes
    Routes,
    /// Select the baseline route for comparisons
    Baseline { route_id: String },
    /// Compare every route against the baseline
    Compare {
        #[arg(long, default_value_t = DEFAULT_TARGET_GHG)]
        target: f64,
    },
    /// Compliance balance for a year
    Cb {
        #[arg(short, long)]
        year: i32,
    },
    /// Bank the surplus of a year
    Bank {
        #[arg(short, long)]
        year: i32,
    },
    /// Apply banked surplus to a deficit year
    Apply {
        #[arg(short, long)]
        year: i32,
    },
    /// Per-route compliance balances for a year
    Adjusted {
        #[arg(short, long)]
        year: i32,
    },
    /// Pool two or more routes of the same year
    Pool {
        #[arg(short, long)]
        year: i32,
        #[arg(required = true, num_args = 2..)]
        route_ids: Vec<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), FleetError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(client: &FleetClient, command: Command) -> Result<(), FleetError> {
    match command {
        Command::Routes => print_json(&client.get_routes().await?),
        Command::Baseline { route_id } => {
            let response = client.set_baseline(&route_id).await?;
            println!("✅ {}", response.message);
            Ok(())
        }
        Command::Compare { target } => {
            let data = client.get_comparison().await?;
            println!(
                "Baseline {} ({:.2} gCO2e/MJ)",
                data.baseline.route_id, data.baseline.ghg_intensity
            );
            println!("{:<10} {:>10} {:>10} {:>10}", "route", "ghg", "diff %", "compliant");
            for row in data.rows(target) {
                println!(
                    "{:<10} {:>10.2} {:>10.2} {:>10}",
                    row.route_id,
                    row.ghg_intensity,
                    row.percent_diff,
                    if row.compliant { "yes" } else { "no" }
                );
            }
            Ok(())
        }
        Command::Cb { year } => print_json(&client.get_compliance_balance(year).await?),
        Command::Bank { year } => print_json(&client.bank_surplus(year).await?),
        Command::Apply { year } => print_json(&client.apply_banked_surplus(year).await?),
        Command::Adjusted { year } => print_json(&client.get_adjusted_cbs(year).await?),
        Command::Pool { year, route_ids } => {
            print_json(&client.create_pool(route_ids, year).await?)
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let result = match FleetClient::new(&args.url) {
        Ok(client) => run(&client, args.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::debug!("fleetctl failed: {:?}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(match e.status_code() {
            400..=499 => 2,
            _ => 1,
        });
    }
}
