use crate::config::AppConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "marine-fleet")]
#[command(about = "GHG compliance balance, banking and pooling service")]
pub struct ServerArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "fleet.toml")]
    pub config: String,

    /// Override the listening port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Load routes from a CSV file instead of the built-in data
    #[arg(long)]
    pub routes_csv: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl ServerArgs {
    /// 命令列參數優先於設定檔與環境變數
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.routes_csv {
            config.store.routes_csv = Some(path.clone());
        }
        if self.json_logs {
            config.logging.json = true;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }
}
