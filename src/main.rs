use anyhow::Context;
use clap::Parser;
use marine_fleet::adapters::http::SharedRepository;
use marine_fleet::config::cli::ServerArgs;
use marine_fleet::utils::{logger, validation::Validate};
use marine_fleet::{build_router, AppConfig, AppState, CsvRouteLoader, InMemoryRouteRepository};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    // 載入配置：設定檔 < PORT 環境變數 < 命令列
    let loaded = AppConfig::from_file_if_exists(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;
    let config_found = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    config.apply_env_overrides()?;
    args.apply_to(&mut config);

    // 初始化日誌（日誌等級可能來自設定檔，所以必須在載入之後）
    logger::init_server_logger(args.verbose, Some(config.logging.level.as_str()), config.logging.json);
    tracing::info!("🚀 Starting marine-fleet");
    if !config_found {
        tracing::warn!("Config file {} not found, using defaults", args.config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let store = match &config.store.routes_csv {
        Some(path) => CsvRouteLoader::from_path(path)?,
        None => {
            tracing::info!("Using built-in reference routes");
            InMemoryRouteRepository::seeded()
        }
    };
    tracing::info!("Route store ready with {} routes", store.len());
    let repository: SharedRepository = Arc::new(store);

    let state = AppState::new(repository, &config.compliance);
    let app = build_router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("cannot bind {}", config.bind_address()))?;
    let local_addr = listener.local_addr()?;

    tracing::info!("📡 API endpoints: http://{}{}", local_addr, config.server.api_prefix);
    tracing::info!("📊 Health check: http://{}/health", local_addr);
    tracing::info!(
        target_ghg = config.compliance.target_ghg,
        year_min = config.compliance.year_min,
        year_max = config.compliance.year_max,
        "Compliance settings"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, closing HTTP server");
}
