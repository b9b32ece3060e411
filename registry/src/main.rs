//! Twin Registry Server Entry Point

use clap::Parser;
use tracing::{error, info};
use twinreg_common::config::RegistryConfig;
use twinreg_common::logging::{self, LogSettings};
use twinreg_common::signal::shutdown_signal;
use twinreg_registry::cli::{Cli, Commands};
use twinreg_registry::{api, AppState};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _log_guard = match logging::init(&LogSettings::from_env("registry.log")) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let config = match cli.command {
        Some(Commands::Serve(args)) => RegistryConfig {
            host: args.host,
            port: args.port,
        },
        // サブコマンドなしは環境変数の設定でserve
        None => RegistryConfig::from_env(),
    };

    if let Err(e) = run_server(config).await {
        error!("Registry server failed: {}", e);
        std::process::exit(1);
    }
}

async fn run_server(config: RegistryConfig) -> std::io::Result<()> {
    info!("Twin Registry v{}", env!("CARGO_PKG_VERSION"));

    let app = api::create_router(AppState::in_memory());
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Registry server listening on {}{}", bind_addr, api::BASE_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
