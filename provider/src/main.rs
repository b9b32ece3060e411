//! Twin Provider Entry Point

use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use twinreg_common::config::ProviderConfig;
use twinreg_common::error::{CommonError, CommonResult};
use twinreg_common::identifier::Identifier;
use twinreg_common::logging::{self, LogSettings};
use twinreg_common::model::Submodel;
use twinreg_common::signal::shutdown_signal;
use twinreg_provider::cli::{Cli, Commands, ServeArgs};
use twinreg_provider::client::HttpRegistryClient;
use twinreg_provider::lease::RegistryLease;
use twinreg_provider::shutdown::CancelSignal;
use twinreg_provider::{api, publish, AppState};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _log_guard = match logging::init(&LogSettings::from_env("provider.log")) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let Commands::Serve(args) = cli.command;
    if let Err(e) = run_provider(args).await {
        error!("Provider failed: {}", e);
        std::process::exit(1);
    }
}

fn load_submodel(path: &Path) -> CommonResult<Submodel> {
    let bytes = std::fs::read(path)
        .map_err(|e| CommonError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn run_provider(args: ServeArgs) -> CommonResult<()> {
    info!("Twin Provider v{}", env!("CARGO_PKG_VERSION"));
    let config: ProviderConfig = args.to_config();

    let state = AppState::default();
    let mut submodels = Vec::with_capacity(args.submodels.len());
    for path in &args.submodels {
        let submodel = load_submodel(path)?;
        let added = state.repository.add_submodel(submodel).await;
        let submodel = added
            .into_result()
            .map_err(|e| CommonError::Validation(format!("{}: {}", path.display(), e)))?
            .ok_or_else(|| CommonError::Validation(format!("{}: empty result", path.display())))?;
        info!(submodel_id = %submodel.id, file = %path.display(), "Loaded submodel");
        submodels.push(submodel);
    }

    let aas_id = match &args.aas_id {
        Some(id) => Identifier::new(id.clone()),
        None => {
            let first = submodels
                .first()
                .ok_or_else(|| CommonError::Config("no submodel given".to_string()))?;
            Identifier::new(format!("{}#aas", first.id))
        }
    };
    let descriptor = publish::shell_descriptor(
        &aas_id,
        &args.aas_id_short,
        &config.advertised_url(),
        &submodels,
    )
    .map_err(|e| CommonError::Config(e.to_string()))?;

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| CommonError::Config(format!("failed to bind {}: {}", bind_addr, e)))?;
    info!("Provider listening on {} (advertised as {})", bind_addr, config.advertised_url());

    let server_stop = CancelSignal::new();
    let server = {
        let stop = server_stop.clone();
        let app = api::create_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.cancelled().await })
                .await
        })
    };

    let client = HttpRegistryClient::new(&config.registry_url, config.request_timeout())
        .map_err(|e| CommonError::Config(e.to_string()))?;
    let mut lease = RegistryLease::new(
        Arc::new(client),
        vec![descriptor],
        config.renewal_interval(),
    );
    for result in lease.start().await {
        if !result.success {
            warn!(error = %result.message_text(), "Initial registration failed");
        }
    }

    let reason = shutdown_signal().await;
    info!(?reason, "Stopping provider");

    // 登録を撤回してからHTTPサーバーを止める
    lease.stop().await;
    server_stop.cancel();
    match server.await {
        Ok(Ok(())) => info!("Server shutdown complete"),
        Ok(Err(e)) => error!("Server error: {}", e),
        Err(e) => error!("Server task failed: {}", e),
    }
    Ok(())
}
