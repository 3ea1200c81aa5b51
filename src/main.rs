use std::sync::Arc;

use anyhow::Result;
use electria::{api, clock::SystemClock, config::Config, ml::ModelArtifacts, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cfg = Config::load()?;
    telemetry::init_tracing(&cfg.logging);

    let model = match ModelArtifacts::load(&cfg.model) {
        Ok(artifacts) => Some(artifacts),
        Err(e) if cfg.model.required => {
            return Err(anyhow::Error::new(e).context("model artifacts are required"));
        }
        Err(e) => {
            warn!(error = %e, "model artifacts not loaded, /predict will answer 503");
            None
        }
    };

    let state = api::AppState::new(cfg.clone(), model, Arc::new(SystemClock));
    let app = api::router(state);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - the API is reachable from the network");
    }

    info!(%addr, "starting ElectrIA backend");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
