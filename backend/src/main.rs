//! Backend entry-point: loads settings, initialises tracing and runs the
//! contacts API server.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use server::{AppSettings, ServerConfig, create_server, drain_on_shutdown};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| {
        error!(error = %err, "failed to load settings");
        std::io::Error::other(err.to_string())
    })?;
    let config = ServerConfig::try_from(settings).map_err(|err| {
        error!(error = %err, "invalid settings");
        std::io::Error::other(err.to_string())
    })?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    actix_web::rt::spawn(drain_on_shutdown(health_state, server.handle()));
    server.await
}
