//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ConfigError, ServerConfig};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::routes::configure_routes;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{DbPool, run_pending_migrations};
use backend::{RateLimit, Trace};
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    rate_limit: RateLimit,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        rate_limit,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(|cfg| configure_routes(cfg, rate_limit))
        .configure(register_docs)
}

/// Serve Swagger UI in debug builds only.
fn register_docs(cfg: &mut web::ServiceConfig) {
    #[cfg(debug_assertions)]
    cfg.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let _ = cfg;
}

/// Connect to PostgreSQL, apply migrations when enabled and start listening.
///
/// # Errors
/// Propagates [`std::io::Error`] when migrations fail, the pool cannot be
/// built or the socket cannot be bound.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    if config.run_migrations() {
        run_pending_migrations(config.database_url())
            .await
            .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
        info!("database migrations applied");
    }

    let pool = DbPool::new(config.pool().clone())
        .await
        .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))?;
    let http_state = build_http_state(&pool, &config.jwt);
    let rate_limit = RateLimit::new(config.rate_limit);

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            rate_limit: rate_limit.clone(),
        })
    })
    .disable_signals()
    .bind(config.bind_addr())?
    .run();

    info!(bind_addr = %config.bind_addr(), "contacts API listening");
    health_state.mark_ready();
    Ok(server)
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Wait for SIGINT or SIGTERM, fail liveness, then stop accepting work and
/// let in-flight requests finish.
pub async fn drain_on_shutdown(health_state: web::Data<HealthState>, handle: ServerHandle) {
    if let Err(err) = shutdown_signal().await {
        warn!(error = %err, "cannot listen for shutdown signals; stopping now");
    }
    info!("shutdown requested, draining connections");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}
