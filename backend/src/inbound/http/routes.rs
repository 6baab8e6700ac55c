//! Route table shared by the server binary and integration tests.

use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::web;

use crate::inbound::http::health::{live, ready};
use crate::inbound::http::validation::extractor_config;
use crate::inbound::http::{contacts, users};
use crate::middleware::RateLimit;

/// Mount the API, health probes and extractor error handlers.
///
/// Only the `/api/contacts` scope is rate limited. API scopes accept a
/// trailing slash, so `/api/contacts/search/` routes like
/// `/api/contacts/search`. Callers provide `web::Data<HttpState>` and
/// `web::Data<HealthState>` as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::RateLimit;
/// use backend::inbound::http::routes::configure_routes;
///
/// let limiter = RateLimit::new(Default::default());
/// let app = App::new().configure(|cfg| configure_routes(cfg, limiter));
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig, rate_limit: RateLimit) {
    extractor_config(cfg);
    cfg.service(
        web::scope("/api/contacts")
            .wrap(rate_limit)
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .configure(contacts::configure),
    )
    .service(
        web::scope("/api/auth")
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .service(users::signup)
            .service(users::login),
    )
    .service(
        web::scope("/api/users")
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .service(users::current_user),
    )
    .service(ready)
    .service(live);
}
