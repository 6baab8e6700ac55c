//! Wires outbound adapters into the services behind [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::{AuthService, ContactsService};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{DbPool, DieselContactRepository, DieselUserRepository};
use backend::outbound::security::{Argon2PasswordHasher, JwtConfig, JwtTokenCodec};

/// Build the handler state over a shared pool, one clock for every service.
pub(super) fn build_http_state(pool: &DbPool, jwt: &JwtConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let contacts = Arc::new(ContactsService::new(
        Arc::new(DieselContactRepository::new(pool.clone())),
        Arc::clone(&clock),
    ));
    let auth = Arc::new(AuthService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher),
        Arc::new(JwtTokenCodec::new(jwt)),
        clock,
    ));

    web::Data::new(HttpState::new(contacts.clone(), contacts, auth))
}
