//! Bearer-token extraction for protected routes.
//!
//! [`AuthenticatedUser`] reads `Authorization: Bearer <token>` and resolves it
//! through the [`Authentication`](crate::domain::ports::Authentication) port
//! held in [`HttpState`]. Extraction fails with 401 before the handler body
//! runs, so no repository is touched for anonymous callers.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, User, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// The user resolved from the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    /// The resolved account.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.0
    }

    /// Identifier used to scope every contact operation.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.0.id()
    }

    /// Take ownership of the resolved account.
    #[must_use]
    pub fn into_inner(self) -> User {
        self.0
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// The scheme is matched case-insensitively.
fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    parse_bearer(value)
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let extracted = bearer_token(req);
        let configured = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state =
                configured.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let token = extracted
                .inspect_err(|err| debug!(reason = %err, "request without usable token"))?;
            state.auth.authenticate(&token).await.map(Self)
        })
    }
}
