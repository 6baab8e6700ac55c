//! Driving port for signup, login and bearer-token resolution.
//!
//! Inbound adapters call this port without knowing how passwords are hashed,
//! how tokens are signed, or where users are stored.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials, SignupRequest, User};

/// Account use cases for inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authentication: Send + Sync {
    /// Register an account; a taken email yields a conflict.
    async fn signup(&self, request: SignupRequest) -> Result<User, Error>;

    /// Exchange valid credentials for an access token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AccessToken, Error>;

    /// Resolve a bearer token to its user, or fail as unauthorised.
    async fn authenticate(&self, token: &str) -> Result<User, Error>;
}

/// Fixture that rejects every token and credential.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthentication;

#[async_trait]
impl Authentication for FixtureAuthentication {
    async fn signup(&self, _request: SignupRequest) -> Result<User, Error> {
        Err(Error::service_unavailable("signup is not available"))
    }

    async fn login(&self, _credentials: LoginCredentials) -> Result<AccessToken, Error> {
        Err(Error::unauthorized("invalid credentials"))
    }

    async fn authenticate(&self, _token: &str) -> Result<User, Error> {
        Err(Error::unauthorized("invalid or expired token"))
    }
}
