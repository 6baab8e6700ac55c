//! Authentication service backing the [`Authentication`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    Authentication, NewUser, PasswordHasher, PasswordHasherError, TokenCodec, TokenCodecError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{AccessToken, Error, LoginCredentials, SignupRequest, User};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const INVALID_TOKEN: &str = "invalid or expired token";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("an account with this email already exists")
        }
    }
}

fn map_hasher_error(error: &PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Signup, login and token resolution over injected adapters.
#[derive(Clone)]
pub struct AuthService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> AuthService<U, H, T> {
    /// Build the service from its driven adapters.
    #[must_use]
    pub const fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

#[async_trait]
impl<U, H, T> Authentication for AuthService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn signup(&self, request: SignupRequest) -> Result<User, Error> {
        if self
            .users
            .find_by_email(request.email())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict("an account with this email already exists"));
        }

        let password_hash = self
            .hasher
            .hash(request.password())
            .map_err(|err| map_hasher_error(&err))?;
        let user = self
            .users
            .create(&NewUser {
                username: request.username().clone(),
                email: request.email().clone(),
                password_hash,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AccessToken, Error> {
        let Some(stored) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let valid = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(|err| map_hasher_error(&err))?;
        if !valid {
            debug!(user_id = %stored.user.id(), "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let issued = self
            .tokens
            .issue(stored.user.id(), self.clock.utc())
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(AccessToken::bearer(issued.token, issued.expires_in_seconds))
    }

    async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let user_id = match self.tokens.verify(token, self.clock.utc()) {
            Ok(id) => id,
            Err(err @ (TokenCodecError::Invalid { .. } | TokenCodecError::Expired)) => {
                debug!(error = %err, "rejected bearer token");
                return Err(Error::unauthorized(INVALID_TOKEN));
            }
            Err(err @ TokenCodecError::Encode { .. }) => {
                return Err(Error::internal(err.to_string()));
            }
        };

        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
