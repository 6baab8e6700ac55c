//! Driven port for user accounts and their stored credentials.
use async_trait::async_trait;

use crate::domain::{EmailAddress, PasswordHash, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Account data to insert at signup.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Chosen login name.
    pub username: Username,
    /// Unique account email.
    pub email: EmailAddress,
    /// Hash of the chosen password.
    pub password_hash: PasswordHash,
}

/// A user together with the hash their password is checked against.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// Stored account.
    pub user: User,
    /// Stored password hash.
    pub password_hash: PasswordHash,
}

/// Port for persisting user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new, unconfirmed user.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user and password hash by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}
