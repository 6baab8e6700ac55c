//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailAddress, EmailValidationError};

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 50;

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was zero or negative.
    InvalidId,
    /// Username was blank.
    EmptyUsername,
    /// Username exceeded its length bound.
    UsernameTooLong {
        /// Maximum permitted characters.
        max: usize,
    },
    /// Email address failed validation.
    Email(EmailValidationError),
}

impl UserValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyUsername | Self::UsernameTooLong { .. } => "username",
            Self::Email(_) => "email",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be positive"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::Email(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<EmailValidationError> for UserValidationError {
    fn from(value: EmailValidationError) -> Self {
        Self::Email(value)
    }
}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and construct a [`UserId`]; identifiers are positive.
    ///
    /// # Errors
    /// Returns [`UserValidationError::InvalidId`] for zero or negative ids.
    pub const fn new(id: i64) -> Result<Self, UserValidationError> {
        if id <= 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Raw database value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login name chosen at signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Errors
    /// Returns an error for blank or overlong names.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let name: String = value.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if name.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered account that owns contacts.
///
/// ## Invariants
/// - `id` is positive and assigned by the store.
/// - `email` is unique across users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    #[schema(value_type = i64, example = 1)]
    id: UserId,
    #[schema(value_type = String, example = "ada")]
    username: Username,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
    confirmed: bool,
}

impl User {
    /// Build a [`User`] from validated components.
    #[must_use]
    pub const fn new(id: UserId, username: Username, email: EmailAddress, confirmed: bool) -> Self {
        Self {
            id,
            username,
            email,
            confirmed,
        }
    }

    /// Fallible constructor from raw column values.
    ///
    /// # Errors
    /// Returns the first component that fails validation.
    pub fn try_from_parts(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        confirmed: bool,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(
            UserId::new(id)?,
            Username::new(username)?,
            EmailAddress::new(email)?,
            confirmed,
        ))
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Unique account email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Whether the address has been confirmed. Stored but not enforced.
    #[must_use]
    pub const fn confirmed(&self) -> bool {
        self.confirmed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDto {
    id: i64,
    username: String,
    email: String,
    #[serde(default)]
    confirmed: bool,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            username,
            email,
            confirmed,
        } = value;
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            confirmed,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.id, value.username, value.email, value.confirmed)
    }
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
