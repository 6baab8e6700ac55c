//! Authentication primitives: signup and login payloads, password hashes and
//! issued access tokens.
//!
//! Handlers build these from raw request fields so services only ever see
//! validated values.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{EmailAddress, UserValidationError, Username};

/// Minimum accepted password length at signup.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length.
pub const PASSWORD_MAX: usize = 128;

/// Validation errors for signup and login payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username or email failed validation.
    User(UserValidationError),
    /// Login password was empty.
    EmptyPassword,
    /// Signup password was shorter than the minimum.
    PasswordTooShort {
        /// Minimum permitted characters.
        min: usize,
    },
    /// Password exceeded the maximum length.
    PasswordTooLong {
        /// Maximum permitted characters.
        max: usize,
    },
}

impl CredentialsValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::User(err) => err.field(),
            Self::EmptyPassword | Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => {
                "password"
            }
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

/// Plain-text password, zeroed on drop and redacted from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Password as provided at login: only emptiness is rejected.
    ///
    /// # Errors
    /// Returns [`CredentialsValidationError::EmptyPassword`] for `""`.
    pub fn presented(value: &str) -> Result<Self, CredentialsValidationError> {
        if value.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(value.to_owned())))
    }

    /// Password chosen at signup, subject to length bounds.
    ///
    /// # Errors
    /// Returns an error when the length is outside `6..=128` characters.
    pub fn chosen(value: &str) -> Result<Self, CredentialsValidationError> {
        let length = value.chars().count();
        if length < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(CredentialsValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(value.to_owned())))
    }

    /// Reveal the plain text for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Stored password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a [`crate::domain::ports::PasswordHasher`].
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Encoded PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.0
    }
}

/// Validated signup payload.
///
/// # Examples
/// ```
/// use backend::domain::SignupRequest;
///
/// let request = SignupRequest::try_from_parts("ada", "ada@example.com", "analytical")
///     .expect("valid signup");
/// assert_eq!(request.email().as_ref(), "ada@example.com");
/// assert!(SignupRequest::try_from_parts("ada", "ada@example.com", "short").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    username: Username,
    email: EmailAddress,
    password: Password,
}

impl SignupRequest {
    /// Validate raw signup fields; the email is trimmed.
    ///
    /// # Errors
    /// Returns the first invalid field.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            email: EmailAddress::new(email.trim()).map_err(UserValidationError::from)?,
            password: Password::chosen(password)?,
        })
    }

    /// Requested login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Account email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Chosen password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and well formed.
/// - `password` is non-empty; whitespace is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Validate raw login fields; the email is trimmed.
    ///
    /// # Errors
    /// Returns the first invalid field.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: EmailAddress::new(email.trim()).map_err(UserValidationError::from)?,
            password: Password::presented(password)?,
        })
    }

    /// Account email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Presented password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

/// Bearer token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessToken {
    /// Signed token to send as `Authorization: Bearer <token>`.
    #[schema(example = "eyJhbGciOiJIUzI1NiJ9.e30.signature")]
    pub access_token: String,
    /// Always `bearer`.
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Lifetime in seconds from issue.
    #[schema(example = 3600)]
    pub expires_in: i64,
}

impl AccessToken {
    /// Wrap a signed token as a bearer credential.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>, expires_in: i64) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_owned(),
            expires_in,
        }
    }
}
