//! Validated email address shared by users and contacts.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum stored length for an email address.
pub const EMAIL_MAX: usize = 100;

/// Reasons an email address is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    /// Address was blank.
    Empty,
    /// Address exceeded the stored length.
    TooLong {
        /// Maximum permitted characters.
        max: usize,
    },
    /// Address did not look like `local@domain.tld`.
    InvalidFormat,
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "email must not be empty"),
            Self::TooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidFormat => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One `@`, a non-empty local part and a dotted domain.
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address accepted by the API.
///
/// # Examples
/// ```
/// use backend::domain::EmailAddress;
///
/// let email = EmailAddress::new("ada@example.com").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// # Errors
    /// Returns an [`EmailValidationError`] for blank, overlong or malformed
    /// input.
    pub fn new(value: impl Into<String>) -> Result<Self, EmailValidationError> {
        let address: String = value.into();
        if address.trim().is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if address.chars().count() > EMAIL_MAX {
            return Err(EmailValidationError::TooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&address) {
            return Err(EmailValidationError::InvalidFormat);
        }
        Ok(Self(address))
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
