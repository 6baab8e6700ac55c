//! Contact records owned by a single user.
//!
//! A [`ContactDraft`] carries the caller-editable fields and is what create and
//! update accept. A [`Contact`] adds the store-assigned identifier and the
//! owning [`UserId`].

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailAddress, EmailValidationError, UserId};

/// Maximum length of a first or last name.
pub const NAME_MAX: usize = 50;
/// Maximum length of a phone number.
pub const PHONE_NUMBER_MAX: usize = 20;

/// Validation failures for contact fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Identifier was zero or negative.
    InvalidId,
    /// Required text field was blank.
    EmptyField {
        /// Offending field name.
        field: &'static str,
    },
    /// Text field exceeded its length bound.
    FieldTooLong {
        /// Offending field name.
        field: &'static str,
        /// Maximum permitted characters.
        max: usize,
    },
    /// Email address failed validation.
    Email(EmailValidationError),
}

impl ContactValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyField { field } | Self::FieldTooLong { field, .. } => field,
            Self::Email(_) => "email",
        }
    }
}

impl fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "contact id must be positive"),
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::Email(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ContactValidationError {}

impl From<EmailValidationError> for ContactValidationError {
    fn from(value: EmailValidationError) -> Self {
        Self::Email(value)
    }
}

/// Store-assigned contact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ContactId(i64);

impl ContactId {
    /// Validate and construct a [`ContactId`]; identifiers are positive.
    ///
    /// # Errors
    /// Returns [`ContactValidationError::InvalidId`] for zero or negative ids.
    pub const fn new(id: i64) -> Result<Self, ContactValidationError> {
        if id <= 0 {
            return Err(ContactValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Raw database value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ContactId> for i64 {
    fn from(value: ContactId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for ContactId {
    type Error = ContactValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn bounded_text(
    value: String,
    field: &'static str,
    max: usize,
) -> Result<String, ContactValidationError> {
    if value.trim().is_empty() {
        return Err(ContactValidationError::EmptyField { field });
    }
    if value.chars().count() > max {
        return Err(ContactValidationError::FieldTooLong { field, max });
    }
    Ok(value)
}

/// Validated, caller-editable contact fields.
///
/// # Examples
/// ```
/// use backend::domain::ContactDraft;
///
/// let draft = ContactDraft::try_from_parts("Ada", "Lovelace", None, "555-0100", None)
///     .expect("valid draft");
/// assert_eq!(draft.first_name(), "Ada");
/// assert!(ContactDraft::try_from_parts("", "Lovelace", None, "555-0100", None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    first_name: String,
    last_name: String,
    email: Option<EmailAddress>,
    phone_number: String,
    birthday: Option<NaiveDate>,
}

impl ContactDraft {
    /// Validate raw field values.
    ///
    /// # Errors
    /// Returns the first field that is blank, too long or not an email.
    pub fn try_from_parts(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: Option<String>,
        phone_number: impl Into<String>,
        birthday: Option<NaiveDate>,
    ) -> Result<Self, ContactValidationError> {
        Ok(Self {
            first_name: bounded_text(first_name.into(), "first_name", NAME_MAX)?,
            last_name: bounded_text(last_name.into(), "last_name", NAME_MAX)?,
            email: email.map(EmailAddress::new).transpose()?,
            phone_number: bounded_text(phone_number.into(), "phone_number", PHONE_NUMBER_MAX)?,
            birthday,
        })
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Optional email address.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Phone number as entered.
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Optional date of birth.
    #[must_use]
    pub const fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }
}

/// Persisted contact belonging to exactly one user.
///
/// ## Invariants
/// - `id` and `user_id` are store-assigned and positive.
/// - Field bounds match [`ContactDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "ContactDto", into = "ContactDto")]
pub struct Contact {
    #[schema(value_type = i64, example = 12)]
    id: ContactId,
    #[schema(value_type = String, example = "Ada")]
    first_name: String,
    #[schema(value_type = String, example = "Lovelace")]
    last_name: String,
    #[schema(value_type = Option<String>, example = "ada@example.com")]
    email: Option<EmailAddress>,
    #[schema(value_type = String, example = "+44 20 7946 0000")]
    phone_number: String,
    #[schema(value_type = Option<String>, format = Date, example = "1815-12-10")]
    birthday: Option<NaiveDate>,
    #[schema(value_type = i64, example = 1)]
    user_id: UserId,
}

impl Contact {
    /// Combine a validated draft with its identifiers.
    #[must_use]
    pub fn new(id: ContactId, user_id: UserId, draft: ContactDraft) -> Self {
        let ContactDraft {
            first_name,
            last_name,
            email,
            phone_number,
            birthday,
        } = draft;
        Self {
            id,
            first_name,
            last_name,
            email,
            phone_number,
            birthday,
            user_id,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> ContactId {
        self.id
    }

    /// Owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Optional email address.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Phone number as entered.
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Optional date of birth.
    #[must_use]
    pub const fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    /// Replace every editable field, keeping identity and ownership.
    #[must_use]
    pub fn with_draft(self, draft: ContactDraft) -> Self {
        Self::new(self.id, self.user_id, draft)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContactDto {
    id: i64,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone_number: String,
    birthday: Option<NaiveDate>,
    user_id: i64,
}

impl From<Contact> for ContactDto {
    fn from(value: Contact) -> Self {
        Self {
            id: value.id.into(),
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email.map(String::from),
            phone_number: value.phone_number,
            birthday: value.birthday,
            user_id: value.user_id.into(),
        }
    }
}

impl TryFrom<ContactDto> for Contact {
    type Error = ContactValidationError;

    fn try_from(value: ContactDto) -> Result<Self, Self::Error> {
        let id = ContactId::new(value.id)?;
        let user_id = UserId::new(value.user_id).map_err(|_| ContactValidationError::InvalidId)?;
        let draft = ContactDraft::try_from_parts(
            value.first_name,
            value.last_name,
            value.email,
            value.phone_number,
            value.birthday,
        )?;
        Ok(Self::new(id, user_id, draft))
    }
}

#[cfg(test)]
#[path = "contact_tests.rs"]
mod tests;
