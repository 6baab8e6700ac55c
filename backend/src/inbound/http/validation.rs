//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain validation failures and extractor rejections both surface as
//! `422 Unprocessable Entity` carrying `{"field", "code"}` details.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{
    BirthdayWindowError, ContactValidationError, CredentialsValidationError, EmailValidationError,
    Error, PageValidationError, UserValidationError,
};

/// Machine-readable reason attached to validation details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DetailCode {
    Empty,
    TooShort,
    TooLong,
    InvalidFormat,
    InvalidId,
    OutOfRange,
    Negative,
    MalformedBody,
    MalformedQuery,
}

impl DetailCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::InvalidFormat => "invalid_format",
            Self::InvalidId => "invalid_id",
            Self::OutOfRange => "out_of_range",
            Self::Negative => "negative",
            Self::MalformedBody => "malformed_body",
            Self::MalformedQuery => "malformed_query",
        }
    }
}

fn field_error(field: &str, code: DetailCode, message: impl Into<String>) -> Error {
    Error::validation_failed(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

fn email_code(err: &EmailValidationError) -> DetailCode {
    match err {
        EmailValidationError::Empty => DetailCode::Empty,
        EmailValidationError::TooLong { .. } => DetailCode::TooLong,
        EmailValidationError::InvalidFormat => DetailCode::InvalidFormat,
    }
}

fn user_code(err: &UserValidationError) -> DetailCode {
    match err {
        UserValidationError::InvalidId => DetailCode::InvalidId,
        UserValidationError::EmptyUsername => DetailCode::Empty,
        UserValidationError::UsernameTooLong { .. } => DetailCode::TooLong,
        UserValidationError::Email(inner) => email_code(inner),
    }
}

pub(crate) fn contact_validation_error(err: &ContactValidationError) -> Error {
    let code = match err {
        ContactValidationError::InvalidId => DetailCode::InvalidId,
        ContactValidationError::EmptyField { .. } => DetailCode::Empty,
        ContactValidationError::FieldTooLong { .. } => DetailCode::TooLong,
        ContactValidationError::Email(inner) => email_code(inner),
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn credentials_validation_error(err: &CredentialsValidationError) -> Error {
    let code = match err {
        CredentialsValidationError::User(inner) => user_code(inner),
        CredentialsValidationError::EmptyPassword => DetailCode::Empty,
        CredentialsValidationError::PasswordTooShort { .. } => DetailCode::TooShort,
        CredentialsValidationError::PasswordTooLong { .. } => DetailCode::TooLong,
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn page_validation_error(err: &PageValidationError) -> Error {
    let code = match *err {
        PageValidationError::LimitOutOfRange { .. } => DetailCode::OutOfRange,
        PageValidationError::NegativeOffset => DetailCode::Negative,
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn birthday_window_error(err: &BirthdayWindowError) -> Error {
    field_error("days", DetailCode::OutOfRange, err.to_string())
}

/// `JsonConfig` error handler: malformed or mistyped bodies become 422.
#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor error handlers receive the error by value"
)]
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected JSON payload");
    Error::validation_failed(format!("request body is invalid: {err}"))
        .with_details(json!({ "code": DetailCode::MalformedBody.as_str() }))
        .into()
}

/// `QueryConfig` error handler: unparsable query strings become 422.
#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor error handlers receive the error by value"
)]
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected query string");
    Error::validation_failed(format!("query string is invalid: {err}"))
        .with_details(json!({ "code": DetailCode::MalformedQuery.as_str() }))
        .into()
}

/// `PathConfig` error handler.
///
/// Path segments are only ever resource identifiers, so an identifier that
/// cannot be parsed names nothing the caller owns.
#[expect(
    clippy::needless_pass_by_value,
    reason = "actix extractor error handlers receive the error by value"
)]
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected path segment");
    Error::not_found("resource not found").into()
}

/// Extractor configuration applying the handlers above.
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
