//! Turns domain [`Error`] values into JSON responses.
//!
//! Handlers return `ApiResult<T>` and let `?` do the rest. Internal failures
//! are logged in full and sent to clients with a fixed message and no details.

use std::borrow::Cow;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

impl From<ErrorCode> for StatusCode {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::InvalidRequest => Self::BAD_REQUEST,
            ErrorCode::Unauthorized => Self::UNAUTHORIZED,
            ErrorCode::Forbidden => Self::FORBIDDEN,
            ErrorCode::NotFound => Self::NOT_FOUND,
            ErrorCode::Conflict => Self::CONFLICT,
            ErrorCode::ValidationFailed => Self::UNPROCESSABLE_ENTITY,
            ErrorCode::TooManyRequests => Self::TOO_MANY_REQUESTS,
            ErrorCode::ServiceUnavailable => Self::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => Self::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The payload a client is allowed to see.
fn client_body(err: &Error) -> Cow<'_, Error> {
    if err.code() != ErrorCode::InternalError {
        return Cow::Borrowed(err);
    }
    // Blank ids are ignored, so a missing trace id keeps the ambient one.
    Cow::Owned(Error::internal(REDACTED_MESSAGE).with_trace_id(err.trace_id().unwrap_or_default()))
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.code().into()
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::InternalError {
            error!(
                message = %self.message(),
                trace_id = self.trace_id().unwrap_or("-"),
                "request failed with internal error"
            );
        }
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(client_body(self))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
