//! Driven port for issuing and verifying bearer access tokens.

use chrono::{DateTime, Utc};

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codecs.
    pub enum TokenCodecError {
        /// Signing the token failed.
        Encode { message: String } => "failed to issue access token: {message}",
        /// Signature, structure or claims are invalid.
        Invalid { message: String } => "access token is invalid: {message}",
        /// The token's expiry has passed.
        Expired => "access token has expired",
    }
}

/// A freshly signed token and its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded token.
    pub token: String,
    /// Seconds until expiry.
    pub expires_in_seconds: i64,
}

/// Port for signing and checking bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token identifying `user`, valid from `issued_at`.
    fn issue(&self, user: UserId, issued_at: DateTime<Utc>)
    -> Result<IssuedToken, TokenCodecError>;

    /// Validate `token` at instant `now` and return its subject.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenCodecError>;
}
