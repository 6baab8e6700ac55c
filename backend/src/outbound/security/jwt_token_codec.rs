//! HS256 JSON Web Token implementation of the `TokenCodec` port.
//!
//! Expiry is checked against the instant handed in by the caller instead of
//! the system clock, so services driven by an injected clock stay
//! deterministic.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::domain::ports::{IssuedToken, TokenCodec, TokenCodecError};

/// Signing secret and token lifetime.
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 signing secret shared by issue and verify.
    pub secret: String,
    /// Lifetime of each issued token.
    pub ttl_seconds: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AccessTokenClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 tokens whose subject is the user id.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokenCodec {
    /// Derive signing and verification keys from `config`.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::seconds(config.ttl_seconds),
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(
        &self,
        user: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenCodecError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenCodecError::encode("token expiry overflow"))?;
        let claims = AccessTokenClaims {
            sub: user.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenCodecError::encode(err.to_string()))?;
        Ok(IssuedToken {
            token,
            expires_in_seconds: self.ttl.num_seconds(),
        })
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenCodecError> {
        let data = decode::<AccessTokenClaims>(token, &self.decoding, &Self::validation())
            .map_err(|err| TokenCodecError::invalid(err.to_string()))?;
        if data.claims.exp <= now.timestamp() {
            return Err(TokenCodecError::expired());
        }
        data.claims
            .sub
            .parse::<i64>()
            .ok()
            .and_then(|raw| UserId::new(raw).ok())
            .ok_or_else(|| TokenCodecError::invalid("subject is not a user id"))
    }
}
