//! Credential adapters: argon2 password hashing and HS256 access tokens.

mod argon2_password_hasher;
mod jwt_token_codec;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_token_codec::{JwtConfig, JwtTokenCodec};
