//! Request middleware: trace identifiers and rate limiting.

pub mod rate_limit;
pub mod trace;

pub use rate_limit::{RateLimit, RateLimitConfig};
pub use trace::Trace;
