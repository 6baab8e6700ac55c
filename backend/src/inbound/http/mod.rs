//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod contacts;
pub mod error;
pub mod health;
pub mod routes;
pub mod state;
pub mod users;
pub mod validation;

pub use error::ApiResult;
