//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters are thin: they translate between internal row structs and
//! validated domain types, and map driver errors to port errors. Connections
//! come from a `bb8` pool through `diesel-async`.
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselContactRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/contacts")).await?;
//! let contacts = DieselContactRepository::new(pool);
//! ```

mod diesel_contact_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_contact_repository::DieselContactRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
