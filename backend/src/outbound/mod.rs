//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **security**: password hashing and bearer-token signing
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod persistence;
pub mod security;
