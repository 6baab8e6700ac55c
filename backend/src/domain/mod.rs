//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed entities used by the HTTP and persistence
//! adapters, the services implementing the driving ports, and the port traits
//! themselves. Types are immutable once validated.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Contact, ContactDraft: core entities.
//! - ContactSearch, Page, BirthdayWindow: query parameters.
//! - ContactsService, AuthService: driving port implementations.

pub mod auth;
pub mod auth_service;
pub mod birthdays;
pub mod contact;
pub mod contact_search;
pub mod contacts_service;
pub mod email;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    AccessToken, CredentialsValidationError, LoginCredentials, Password, PasswordHash,
    SignupRequest,
};
pub use self::auth_service::AuthService;
pub use self::birthdays::{
    BirthdayWindow, BirthdayWindowError, days_until, is_upcoming, next_occurrence,
    select_upcoming,
};
pub use self::contact::{Contact, ContactDraft, ContactId, ContactValidationError};
pub use self::contact_search::ContactSearch;
pub use self::contacts_service::ContactsService;
pub use self::email::{EmailAddress, EmailValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::pagination::{Page, PageValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserValidationError, Username};
