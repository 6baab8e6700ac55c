//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenCodec`]) are
//! implemented by outbound adapters. Driving ports ([`ContactsQuery`],
//! [`ContactsCommand`], [`Authentication`]) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod authentication;
mod contact_repository;
mod contacts_command;
mod contacts_query;
mod password_hasher;
mod token_codec;
mod user_repository;

#[cfg(test)]
pub use authentication::MockAuthentication;
pub use authentication::{Authentication, FixtureAuthentication};
#[cfg(test)]
pub use contact_repository::MockContactRepository;
pub use contact_repository::{
    ContactRepository, ContactRepositoryError, FixtureContactRepository,
};
#[cfg(test)]
pub use contacts_command::MockContactsCommand;
pub use contacts_command::ContactsCommand;
#[cfg(test)]
pub use contacts_query::MockContactsQuery;
pub use contacts_query::ContactsQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{IssuedToken, TokenCodec, TokenCodecError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, UserCredentials, UserPersistenceError, UserRepository};
