//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and only see driving
//! ports, so they stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::{Authentication, ContactsCommand, ContactsQuery};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::ContactsService;
/// use backend::domain::ports::{FixtureAuthentication, FixtureContactRepository};
/// use backend::inbound::http::state::HttpState;
/// use mockable::DefaultClock;
///
/// let contacts = Arc::new(ContactsService::new(
///     Arc::new(FixtureContactRepository),
///     Arc::new(DefaultClock),
/// ));
/// let state = HttpState::new(contacts.clone(), contacts, Arc::new(FixtureAuthentication));
/// let _auth = state.auth.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    /// Read-side contact port.
    pub contacts_query: Arc<dyn ContactsQuery>,
    /// Write-side contact port.
    pub contacts_command: Arc<dyn ContactsCommand>,
    /// Signup, login and token resolution.
    pub auth: Arc<dyn Authentication>,
}

impl HttpState {
    /// Bundle the driving ports for handlers.
    #[must_use]
    pub const fn new(
        contacts_query: Arc<dyn ContactsQuery>,
        contacts_command: Arc<dyn ContactsCommand>,
        auth: Arc<dyn Authentication>,
    ) -> Self {
        Self {
            contacts_query,
            contacts_command,
            auth,
        }
    }
}
