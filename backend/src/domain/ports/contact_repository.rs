//! Driven port for owner-scoped contact persistence.
//!
//! Every operation takes the acting [`UserId`] and adapters must apply it as a
//! mandatory filter. A contact owned by someone else is indistinguishable from
//! one that does not exist: both come back as `None` or are absent from lists.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{BirthdayWindow, Contact, ContactDraft, ContactId, ContactSearch, Page, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by contact repository adapters.
    pub enum ContactRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "contact repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "contact repository query failed: {message}",
    }
}

/// Port for reading and mutating a user's contacts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Page through the owner's contacts in ascending id order.
    async fn list(&self, owner: UserId, page: Page)
    -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Fetch one contact if it exists and belongs to `owner`.
    async fn find(
        &self,
        owner: UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Insert a contact for `owner` and return it with its new id.
    async fn create(
        &self,
        owner: UserId,
        draft: &ContactDraft,
    ) -> Result<Contact, ContactRepositoryError>;

    /// Overwrite every editable field of an owned contact.
    ///
    /// Returns `None` when no such contact is owned by `owner`; never inserts.
    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        draft: &ContactDraft,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Remove an owned contact and return its last state.
    async fn delete(
        &self,
        owner: UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Exact-match search with OR-combined filters, ascending id order.
    async fn search(
        &self,
        owner: UserId,
        search: &ContactSearch,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Contacts whose next birthday falls within `window` days of `today`.
    async fn upcoming_birthdays(
        &self,
        owner: UserId,
        today: NaiveDate,
        window: BirthdayWindow,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;
}

/// Fixture repository holding no contacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactRepository;

#[async_trait]
impl ContactRepository for FixtureContactRepository {
    async fn list(
        &self,
        _owner: UserId,
        _page: Page,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(
        &self,
        _owner: UserId,
        _id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn create(
        &self,
        _owner: UserId,
        _draft: &ContactDraft,
    ) -> Result<Contact, ContactRepositoryError> {
        Err(ContactRepositoryError::query(
            "fixture repository does not persist contacts",
        ))
    }

    async fn update(
        &self,
        _owner: UserId,
        _id: ContactId,
        _draft: &ContactDraft,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn delete(
        &self,
        _owner: UserId,
        _id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn search(
        &self,
        _owner: UserId,
        _search: &ContactSearch,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(Vec::new())
    }

    async fn upcoming_birthdays(
        &self,
        _owner: UserId,
        _today: NaiveDate,
        _window: BirthdayWindow,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(Vec::new())
    }
}
