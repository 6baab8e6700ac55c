//! Driving port for reading a user's contacts.

use async_trait::async_trait;

use crate::domain::{BirthdayWindow, Contact, ContactId, ContactSearch, Error, Page, UserId};

/// Read-side contact use cases for inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsQuery: Send + Sync {
    /// One page of the owner's contacts in ascending id order.
    async fn list(&self, owner: UserId, page: Page) -> Result<Vec<Contact>, Error>;

    /// `Ok(None)` when the contact is missing or owned by someone else.
    async fn get(&self, owner: UserId, id: ContactId) -> Result<Option<Contact>, Error>;

    /// Exact-match search with filters combined by OR.
    async fn search(&self, owner: UserId, search: ContactSearch) -> Result<Vec<Contact>, Error>;

    /// Birthdays in the window starting today, by the service clock.
    async fn upcoming_birthdays(
        &self,
        owner: UserId,
        window: BirthdayWindow,
    ) -> Result<Vec<Contact>, Error>;
}
