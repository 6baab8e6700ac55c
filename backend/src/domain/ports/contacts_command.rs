//! Driving port for contact mutations.

use async_trait::async_trait;

use crate::domain::{Contact, ContactDraft, ContactId, Error, UserId};

/// Write-side contact use cases for inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsCommand: Send + Sync {
    /// Store a new contact owned by `owner`.
    async fn create(&self, owner: UserId, draft: ContactDraft) -> Result<Contact, Error>;

    /// Replace an owned contact's fields; `Ok(None)` when it is not owned.
    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        draft: ContactDraft,
    ) -> Result<Option<Contact>, Error>;

    /// Remove an owned contact, returning its last state.
    async fn delete(&self, owner: UserId, id: ContactId) -> Result<Option<Contact>, Error>;
}
