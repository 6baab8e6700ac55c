//! Contact domain service.
//!
//! Implements the contact driving ports on top of a [`ContactRepository`],
//! supplying "today" from an injected clock and translating repository
//! failures into domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ContactRepository, ContactRepositoryError, ContactsCommand, ContactsQuery,
};
use crate::domain::{
    BirthdayWindow, Contact, ContactDraft, ContactId, ContactSearch, Error, Page, UserId,
};

fn map_repository_error(error: ContactRepositoryError) -> Error {
    match error {
        ContactRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("contact repository unavailable: {message}"))
        }
        ContactRepositoryError::Query { message } => {
            Error::internal(format!("contact repository error: {message}"))
        }
    }
}

/// Service implementing [`ContactsQuery`] and [`ContactsCommand`].
#[derive(Clone)]
pub struct ContactsService<R> {
    contact_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ContactsService<R> {
    /// Build the service over a repository and a clock supplying "today".
    #[must_use]
    pub const fn new(contact_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            contact_repo,
            clock,
        }
    }
}

#[async_trait]
impl<R> ContactsQuery for ContactsService<R>
where
    R: ContactRepository,
{
    async fn list(&self, owner: UserId, page: Page) -> Result<Vec<Contact>, Error> {
        self.contact_repo
            .list(owner, page)
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, owner: UserId, id: ContactId) -> Result<Option<Contact>, Error> {
        self.contact_repo
            .find(owner, id)
            .await
            .map_err(map_repository_error)
    }

    async fn search(&self, owner: UserId, search: ContactSearch) -> Result<Vec<Contact>, Error> {
        self.contact_repo
            .search(owner, &search)
            .await
            .map_err(map_repository_error)
    }

    async fn upcoming_birthdays(
        &self,
        owner: UserId,
        window: BirthdayWindow,
    ) -> Result<Vec<Contact>, Error> {
        let today = self.clock.utc().date_naive();
        self.contact_repo
            .upcoming_birthdays(owner, today, window)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> ContactsCommand for ContactsService<R>
where
    R: ContactRepository,
{
    async fn create(&self, owner: UserId, draft: ContactDraft) -> Result<Contact, Error> {
        let contact = self
            .contact_repo
            .create(owner, &draft)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %owner, contact_id = %contact.id(), "contact created");
        Ok(contact)
    }

    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        draft: ContactDraft,
    ) -> Result<Option<Contact>, Error> {
        let updated = self
            .contact_repo
            .update(owner, id, &draft)
            .await
            .map_err(map_repository_error)?;
        if updated.is_some() {
            info!(user_id = %owner, contact_id = %id, "contact updated");
        }
        Ok(updated)
    }

    async fn delete(&self, owner: UserId, id: ContactId) -> Result<Option<Contact>, Error> {
        let deleted = self
            .contact_repo
            .delete(owner, id)
            .await
            .map_err(map_repository_error)?;
        if deleted.is_some() {
            info!(user_id = %owner, contact_id = %id, "contact deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "contacts_service_tests.rs"]
mod tests;
