//! In-memory adapters for integration tests.
//!
//! Compiled for unit tests and behind the `test-support` feature. The
//! repositories honour the same ownership, ordering and search rules as the
//! Diesel adapters so HTTP flows can be exercised without PostgreSQL.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::Clock;

use crate::domain::ports::{
    ContactRepository, ContactRepositoryError, NewUser, UserCredentials, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    BirthdayWindow, Contact, ContactDraft, ContactId, ContactSearch, EmailAddress, Page, User,
    UserId, select_upcoming,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Default)]
struct ContactTable {
    last_id: i64,
    rows: BTreeMap<ContactId, Contact>,
}

/// Contact store keyed by id, iterated in ascending id order.
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    table: Mutex<ContactTable>,
}

impl InMemoryContactRepository {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn owned(&self, owner: UserId) -> Vec<Contact> {
        lock(&self.table)
            .rows
            .values()
            .filter(|c| c.user_id() == owner)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn list(
        &self,
        owner: UserId,
        page: Page,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let skip = usize::try_from(page.offset())
            .map_err(|err| ContactRepositoryError::query(err.to_string()))?;
        let take = usize::try_from(page.limit())
            .map_err(|err| ContactRepositoryError::query(err.to_string()))?;
        Ok(self.owned(owner).into_iter().skip(skip).take(take).collect())
    }

    async fn find(
        &self,
        owner: UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(lock(&self.table)
            .rows
            .get(&id)
            .filter(|c| c.user_id() == owner)
            .cloned())
    }

    async fn create(
        &self,
        owner: UserId,
        draft: &ContactDraft,
    ) -> Result<Contact, ContactRepositoryError> {
        let mut table = lock(&self.table);
        table.last_id += 1;
        let id = ContactId::new(table.last_id)
            .map_err(|err| ContactRepositoryError::query(err.to_string()))?;
        let contact = Contact::new(id, owner, draft.clone());
        table.rows.insert(id, contact.clone());
        Ok(contact)
    }

    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        draft: &ContactDraft,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut table = lock(&self.table);
        let Some(slot) = table.rows.get_mut(&id).filter(|c| c.user_id() == owner) else {
            return Ok(None);
        };
        *slot = slot.clone().with_draft(draft.clone());
        Ok(Some(slot.clone()))
    }

    async fn delete(
        &self,
        owner: UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut table = lock(&self.table);
        if !table.rows.get(&id).is_some_and(|c| c.user_id() == owner) {
            return Ok(None);
        }
        Ok(table.rows.remove(&id))
    }

    async fn search(
        &self,
        owner: UserId,
        search: &ContactSearch,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(self
            .owned(owner)
            .into_iter()
            .filter(|c| search.matches(c))
            .collect())
    }

    async fn upcoming_birthdays(
        &self,
        owner: UserId,
        today: NaiveDate,
        window: BirthdayWindow,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(select_upcoming(self.owned(owner), today, window))
    }
}

#[derive(Debug, Default)]
struct UserTable {
    last_id: i64,
    rows: Vec<UserCredentials>,
}

/// User store enforcing unique email addresses.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl InMemoryUserRepository {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut table = lock(&self.table);
        if table.rows.iter().any(|row| row.user.email() == &user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_str()));
        }
        table.last_id += 1;
        let id = UserId::new(table.last_id)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let created = User::new(id, user.username.clone(), user.email.clone(), false);
        table.rows.push(UserCredentials {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        Ok(lock(&self.table)
            .rows
            .iter()
            .find(|row| row.user.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.table)
            .rows
            .iter()
            .find(|row| row.user.id() == id)
            .map(|row| row.user.clone()))
    }
}
