//! PostgreSQL-backed `ContactRepository` using Diesel.
//!
//! Every statement carries `contacts.user_id = $owner`. Update and delete are
//! single `UPDATE ... RETURNING` / `DELETE ... RETURNING` statements, so an
//! absent or foreign row simply yields no result.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ContactRepository, ContactRepositoryError};
use crate::domain::{
    BirthdayWindow, Contact, ContactDraft, ContactId, ContactSearch, Page, UserId,
    select_upcoming,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ContactChangeset, ContactRow, NewContactRow};
use super::pool::{DbPool, PoolError};
use super::schema::contacts;

type ContactPredicate = Box<dyn BoxableExpression<contacts::table, Pg, SqlType = Bool>>;

/// Diesel implementation of the contact repository port.
#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    /// Build a contact repository over a shared connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ContactRepositoryError {
    map_pool_error(error, ContactRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ContactRepositoryError {
    map_diesel_error(
        error,
        ContactRepositoryError::query,
        ContactRepositoryError::connection,
    )
}

fn row_to_contact(row: ContactRow) -> Result<Contact, ContactRepositoryError> {
    let ContactRow {
        id,
        first_name,
        last_name,
        email,
        phone_number,
        birthday,
        user_id,
    } = row;
    let invalid = |err: &dyn std::fmt::Display| {
        ContactRepositoryError::query(format!("stored contact {id} is invalid: {err}"))
    };
    let contact_id = ContactId::new(id).map_err(|err| invalid(&err))?;
    let owner = UserId::new(user_id).map_err(|err| invalid(&err))?;
    let draft = ContactDraft::try_from_parts(first_name, last_name, email, phone_number, birthday)
        .map_err(|err| invalid(&err))?;
    Ok(Contact::new(contact_id, owner, draft))
}

fn rows_to_contacts(rows: Vec<ContactRow>) -> Result<Vec<Contact>, ContactRepositoryError> {
    rows.into_iter().map(row_to_contact).collect()
}

/// OR together the supplied filters; `None` when there are none.
fn search_predicate(search: &ContactSearch) -> Option<ContactPredicate> {
    let mut clauses: Vec<ContactPredicate> = Vec::with_capacity(3);
    if let Some(first_name) = search.first_name() {
        clauses.push(Box::new(contacts::first_name.eq(first_name.to_owned())));
    }
    if let Some(last_name) = search.last_name() {
        clauses.push(Box::new(contacts::last_name.eq(last_name.to_owned())));
    }
    if let Some(email) = search.email() {
        // NULL emails compare as unknown, which WHERE treats as false.
        clauses.push(Box::new(
            contacts::email.assume_not_null().eq(email.to_owned()),
        ));
    }
    clauses
        .into_iter()
        .reduce(|acc, next| -> ContactPredicate { Box::new(acc.or(next)) })
}

fn changeset(draft: &ContactDraft) -> ContactChangeset<'_> {
    ContactChangeset {
        first_name: draft.first_name(),
        last_name: draft.last_name(),
        email: draft.email().map(|email| email.as_str()),
        phone_number: draft.phone_number(),
        birthday: draft.birthday(),
    }
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn list(
        &self,
        owner: UserId,
        page: Page,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::user_id.eq(owner.as_i64()))
            .order(contacts::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_contacts(rows)
    }

    async fn find(
        &self,
        owner: UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = contacts::table
            .filter(contacts::id.eq(id.as_i64()))
            .filter(contacts::user_id.eq(owner.as_i64()))
            .select(ContactRow::as_select())
            .first::<ContactRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_contact).transpose()
    }

    async fn create(
        &self,
        owner: UserId,
        draft: &ContactDraft,
    ) -> Result<Contact, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let new_row = NewContactRow {
            first_name: draft.first_name(),
            last_name: draft.last_name(),
            email: draft.email().map(|email| email.as_str()),
            phone_number: draft.phone_number(),
            birthday: draft.birthday(),
            user_id: owner.as_i64(),
        };
        let row = diesel::insert_into(contacts::table)
            .values(&new_row)
            .returning(ContactRow::as_returning())
            .get_result::<ContactRow>(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_contact(row)
    }

    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        draft: &ContactDraft,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let target = contacts::table
            .filter(contacts::id.eq(id.as_i64()))
            .filter(contacts::user_id.eq(owner.as_i64()));
        let row = diesel::update(target)
            .set(&changeset(draft))
            .returning(ContactRow::as_returning())
            .get_result::<ContactRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_contact).transpose()
    }

    async fn delete(
        &self,
        owner: UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let target = contacts::table
            .filter(contacts::id.eq(id.as_i64()))
            .filter(contacts::user_id.eq(owner.as_i64()));
        let row = diesel::delete(target)
            .returning(ContactRow::as_returning())
            .get_result::<ContactRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_contact).transpose()
    }

    async fn search(
        &self,
        owner: UserId,
        search: &ContactSearch,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = contacts::table
            .filter(contacts::user_id.eq(owner.as_i64()))
            .into_boxed();
        if let Some(predicate) = search_predicate(search) {
            query = query.filter(predicate);
        }
        let rows: Vec<ContactRow> = query
            .order(contacts::id.asc())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_contacts(rows)
    }

    async fn upcoming_birthdays(
        &self,
        owner: UserId,
        today: NaiveDate,
        window: BirthdayWindow,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        // Month-day arithmetic across the year boundary is done in Rust; the
        // query only narrows to the owner's contacts that have a birthday.
        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::user_id.eq(owner.as_i64()))
            .filter(contacts::birthday.is_not_null())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(select_upcoming(rows_to_contacts(rows)?, today, window))
    }
}
