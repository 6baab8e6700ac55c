//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; adapters convert them into
//! validated domain types.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::{contacts, users};

/// Row read from the `users` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub confirmed: bool,
}

/// Insertable user created at signup.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Row read from the `contacts` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    pub user_id: i64,
}

/// Insertable contact.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub(crate) struct NewContactRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone_number: &'a str,
    pub birthday: Option<NaiveDate>,
    pub user_id: i64,
}

/// Full overwrite of a contact's editable columns.
///
/// `treat_none_as_null` makes a missing email or birthday clear the column
/// rather than leave it untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ContactChangeset<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone_number: &'a str,
    pub birthday: Option<NaiveDate>,
}
