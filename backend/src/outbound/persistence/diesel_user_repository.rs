//! PostgreSQL-backed `UserRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUser, UserCredentials, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordHash, User, UserId};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Build a user repository over a shared connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_credentials(row: UserRow) -> Result<UserCredentials, UserPersistenceError> {
    let UserRow {
        id,
        username,
        email,
        password_hash,
        confirmed,
    } = row;
    let user = User::try_from_parts(id, username, email, confirmed)
        .map_err(|err| UserPersistenceError::query(format!("stored user {id} is invalid: {err}")))?;
    Ok(UserCredentials {
        user,
        password_hash: PasswordHash::new(password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            username: user.username.as_ref(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
        };
        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_email(user.email.as_str())
                } else {
                    diesel_error(err)
                }
            })?;
        row_to_credentials(inserted).map(|stored| stored.user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_credentials).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_i64()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| row_to_credentials(row).map(|stored| stored.user))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rows_become_credentials() {
        let row = UserRow {
            id: 3,
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: "$argon2id$stored".to_owned(),
            confirmed: false,
        };
        let stored = row_to_credentials(row).expect("valid row");
        assert_eq!(stored.user.id().as_i64(), 3);
        assert_eq!(stored.password_hash.as_str(), "$argon2id$stored");
    }

    #[rstest]
    fn corrupt_rows_surface_as_query_errors() {
        let row = UserRow {
            id: 3,
            username: "ada".to_owned(),
            email: "not-an-email".to_owned(),
            password_hash: String::new(),
            confirmed: false,
        };
        assert!(matches!(
            row_to_credentials(row),
            Err(UserPersistenceError::Query { .. })
        ));
    }
}
