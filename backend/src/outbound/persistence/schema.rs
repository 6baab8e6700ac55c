//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        #[max_length = 50]
        username -> Varchar,
        /// Unique login address.
        #[max_length = 100]
        email -> Varchar,
        /// Argon2 PHC string.
        #[max_length = 255]
        password_hash -> Varchar,
        confirmed -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Contacts, each owned by exactly one user.
    contacts (id) {
        id -> Int8,
        #[max_length = 50]
        first_name -> Varchar,
        #[max_length = 50]
        last_name -> Varchar,
        #[max_length = 100]
        email -> Nullable<Varchar>,
        #[max_length = 20]
        phone_number -> Varchar,
        birthday -> Nullable<Date>,
        /// Owning user; every query filters on it.
        user_id -> Int8,
    }
}

diesel::joinable!(contacts -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(contacts, users);
