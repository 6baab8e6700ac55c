//! Integration tests for `DieselContactRepository` against embedded PostgreSQL.
//!
//! Every test runs on its own migrated database. Two accounts are seeded
//! through `DieselUserRepository` so ownership scoping is exercised against
//! real foreign keys.

use backend::domain::ports::{ContactRepository, NewUser, UserRepository};
use backend::domain::{
    BirthdayWindow, Contact, ContactDraft, ContactId, ContactSearch, EmailAddress, Page,
    PasswordHash, UserId, Username,
};
use backend::outbound::persistence::{DieselContactRepository, DieselUserRepository};
use chrono::NaiveDate;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{MigratedDatabase, handle_cluster_setup_failure, migrated_database};

struct TestContext {
    runtime: Runtime,
    repository: DieselContactRepository,
    owner: UserId,
    other: UserId,
    _database: MigratedDatabase,
}

impl TestContext {
    fn create(&self, owner: UserId, draft: &ContactDraft) -> Contact {
        self.runtime
            .block_on(self.repository.create(owner, draft))
            .expect("create contact")
    }

    fn names(contacts: &[Contact]) -> Vec<&str> {
        contacts.iter().map(Contact::first_name).collect()
    }
}

fn seed_user(runtime: &Runtime, users: &DieselUserRepository, name: &str) -> Result<UserId, String> {
    let new_user = NewUser {
        username: Username::new(name).map_err(|err| err.to_string())?,
        email: EmailAddress::new(format!("{name}@example.com")).map_err(|err| err.to_string())?,
        password_hash: PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
    };
    runtime
        .block_on(users.create(&new_user))
        .map(|user| user.id())
        .map_err(|err| err.to_string())
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = migrated_database(&runtime)?;

    let users = DieselUserRepository::new(database.pool.clone());
    let owner = seed_user(&runtime, &users, "ada")?;
    let other = seed_user(&runtime, &users, "eve")?;

    Ok(TestContext {
        runtime,
        repository: DieselContactRepository::new(database.pool.clone()),
        owner,
        other,
        _database: database,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn draft(first: &str, email: Option<&str>, birthday: Option<NaiveDate>) -> ContactDraft {
    ContactDraft::try_from_parts(first, "Person", email.map(str::to_owned), "555-0100", birthday)
        .expect("valid draft")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[rstest]
fn foreign_rows_are_invisible_to_get_update_and_delete(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: foreign_rows_are_invisible_to_get_update_and_delete skipped");
        return;
    };
    let original = ctx.create(ctx.owner, &draft("Mary", Some("mary@example.com"), None));
    let id = original.id();
    let repo = &ctx.repository;

    let found = ctx
        .runtime
        .block_on(repo.find(ctx.other, id))
        .expect("find as other user");
    assert!(found.is_none(), "other user must not see the row");

    let updated = ctx
        .runtime
        .block_on(repo.update(ctx.other, id, &draft("Eve", None, None)))
        .expect("update as other user");
    assert!(updated.is_none(), "other user must not update the row");

    let deleted = ctx
        .runtime
        .block_on(repo.delete(ctx.other, id))
        .expect("delete as other user");
    assert!(deleted.is_none(), "other user must not delete the row");

    let still_there = ctx
        .runtime
        .block_on(repo.find(ctx.owner, id))
        .expect("find as owner");
    assert_eq!(still_there, Some(original));
}

#[rstest]
fn updating_a_missing_id_creates_nothing(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: updating_a_missing_id_creates_nothing skipped");
        return;
    };
    let missing = ContactId::new(9_999).expect("contact id");

    let updated = ctx
        .runtime
        .block_on(ctx.repository.update(ctx.owner, missing, &draft("Ghost", None, None)))
        .expect("update missing id");
    assert!(updated.is_none());

    let listed = ctx
        .runtime
        .block_on(ctx.repository.list(ctx.owner, Page::default()))
        .expect("list");
    assert!(listed.is_empty(), "update must not insert: {listed:?}");
}

#[rstest]
fn update_overwrites_and_clears_optional_columns(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: update_overwrites_and_clears_optional_columns skipped");
        return;
    };
    let created = ctx.create(
        ctx.owner,
        &draft("Charles", Some("charles@example.com"), Some(date(1791, 12, 26))),
    );

    let updated = ctx
        .runtime
        .block_on(ctx.repository.update(ctx.owner, created.id(), &draft("Charles", None, None)))
        .expect("update")
        .expect("owned row is updated");
    assert_eq!(updated.id(), created.id());
    assert!(updated.email().is_none());
    assert!(updated.birthday().is_none());

    let deleted = ctx
        .runtime
        .block_on(ctx.repository.delete(ctx.owner, created.id()))
        .expect("delete");
    assert_eq!(deleted, Some(updated));
    let gone = ctx
        .runtime
        .block_on(ctx.repository.find(ctx.owner, created.id()))
        .expect("find after delete");
    assert!(gone.is_none());
}

#[rstest]
fn listing_orders_by_id_and_honours_offset_and_limit(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: listing_orders_by_id_and_honours_offset_and_limit skipped");
        return;
    };
    for first in ["C0", "C1", "C2", "C3", "C4"] {
        ctx.create(ctx.owner, &draft(first, None, None));
    }
    ctx.create(ctx.other, &draft("Foreign", None, None));

    let page = Page::new(Some(2), Some(2)).expect("valid page");
    let listed = ctx
        .runtime
        .block_on(ctx.repository.list(ctx.owner, page))
        .expect("list");
    assert_eq!(TestContext::names(&listed), vec!["C2", "C3"]);

    let tail = Page::new(Some(10), Some(4)).expect("valid page");
    let last = ctx
        .runtime
        .block_on(ctx.repository.list(ctx.owner, tail))
        .expect("list");
    assert_eq!(TestContext::names(&last), vec!["C4"]);
}

#[rstest]
fn search_ors_filters_and_tolerates_null_emails(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: search_ors_filters_and_tolerates_null_emails skipped");
        return;
    };
    ctx.create(ctx.owner, &draft("Ada", Some("ada@example.com"), None));
    ctx.create(ctx.owner, &draft("Alan", None, None));
    ctx.create(ctx.owner, &draft("Grace", Some("grace@example.com"), None));

    let either = ContactSearch::new(
        Some("Alan".to_owned()),
        None,
        Some("grace@example.com".to_owned()),
    );
    let found = ctx
        .runtime
        .block_on(ctx.repository.search(ctx.owner, &either))
        .expect("search");
    assert_eq!(TestContext::names(&found), vec!["Alan", "Grace"]);

    let by_email = ContactSearch::new(None, None, Some("ada@example.com".to_owned()));
    let emailed = ctx
        .runtime
        .block_on(ctx.repository.search(ctx.owner, &by_email))
        .expect("search by email");
    assert_eq!(TestContext::names(&emailed), vec!["Ada"]);
}

#[rstest]
fn search_never_returns_another_users_namesakes(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: search_never_returns_another_users_namesakes skipped");
        return;
    };
    let first = ctx.create(ctx.owner, &draft("Ada", None, None));
    ctx.create(ctx.other, &draft("Ada", None, None));
    let second = ctx.create(ctx.owner, &draft("Ada", None, None));

    let search = ContactSearch::new(Some("Ada".to_owned()), None, None);
    let found = ctx
        .runtime
        .block_on(ctx.repository.search(ctx.owner, &search))
        .expect("search");
    let ids: Vec<ContactId> = found.iter().map(Contact::id).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
    assert!(found.iter().all(|contact| contact.user_id() == ctx.owner));
}

#[rstest]
fn upcoming_birthdays_cross_the_year_end(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: upcoming_birthdays_cross_the_year_end skipped");
        return;
    };
    ctx.create(ctx.owner, &draft("January", None, Some(date(2020, 1, 3))));
    ctx.create(ctx.owner, &draft("Passed", None, Some(date(2024, 12, 20))));
    ctx.create(ctx.owner, &draft("Today", None, Some(date(1990, 12, 28))));
    ctx.create(ctx.owner, &draft("Unknown", None, None));
    ctx.create(ctx.other, &draft("Foreign", None, Some(date(2000, 12, 30))));

    let found = ctx
        .runtime
        .block_on(ctx.repository.upcoming_birthdays(
            ctx.owner,
            date(2024, 12, 28),
            BirthdayWindow::default(),
        ))
        .expect("upcoming birthdays");
    assert_eq!(TestContext::names(&found), vec!["Today", "January"]);
}
