//! Embedded PostgreSQL for repository integration tests.
//!
//! One cluster is shared per test binary. Each test gets its own temporary
//! database with the backend migrations applied, so suites never see each
//! other's rows.
//!
//! Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start; setup failures
//! then skip the test instead of failing it.

use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use tokio::runtime::Runtime;

/// A migrated temporary database and a pool connected to it.
///
/// The database is dropped together with this value.
pub struct MigratedDatabase {
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

/// Returns true when `SKIP_TEST_CLUSTER` is set to a truthy value.
///
/// Truthy values: "1", "true", "yes" (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when the environment allows it; otherwise fail with the reason.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Create a fresh database on the shared cluster, migrate it and pool it.
///
/// Runs the async steps on `runtime` so callers stay synchronous.
pub fn migrated_database(runtime: &Runtime) -> Result<MigratedDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let database = cluster
        .create_temporary_database()
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_owned();

    runtime
        .block_on(run_pending_migrations(&url))
        .map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(url).with_max_connections(2)))
        .map_err(|err| err.to_string())?;

    Ok(MigratedDatabase {
        pool,
        _database: database,
    })
}
