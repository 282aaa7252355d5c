//! Shared embedded `PostgreSQL` cluster for the board repository tests.

use pg_embedded_setup_unpriv::{ClusterHandle, TestCluster};
use rstest::fixture;
use std::sync::OnceLock;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared `PostgreSQL` cluster handle for integration tests.
pub type PostgresCluster = &'static ClusterHandle;

static SHARED_CLUSTER: OnceLock<Option<ClusterHandle>> = OnceLock::new();

/// Provides the process-wide cluster, or `None` when this host cannot run
/// one.
///
/// The first caller boots the cluster. A failed boot is reported once on
/// stderr with the `SKIP-TEST-CLUSTER` prefix and every test that asks for
/// the cluster returns early.
#[fixture]
pub fn postgres_cluster() -> Option<PostgresCluster> {
    SHARED_CLUSTER.get_or_init(start_cluster).as_ref()
}

fn start_cluster() -> Option<ClusterHandle> {
    // `TestCluster` is `!Send`, so the shared static holds the `Send + Sync`
    // handle; the guard is forgotten and shutdown happens at process exit.
    match TestCluster::new_split() {
        Ok((handle, guard)) => {
            if let Err(err) = handle.register_shutdown_on_exit() {
                eprintln!("Warning: failed to register cluster shutdown hook: {err}");
            }
            std::mem::forget(guard);
            Some(handle)
        }
        Err(err) => {
            eprintln!("SKIP-TEST-CLUSTER: failed to start PostgreSQL: {err}");
            None
        }
    }
}

/// Quotes a database name for use in administrative SQL.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
