//! Opt-in policy for suites that start an embedded PostgreSQL cluster.
//!
//! The cluster downloads server binaries on first use, so these suites only
//! run when `RUN_PG_EMBEDDED=1`. Setup failures panic unless
//! `SKIP_TEST_CLUSTER` is truthy.

fn truthy(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// True when the caller asked for embedded PostgreSQL suites to run.
pub fn embedded_postgres_enabled() -> bool {
    let enabled = truthy("RUN_PG_EMBEDDED");
    if !enabled {
        eprintln!("SKIP-TEST-CLUSTER: set RUN_PG_EMBEDDED=1 to run");
    }
    enabled
}

/// Report a cluster setup failure.
///
/// Prints a skip marker and returns `None` when `SKIP_TEST_CLUSTER` is set;
/// panics otherwise so CI breakage stays visible.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if truthy("SKIP_TEST_CLUSTER") {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
