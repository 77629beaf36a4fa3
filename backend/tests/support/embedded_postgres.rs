//! Per-test databases on a shared embedded cluster.
//!
//! Databases are created through the synchronous `postgres` client so the
//! `CREATE DATABASE` statement runs outside any transaction. Schema setup is
//! left to the crate's own migration runner.

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

/// Create an empty database named `test_<uuid>` and return its URL.
///
/// Must be called outside a Tokio runtime; the `postgres` client drives its
/// own.
pub fn fresh_database(cluster: &TestCluster) -> Result<String, String> {
    let connection = cluster.connection();
    let name = format!("test_{}", Uuid::new_v4().simple());
    let mut admin = Client::connect(&connection.database_url("postgres"), NoTls)
        .map_err(|err| format_postgres_error(&err))?;
    admin
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))?;
    Ok(connection.database_url(&name))
}
