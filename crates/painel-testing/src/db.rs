//! Throwaway databases for integration tests.

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Connect to a fresh in-memory SQLite database.
///
/// The pool holds exactly one connection: every SQLite `:memory:` connection is its own
/// database, so a second connection would see empty tables.
pub async fn memory_database() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(opt)
        .await
        .expect("connect to in-memory sqlite")
}
