//! PostgreSQL pool and schema setup for [`PostgresStore`](crate::store::PostgresStore).

use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

/// Upper bound on pooled connections. Each in-flight transfer holds one for
/// the lifetime of its transaction.
const MAX_CONNECTIONS: u32 = 5;

/// Connect to `database_url`.
///
/// Fails on a malformed URL or when the server refuses the connection.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Bring the `accounts` schema up to date. Safe to call on every start.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // Embedded at compile time
    sqlx::migrate!("./migrations").run(pool).await
}
