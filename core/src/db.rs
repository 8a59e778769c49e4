// shopfront/src/db.rs

//! Pool construction and schema migrations.

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Opens (creating if needed) the database at `database_url` with foreign keys
/// enforced, WAL journaling and a busy timeout so concurrent writers queue
/// instead of failing.
#[instrument(skip(database_url), err(Display))]
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str(database_url)?
    .create_if_missing(true)
    .foreign_keys(true)
    .journal_mode(SqliteJournalMode::Wal)
    .busy_timeout(Duration::from_secs(5));

  let pool = SqlitePoolOptions::new()
    .max_connections(max_connections.max(1))
    .connect_with(options)
    .await?;

  info!(max_connections, "Database pool created.");
  Ok(pool)
}

#[instrument(skip(pool), err(Display))]
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
  sqlx::migrate!("./migrations").run(pool).await?;
  info!("Database migrations applied.");
  Ok(())
}

/// A migrated in-memory database on a single long-lived connection. Every
/// query sees the same data because there is only ever one connection.
pub async fn in_memory() -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .min_connections(1)
    .idle_timeout(None)
    .max_lifetime(None)
    .connect_with(options)
    .await?;

  migrate(&pool).await?;
  Ok(pool)
}
