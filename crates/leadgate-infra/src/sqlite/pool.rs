//! Split-pool SQLite handle.
//!
//! Writes go through a dedicated single-connection pool, so statements
//! serialize instead of tripping over SQLITE_BUSY; reads fan out over a
//! small read-only pool. WAL mode lets the readers proceed while a write
//! is in flight. Migrations run on the writer before the readers open,
//! so a repository never sees a half-migrated schema.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

const READER_CONNECTIONS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Paired reader/writer pools over one SQLite file.
///
/// Cloning is cheap; all clones share the same underlying pools.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools against `database_url` and apply pending migrations.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts.clone())
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(opts.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}
