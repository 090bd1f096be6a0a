//! SQLite database implementations.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::infrastructure::ports::{ClockPort, RepoError};

mod helpers;
mod schema;

mod completion_repo;
mod content_repo;
mod ledger_repo;
mod notification_repo;
mod profile_repo;


pub use completion_repo::SqliteCompletionRepo;
pub use content_repo::SqliteContentRepo;
pub use ledger_repo::SqliteXpLedgerRepo;
pub use notification_repo::SqliteNotificationRepo;
pub use profile_repo::SqliteProfileRepo;

/// Concurrent writers wait this long for the database lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_CONNECTIONS: u32 = 8;

/// All SQLite repositories sharing one connection pool.
pub struct SqliteRepositories {
    pub ledger: Arc<SqliteXpLedgerRepo>,
    pub completion: Arc<SqliteCompletionRepo>,
    pub profile: Arc<SqliteProfileRepo>,
    pub content: Arc<SqliteContentRepo>,
    pub notifications: Arc<SqliteNotificationRepo>,
    #[cfg(test)]
    pool: SqlitePool,
}

impl SqliteRepositories {
    /// Open (or create) the database at `db_path` and ensure the schema.
    pub async fn connect(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path))
            .map_err(|e| RepoError::database("connect", e))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        schema::ensure_schema(&pool)
            .await
            .map_err(|e| RepoError::database("schema", e))?;

        tracing::info!(db_path = %db_path, "SQLite XP store ready");
        Ok(Self::new(pool, clock))
    }

    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            ledger: Arc::new(SqliteXpLedgerRepo::new(pool.clone())),
            completion: Arc::new(SqliteCompletionRepo::new(pool.clone())),
            profile: Arc::new(SqliteProfileRepo::new(pool.clone(), clock.clone())),
            content: Arc::new(SqliteContentRepo::new(pool.clone())),
            notifications: Arc::new(SqliteNotificationRepo::new(pool.clone(), clock)),
            #[cfg(test)]
            pool,
        }
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
