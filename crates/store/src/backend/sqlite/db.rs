//! The SQLite database recipes and servings preferences are kept in.

use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// How long a writer waits on another connection's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_millis(1500);

/// A migrated recipe database.
///
/// Hand it to [`SqliteRepository`](super::SqliteRepository) to read and write
/// recipes. The schema relies on foreign keys being enforced, so that deleting
/// a recipe deletes every servings preference for it; every connection opened
/// here has them switched on.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the recipe database file at `path`, creating it (and any missing
    /// parent directories) first if needed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>, max_connections: Option<u32>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Database)?;
        }
        let options = recipe_options()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        Self::with_pool(options, max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)).await
    }

    /// Open a private, empty recipe database that lives as long as this value.
    ///
    /// Every connection to `:memory:` is its own database, so the pool is
    /// capped at one connection.
    pub async fn open_in_memory() -> Result<Self> {
        Self::with_pool(recipe_options().filename(":memory:"), 1).await
    }

    async fn with_pool(options: SqliteConnectOptions, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        MIGRATOR.run(&pool).await.or_raise(|| ErrorKind::Migration)?;
        tracing::debug!(max_connections, "Recipe database ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for checked-out connections to come back, then close them all.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn recipe_options() -> SqliteConnectOptions {
    SqliteConnectOptions::new().foreign_keys(true).busy_timeout(BUSY_TIMEOUT)
}
