//! Async access to the snapshot database.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};

use crate::error::ApiError;
use crate::model::{CountryFilter, CountryStat, GlobalStat};
use crate::query;
use crate::schema::init_schema;

/// How long SQLite waits on a lock held by the ingestion writer.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the snapshot tables.
///
/// Cloning is cheap; all clones share one connection. Queries run on the
/// blocking thread pool so the async workers never wait on SQLite.
#[derive(Clone)]
pub struct SnapshotStore {
    conn: Arc<Mutex<Connection>>,
    excluded: Arc<[String]>,
}

impl SnapshotStore {
    /// Open the database at `path`.
    ///
    /// The connection is read-only unless `create_schema` is set, in which
    /// case missing tables are created first.
    pub fn open(
        path: &Path,
        create_schema: bool,
        excluded: Vec<String>,
    ) -> anyhow::Result<Self> {
        let conn = if create_schema {
            let conn = Connection::open(path)?;
            init_schema(&conn)?;
            conn
        } else {
            Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        };
        conn.busy_timeout(BUSY_TIMEOUT)?;

        tracing::info!(
            path = %path.display(),
            read_only = !create_schema,
            "snapshot database opened"
        );

        Ok(Self::from_connection(conn, excluded))
    }

    /// Wrap an already-open connection.
    pub fn from_connection(conn: Connection, excluded: Vec<String>) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            excluded: excluded.into(),
        }
    }

    /// Latest per-country stats matching `filter`.
    pub async fn country_stats(&self, filter: CountryFilter) -> Result<Vec<CountryStat>, ApiError> {
        self.run(move |conn, excluded| query::country_stats(conn, &filter, excluded))
            .await
    }

    /// Latest worldwide totals, `None` if no aggregate has been written yet.
    pub async fn global_stats(&self) -> Result<Option<GlobalStat>, ApiError> {
        self.run(|conn, _| query::global_stats(conn)).await
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) {
        self.conn.lock().execute_batch(sql).unwrap();
    }

    async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &[String]) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let excluded = Arc::clone(&self.excluded);

        let result = tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn, &excluded)
        })
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("query worker join error: {e}")))?;

        Ok(result?)
    }
}
