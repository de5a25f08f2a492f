use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use duckdb::Connection;
use tokio::sync::Mutex;
use tracing::info;

use crate::schema::init_sql;

/// A DuckDB backend for pagetally.
///
/// DuckDB is single-writer: concurrent reads are fine, but concurrent writes
/// cause contention. We wrap the connection in `Arc<Mutex<_>>` so the async
/// runtime serialises every store operation while still allowing the struct
/// to be cheaply cloned and shared across Axum handlers. Holding the mutex
/// across each select-then-write sequence is also what makes the session
/// touch and dedupe check linearizable per key.
///
/// TTLs are fixed at open time; the store enforces them as visibility
/// cutoffs on every read, independent of the purge sweep.
pub struct DuckDbStore {
    pub(crate) conn: Arc<Mutex<Connection>>,
    pub(crate) session_ttl: Duration,
    pub(crate) dedupe_window: Duration,
}

/// Format a timestamp the way the TIMESTAMP columns store it.
pub(crate) fn ts(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

fn to_chrono(d: StdDuration) -> Result<Duration> {
    Duration::from_std(d).map_err(|e| anyhow::anyhow!("TTL out of range: {e}"))
}

impl DuckDbStore {
    /// Open (or create) a DuckDB database file at `path`.
    ///
    /// `memory_limit` is a DuckDB size string such as `"1GB"` or `"512MB"`,
    /// read from `Config.duckdb_memory_limit` at the call site. Runs the
    /// idempotent schema init SQL on the connection.
    pub fn open(
        path: &str,
        memory_limit: &str,
        session_ttl: StdDuration,
        dedupe_window: StdDuration,
    ) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(&init_sql(memory_limit))?;
        info!(
            "DuckDB opened at {} with memory_limit={}, threads=2",
            path, memory_limit
        );
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            session_ttl: to_chrono(session_ttl)?,
            dedupe_window: to_chrono(dedupe_window)?,
        })
    }

    /// Open an **in-memory** DuckDB database.
    ///
    /// Intended for tests only — data is discarded when the struct is
    /// dropped. Uses a 1GB memory limit (tests are not memory-constrained).
    pub fn open_in_memory(session_ttl: StdDuration, dedupe_window: StdDuration) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(&init_sql("1GB"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            session_ttl: to_chrono(session_ttl)?,
            dedupe_window: to_chrono(dedupe_window)?,
        })
    }

    /// Delete sessions and dedupe records whose timestamps aged past their
    /// TTLs. Reads never see these rows anyway; the sweep reclaims space.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<()> {
        let conn = self.conn.lock().await;
        let session_cutoff = ts(now - self.session_ttl);
        let dead_sessions = conn.execute(
            "DELETE FROM sessions WHERE last_seen <= ?1",
            duckdb::params![session_cutoff],
        )?;
        let dedupe_cutoff = ts(now - self.dedupe_window);
        let dead_records = conn.execute(
            "DELETE FROM dedupe_records WHERE last_hit <= ?1",
            duckdb::params![dedupe_cutoff],
        )?;
        if dead_sessions > 0 || dead_records > 0 {
            tracing::debug!(
                sessions = dead_sessions,
                dedupe_records = dead_records,
                "Purged expired rows"
            );
        }
        Ok(())
    }

    /// Execute `SELECT 1` as a lightweight liveness check.
    ///
    /// Returns an error if the connection is unavailable (file locked,
    /// disk full, etc.).
    pub async fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch("SELECT 1")?;
        Ok(())
    }

    /// Acquire the DuckDB connection lock for direct queries.
    ///
    /// Intended for integration tests that need to verify stored data.
    /// Production code should use the typed methods.
    pub async fn conn_for_test(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}
