use anyhow::Result;
use chrono::{DateTime, Utc};

use pagetally_core::store::SessionTouch;

use crate::backend::{ts, DuckDbStore};

/// Touch the session for `session_key`: create it if no live row exists,
/// otherwise refresh `last_seen` only.
///
/// The connection mutex is held across the liveness check and the write, so
/// concurrent callers with the same key are serialised and exactly one of
/// them observes `is_new = true`. An expired-but-unpurged row is not live:
/// it is replaced wholesale (identity fields rewritten, `created_at` reset),
/// matching the visibility rule that an aged session no longer exists.
pub(crate) async fn touch_session_inner(
    store: &DuckDbStore,
    session_key: &str,
    visitor_token: &str,
    user_agent: &str,
    ip_hash: &str,
    now: DateTime<Utc>,
) -> Result<SessionTouch> {
    let conn = store.conn.lock().await;
    let cutoff = ts(now - store.session_ttl);
    let now_str = ts(now);

    let mut stmt = conn.prepare(
        "SELECT COUNT(*) FROM sessions WHERE session_key = ?1 AND last_seen > ?2",
    )?;
    let live: i64 = stmt.query_row(duckdb::params![session_key, cutoff], |row| row.get(0))?;

    if live > 0 {
        // Identity fields are immutable after creation; only last_seen moves.
        conn.execute(
            "UPDATE sessions SET last_seen = ?1 WHERE session_key = ?2",
            duckdb::params![now_str, session_key],
        )?;
        return Ok(SessionTouch { is_new: false });
    }

    conn.execute(
        "INSERT OR REPLACE INTO sessions \
         (session_key, visitor_token, user_agent, ip_hash, created_at, last_seen) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        duckdb::params![session_key, visitor_token, user_agent, ip_hash, now_str, now_str],
    )?;

    Ok(SessionTouch { is_new: true })
}
