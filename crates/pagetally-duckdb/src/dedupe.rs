use anyhow::Result;
use chrono::{DateTime, Utc};

use pagetally_core::store::DedupeCheck;

use crate::backend::{ts, DuckDbStore};

/// Check-and-mark for the (session, path) pair.
///
/// A record inside the dedupe window means this hit is a repeat: `last_hit`
/// is refreshed and the caller is told to suppress. An absent or aged
/// record means the hit is fresh: a new record is written at `now`. The
/// whole sequence runs under the connection mutex, so exactly one of any
/// set of concurrent callers for the same pair sees `is_duplicate = false`.
pub(crate) async fn check_and_mark_inner(
    store: &DuckDbStore,
    session_key: &str,
    path: &str,
    now: DateTime<Utc>,
) -> Result<DedupeCheck> {
    let conn = store.conn.lock().await;
    let cutoff = ts(now - store.dedupe_window);
    let now_str = ts(now);

    let mut stmt = conn.prepare(
        "SELECT COUNT(*) FROM dedupe_records \
         WHERE session_key = ?1 AND path = ?2 AND last_hit > ?3",
    )?;
    let live: i64 =
        stmt.query_row(duckdb::params![session_key, path, cutoff], |row| row.get(0))?;

    if live > 0 {
        conn.execute(
            "UPDATE dedupe_records SET last_hit = ?1 WHERE session_key = ?2 AND path = ?3",
            duckdb::params![now_str, session_key, path],
        )?;
        return Ok(DedupeCheck { is_duplicate: true });
    }

    conn.execute(
        "INSERT OR REPLACE INTO dedupe_records (session_key, path, last_hit) \
         VALUES (?1, ?2, ?3)",
        duckdb::params![session_key, path, now_str],
    )?;

    Ok(DedupeCheck {
        is_duplicate: false,
    })
}
