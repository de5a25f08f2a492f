use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use pagetally_core::event::DayPathAggregate;

use crate::DuckDbStore;

/// Upsert-and-increment the (day, path) counters.
///
/// The increment happens in place in SQL so concurrent writers cannot lose
/// updates to a read-then-write-full-value race. `unique_sessions` moves
/// only when the hit came from a session whose first-ever event this is.
pub(crate) async fn increment_aggregate_inner(
    store: &DuckDbStore,
    day: NaiveDate,
    path: &str,
    counts_unique_session: bool,
) -> Result<()> {
    let conn = store.conn.lock().await;
    let unique_inc: i64 = if counts_unique_session { 1 } else { 0 };
    conn.execute(
        "INSERT INTO aggregates (day, path, hits, unique_sessions) VALUES (?1, ?2, 1, ?3) \
         ON CONFLICT (day, path) DO UPDATE SET \
             hits = aggregates.hits + 1, \
             unique_sessions = aggregates.unique_sessions + EXCLUDED.unique_sessions",
        duckdb::params![day.to_string(), path, unique_inc],
    )?;
    Ok(())
}

/// All aggregate rows for `day`, busiest paths first. Recomputed on every
/// call; ties broken by path for a stable order.
pub(crate) async fn list_by_day_inner(
    store: &DuckDbStore,
    day: NaiveDate,
) -> Result<Vec<DayPathAggregate>> {
    let conn = store.conn.lock().await;
    let mut stmt = conn.prepare(
        "SELECT CAST(day AS VARCHAR), path, hits, unique_sessions \
         FROM aggregates WHERE day = ?1 \
         ORDER BY hits DESC, path ASC",
    )?;
    let raw: Vec<(String, String, i64, i64)> = stmt
        .query_map(duckdb::params![day.to_string()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?
        .collect::<std::result::Result<_, _>>()?;

    raw.into_iter()
        .map(|(day_str, path, hits, unique_sessions)| {
            Ok(DayPathAggregate {
                day: NaiveDate::parse_from_str(&day_str, "%Y-%m-%d")
                    .map_err(|e| anyhow!("unparseable day {day_str:?} in aggregates: {e}"))?,
                path,
                hits: hits as u64,
                unique_sessions: unique_sessions as u64,
            })
        })
        .collect()
}
