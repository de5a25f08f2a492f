/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// All statements use `IF NOT EXISTS` so they are safe to re-run on every
/// startup (idempotent).
///
/// `memory_limit` is passed at runtime from `Config.duckdb_memory_limit`
/// (env `PAGETALLY_DUCKDB_MEMORY`, default `"1GB"`). Always set an explicit
/// limit — the DuckDB default (80% of system RAM) is not acceptable for a
/// server process. `SET threads = 2` keeps the background pool small; safe
/// for single-writer embedded use.
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- SESSIONS (one row per anonymous session key)
-- ===========================================
-- Identity fields (visitor_token, user_agent, ip_hash) are written once at
-- creation and never overwritten; only last_seen moves. Rows whose
-- last_seen aged past the session TTL are invisible to reads and are
-- deleted by the periodic purge sweep.
CREATE TABLE IF NOT EXISTS sessions (
    session_key     VARCHAR PRIMARY KEY,           -- sha256(visitor_token || user_agent), 64 hex chars
    visitor_token   VARCHAR NOT NULL,
    user_agent      VARCHAR NOT NULL,
    ip_hash         VARCHAR NOT NULL,              -- sha256 of the client IP; the raw IP is never stored
    created_at      TIMESTAMP NOT NULL,
    last_seen       TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_last_seen ON sessions(last_seen);

-- ===========================================
-- DEDUPE RECORDS (one row per live (session, path) pair)
-- ===========================================
-- A row older than the dedupe window is treated as absent for matching
-- and reclaimed by the purge sweep.
CREATE TABLE IF NOT EXISTS dedupe_records (
    session_key     VARCHAR NOT NULL,
    path            VARCHAR NOT NULL,
    last_hit        TIMESTAMP NOT NULL,
    PRIMARY KEY (session_key, path)
);
CREATE INDEX IF NOT EXISTS idx_dedupe_last_hit ON dedupe_records(last_hit);

-- ===========================================
-- AGGREGATES (per UTC day, per path running totals)
-- ===========================================
-- Both counters are monotonic; rows are never expired by this system
-- (retention is an operational concern).
CREATE TABLE IF NOT EXISTS aggregates (
    day             DATE NOT NULL,
    path            VARCHAR NOT NULL,
    hits            BIGINT NOT NULL DEFAULT 0,
    unique_sessions BIGINT NOT NULL DEFAULT 0,
    PRIMARY KEY (day, path)
);
"#
    )
}
