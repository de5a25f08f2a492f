use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    /// Inactivity after which a session is forgotten, in seconds.
    pub session_ttl_secs: u64,
    /// Span during which a repeat (session, path) hit is suppressed, in seconds.
    pub dedupe_window_secs: u64,
    /// Interval between background purge sweeps, in seconds.
    pub purge_interval_secs: u64,
    pub duckdb_memory_limit: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("PAGETALLY_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: std::env::var("PAGETALLY_DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string()),
            session_ttl_secs: std::env::var("PAGETALLY_SESSION_TTL_SECS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse()
                .unwrap_or(1800),
            dedupe_window_secs: std::env::var("PAGETALLY_DEDUPE_WINDOW_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            purge_interval_secs: std::env::var("PAGETALLY_PURGE_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            duckdb_memory_limit: std::env::var("PAGETALLY_DUCKDB_MEMORY")
                .unwrap_or_else(|_| "1GB".to_string()),
        })
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn dedupe_window(&self) -> Duration {
        Duration::from_secs(self.dedupe_window_secs)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }
}
