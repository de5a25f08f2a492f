use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{error, info};

use pagetally_core::config::Config;
use pagetally_core::pipeline::IngestPipeline;
use pagetally_core::store::TrackingStore;
use pagetally_duckdb::DuckDbStore;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// The store slot starts empty and is attached once the backend opens
/// successfully. The process stays alive either way: handlers that need the
/// store surface 503 until it is ready, and a background task in `main`
/// keeps retrying the open. Readiness is queryable via [`AppState::is_ready`].
pub struct AppState {
    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// The DuckDB store, once connected. `None` until the first successful open.
    store: RwLock<Option<Arc<DuckDbStore>>>,
}

impl AppState {
    /// Construct state with no store attached (backend not connected yet).
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            store: RwLock::new(None),
        }
    }

    /// Construct state with a ready store. Used by `main` when the open
    /// succeeds immediately, and by integration tests.
    pub fn with_store(config: Config, store: DuckDbStore) -> Self {
        Self {
            config: Arc::new(config),
            store: RwLock::new(Some(Arc::new(store))),
        }
    }

    /// Attach (or replace) the store once a backend open succeeds.
    pub async fn attach_store(&self, store: Arc<DuckDbStore>) {
        let mut slot = self.store.write().await;
        *slot = Some(store);
        info!("Store attached — tracking enabled");
    }

    /// The current store, if connected.
    pub async fn store(&self) -> Option<Arc<DuckDbStore>> {
        self.store.read().await.clone()
    }

    /// An ingestion pipeline over the current store, if connected.
    pub async fn pipeline(&self) -> Option<IngestPipeline> {
        self.store()
            .await
            .map(|store| IngestPipeline::new(store as Arc<dyn TrackingStore>))
    }

    /// True when the store is attached and answers a ping.
    pub async fn is_ready(&self) -> bool {
        match self.store().await {
            Some(store) => store.ping().await.is_ok(),
            None => false,
        }
    }

    /// Background loop: purge expired sessions and dedupe records on a
    /// fixed interval.
    ///
    /// Spawned as a `tokio::spawn` task in `main.rs`. Runs until the process
    /// exits. A failed sweep is logged but does not crash the loop — expired
    /// rows are invisible to reads regardless, so the next tick can retry.
    pub async fn run_purge_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.config.purge_interval());
        loop {
            ticker.tick().await;
            let Some(store) = self.store().await else {
                continue;
            };
            if let Err(e) = store.purge_expired(Utc::now()).await {
                error!(error = %e, "Purge sweep failed");
            }
        }
    }
}
