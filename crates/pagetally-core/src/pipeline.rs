//! The ingestion pipeline: one call per inbound event.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::event::{Outcome, RejectReason};
use crate::identity::{derive_session_key, hash_ip, UNKNOWN};
use crate::store::TrackingStore;

/// Orchestrates the session registry, dedupe window, and aggregate counter
/// for each incoming event.
///
/// Holds the store client it was constructed with; cheap to clone. Invoked
/// concurrently, once per event — the store's atomic primitives are the only
/// cross-invocation synchronisation.
#[derive(Clone)]
pub struct IngestPipeline {
    store: Arc<dyn TrackingStore>,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn TrackingStore>) -> Self {
        Self { store }
    }

    /// Process one page-visit event.
    ///
    /// Step order matters: the session is touched before the dedupe check
    /// runs, and `is_new` is captured first, so a brand-new session's very
    /// first hit can never be suppressed — no dedupe record can pre-exist
    /// for a session key that did not exist. A duplicate contributes to
    /// neither `hits` nor `unique_sessions`, even though the session itself
    /// was just touched.
    ///
    /// Store errors propagate unchanged; there are no retries. A failed
    /// event is lost (at-most-once), and partial effects from a caller that
    /// disconnects mid-pipeline are acceptable and idempotent on retry.
    pub async fn ingest(
        &self,
        visitor_token: &str,
        path: &str,
        user_agent: &str,
        client_ip: &str,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        if visitor_token.is_empty() || path.is_empty() {
            return Ok(Outcome::Rejected(RejectReason::MissingFields));
        }

        let user_agent = if user_agent.is_empty() {
            UNKNOWN
        } else {
            user_agent
        };
        let session_key = derive_session_key(visitor_token, user_agent);
        let ip_hash = hash_ip(client_ip);
        let day = now.date_naive();

        let touch = self
            .store
            .touch_session(&session_key, visitor_token, user_agent, &ip_hash, now)
            .await?;

        let dedupe = self.store.check_and_mark(&session_key, path, now).await?;
        if dedupe.is_duplicate {
            return Ok(Outcome::SuppressedDuplicate);
        }

        self.store
            .increment_aggregate(day, path, touch.is_new)
            .await?;
        Ok(Outcome::Accepted)
    }
}
