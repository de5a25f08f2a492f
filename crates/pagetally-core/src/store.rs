//! Tracking store abstraction.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::event::DayPathAggregate;

/// Result of a session touch.
#[derive(Debug, Clone, Copy)]
pub struct SessionTouch {
    /// True when this call created the session (no live record existed).
    pub is_new: bool,
}

/// Result of a dedupe check-and-mark.
#[derive(Debug, Clone, Copy)]
pub struct DedupeCheck {
    /// True when a live record for the (session, path) pair already existed.
    pub is_duplicate: bool,
}

/// Backing store for sessions, dedupe records, and day/path aggregates.
///
/// Every method is a potentially-blocking store round trip. The mutating
/// methods must be atomic read-modify-writes per key: under concurrent
/// `touch_session` calls for one key exactly one caller observes
/// `is_new = true`, and under concurrent `check_and_mark` calls for one
/// (key, path) pair exactly one caller observes `is_duplicate = false`.
/// Expiry is a store property: a session whose `last_seen` aged past the
/// session TTL, or a dedupe record older than the dedupe window, is
/// invisible to these reads even before it is physically purged.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    /// Create the session if no live record exists (`created_at = last_seen
    /// = now`), otherwise refresh `last_seen` only — identity fields are
    /// immutable after creation.
    async fn touch_session(
        &self,
        session_key: &str,
        visitor_token: &str,
        user_agent: &str,
        ip_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionTouch>;

    /// Record a hit on (session, path): refresh a live record and report a
    /// duplicate, or write a fresh one and report fresh.
    async fn check_and_mark(
        &self,
        session_key: &str,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<DedupeCheck>;

    /// Upsert the (day, path) row and increment `hits`, plus
    /// `unique_sessions` when `counts_unique_session` is set. Increments
    /// happen in place in the store — never read-then-write-full-value.
    async fn increment_aggregate(
        &self,
        day: NaiveDate,
        path: &str,
        counts_unique_session: bool,
    ) -> Result<()>;

    /// All aggregate rows for `day`, sorted by hits descending.
    async fn list_by_day(&self, day: NaiveDate) -> Result<Vec<DayPathAggregate>>;

    /// Delete sessions and dedupe records whose timestamps aged past their
    /// TTLs. Visibility does not depend on this — expired rows are already
    /// invisible to reads — so the sweep only reclaims space.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<()>;

    /// Lightweight liveness check against the store.
    async fn ping(&self) -> Result<()>;
}
