use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use pagetally_core::event::DayPathAggregate;
use pagetally_core::store::{DedupeCheck, SessionTouch, TrackingStore};

use crate::DuckDbStore;

#[async_trait]
impl TrackingStore for DuckDbStore {
    async fn touch_session(
        &self,
        session_key: &str,
        visitor_token: &str,
        user_agent: &str,
        ip_hash: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<SessionTouch> {
        crate::session::touch_session_inner(self, session_key, visitor_token, user_agent, ip_hash, now)
            .await
    }

    async fn check_and_mark(
        &self,
        session_key: &str,
        path: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<DedupeCheck> {
        crate::dedupe::check_and_mark_inner(self, session_key, path, now).await
    }

    async fn increment_aggregate(
        &self,
        day: NaiveDate,
        path: &str,
        counts_unique_session: bool,
    ) -> anyhow::Result<()> {
        crate::aggregate::increment_aggregate_inner(self, day, path, counts_unique_session).await
    }

    async fn list_by_day(&self, day: NaiveDate) -> anyhow::Result<Vec<DayPathAggregate>> {
        crate::aggregate::list_by_day_inner(self, day).await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<()> {
        DuckDbStore::purge_expired(self, now).await
    }

    async fn ping(&self) -> anyhow::Result<()> {
        DuckDbStore::ping(self).await
    }
}
