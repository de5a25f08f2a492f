use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The payload the client sends to POST /track.
/// Wire names are camelCase to match the tracking snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPayload {
    #[serde(rename = "visitorId", default)]
    pub visitor_id: String,
    #[serde(default)]
    pub path: String,
    /// Accepted for wire compatibility; counting ignores it.
    #[serde(default)]
    pub referrer: Option<String>,
}

/// Final decision of the ingestion pipeline for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Fresh hit — the aggregate row was incremented.
    Accepted,
    /// Repeat hit on the same (session, path) within the dedupe window.
    /// The session was touched but no counter moved.
    SuppressedDuplicate,
    /// Input failed validation; no store was mutated.
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingFields,
}

/// One row of the per-day, per-path counters. Both counters are monotonic
/// for the lifetime of the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPathAggregate {
    pub day: NaiveDate,
    pub path: String,
    pub hits: u64,
    #[serde(rename = "uniqueSessions")]
    pub unique_sessions: u64,
}
