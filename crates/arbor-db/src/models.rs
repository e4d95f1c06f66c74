//! Database row types and the TEXT column codecs shared by every query.
//! Row structs stay distinct from the arbor-types API models where the raw
//! shape differs (the user row carries the password hash, which must never
//! leave this layer).

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use tracing::warn;
use uuid::Uuid;

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub created_at: String,
}

/// Format a timestamp the way every insert stores it: RFC 3339 UTC with
/// fixed microsecond width, so TEXT comparison equals time comparison.
pub fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_ts(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Column defaults store "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

pub fn parse_id(raw: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt id '{}': {}", raw, e);
        Uuid::default()
    })
}
