use chrono::{DateTime, Utc};

/// Current time in UTC.
///
/// Timestamps are persisted as RFC 3339 text, which sorts
/// chronologically as long as every writer goes through here.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
