use chrono::{Duration, TimeZone, Utc};

/// Current time as unix milliseconds, the unit every document timestamp uses.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// `None` when the offset falls outside chrono's representable range.
pub fn days_from_now(days: i64) -> Option<i64> {
    let offset = Duration::try_days(days)?;
    Utc::now()
        .checked_add_signed(offset)
        .map(|dt| dt.timestamp_millis())
}

/// RFC 3339 rendering for user-facing messages.
pub fn format_millis(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
