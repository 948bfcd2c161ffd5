use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::axum_http::error_responses::AppError;

const MOSCOW_OFFSET_SECS: i32 = 3 * 3600;

/// Lenient boolean: `1/t/true` and `0/f/false` in any case. Anything else is
/// treated as absent.
pub fn parse_bool(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

pub fn parse_i64(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}

/// Parses unix seconds, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS` (Moscow time).
/// An upper bound that lands on Moscow midnight is stretched to 23:59:59 of
/// that day.
pub fn parse_date(name: &str, raw: Option<&str>, upper_bound: bool) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    let invalid = || AppError::BadRequest(format!("invalid {name}"));
    let tz = FixedOffset::east_opt(MOSCOW_OFFSET_SECS).ok_or_else(invalid)?;

    let local = if raw.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = raw.parse().map_err(|_| invalid())?;
        if secs <= 0 {
            return Err(invalid());
        }
        DateTime::from_timestamp(secs, 0)
            .ok_or_else(invalid)?
            .with_timezone(&tz)
    } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
            .single()
            .ok_or_else(invalid)?
    } else if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        tz.from_local_datetime(&datetime).single().ok_or_else(invalid)?
    } else {
        return Err(invalid());
    };

    let local = if upper_bound && local.time() == NaiveTime::MIN {
        local + Duration::seconds(23 * 3600 + 59 * 60 + 59)
    } else {
        local
    };

    Ok(Some(local.with_timezone(&Utc)))
}
