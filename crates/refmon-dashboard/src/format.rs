//! Display formatters shared by every view.

use chrono::{Local, TimeZone};
use refmon_core::Timestamp;

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Absolute time format used in tables.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `3661` -> `"1h 1m 1s"`. All three units are always shown.
pub fn format_duration(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h}h {m}m {s}s")
}

/// Local date/time, empty for a missing timestamp.
pub fn format_time(ts: Option<Timestamp>) -> String {
    format_time_in(ts, &Local)
}

/// [`format_time`] in an explicit time zone.
pub fn format_time_in<Tz>(ts: Option<Timestamp>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    ts.and_then(|t| t.to_datetime())
        .map(|dt| dt.with_timezone(tz).format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Human-scaled byte count with one decimal, by powers of 1024.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", BYTE_UNITS[unit])
}

/// Compact time since `ts`: `"2h 5m"`, `"5m 3s"` or `"3s"`. `"-"` when missing.
pub fn format_elapsed(ts: Option<Timestamp>, now: Timestamp) -> String {
    let Some(ts) = ts else {
        return "-".to_string();
    };

    let seconds = ts.elapsed_until(now);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
