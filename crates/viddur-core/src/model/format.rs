/// Display formatting for durations and timestamps.
///
/// Durations are carried as `f64` seconds everywhere; they are truncated to
/// whole seconds only here, at the display boundary.
use chrono::{DateTime, Local};
use std::time::{SystemTime, UNIX_EPOCH};

/// Format seconds as `H:MM:SS`: truncated to whole seconds, hours unpadded.
///
/// Negative and non-finite inputs render as `0:00:00`.
pub fn format_hms(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

/// Seconds since the Unix epoch, negative for times before it.
pub fn unix_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// Local wall-clock rendering used in reports, e.g. `2024-06-01 12:30:45`.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
