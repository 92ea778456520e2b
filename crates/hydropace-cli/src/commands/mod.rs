pub mod config;
pub mod drink;
pub mod evaluate;
pub mod goal;
pub mod status;

use chrono::{DateTime, FixedOffset, Local};

/// Parse an ISO-8601 instant, or take the local wall clock.
pub fn instant_or_now(at: Option<&str>) -> Result<DateTime<FixedOffset>, Box<dyn std::error::Error>> {
    match at {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map_err(|e| format!("invalid timestamp '{s}': {e}").into()),
        None => Ok(Local::now().fixed_offset()),
    }
}
