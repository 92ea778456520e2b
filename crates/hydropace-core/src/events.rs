//! Drink events and the day's drink log.
//!
//! Events are immutable once created. The log is append-only during the day
//! apart from undoing the most recent event, and is cleared when the day
//! rotates.

use std::path::Path;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{PacingError, Result};

/// A single reported drink.
///
/// Deserialization goes through [`DrinkEvent::new`], so a zero amount is
/// rejected wherever events enter the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDrinkEvent")]
pub struct DrinkEvent {
    /// When the drink happened (ISO-8601 with offset)
    pub timestamp: DateTime<FixedOffset>,
    /// Amount in millilitres, always > 0
    pub amount_ml: u32,
    /// Where the event came from ("manual", "watch", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Deserialize)]
struct RawDrinkEvent {
    timestamp: DateTime<FixedOffset>,
    amount_ml: u32,
    #[serde(default)]
    source: Option<String>,
}

impl TryFrom<RawDrinkEvent> for DrinkEvent {
    type Error = PacingError;

    fn try_from(raw: RawDrinkEvent) -> Result<Self, Self::Error> {
        let event = Self::new(raw.timestamp, raw.amount_ml)?;
        Ok(Self {
            source: raw.source,
            ..event
        })
    }
}

impl DrinkEvent {
    pub fn new(timestamp: DateTime<FixedOffset>, amount_ml: u32) -> Result<Self, PacingError> {
        if amount_ml == 0 {
            return Err(PacingError::InvalidAmount { amount_ml: 0 });
        }
        Ok(Self {
            timestamp,
            amount_ml,
            source: None,
        })
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Fractional hour of day of this event, seen from `reference`'s offset.
    pub fn hour_in(&self, reference: &DateTime<FixedOffset>) -> f64 {
        fractional_hour(&self.timestamp.with_timezone(reference.offset()))
    }
}

/// Fractional hour of day (e.g. 14:30 -> 14.5).
pub fn fractional_hour(at: &DateTime<FixedOffset>) -> f64 {
    f64::from(at.hour()) + f64::from(at.minute()) / 60.0 + f64::from(at.second()) / 3600.0
}

/// Sort events by timestamp, keeping insertion order on ties.
pub fn ordered(events: &[DrinkEvent]) -> Vec<DrinkEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.timestamp);
    sorted
}

/// Total of event amounts, saturating at `u32::MAX`.
pub fn total_of<'a>(events: impl IntoIterator<Item = &'a DrinkEvent>) -> u32 {
    events
        .into_iter()
        .fold(0u32, |acc, e| acc.saturating_add(e.amount_ml))
}

/// Sum of event amounts in `[now - window, now]`.
pub fn intake_in_window(events: &[DrinkEvent], now: DateTime<FixedOffset>, window_minutes: u32) -> u32 {
    let cutoff = now - Duration::minutes(i64::from(window_minutes));
    total_of(
        events
            .iter()
            .filter(|e| e.timestamp >= cutoff && e.timestamp <= now),
    )
}

/// Today's drink events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub events: Vec<DrinkEvent>,
}

impl DrinkLog {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, event: DrinkEvent) {
        self.events.push(event);
    }

    /// Remove the most recent event. On equal timestamps the one inserted
    /// last goes first.
    pub fn undo_last(&mut self) -> Option<DrinkEvent> {
        let (idx, _) = self
            .events
            .iter()
            .enumerate()
            .max_by_key(|(i, e)| (e.timestamp, *i))?;
        Some(self.events.remove(idx))
    }

    pub fn total_ml(&self) -> u32 {
        total_of(&self.events)
    }

    pub fn ordered(&self) -> Vec<DrinkEvent> {
        ordered(&self.events)
    }

    /// Events of `now`'s calendar day up to and including `now`, ordered.
    /// Reads never rotate the log.
    pub fn as_of(&self, now: &DateTime<FixedOffset>) -> Vec<DrinkEvent> {
        let today = now.date_naive();
        let visible: Vec<DrinkEvent> = self
            .events
            .iter()
            .filter(|e| e.timestamp <= *now && e.timestamp.with_timezone(now.offset()).date_naive() == today)
            .cloned()
            .collect();
        ordered(&visible)
    }

    /// Intake logged in the `window_minutes` up to and including `now`.
    pub fn in_window(&self, now: DateTime<FixedOffset>, window_minutes: u32) -> u32 {
        intake_in_window(&self.events, now, window_minutes)
    }

    /// Start a fresh log when `date` is a new day. Returns true if rotated.
    pub fn rotate(&mut self, date: NaiveDate) -> bool {
        if self.date == date {
            return false;
        }
        self.date = date;
        self.events.clear();
        true
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
