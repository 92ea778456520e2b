//! Step-function reconstruction of actual intake.
//!
//! Cumulative intake is flat between drinks and jumps at each event. The
//! curve starts at `(wake_hour, base_ml)` and ends at `(now_hour, total)`.
//! `base_ml` absorbs any intake the local log does not explain, so the
//! curve always terminates at the reported total.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PacingError;
use crate::events::{fractional_hour, ordered, DrinkEvent};

/// A vertex of the step curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepPoint {
    pub hour: f64,
    pub ml: f64,
}

/// A drink placed on the hour axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedDrink {
    pub hour: f64,
    pub amount_ml: u32,
}

/// Reconstructed step history.
#[derive(Debug, Clone, PartialEq)]
pub struct StepHistory {
    pub points: Vec<StepPoint>,
    /// Events left out of the curve, with the reason
    pub dropped: Vec<PacingError>,
}

impl StepHistory {
    /// Level at the last vertex.
    pub fn final_ml(&self) -> f64 {
        self.points.last().map(|p| p.ml).unwrap_or(0.0)
    }

    /// Number of vertical segments.
    pub fn jump_count(&self) -> usize {
        self.points
            .windows(2)
            .filter(|w| w[0].hour == w[1].hour && w[0].ml != w[1].ml)
            .count()
    }
}

/// Build the step curve from drinks already placed on the hour axis.
///
/// `drinks` must be in ascending order. Hours before `wake_hour` are clamped
/// to it; hours after `now_hour` are skipped. Use [`reconstruct`] to get
/// skipped events reported.
pub fn build_steps(base_ml: f64, drinks: &[TimedDrink], wake_hour: f64, now_hour: f64) -> Vec<StepPoint> {
    let mut points = vec![StepPoint {
        hour: wake_hour,
        ml: base_ml,
    }];
    let mut running = base_ml;

    for drink in drinks {
        if drink.hour > now_hour {
            continue;
        }
        let hour = drink.hour.max(wake_hour);
        push_distinct(&mut points, StepPoint { hour, ml: running });
        running += f64::from(drink.amount_ml);
        points.push(StepPoint { hour, ml: running });
    }

    if now_hour > wake_hour {
        push_distinct(
            &mut points,
            StepPoint {
                hour: now_hour,
                ml: running,
            },
        );
    }
    points
}

fn push_distinct(points: &mut Vec<StepPoint>, point: StepPoint) {
    if points.last() != Some(&point) {
        points.push(point);
    }
}

/// Reconstruct the step history from raw events as seen at `now`.
///
/// Events after `now` are dropped with `OutOfOrderEvent` and logged. Events
/// from before the current day or before wake are pinned to `wake_hour`,
/// also when `now` itself is still before wake.
pub fn reconstruct(
    base_ml: i64,
    events: &[DrinkEvent],
    wake_hour: f64,
    now: &DateTime<FixedOffset>,
) -> StepHistory {
    let now_hour = fractional_hour(now);
    let today = now.date_naive();
    let mut dropped = Vec::new();
    let mut drinks = Vec::with_capacity(events.len());

    for event in ordered(events) {
        if event.timestamp > *now {
            warn!(
                timestamp = %event.timestamp.to_rfc3339(),
                now = %now.to_rfc3339(),
                amount_ml = event.amount_ml,
                "dropping drink event from the future"
            );
            dropped.push(PacingError::OutOfOrderEvent {
                timestamp: event.timestamp.to_rfc3339(),
                now: now.to_rfc3339(),
            });
            continue;
        }
        // Earlier days count from midnight so they stay before `now_hour`
        // and land on wake like any pre-wake drink.
        let hour = if event.timestamp.with_timezone(now.offset()).date_naive() < today {
            0.0
        } else {
            event.hour_in(now)
        };
        drinks.push(TimedDrink {
            hour,
            amount_ml: event.amount_ml,
        });
    }

    StepHistory {
        points: build_steps(base_ml as f64, &drinks, wake_hour, now_hour),
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn two_events_give_two_jumps() {
        let drinks = [
            TimedDrink { hour: 9.0, amount_ml: 300 },
            TimedDrink { hour: 11.5, amount_ml: 200 },
        ];
        let points = build_steps(1000.0, &drinks, 7.0, 12.0);
        let expected = vec![
            StepPoint { hour: 7.0, ml: 1000.0 },
            StepPoint { hour: 9.0, ml: 1000.0 },
            StepPoint { hour: 9.0, ml: 1300.0 },
            StepPoint { hour: 11.5, ml: 1300.0 },
            StepPoint { hour: 11.5, ml: 1500.0 },
            StepPoint { hour: 12.0, ml: 1500.0 },
        ];
        assert_eq!(points, expected);
    }

    #[test]
    fn no_events_is_a_flat_line() {
        let points = build_steps(400.0, &[], 7.0, 10.0);
        assert_eq!(
            points,
            vec![StepPoint { hour: 7.0, ml: 400.0 }, StepPoint { hour: 10.0, ml: 400.0 }]
        );
    }

    #[test]
    fn before_wake_is_a_single_point() {
        let points = build_steps(0.0, &[], 7.0, 6.0);
        assert_eq!(points, vec![StepPoint { hour: 7.0, ml: 0.0 }]);
    }

    #[test]
    fn early_events_clamp_to_wake() {
        let drinks = [TimedDrink { hour: 5.5, amount_ml: 250 }];
        let points = build_steps(0.0, &drinks, 7.0, 8.0);
        assert_eq!(
            points,
            vec![
                StepPoint { hour: 7.0, ml: 0.0 },
                StepPoint { hour: 7.0, ml: 250.0 },
                StepPoint { hour: 8.0, ml: 250.0 },
            ]
        );
    }

    #[test]
    fn simultaneous_events_stack() {
        let drinks = [
            TimedDrink { hour: 9.0, amount_ml: 100 },
            TimedDrink { hour: 9.0, amount_ml: 150 },
        ];
        let points = build_steps(0.0, &drinks, 7.0, 10.0);
        let history = StepHistory { points, dropped: vec![] };
        assert_eq!(history.jump_count(), 2);
        assert_eq!(history.final_ml(), 250.0);
    }

    #[test]
    fn future_events_are_dropped_and_reported() {
        let now = at("2026-10-15T12:00:00+02:00");
        let events = vec![
            DrinkEvent::new(at("2026-10-15T09:00:00+02:00"), 300).unwrap(),
            DrinkEvent::new(at("2026-10-15T12:30:00+02:00"), 500).unwrap(),
        ];
        let history = reconstruct(0, &events, 7.0, &now);
        assert_eq!(history.final_ml(), 300.0);
        assert_eq!(history.jump_count(), 1);
        assert_eq!(history.dropped.len(), 1);
        assert!(matches!(history.dropped[0], PacingError::OutOfOrderEvent { .. }));
    }

    #[test]
    fn previous_day_events_pin_to_wake() {
        let now = at("2026-10-15T08:00:00+00:00");
        let events = vec![DrinkEvent::new(at("2026-10-14T22:00:00+00:00"), 200).unwrap()];
        let history = reconstruct(0, &events, 7.0, &now);
        assert_eq!(history.points[1], StepPoint { hour: 7.0, ml: 200.0 });
        assert_eq!(history.final_ml(), 200.0);
    }

    #[test]
    fn previous_day_events_count_before_wake() {
        let now = at("2026-10-15T06:00:00+00:00");
        let events = vec![DrinkEvent::new(at("2026-10-14T22:00:00+00:00"), 300).unwrap()];
        let history = reconstruct(0, &events, 7.0, &now);
        assert_eq!(
            history.points,
            vec![StepPoint { hour: 7.0, ml: 0.0 }, StepPoint { hour: 7.0, ml: 300.0 }]
        );
        assert_eq!(history.final_ml(), 300.0);
        assert!(history.dropped.is_empty());
    }

    #[test]
    fn unsorted_events_are_ordered_before_building() {
        let now = at("2026-10-15T12:00:00+00:00");
        let events = vec![
            DrinkEvent::new(at("2026-10-15T11:30:00+00:00"), 200).unwrap(),
            DrinkEvent::new(at("2026-10-15T09:00:00+00:00"), 300).unwrap(),
        ];
        let history = reconstruct(1000, &events, 7.0, &now);
        assert_eq!(history.points[2], StepPoint { hour: 9.0, ml: 1300.0 });
        assert_eq!(history.final_ml(), 1500.0);
    }
}
