//! Expected-intake curve.
//!
//! The expected fraction of the daily goal rises from 0 at wake to 1 at
//! sleep following `t^0.85`, where `t` is the normalized elapsed waking
//! time. The exponent below 1 front-loads the curve. Every evaluation site
//! must go through [`expected_fraction`] so that offline and online curves
//! agree bit for bit.

use serde::{Deserialize, Serialize};

use crate::error::PacingError;

/// Shape exponent of the expected-progress curve.
pub const CURVE_EXPONENT: f64 = 0.85;

/// Waking window for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WakeWindow {
    #[serde(default = "default_wake_hour")]
    pub wake_hour: f64,
    #[serde(default = "default_sleep_hour")]
    pub sleep_hour: f64,
}

fn default_wake_hour() -> f64 {
    7.0
}
fn default_sleep_hour() -> f64 {
    23.0
}

impl Default for WakeWindow {
    fn default() -> Self {
        Self {
            wake_hour: default_wake_hour(),
            sleep_hour: default_sleep_hour(),
        }
    }
}

impl WakeWindow {
    /// Create a validated window.
    pub fn new(wake_hour: f64, sleep_hour: f64) -> Result<Self, PacingError> {
        let window = Self {
            wake_hour,
            sleep_hour,
        };
        window.validate()?;
        Ok(window)
    }

    /// Both hours must lie in [0, 24) and sleep must follow wake.
    pub fn validate(&self) -> Result<(), PacingError> {
        let in_day = |h: f64| h.is_finite() && (0.0..24.0).contains(&h);
        if !in_day(self.wake_hour) || !in_day(self.sleep_hour) || self.sleep_hour <= self.wake_hour
        {
            return Err(PacingError::InvalidWindow {
                wake_hour: self.wake_hour,
                sleep_hour: self.sleep_hour,
            });
        }
        Ok(())
    }

    /// Length of the waking day in hours.
    pub fn waking_hours(&self) -> f64 {
        self.sleep_hour - self.wake_hour
    }

    pub fn fraction_at(&self, hour: f64) -> f64 {
        expected_fraction(hour, self.wake_hour, self.sleep_hour)
    }

    pub fn expected_ml_at(&self, hour: f64, goal_ml: i64) -> i64 {
        expected_ml(hour, self.wake_hour, self.sleep_hour, goal_ml)
    }
}

/// A sample of the expected-intake curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedCurvePoint {
    pub hour: f64,
    pub ml: f64,
}

/// Expected fraction of the daily goal consumed by `hour`.
///
/// Returns 0 at or before wake, 1 at or after sleep. Callers are expected to
/// pass a validated window; a degenerate window collapses to a step at
/// `wake_hour`.
pub fn expected_fraction(hour: f64, wake_hour: f64, sleep_hour: f64) -> f64 {
    if hour <= wake_hour {
        return 0.0;
    }
    if hour >= sleep_hour {
        return 1.0;
    }
    let t = (hour - wake_hour) / (sleep_hour - wake_hour);
    t.powf(CURVE_EXPONENT).clamp(0.0, 1.0)
}

/// Expected cumulative intake at `hour`, rounded to whole millilitres.
pub fn expected_ml(hour: f64, wake_hour: f64, sleep_hour: f64, goal_ml: i64) -> i64 {
    (goal_ml as f64 * expected_fraction(hour, wake_hour, sleep_hour)).round() as i64
}

/// Sample the expected curve from wake to sleep every `interval_minutes`.
///
/// The last sample always sits exactly on `sleep_hour`, even when the
/// window length is not a multiple of the interval.
pub fn sample_expected_curve(
    window: &WakeWindow,
    goal_ml: i64,
    interval_minutes: u32,
) -> Vec<ExpectedCurvePoint> {
    let step = f64::from(interval_minutes.max(1)) / 60.0;
    let mut points = Vec::new();
    let mut i = 0u32;
    loop {
        let hour = window.wake_hour + f64::from(i) * step;
        if hour >= window.sleep_hour {
            break;
        }
        points.push(ExpectedCurvePoint {
            hour,
            ml: goal_ml as f64 * window.fraction_at(hour),
        });
        i += 1;
    }
    points.push(ExpectedCurvePoint {
        hour: window.sleep_hour,
        ml: goal_ml as f64,
    });
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_is_zero_before_wake_and_one_after_sleep() {
        assert_eq!(expected_fraction(5.0, 7.0, 23.0), 0.0);
        assert_eq!(expected_fraction(7.0, 7.0, 23.0), 0.0);
        assert_eq!(expected_fraction(23.0, 7.0, 23.0), 1.0);
        assert_eq!(expected_fraction(23.5, 7.0, 23.0), 1.0);
    }

    #[test]
    fn fraction_is_front_loaded() {
        let half = expected_fraction(15.0, 7.0, 23.0);
        assert!((half - 0.5f64.powf(0.85)).abs() < 1e-12);
        assert!((half - 0.5548).abs() < 1e-3);
        assert!(half > 0.5);
    }

    #[test]
    fn expected_ml_rounds_to_whole_millilitres() {
        // 3733 * (7.5 / 16)^0.85 = 1960.46...
        assert_eq!(expected_ml(14.5, 7.0, 23.0, 3733), 1960);
        assert_eq!(expected_ml(6.0, 7.0, 23.0, 3733), 0);
        assert_eq!(expected_ml(23.0, 7.0, 23.0, 3733), 3733);
    }

    #[test]
    fn window_validation() {
        assert!(WakeWindow::new(7.0, 23.0).is_ok());
        assert!(matches!(
            WakeWindow::new(23.0, 7.0),
            Err(PacingError::InvalidWindow { .. })
        ));
        assert!(WakeWindow::new(7.0, 7.0).is_err());
        assert!(WakeWindow::new(7.0, 24.0).is_err());
        assert!(WakeWindow::new(-1.0, 8.0).is_err());
        assert!(WakeWindow::new(f64::NAN, 8.0).is_err());
    }

    #[test]
    fn sampled_curve_spans_window() {
        let window = WakeWindow::default();
        let points = sample_expected_curve(&window, 2500, 30);
        // 16 hours at 30 minute intervals plus the closing sample
        assert_eq!(points.len(), 33);
        assert_eq!(points[0].hour, 7.0);
        assert_eq!(points[0].ml, 0.0);
        let last = points.last().unwrap();
        assert_eq!(last.hour, 23.0);
        assert_eq!(last.ml, 2500.0);
        assert!(points.windows(2).all(|w| w[0].ml <= w[1].ml));
    }

    #[test]
    fn sampled_curve_closes_on_unaligned_sleep() {
        let window = WakeWindow::new(7.0, 22.75).unwrap();
        let points = sample_expected_curve(&window, 2000, 30);
        let last = points.last().unwrap();
        assert_eq!(last.hour, 22.75);
        assert!(points[points.len() - 2].hour < 22.75);
    }
}
