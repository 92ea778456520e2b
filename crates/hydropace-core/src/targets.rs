//! Short-horizon intake targets and the hydration score.

use serde::{Deserialize, Serialize};

use crate::curve::WakeWindow;

/// Look-ahead horizons for micro targets (minutes).
pub const TARGET_HORIZONS_MINUTES: [u32; 4] = [15, 30, 45, 60];

/// Where the expected curve will be a few minutes from now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroTarget {
    pub minutes: u32,
    pub target_ml: i64,
    /// How much more is needed to be on the curve at that point
    pub delta_ml: i64,
}

pub fn micro_targets(
    now_hour: f64,
    window: &WakeWindow,
    goal_ml: i64,
    current_ml: u32,
) -> Vec<MicroTarget> {
    TARGET_HORIZONS_MINUTES
        .iter()
        .map(|&minutes| {
            let hour = (now_hour + f64::from(minutes) / 60.0).min(window.sleep_hour);
            let target_ml = window.expected_ml_at(hour, goal_ml);
            MicroTarget {
                minutes,
                target_ml,
                delta_ml: (target_ml - i64::from(current_ml)).max(0),
            }
        })
        .collect()
}

/// Score modifier in [-10, 5] for how actual intake compares to expected.
pub fn hydration_score(current_ml: u32, expected_ml: i64) -> i8 {
    if expected_ml <= 0 {
        return 0;
    }
    let ratio = f64::from(current_ml) / expected_ml as f64;
    match ratio {
        r if r >= 1.1 => 5,
        r if r >= 0.95 => 3,
        r if r >= 0.8 => 0,
        r if r >= 0.6 => -5,
        r if r >= 0.4 => -8,
        _ => -10,
    }
}
