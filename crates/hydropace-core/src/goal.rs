//! Daily goal state and the weight-based goal model.
//!
//! ```text
//! goal = weight_kg * base_ml_per_kg
//!      + medication modifier (if active)
//!      + fasting modifier    (if fasting)
//!      + activity_ml_per_1k_steps * max(0, steps - baseline) / 1000
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PacingError;

/// Goal and intake so far for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalState {
    pub daily_goal_ml: i64,
    pub current_intake_ml: u32,
}

impl GoalState {
    pub fn new(daily_goal_ml: i64, current_intake_ml: u32) -> Result<Self, PacingError> {
        let state = Self {
            daily_goal_ml,
            current_intake_ml,
        };
        state.validate()?;
        Ok(state)
    }

    pub fn validate(&self) -> Result<(), PacingError> {
        if self.daily_goal_ml <= 0 {
            return Err(PacingError::NegativeGoal {
                goal_ml: self.daily_goal_ml,
            });
        }
        Ok(())
    }

    /// Progress towards the goal in percent, rounded to one decimal.
    pub fn progress_pct(&self) -> f64 {
        if self.daily_goal_ml <= 0 {
            return 0.0;
        }
        let pct = f64::from(self.current_intake_ml) / self.daily_goal_ml as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    }
}

/// Coefficients of the goal model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPolicy {
    #[serde(default = "default_base_ml_per_kg")]
    pub base_ml_per_kg: f64,
    #[serde(default = "default_fasting_modifier")]
    pub fasting_modifier_ml: u32,
    #[serde(default = "default_medication_modifier")]
    pub medication_modifier_ml: u32,
    #[serde(default = "default_activity_ml")]
    pub activity_ml_per_1k_steps: u32,
    #[serde(default = "default_baseline_steps")]
    pub activity_baseline_steps: u32,
}

fn default_base_ml_per_kg() -> f64 {
    33.3
}
fn default_fasting_modifier() -> u32 {
    500
}
fn default_medication_modifier() -> u32 {
    110
}
fn default_activity_ml() -> u32 {
    60
}
fn default_baseline_steps() -> u32 {
    4000
}

impl Default for GoalPolicy {
    fn default() -> Self {
        Self {
            base_ml_per_kg: default_base_ml_per_kg(),
            fasting_modifier_ml: default_fasting_modifier(),
            medication_modifier_ml: default_medication_modifier(),
            activity_ml_per_1k_steps: default_activity_ml(),
            activity_baseline_steps: default_baseline_steps(),
        }
    }
}

/// Inputs describing the user today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProfile {
    pub weight_kg: f64,
    #[serde(default)]
    pub fasting: bool,
    #[serde(default)]
    pub medication_active: bool,
    #[serde(default)]
    pub steps: u32,
}

/// Computed goal with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub goal_ml: i64,
    pub base_ml: i64,
    pub medication_modifier_ml: i64,
    pub fasting_modifier_ml: i64,
    pub activity_modifier_ml: i64,
}

pub fn compute_daily_goal(profile: &GoalProfile, policy: &GoalPolicy) -> DailyGoal {
    let base = profile.weight_kg.max(0.0) * policy.base_ml_per_kg;
    let medication = if profile.medication_active {
        i64::from(policy.medication_modifier_ml)
    } else {
        0
    };
    let fasting = if profile.fasting {
        i64::from(policy.fasting_modifier_ml)
    } else {
        0
    };
    let surplus_steps = profile.steps.saturating_sub(policy.activity_baseline_steps);
    let activity =
        (f64::from(policy.activity_ml_per_1k_steps) * (f64::from(surplus_steps) / 1000.0)) as i64;

    DailyGoal {
        goal_ml: (base + (medication + fasting + activity) as f64) as i64,
        base_ml: base as i64,
        medication_modifier_ml: medication,
        fasting_modifier_ml: fasting,
        activity_modifier_ml: activity,
    }
}

/// Target to push to a device holding `device_goal_ml`; 0 when it already
/// matches.
pub fn target_override(computed_goal_ml: i64, device_goal_ml: i64) -> u32 {
    if computed_goal_ml == device_goal_ml || computed_goal_ml <= 0 {
        0
    } else {
        u32::try_from(computed_goal_ml).unwrap_or(u32::MAX)
    }
}
