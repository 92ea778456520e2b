//! Pacing policy constants.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default renal safety ceiling on recommended intake rate.
pub const DEFAULT_VELOCITY_CAP_ML_PER_HOUR: u32 = 800;

/// Default deficit above which a prompt is promoted to high priority.
pub const DEFAULT_LARGE_DEFICIT_ML: u32 = 500;

/// Default equality band for on-track classification.
pub const DEFAULT_TOLERANCE_ML: u32 = 50;

/// Policy knobs for the planner, synthesizer and intake guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingPolicy {
    /// Safety ceiling on recommended rate (ml/h)
    #[serde(default = "default_velocity_cap")]
    pub velocity_cap_ml_per_hour: u32,

    /// Deficit threshold promoting priority to high (ml)
    #[serde(default = "default_large_deficit")]
    pub large_deficit_ml: u32,

    /// Equality band for on-track classification (ml)
    #[serde(default = "default_tolerance")]
    pub tolerance_ml: u32,

    /// Spacing of curve samples (minutes)
    #[serde(default = "default_sample_interval")]
    pub sample_interval_minutes: u32,

    /// Look-back window for the overhydration check (minutes)
    #[serde(default = "default_velocity_window")]
    pub velocity_window_minutes: u32,

    /// Intake within `rapid_window_minutes` that suppresses deficit prompts (ml)
    #[serde(default = "default_rapid_intake")]
    pub rapid_intake_ml: u32,

    #[serde(default = "default_rapid_window")]
    pub rapid_window_minutes: u32,
}

fn default_velocity_cap() -> u32 {
    DEFAULT_VELOCITY_CAP_ML_PER_HOUR
}
fn default_large_deficit() -> u32 {
    DEFAULT_LARGE_DEFICIT_ML
}
fn default_tolerance() -> u32 {
    DEFAULT_TOLERANCE_ML
}
fn default_sample_interval() -> u32 {
    30
}
fn default_velocity_window() -> u32 {
    60
}
fn default_rapid_intake() -> u32 {
    500
}
fn default_rapid_window() -> u32 {
    30
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            velocity_cap_ml_per_hour: default_velocity_cap(),
            large_deficit_ml: default_large_deficit(),
            tolerance_ml: default_tolerance(),
            sample_interval_minutes: default_sample_interval(),
            velocity_window_minutes: default_velocity_window(),
            rapid_intake_ml: default_rapid_intake(),
            rapid_window_minutes: default_rapid_window(),
        }
    }
}

impl PacingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity_cap(mut self, ml_per_hour: u32) -> Self {
        self.velocity_cap_ml_per_hour = ml_per_hour;
        self
    }

    pub fn with_large_deficit(mut self, ml: u32) -> Self {
        self.large_deficit_ml = ml;
        self
    }

    pub fn with_tolerance(mut self, ml: u32) -> Self {
        self.tolerance_ml = ml;
        self
    }

    pub fn cap(&self) -> f64 {
        f64::from(self.velocity_cap_ml_per_hour)
    }

    /// Reject zero rates and intervals; they would stall the planner or the
    /// curve sampler.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("policy.velocity_cap_ml_per_hour", self.velocity_cap_ml_per_hour),
            ("policy.sample_interval_minutes", self.sample_interval_minutes),
            ("policy.velocity_window_minutes", self.velocity_window_minutes),
            ("policy.rapid_window_minutes", self.rapid_window_minutes),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}
