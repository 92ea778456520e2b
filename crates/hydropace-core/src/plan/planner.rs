//! Adaptive catch-up planner.
//!
//! Compares actual intake with the expected curve and works out how to close
//! the gap before sleep. The expected curve is front-loaded, but the
//! required finishing rate is flat: the first says when water should have
//! been drunk, the second what it takes from now to reach the goal.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::policy::PacingPolicy;
use crate::curve::{expected_fraction, ExpectedCurvePoint, WakeWindow};
use crate::error::PacingError;
use crate::goal::GoalState;

/// Pacing classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Ahead,
    OnTrack,
    Behind,
    /// The goal cannot be reached at the capped rate
    Critical,
}

/// Outcome of one planning pass. Derived state, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptivePlan {
    pub goal_ml: f64,
    pub current_ml: f64,
    pub expected_now_ml: f64,
    /// Expected minus actual; negative means surplus
    pub deficit_ml: f64,
    /// Uncapped flat rate needed to finish exactly at goal
    pub catch_up_rate_ml_per_hour: f64,
    pub achievable_ml: f64,
    pub remaining_ml: f64,
    pub remaining_hours: f64,
    pub status: PlanStatus,
}

impl AdaptivePlan {
    pub fn is_reachable(&self) -> bool {
        self.achievable_ml >= self.goal_ml
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdaptiveCatchUpPlanner {
    policy: PacingPolicy,
}

impl AdaptiveCatchUpPlanner {
    pub fn new(policy: PacingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PacingPolicy {
        &self.policy
    }

    /// Plan from `now_hour` to the end of the waking window.
    ///
    /// # Errors
    ///
    /// Fails on an invalid window or a non-positive goal.
    pub fn plan(
        &self,
        now_hour: f64,
        window: &WakeWindow,
        goal: &GoalState,
    ) -> Result<AdaptivePlan, PacingError> {
        window.validate()?;
        goal.validate()?;

        let goal_ml = goal.daily_goal_ml as f64;
        let current_ml = f64::from(goal.current_intake_ml);
        let cap = self.policy.cap();
        let tolerance = f64::from(self.policy.tolerance_ml);

        let expected_now_ml = window.expected_ml_at(now_hour, goal.daily_goal_ml) as f64;
        let deficit_ml = expected_now_ml - current_ml;
        let remaining_hours = (window.sleep_hour - now_hour).max(0.0);
        let remaining_ml = (goal_ml - current_ml).max(0.0);

        let (catch_up_rate_ml_per_hour, achievable_ml, status) = if remaining_hours <= 0.0 {
            let status = if deficit_ml <= 0.0 {
                PlanStatus::Ahead
            } else {
                PlanStatus::Critical
            };
            (0.0, current_ml, status)
        } else {
            let rate = remaining_ml / remaining_hours;
            let achievable = if rate <= cap {
                goal_ml
            } else {
                current_ml + remaining_hours * cap
            };
            let status = if achievable < goal_ml {
                PlanStatus::Critical
            } else if deficit_ml <= -tolerance {
                PlanStatus::Ahead
            } else if deficit_ml.abs() <= tolerance {
                PlanStatus::OnTrack
            } else {
                PlanStatus::Behind
            };
            (rate, achievable, status)
        };

        debug!(
            now_hour,
            expected_now_ml,
            deficit_ml,
            catch_up_rate_ml_per_hour,
            achievable_ml,
            ?status,
            "planned catch-up"
        );

        Ok(AdaptivePlan {
            goal_ml,
            current_ml,
            expected_now_ml,
            deficit_ml,
            catch_up_rate_ml_per_hour,
            achievable_ml,
            remaining_ml,
            remaining_hours,
            status,
        })
    }

    /// Curve from the user's actual position to the achievable end point.
    ///
    /// Uses the expected-curve shape re-normalized over `[now, sleep]`, so it
    /// starts exactly at the current intake. Samples sit at the start, at
    /// every grid point of the wake-anchored sampling interval after it, and
    /// at sleep.
    pub fn adaptive_curve(
        &self,
        plan: &AdaptivePlan,
        now_hour: f64,
        window: &WakeWindow,
    ) -> Vec<ExpectedCurvePoint> {
        let start = now_hour.max(window.wake_hour);
        let from = plan.current_ml;
        let to = plan.achievable_ml.max(plan.current_ml);

        if start >= window.sleep_hour {
            return vec![ExpectedCurvePoint { hour: now_hour, ml: from }];
        }

        let at = |hour: f64| ExpectedCurvePoint {
            hour,
            ml: from + (to - from) * expected_fraction(hour, start, window.sleep_hour),
        };

        let step = f64::from(self.policy.sample_interval_minutes.max(1)) / 60.0;
        let first = ((start - window.wake_hour) / step).floor() as u32 + 1;

        let mut points = vec![at(start)];
        let mut i = first;
        loop {
            let hour = window.wake_hour + f64::from(i) * step;
            if hour >= window.sleep_hour {
                break;
            }
            if hour > start {
                points.push(at(hour));
            }
            i += 1;
        }
        points.push(at(window.sleep_hour));
        points
    }
}
