//! One pacing evaluation over an immutable day snapshot.
//!
//! ## Pipeline
//!
//! ```text
//! snapshot -> reconcile base -> step history -> plan -> instruction -> guards -> bundle
//! ```
//!
//! The session holds only policy. Identical snapshots produce identical
//! bundles, so an on-device evaluation and a remote one agree as long as
//! both run this code.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::curve::{reconstruct, sample_expected_curve, ExpectedCurvePoint, StepPoint, WakeWindow};
use crate::error::PacingError;
use crate::events::{fractional_hour, intake_in_window, DrinkEvent};
use crate::goal::GoalState;
use crate::plan::{
    AdaptiveCatchUpPlanner, AdaptivePlan, Instruction, InstructionSynthesizer, PacingPolicy,
    PlanStatus,
};
use crate::targets::{hydration_score, micro_targets, MicroTarget};
use crate::velocity::{apply_guards, check_velocity, VelocityCheck};

/// Largest gap between declared base plus events and reported intake that
/// still counts as reconciled.
pub const RECONCILIATION_TOLERANCE_ML: i64 = 1;

/// Everything an evaluation needs, owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingSnapshot {
    pub window: WakeWindow,
    pub goal: GoalState,
    #[serde(default)]
    pub events: Vec<DrinkEvent>,
    pub now: DateTime<FixedOffset>,
    /// Intake the event log is known not to cover (imports, manual totals)
    #[serde(default)]
    pub base_offset_ml: i64,
    /// Recalculated daily target to pass through, 0 for none
    #[serde(default)]
    pub target_override_ml: u32,
}

/// Curve vertex at the system boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub hour: f64,
    pub ml: i64,
}

impl From<&ExpectedCurvePoint> for CurvePoint {
    fn from(p: &ExpectedCurvePoint) -> Self {
        Self {
            hour: round_hour(p.hour),
            ml: p.ml.round() as i64,
        }
    }
}

impl From<&StepPoint> for CurvePoint {
    fn from(p: &StepPoint) -> Self {
        Self {
            hour: round_hour(p.hour),
            ml: p.ml.round() as i64,
        }
    }
}

/// Plan as exposed across the boundary, in whole millilitres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub deficit_ml: i64,
    pub catch_up_rate_ml_per_hour: i64,
    pub achievable_ml: i64,
    pub remaining_ml: i64,
    pub remaining_hours: f64,
    pub status: PlanStatus,
}

impl From<&AdaptivePlan> for PlanReport {
    fn from(plan: &AdaptivePlan) -> Self {
        Self {
            deficit_ml: plan.deficit_ml.round() as i64,
            catch_up_rate_ml_per_hour: plan.catch_up_rate_ml_per_hour.round() as i64,
            achievable_ml: plan.achievable_ml.round() as i64,
            remaining_ml: plan.remaining_ml.round() as i64,
            remaining_hours: round_hour(plan.remaining_hours),
            status: plan.status,
        }
    }
}

/// The single artifact an evaluation produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingBundle {
    pub evaluated_at: String,
    pub goal_ml: i64,
    pub current_ml: u32,
    pub expected_now_ml: i64,
    pub progress_pct: f64,
    pub expected_curve: Vec<CurvePoint>,
    pub actual_steps: Vec<CurvePoint>,
    pub adaptive_curve: Vec<CurvePoint>,
    pub plan: PlanReport,
    pub instruction: Instruction,
    pub targets: Vec<MicroTarget>,
    pub velocity: VelocityCheck,
    pub score: i8,
    /// Non-fatal data problems (dropped events, reconciliation gaps)
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PacingSession {
    policy: PacingPolicy,
}

impl PacingSession {
    pub fn new(policy: PacingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PacingPolicy {
        &self.policy
    }

    /// Evaluate a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWindow` or `NegativeGoal` for bad caller
    /// configuration. Data problems never fail the evaluation; they end up
    /// in [`PacingBundle::warnings`].
    pub fn evaluate(&self, snapshot: &PacingSnapshot) -> Result<PacingBundle, PacingError> {
        let PacingSnapshot {
            window,
            goal,
            events,
            now,
            base_offset_ml,
            target_override_ml,
        } = snapshot;
        window.validate()?;
        goal.validate()?;

        let now_hour = fractional_hour(now);
        let current = i64::from(goal.current_intake_ml);
        let mut warnings = Vec::new();

        let accepted: Vec<DrinkEvent> = events.iter().filter(|e| e.timestamp <= *now).cloned().collect();
        let logged_ml: i64 = accepted.iter().map(|e| i64::from(e.amount_ml)).sum();
        if let Some(mismatch) = reconcile(*base_offset_ml, logged_ml, current) {
            warn!(%mismatch, "trusting reported intake over the event log");
            warnings.push(mismatch.to_string());
        }
        let base_ml = current - logged_ml;

        let history = reconstruct(base_ml, events, window.wake_hour, now);
        warnings.extend(history.dropped.iter().map(ToString::to_string));

        let planner = AdaptiveCatchUpPlanner::new(self.policy.clone());
        let plan = planner.plan(now_hour, window, goal)?;

        let instruction = InstructionSynthesizer::new(self.policy.clone())
            .synthesize(&plan, now_hour, window.sleep_hour)
            .with_target_override(*target_override_ml);
        let velocity = check_velocity(&accepted, *now, &self.policy);
        let rapid_ml = intake_in_window(&accepted, *now, self.policy.rapid_window_minutes);
        let instruction = apply_guards(instruction, plan.status, &velocity, rapid_ml, &self.policy);

        let expected_curve =
            sample_expected_curve(window, goal.daily_goal_ml, self.policy.sample_interval_minutes);
        let adaptive_curve = planner.adaptive_curve(&plan, now_hour, window);
        let expected_now_ml = plan.expected_now_ml.round() as i64;

        Ok(PacingBundle {
            evaluated_at: now.to_rfc3339(),
            goal_ml: goal.daily_goal_ml,
            current_ml: goal.current_intake_ml,
            expected_now_ml,
            progress_pct: goal.progress_pct(),
            expected_curve: expected_curve.iter().map(CurvePoint::from).collect(),
            actual_steps: history.points.iter().map(CurvePoint::from).collect(),
            adaptive_curve: adaptive_curve.iter().map(CurvePoint::from).collect(),
            plan: PlanReport::from(&plan),
            instruction,
            targets: micro_targets(now_hour, window, goal.daily_goal_ml, goal.current_intake_ml),
            velocity,
            score: hydration_score(goal.current_intake_ml, expected_now_ml),
            warnings,
        })
    }
}

/// Check declared base plus logged events against the reported intake.
pub fn reconcile(base_offset_ml: i64, logged_ml: i64, current_ml: i64) -> Option<PacingError> {
    let declared_ml = base_offset_ml + logged_ml;
    let difference_ml = current_ml - declared_ml;
    (difference_ml.abs() > RECONCILIATION_TOLERANCE_ML).then_some(PacingError::ReconciliationMismatch {
        declared_ml,
        observed_ml: current_ml,
        difference_ml,
    })
}

fn round_hour(hour: f64) -> f64 {
    (hour * 100.0).round() / 100.0
}
