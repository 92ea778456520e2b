//! Turns a plan into a single user-facing instruction.
//!
//! Rules are evaluated in status order; the first match wins. A single
//! recommendation never exceeds half an hour's worth of the safe rate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::planner::{AdaptivePlan, PlanStatus};
use super::policy::PacingPolicy;

/// Deadline for an urgent prompt (minutes).
const URGENT_DEADLINE_MINUTES: u32 = 15;
const LARGE_DEFICIT_DEADLINE_MINUTES: u32 = 30;
const SMALL_DEFICIT_DEADLINE_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

/// What the user should do right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub message: String,
    pub recommended_amount_ml: u32,
    pub priority: Priority,
    /// 0 means no action required
    pub deadline_minutes: u32,
    /// 0 means the day's target is unchanged
    pub daily_target_override_ml: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity_warning: Option<String>,
}

impl Instruction {
    /// An instruction that asks for nothing.
    pub fn idle(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            recommended_amount_ml: 0,
            priority: Priority::Low,
            deadline_minutes: 0,
            daily_target_override_ml: 0,
            velocity_warning: None,
        }
    }

    /// Pass through an externally recalculated daily target.
    pub fn with_target_override(mut self, target_ml: u32) -> Self {
        self.daily_target_override_ml = target_ml;
        self
    }

    pub fn requires_action(&self) -> bool {
        self.recommended_amount_ml > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstructionSynthesizer {
    policy: PacingPolicy,
}

impl InstructionSynthesizer {
    pub fn new(policy: PacingPolicy) -> Self {
        Self { policy }
    }

    pub fn synthesize(&self, plan: &AdaptivePlan, now_hour: f64, sleep_hour: f64) -> Instruction {
        let cap = self.policy.cap();
        let large = f64::from(self.policy.large_deficit_ml);

        let instruction = match plan.status {
            PlanStatus::Critical => {
                let amount = to_ml(cap * plan.remaining_hours.min(1.0));
                let message = if plan.remaining_hours <= 0.0 {
                    format!(
                        "Day is over at {} of {} ml. The goal was not reached.",
                        to_ml(plan.current_ml),
                        to_ml(plan.goal_ml)
                    )
                } else {
                    format!(
                        "The {} ml goal is no longer fully reachable. Drink {} ml now; {} ml is achievable by {}.",
                        to_ml(plan.goal_ml),
                        amount,
                        to_ml(plan.achievable_ml),
                        clock(sleep_hour)
                    )
                };
                let velocity_warning = (plan.catch_up_rate_ml_per_hour > cap).then(|| {
                    format!(
                        "Closing the gap would need {} ml/h, above the safe limit of {} ml/h.",
                        to_ml(plan.catch_up_rate_ml_per_hour),
                        self.policy.velocity_cap_ml_per_hour
                    )
                });
                Instruction {
                    message,
                    recommended_amount_ml: amount,
                    priority: Priority::Urgent,
                    deadline_minutes: URGENT_DEADLINE_MINUTES,
                    daily_target_override_ml: 0,
                    velocity_warning,
                }
            }
            PlanStatus::Behind => {
                let severe = plan.deficit_ml > large;
                let amount = to_ml(plan.deficit_ml.min(cap * 0.5));
                let nominal = if severe {
                    LARGE_DEFICIT_DEADLINE_MINUTES
                } else {
                    SMALL_DEFICIT_DEADLINE_MINUTES
                };
                let deadline = nominal.min(minutes_until(now_hour, sleep_hour).max(URGENT_DEADLINE_MINUTES));
                Instruction {
                    message: format!(
                        "You are {} ml behind pace. Drink {} ml within {} minutes.",
                        to_ml(plan.deficit_ml),
                        amount,
                        deadline
                    ),
                    recommended_amount_ml: amount,
                    priority: if severe { Priority::High } else { Priority::Normal },
                    deadline_minutes: deadline,
                    daily_target_override_ml: 0,
                    velocity_warning: None,
                }
            }
            PlanStatus::OnTrack => Instruction::idle("Right on pace. Keep it up."),
            PlanStatus::Ahead => {
                let surplus = -plan.deficit_ml;
                if surplus > large {
                    Instruction::idle(format!(
                        "You are {} ml ahead of pace. Ease off for a while.",
                        to_ml(surplus)
                    ))
                } else {
                    Instruction::idle("Ahead of pace. Nothing to drink right now.")
                }
            }
        };

        debug!(
            status = ?plan.status,
            priority = ?instruction.priority,
            amount_ml = instruction.recommended_amount_ml,
            deadline_minutes = instruction.deadline_minutes,
            "synthesized instruction"
        );
        instruction
    }
}

/// Round to whole millilitres, never below zero.
fn to_ml(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

fn minutes_until(now_hour: f64, until_hour: f64) -> u32 {
    ((until_hour - now_hour).max(0.0) * 60.0).ceil() as u32
}

fn clock(hour: f64) -> String {
    let total = (hour * 60.0).round() as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}
