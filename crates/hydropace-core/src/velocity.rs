//! Intake velocity guards.
//!
//! Drinking faster than the kidneys can clear risks hyponatremia, so recent
//! intake above the hourly cap overrides any catch-up prompt. A large drink
//! in the last half hour also silences deficit prompts while it absorbs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::events::{intake_in_window, DrinkEvent};
use crate::plan::{Instruction, PacingPolicy, PlanStatus, Priority};

/// Result of the overhydration check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VelocityCheck {
    pub recent_ml: u32,
    pub window_minutes: u32,
    /// Hourly cap scaled to `window_minutes`
    pub cap_ml: u32,
    pub alert: bool,
}

impl VelocityCheck {
    pub fn message(&self) -> Option<String> {
        self.alert.then(|| {
            format!(
                "{} ml in the last {} minutes exceeds the safe {} ml. Pause drinking.",
                self.recent_ml, self.window_minutes, self.cap_ml
            )
        })
    }
}

pub fn check_velocity(
    events: &[DrinkEvent],
    now: DateTime<FixedOffset>,
    policy: &PacingPolicy,
) -> VelocityCheck {
    let window_minutes = policy.velocity_window_minutes;
    let recent_ml = intake_in_window(events, now, window_minutes);
    let cap_ml = window_cap(policy.velocity_cap_ml_per_hour, window_minutes);
    VelocityCheck {
        recent_ml,
        window_minutes,
        cap_ml,
        alert: recent_ml > cap_ml,
    }
}

fn window_cap(cap_ml_per_hour: u32, window_minutes: u32) -> u32 {
    let scaled = u64::from(cap_ml_per_hour) * u64::from(window_minutes) / 60;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Apply the overhydration and rapid-intake guards to a synthesized
/// instruction.
pub fn apply_guards(
    instruction: Instruction,
    status: PlanStatus,
    velocity: &VelocityCheck,
    rapid_intake_ml: u32,
    policy: &PacingPolicy,
) -> Instruction {
    if let Some(message) = velocity.message() {
        warn!(
            recent_ml = velocity.recent_ml,
            cap_ml = velocity.cap_ml,
            "intake velocity above safe limit"
        );
        return Instruction {
            message: message.clone(),
            recommended_amount_ml: 0,
            priority: Priority::Urgent,
            deadline_minutes: 0,
            daily_target_override_ml: instruction.daily_target_override_ml,
            velocity_warning: Some(message),
        };
    }

    if status == PlanStatus::Behind && rapid_intake_ml > policy.rapid_intake_ml {
        debug!(rapid_intake_ml, "suppressing deficit prompt after rapid intake");
        return Instruction::idle("You just drank a lot. Let it absorb before the next glass.")
            .with_target_override(instruction.daily_target_override_ml);
    }

    instruction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn behind() -> Instruction {
        Instruction {
            message: "behind".into(),
            recommended_amount_ml: 300,
            priority: Priority::Normal,
            deadline_minutes: 60,
            daily_target_override_ml: 2900,
            velocity_warning: None,
        }
    }

    #[test]
    fn alert_above_cap() {
        let policy = PacingPolicy::default();
        let now = at("2026-10-15T12:00:00+00:00");
        let events = vec![
            DrinkEvent::new(at("2026-10-15T10:30:00+00:00"), 500).unwrap(),
            DrinkEvent::new(at("2026-10-15T11:20:00+00:00"), 500).unwrap(),
            DrinkEvent::new(at("2026-10-15T11:50:00+00:00"), 400).unwrap(),
        ];
        let check = check_velocity(&events, now, &policy);
        assert_eq!(check.recent_ml, 900);
        assert!(check.alert);
        assert!(check.message().unwrap().contains("900 ml"));
    }

    #[test]
    fn exactly_at_cap_is_fine() {
        let policy = PacingPolicy::default();
        let now = at("2026-10-15T12:00:00+00:00");
        let events = vec![DrinkEvent::new(at("2026-10-15T11:30:00+00:00"), 800).unwrap()];
        assert!(!check_velocity(&events, now, &policy).alert);
    }

    #[test]
    fn cap_scales_with_window() {
        let mut policy = PacingPolicy::default();
        policy.velocity_window_minutes = 30;
        let now = at("2026-10-15T12:00:00+00:00");
        let events = vec![DrinkEvent::new(at("2026-10-15T11:45:00+00:00"), 450).unwrap()];
        let check = check_velocity(&events, now, &policy);
        assert_eq!(check.cap_ml, 400);
        assert!(check.alert);

        policy.velocity_window_minutes = 120;
        let check = check_velocity(&events, now, &policy);
        assert_eq!(check.cap_ml, 1600);
        assert!(!check.alert);
    }

    #[test]
    fn velocity_alert_overrides_instruction() {
        let policy = PacingPolicy::default();
        let check = VelocityCheck {
            recent_ml: 1000,
            window_minutes: 60,
            cap_ml: 800,
            alert: true,
        };
        let guarded = apply_guards(behind(), PlanStatus::Behind, &check, 0, &policy);
        assert_eq!(guarded.priority, Priority::Urgent);
        assert_eq!(guarded.recommended_amount_ml, 0);
        assert_eq!(guarded.deadline_minutes, 0);
        assert!(guarded.velocity_warning.is_some());
        assert_eq!(guarded.daily_target_override_ml, 2900);
    }

    #[test]
    fn rapid_intake_silences_deficit_prompt() {
        let policy = PacingPolicy::default();
        let calm = VelocityCheck {
            recent_ml: 600,
            window_minutes: 60,
            cap_ml: 800,
            alert: false,
        };
        let guarded = apply_guards(behind(), PlanStatus::Behind, &calm, 600, &policy);
        assert!(!guarded.requires_action());
        assert_eq!(guarded.daily_target_override_ml, 2900);

        let untouched = apply_guards(behind(), PlanStatus::Behind, &calm, 300, &policy);
        assert_eq!(untouched, behind());
    }
}
