//! Property tests for the pacing model.

use chrono::{DateTime, Duration, FixedOffset};
use hydropace_core::{
    curve::reconstruct, expected_fraction, AdaptiveCatchUpPlanner, DrinkEvent, DrinkLog,
    GoalState, PacingPolicy, PlanStatus, WakeWindow,
};
use proptest::prelude::*;

fn window() -> impl Strategy<Value = (f64, f64)> {
    (0.0f64..20.0, 1.0f64..12.0).prop_map(|(wake, len)| (wake, (wake + len).min(23.5)))
}

proptest! {
    #[test]
    fn fraction_is_bounded_and_monotonic(
        (wake, sleep) in window(),
        a in 0.0f64..24.0,
        b in 0.0f64..24.0,
    ) {
        let (h1, h2) = if a <= b { (a, b) } else { (b, a) };
        let f1 = expected_fraction(h1, wake, sleep);
        let f2 = expected_fraction(h2, wake, sleep);
        prop_assert!((0.0..=1.0).contains(&f1));
        prop_assert!((0.0..=1.0).contains(&f2));
        prop_assert!(f1 <= f2);
    }

    #[test]
    fn fraction_never_below_linear(
        (wake, sleep) in window(),
        t in 0.0f64..1.0,
    ) {
        let hour = wake + t * (sleep - wake);
        let linear = (hour - wake) / (sleep - wake);
        prop_assert!(expected_fraction(hour, wake, sleep) + 1e-12 >= linear);
    }

    #[test]
    fn steps_terminate_at_reported_intake(
        amounts in proptest::collection::vec(1u32..800, 0..20),
        offsets in proptest::collection::vec(0i64..600, 0..20),
        unexplained in 0u32..1500,
    ) {
        let now: DateTime<FixedOffset> =
            DateTime::parse_from_rfc3339("2026-10-15T18:00:00+01:00").unwrap();
        let events: Vec<DrinkEvent> = amounts
            .iter()
            .zip(offsets.iter().chain(std::iter::repeat(&0)))
            .map(|(&ml, &mins)| DrinkEvent::new(now - Duration::minutes(mins), ml).unwrap())
            .collect();
        let logged: u32 = amounts.iter().sum();
        let current = logged + unexplained;
        let base = i64::from(current) - i64::from(logged);

        // Base plus events reproduces the reported intake exactly
        prop_assert_eq!(base + i64::from(logged), i64::from(current));

        let history = reconstruct(base, &events, 7.0, &now);
        prop_assert_eq!(history.final_ml(), f64::from(current));
        prop_assert_eq!(history.jump_count(), events.len());
        prop_assert!(history.points.windows(2).all(|w| w[0].hour <= w[1].hour && w[0].ml <= w[1].ml));
    }

    #[test]
    fn undo_restores_previous_total(
        amounts in proptest::collection::vec(1u32..800, 1..15),
    ) {
        let start: DateTime<FixedOffset> =
            DateTime::parse_from_rfc3339("2026-10-15T07:00:00+00:00").unwrap();
        let mut log = DrinkLog::new(start.date_naive());
        for (i, &ml) in amounts.iter().enumerate() {
            log.record(DrinkEvent::new(start + Duration::minutes(i as i64 * 10), ml).unwrap());
        }
        let before = log.total_ml();
        let removed = log.undo_last().unwrap();
        prop_assert_eq!(removed.amount_ml, *amounts.last().unwrap());
        prop_assert_eq!(log.total_ml() + removed.amount_ml, before);
    }

    #[test]
    fn plan_is_consistent(
        goal in 500i64..6000,
        current in 0u32..6000,
        now in 0.0f64..24.0,
    ) {
        let planner = AdaptiveCatchUpPlanner::new(PacingPolicy::default());
        let window = WakeWindow::default();
        let plan = planner.plan(now, &window, &GoalState::new(goal, current).unwrap()).unwrap();

        prop_assert!(plan.remaining_hours >= 0.0);
        prop_assert!(plan.remaining_ml >= 0.0);
        if plan.status == PlanStatus::Critical && plan.remaining_hours > 0.0 {
            prop_assert!(plan.achievable_ml < plan.goal_ml);
            prop_assert!(plan.catch_up_rate_ml_per_hour > 800.0);
        }
        if plan.catch_up_rate_ml_per_hour <= 800.0 && plan.remaining_hours > 0.0 {
            prop_assert_eq!(plan.achievable_ml, goal as f64);
        }

        let curve = planner.adaptive_curve(&plan, now, &window);
        prop_assert_eq!(curve[0].ml, f64::from(current));
        prop_assert!(curve.windows(2).all(|w| w[0].ml <= w[1].ml && w[0].hour < w[1].hour));
    }
}
