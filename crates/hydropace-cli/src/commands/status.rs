//! Pacing status for today from the local drink log.

use clap::Args;

use hydropace_core::events::total_of;
use hydropace_core::{
    target_override, Config, GoalState, PacingBundle, PacingSession, PacingSnapshot, PlanStatus,
};

use super::drink::read_log;
use super::instant_or_now;

#[derive(Args)]
pub struct StatusArgs {
    /// Evaluation time (RFC 3339, defaults to now)
    #[arg(long)]
    now: Option<String>,
    /// Steps walked so far, feeds the activity modifier
    #[arg(long, default_value = "0")]
    steps: u32,
    /// Medication taken today
    #[arg(long)]
    medication: bool,
    /// Goal currently held by the device; a differing goal is sent as override
    #[arg(long)]
    device_goal: Option<i64>,
    /// Print the full bundle as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let now = instant_or_now(args.now.as_deref())?;
    let events = read_log(now.date_naive())?.as_of(&now);

    let goal_ml = config.daily_goal_ml(args.steps, args.medication);
    let snapshot = PacingSnapshot {
        window: config.window,
        goal: GoalState::new(goal_ml, total_of(&events))?,
        events,
        now,
        base_offset_ml: 0,
        target_override_ml: args
            .device_goal
            .map(|device| target_override(goal_ml, device))
            .unwrap_or(0),
    };

    let bundle = PacingSession::new(config.policy).evaluate(&snapshot)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    } else {
        print_summary(&bundle);
    }
    Ok(())
}

fn print_summary(bundle: &PacingBundle) {
    let status = match bundle.plan.status {
        PlanStatus::Ahead => "ahead",
        PlanStatus::OnTrack => "on track",
        PlanStatus::Behind => "behind",
        PlanStatus::Critical => "critical",
    };

    println!("\nHydration Pacing\n");
    println!("{}", "=".repeat(50));
    println!(
        "  Intake:    {} / {} ml ({:.1}%)",
        bundle.current_ml, bundle.goal_ml, bundle.progress_pct
    );
    println!("  Expected:  {} ml", bundle.expected_now_ml);
    println!("  Status:    {status} ({:+} ml)", -bundle.plan.deficit_ml);
    println!(
        "  Pace:      {} ml/h over {:.2} h",
        bundle.plan.catch_up_rate_ml_per_hour, bundle.plan.remaining_hours
    );
    if bundle.plan.achievable_ml < bundle.goal_ml {
        println!("  Reachable: {} ml", bundle.plan.achievable_ml);
    }
    println!("{}", "=".repeat(50));

    println!("\n{}", bundle.instruction.message);
    if let Some(warning) = &bundle.instruction.velocity_warning {
        println!("⚠ {warning}");
    }
    if bundle.instruction.daily_target_override_ml > 0 {
        println!("New daily target: {} ml", bundle.instruction.daily_target_override_ml);
    }

    let next: Vec<String> = bundle
        .targets
        .iter()
        .map(|t| format!("{}': +{} ml", t.minutes, t.delta_ml))
        .collect();
    println!("\nNext targets: {}", next.join("  "));

    for warning in &bundle.warnings {
        eprintln!("warning: {warning}");
    }
}
