use clap::Args;

use hydropace_core::{compute_daily_goal, Config};

#[derive(Args)]
pub struct GoalArgs {
    /// Body weight in kg (defaults to configured weight)
    #[arg(long)]
    weight: Option<f64>,
    /// Steps walked today
    #[arg(long, default_value = "0")]
    steps: u32,
    /// Fasting today (adds the fasting modifier)
    #[arg(long)]
    fasting: bool,
    /// Medication taken today
    #[arg(long)]
    medication: bool,
    #[arg(long)]
    json: bool,
}

pub fn run(args: GoalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut profile = config.profile(args.steps, args.medication);
    if let Some(weight) = args.weight {
        profile.weight_kg = weight;
    }
    profile.fasting |= args.fasting;

    let goal = compute_daily_goal(&profile, &config.goal.model);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&goal)?);
        return Ok(());
    }

    println!("Daily goal: {} ml", goal.goal_ml);
    println!("  Base ({} kg):  {} ml", profile.weight_kg, goal.base_ml);
    println!("  Medication:    +{} ml", goal.medication_modifier_ml);
    println!("  Fasting:       +{} ml", goal.fasting_modifier_ml);
    println!("  Activity:      +{} ml", goal.activity_modifier_ml);
    if config.goal.fixed_goal_ml > 0 {
        println!(
            "\n  Note: config fixes the goal at {} ml (goal.fixed_goal_ml)",
            config.goal.fixed_goal_ml
        );
    }
    Ok(())
}
