//! Evaluate a snapshot file, the offline twin of a server evaluation.

use std::path::PathBuf;

use clap::Args;

use hydropace_core::{Config, PacingSession, PacingSnapshot};

#[derive(Args)]
pub struct EvaluateArgs {
    /// Snapshot JSON file
    snapshot: PathBuf,
    /// Use default policy instead of the configured one
    #[arg(long)]
    default_policy: bool,
}

pub fn run(args: EvaluateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.snapshot)
        .map_err(|e| format!("cannot read {}: {e}", args.snapshot.display()))?;
    let snapshot: PacingSnapshot = serde_json::from_str(&content)?;

    let policy = if args.default_policy {
        Default::default()
    } else {
        Config::load()?.policy
    };
    let bundle = PacingSession::new(policy).evaluate(&snapshot)?;
    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(())
}
