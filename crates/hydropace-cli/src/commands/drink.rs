use clap::Subcommand;
use chrono::{DateTime, FixedOffset, NaiveDate};

use hydropace_core::storage::drink_log_path;
use hydropace_core::{DrinkEvent, DrinkLog};

use super::instant_or_now;

#[derive(Subcommand)]
pub enum DrinkAction {
    /// Record a drink
    Add {
        /// Amount in millilitres
        amount_ml: u32,
        /// When it happened (RFC 3339, defaults to now)
        #[arg(long)]
        at: Option<String>,
        /// Source label (e.g. "watch")
        #[arg(long, default_value = "manual")]
        source: String,
    },
    /// Remove the most recent drink
    Undo,
    /// List today's drinks
    List {
        #[arg(long)]
        json: bool,
    },
}

/// Read the stored drink log, or an empty one dated `today`. Never writes.
pub fn read_log(today: NaiveDate) -> Result<DrinkLog, Box<dyn std::error::Error>> {
    let path = drink_log_path()?;
    if path.exists() {
        Ok(DrinkLog::load_from(&path)?)
    } else {
        Ok(DrinkLog::new(today))
    }
}

/// The log for the wall-clock day of `now`. A stale log is cleared in
/// memory; only mutations persist the rotation.
fn todays_log(now: &DateTime<FixedOffset>) -> Result<DrinkLog, Box<dyn std::error::Error>> {
    let today = now.date_naive();
    let mut log = read_log(today)?;
    if log.rotate(today) {
        tracing::debug!(%today, "starting a new drink log");
    }
    Ok(log)
}

fn save_log(log: &DrinkLog) -> Result<(), Box<dyn std::error::Error>> {
    log.save_to(&drink_log_path()?)?;
    Ok(())
}

pub fn run(action: DrinkAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DrinkAction::Add { amount_ml, at, source } => {
            let now = instant_or_now(None)?;
            let when = match at.as_deref() {
                Some(s) => instant_or_now(Some(s))?,
                None => now,
            };
            if when > now {
                return Err(format!("drink time {} is in the future", when.to_rfc3339()).into());
            }
            let mut log = todays_log(&now)?;
            log.record(DrinkEvent::new(when, amount_ml)?.with_source(source));
            save_log(&log)?;
            println!("Recorded {amount_ml} ml (today: {} ml)", log.total_ml());
        }
        DrinkAction::Undo => {
            let now = instant_or_now(None)?;
            let mut log = todays_log(&now)?;
            match log.undo_last() {
                Some(event) => {
                    save_log(&log)?;
                    println!(
                        "Removed {} ml from {} (today: {} ml)",
                        event.amount_ml,
                        event.timestamp.format("%H:%M"),
                        log.total_ml()
                    );
                }
                None => println!("Nothing to undo"),
            }
        }
        DrinkAction::List { json } => {
            let now = instant_or_now(None)?;
            let log = todays_log(&now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&log.ordered())?);
            } else {
                for event in log.ordered() {
                    println!(
                        "{}  {:>5} ml  {}",
                        event.timestamp.format("%H:%M"),
                        event.amount_ml,
                        event.source.as_deref().unwrap_or("")
                    );
                }
                println!("Total: {} ml", log.total_ml());
            }
        }
    }
    Ok(())
}
