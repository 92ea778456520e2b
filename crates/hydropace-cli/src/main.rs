use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

#[derive(Parser)]
#[command(name = "hydropace-cli", version, about = "Hydropace CLI")]
struct Cli {
    /// Log pacing decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record, undo and list today's drinks
    Drink {
        #[command(subcommand)]
        action: commands::drink::DrinkAction,
    },
    /// Evaluate pacing from config and today's drink log
    Status(commands::status::StatusArgs),
    /// Evaluate a snapshot file and print the bundle as JSON
    Evaluate(commands::evaluate::EvaluateArgs),
    /// Compute the daily goal from the profile
    Goal(commands::goal::GoalArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(verbose: bool) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to install logger: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Drink { action } => commands::drink::run(action),
        Commands::Status(args) => commands::status::run(args),
        Commands::Evaluate(args) => commands::evaluate::run(args),
        Commands::Goal(args) => commands::goal::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
