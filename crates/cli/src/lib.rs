pub mod commands;

use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use cloudpick_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "cloudpick",
    about = "Cloudpick operator CLI",
    long_about = "Recommend a cloud provider from the reference dataset, and inspect or prune \
                  stored recommendations.",
    after_help = "Examples:\n  cloudpick recommend --name Acme --segment IT --storage 500 \
                  --encryption --cpu 3.0 --price 0.5 --score 3\n  cloudpick history --limit 5\n  \
                  cloudpick doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Pick the closest provider offering for the given requirements")]
    Recommend(commands::recommend::RecommendArgs),
    #[command(about = "List stored recommendations, newest first")]
    History {
        #[arg(long, default_value_t = commands::history::DEFAULT_LIMIT)]
        limit: u32,
    },
    #[command(about = "Print one stored recommendation with full provider detail")]
    Show { id: String },
    #[command(about = "Delete one stored recommendation")]
    Delete { id: String },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, dataset readability, and DB connectivity checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        if let Err(error) = init_logging(&config) {
            eprintln!("logging disabled: {error:#}");
        }
    }

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(args),
        Command::History { limit } => commands::history::run(limit),
        Command::Show { id } => commands::show::run(&id),
        Command::Delete { id } => commands::delete::run(&id),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so command output on stdout stays parseable.
fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow!(error).context("failed to install tracing subscriber"))
}
