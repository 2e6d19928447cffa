//! CLI interface for Pacer.
//!
//! Each subcommand is non-interactive: arguments in, output out.
//! Ids and JSON go to stdout; errors and logs go to stderr.

mod format;
mod workout;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::{config::Config, model::WorkoutKind, storage::Storage};

/// Pacer — log workouts and review the latest one.
#[derive(Debug, Parser)]
#[command(name = "pacer", after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Database file. Overrides `database` in `~/.pacer/config.toml`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    command: Command,
}

const USAGE_HELP: &str = r"Example:
  pacer add --type running --calories 320 --distance 4.2
  pacer latest
  pacer latest --json";

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or upgrade the workout database. Prints the schema version.
    Init,

    /// Log a workout that starts now. Prints the workout ID.
    ///
    /// The workout spans `window-minutes` from config (60 by default).
    Add {
        /// Kind of workout.
        #[arg(long = "type", value_enum, default_value_t = KindArg::Walking)]
        kind: KindArg,

        /// Calories burned.
        #[arg(long)]
        calories: String,

        /// Distance covered, in kilometers.
        #[arg(long)]
        distance: String,

        /// Step count reported by the pedometer for this session.
        #[arg(long)]
        steps: Option<u64>,
    },

    /// Show the workout with the latest start time.
    Latest {
        /// Print the stored record as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// CLI-facing workout kind, mapped to the domain `WorkoutKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Walking,
    Running,
    Cycling,
}

impl KindArg {
    fn to_domain(self) -> WorkoutKind {
        match self {
            Self::Walking => WorkoutKind::Walking,
            Self::Running => WorkoutKind::Running,
            Self::Cycling => WorkoutKind::Cycling,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli, config: &Config) -> Result<(), String> {
    let path = config
        .database_path(cli.db.as_deref())
        .ok_or("could not determine home directory; pass --db <path>")?;
    let storage = Storage::open(&path)
        .map_err(|e| format!("failed to open {}: {e}", path.display()))?;

    let result = match cli.command {
        Command::Init => workout::cmd_init(&storage),
        Command::Add {
            kind,
            calories,
            distance,
            steps,
        } => workout::cmd_add(
            config,
            &storage,
            kind.to_domain(),
            calories,
            distance,
            steps,
        ),
        Command::Latest { json } => workout::cmd_latest(&storage, json),
    };

    storage
        .close()
        .map_err(|e| format!("failed to close {}: {e}", path.display()))?;
    result
}
