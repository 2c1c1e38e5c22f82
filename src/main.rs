//! Exprgp CLI - evolve symbolic expressions that fit a dataset.

// Allow unwrap in tests and print in the CLI binary
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exprgp - symbolic regression by genetic programming
#[derive(Parser, Debug)]
#[command(name = "exprgp")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve expression trees against a dataset
    Evolve {
        #[command(flatten)]
        problem: cli::ProblemArgs,

        #[command(flatten)]
        tuning: cli::TuningArgs,

        /// Number of independent trials, seeds offset by trial index
        #[arg(short, long, default_value = "1")]
        trials: usize,

        /// Directory for per-generation logs
        #[arg(long, default_value = "logs")]
        logs_dir: PathBuf,

        /// Directory for best-individual plot data
        #[arg(long, default_value = "plots")]
        plots_dir: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show a per-generation progress bar (needs verbosity > 0)
        #[arg(short, long)]
        progress: bool,
    },

    /// Validate a configuration and dataset without running
    Check {
        #[command(flatten)]
        problem: cli::ProblemArgs,

        #[command(flatten)]
        tuning: cli::TuningArgs,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Evolve {
            problem,
            tuning,
            trials,
            logs_dir,
            plots_dir,
            format,
            progress,
        } => cli::evolve::execute(&problem, &tuning, trials, &logs_dir, &plots_dir, format, progress),

        Commands::Check { problem, tuning } => cli::check::execute(&problem, &tuning),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
