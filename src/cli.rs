//! CLI command implementations for exprgp.

pub(crate) mod check;
pub(crate) mod evolve;

mod output;

use clap::{Args, ValueEnum};
use exprgp::error::{ConfigError, EvolutionError, ProblemError};
use exprgp::gp::EvolutionConfig;
use exprgp::problem::{Builtin, Problem};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Output format for the `evolve` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Built-in target functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ProblemKind {
    /// `x^2`
    Square,
    /// `x^3 - x`
    Cubic,
    /// `sin(x) + x / 2`
    Sine,
}

impl From<ProblemKind> for Builtin {
    fn from(kind: ProblemKind) -> Self {
        match kind {
            ProblemKind::Square => Self::Square,
            ProblemKind::Cubic => Self::Cubic,
            ProblemKind::Sine => Self::Sine,
        }
    }
}

/// Where the samples come from and how trees are built.
#[derive(Args, Debug)]
pub(crate) struct ProblemArgs {
    /// Two-column `input target` dataset file
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Built-in target sampled when no dataset is given
    #[arg(long, default_value = "square", conflicts_with = "dataset")]
    problem: ProblemKind,

    /// Maximum depth of initial and mutated trees
    #[arg(long, default_value = "4")]
    max_depth: usize,

    /// Lower bound for random constants
    #[arg(long, default_value = "-10", allow_hyphen_values = true)]
    constant_min: f64,

    /// Upper bound for random constants
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    constant_max: f64,
}

impl ProblemArgs {
    /// Load the dataset or sample the built-in target.
    pub(crate) fn build(&self) -> Result<Problem, CliError> {
        match &self.dataset {
            Some(path) => Problem::load(path, self.max_depth, self.constant_min, self.constant_max)
                .map_err(|e| CliError::new(format!("{}: {e}", path.display()))),
            None => Ok(Problem::sampled(
                self.problem.into(),
                self.max_depth,
                self.constant_min,
                self.constant_max,
            )),
        }
    }
}

/// Evolution options; flags override the optional JSON config.
#[derive(Args, Debug)]
pub(crate) struct TuningArgs {
    /// JSON file holding an evolution config used as the base
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Population size
    #[arg(long)]
    population_size: Option<usize>,

    /// Number of generations
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Tournament size
    #[arg(long)]
    tournament_size: Option<usize>,

    /// Offspring slots overwritten by the generation's best
    #[arg(long)]
    elitism_size: Option<usize>,

    /// Probability that an offspring pair is crossed over
    #[arg(long)]
    crossover_chance: Option<f64>,

    /// Probability of picking internal crossover points
    #[arg(long)]
    internals_chance: Option<f64>,

    /// Crossover arity; only 2 enables crossover
    #[arg(long)]
    crossover_size: Option<usize>,

    /// Probability that an offspring is mutated
    #[arg(long)]
    mutate_chance: Option<f64>,

    /// Probability that an initial tree is grown rather than full
    #[arg(long)]
    grow_chance: Option<f64>,

    /// Size penalty per node added to fitness
    #[arg(long)]
    penalty: Option<f64>,

    /// Log verbosity; 0 disables the generation log
    #[arg(short, long)]
    verbosity: Option<u32>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,
}

impl TuningArgs {
    /// Read the base config, then apply every flag that was given.
    pub(crate) fn build(&self) -> Result<EvolutionConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
                serde_json::from_str(&text)
                    .map_err(|e| CliError::new(format!("Failed to parse {}: {e}", path.display())))?
            }
            None => EvolutionConfig::default(),
        };

        if let Some(v) = self.population_size {
            config.population_size = v;
        }
        if let Some(v) = self.iterations {
            config.iterations = v;
        }
        if let Some(v) = self.tournament_size {
            config.selection.tournament_size = v;
        }
        if let Some(v) = self.elitism_size {
            config.selection.elitism_size = v;
        }
        if let Some(v) = self.crossover_chance {
            config.crossover.crossover_chance = v;
        }
        if let Some(v) = self.internals_chance {
            config.crossover.internals_chance = v;
        }
        if let Some(v) = self.crossover_size {
            config.crossover.crossover_size = v;
        }
        if let Some(v) = self.mutate_chance {
            config.mutation.mutate_chance = v;
        }
        if let Some(v) = self.grow_chance {
            config.grow_chance = v;
        }
        if let Some(v) = self.penalty {
            config.penalty = v;
        }
        if let Some(v) = self.verbosity {
            config.verbosity = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }

        Ok(config)
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(format!("invalid configuration: {e}"))
    }
}

impl From<ProblemError> for CliError {
    fn from(e: ProblemError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<EvolutionError> for CliError {
    fn from(e: EvolutionError) -> Self {
        Self::new(e.to_string())
    }
}
