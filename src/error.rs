//! Error types for configuration, problem loading and the evolution driver.

use std::io;
use thiserror::Error;

/// A configuration invariant was violated.
///
/// These are detected before the first generation runs and are never
/// recovered from mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// The population must hold at least one individual.
    #[error("population size must be greater than zero")]
    EmptyPopulation,
    /// Tournament size outside `[1, population_size]`.
    #[error("tournament size {size} must be in [1, {population_size}]")]
    TournamentSize {
        /// Configured tournament size.
        size: usize,
        /// Configured population size.
        population_size: usize,
    },
    /// Elitism size larger than the population.
    #[error("elitism size {size} must not exceed population size {population_size}")]
    ElitismSize {
        /// Configured elitism size.
        size: usize,
        /// Configured population size.
        population_size: usize,
    },
    /// A probability outside `[0, 1]`.
    #[error("{name} must be a probability in [0, 1], got {value}")]
    Chance {
        /// Name of the offending option.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Size penalty coefficient is negative or not finite.
    #[error("penalty must be a finite value >= 0, got {0}")]
    Penalty(f64),
    /// Constant range is inverted or not finite.
    #[error("constant range [{min}, {max}] is invalid")]
    ConstantRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// The dataset has no samples to fit.
    #[error("dataset contains no samples")]
    EmptyDataset,
}

/// Failure to load a dataset.
#[derive(Debug, Error)]
pub enum ProblemError {
    /// The dataset file could not be read.
    #[error("failed to read dataset: {0}")]
    Io(#[from] io::Error),
    /// A line did not hold two real numbers.
    #[error("line {line}: expected `input target`, got '{content}'")]
    Parse {
        /// One-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },
}

/// Failure while running the evolution driver.
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// The configuration was rejected before the first generation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A progress sink could not be written.
    #[error("progress log failed: {0}")]
    Log(#[from] io::Error),
    /// A generation came out with a different number of individuals.
    #[error("generation {generation} has {actual} individuals, expected {expected}")]
    PopulationSize {
        /// Generation whose offspring were built.
        generation: usize,
        /// Configured population size.
        expected: usize,
        /// Offspring count after elitism.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_copy() {
        let error = ConfigError::Chance {
            name: "grow_chance",
            value: 2.0,
        };
        let copy = error;
        assert_eq!(copy, error);

        let wrapped = EvolutionError::from(error);
        assert_eq!(
            wrapped.to_string(),
            "invalid configuration: grow_chance must be a probability in [0, 1], got 2"
        );
    }
}
