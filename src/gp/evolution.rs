//! Main evolution loop for genetic programming.
//!
//! Each generation finds the current best individual, records progress
//! while the offspring are built, copies the best into random offspring
//! slots and then replaces the population wholesale.

use crate::error::{ConfigError, EvolutionError};
use crate::gp::crossover::CrossoverConfig;
use crate::gp::individual::Individual;
use crate::gp::mutation::MutationConfig;
use crate::gp::population::{new_offspring, new_population};
use crate::gp::selection::{SelectionConfig, best_of, elitism};
use crate::problem::Problem;
use crate::report::{GenerationRecord, ProgressSink};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Configuration for the evolution process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Population size.
    pub population_size: usize,
    /// Number of generations to run.
    pub iterations: usize,
    /// Probability that an initial tree is grown rather than built full.
    pub grow_chance: f64,
    /// Size penalty coefficient added to fitness per node.
    pub penalty: f64,
    /// Progress reporting level; `0` disables the progress sink.
    pub verbosity: u32,
    /// RNG seed for reproducibility.
    pub seed: u64,
    /// Selection configuration.
    pub selection: SelectionConfig,
    /// Crossover configuration.
    pub crossover: CrossoverConfig,
    /// Mutation configuration.
    pub mutation: MutationConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            iterations: 100,
            grow_chance: 0.5,
            penalty: 0.0,
            verbosity: 1,
            seed: 42,
            selection: SelectionConfig::default(),
            crossover: CrossoverConfig::default(),
            mutation: MutationConfig::default(),
        }
    }
}

impl EvolutionConfig {
    /// Check every option against `problem` before a run starts.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self, problem: &Problem) -> Result<(), ConfigError> {
        let population_size = self.population_size;
        if population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        let tournament_size = self.selection.tournament_size;
        if !(1..=population_size).contains(&tournament_size) {
            return Err(ConfigError::TournamentSize {
                size: tournament_size,
                population_size,
            });
        }
        if self.selection.elitism_size > population_size {
            return Err(ConfigError::ElitismSize {
                size: self.selection.elitism_size,
                population_size,
            });
        }

        let chances = [
            ("crossover_chance", self.crossover.crossover_chance),
            ("internals_chance", self.crossover.internals_chance),
            ("mutate_chance", self.mutation.mutate_chance),
            ("grow_chance", self.grow_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Chance { name, value });
            }
        }

        if !self.penalty.is_finite() || self.penalty < 0.0 {
            return Err(ConfigError::Penalty(self.penalty));
        }

        let (min, max) = (problem.constant_min, problem.constant_max);
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigError::ConstantRange { min, max });
        }
        if problem.dataset.is_empty() {
            return Err(ConfigError::EmptyDataset);
        }

        Ok(())
    }
}

/// Overall statistics from an evolution run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvolutionStats {
    /// Number of generations run.
    pub generations: usize,
    /// Seed the run started from.
    pub seed: u64,
    /// Total time in seconds.
    pub elapsed_seconds: f64,
}

/// Result of an evolution run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionOutcome {
    /// Best individual of the final generation.
    pub best: Individual,
    /// Run statistics.
    pub stats: EvolutionStats,
}

/// Run the evolution process.
///
/// Progress records are computed on the rayon pool alongside offspring
/// construction and are joined before the population is replaced. With
/// `verbosity == 0` the sink is never called.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the sink fails.
pub fn evolve<S: ProgressSink>(
    config: &EvolutionConfig,
    problem: &Problem,
    sink: &mut S,
) -> Result<EvolutionOutcome, EvolutionError> {
    config.validate(problem)?;

    let start_time = Instant::now();
    let mut rng = SmallRng::seed_from_u64(config.seed);
    info!(
        "evolving {} individuals for {} generations over {} samples (seed {})",
        config.population_size,
        config.iterations,
        problem.dataset.len(),
        config.seed
    );

    let mut population = new_population(config, problem, &mut rng);

    for generation in 0..config.iterations {
        let best = current_best(&population)?;
        if !best.fitness().is_normal() {
            warn!("generation {generation}: no individual has a normal fitness");
        }

        let (logged, mut offspring) = if config.verbosity > 0 {
            rayon::join(
                || sink.record(&GenerationRecord::summarize(generation, &best, &population)),
                || new_offspring(config, problem, &population, &mut rng),
            )
        } else {
            (Ok(()), new_offspring(config, problem, &population, &mut rng))
        };
        logged?;

        elitism(&best, &mut offspring, config.selection.elitism_size, &mut rng);
        check_size(generation, config.population_size, &offspring)?;
        debug!(
            "generation {generation}: best={:.6} size={} depth={}",
            best.fitness(),
            best.size().total(),
            best.depth()
        );

        population = offspring;
    }

    let best = current_best(&population)?;
    let stats = EvolutionStats {
        generations: config.iterations,
        seed: config.seed,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    };
    if config.verbosity > 0 {
        sink.finish(&best, &stats)?;
    }
    info!(
        "finished in {:.3}s, best fitness {:.6} with {} nodes",
        stats.elapsed_seconds,
        best.fitness(),
        best.size().total()
    );

    Ok(EvolutionOutcome { best, stats })
}

fn check_size(generation: usize, expected: usize, offspring: &[Individual]) -> Result<(), EvolutionError> {
    if offspring.len() == expected {
        Ok(())
    } else {
        Err(EvolutionError::PopulationSize {
            generation,
            expected,
            actual: offspring.len(),
        })
    }
}

fn current_best(population: &[Individual]) -> Result<Individual, ConfigError> {
    best_of(population).cloned().ok_or(ConfigError::EmptyPopulation)
}
