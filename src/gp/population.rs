//! Population construction and offspring generation.
//!
//! Work that is independent per individual runs on the rayon pool. Each
//! task gets its own `SmallRng` seeded from a base seed drawn from the
//! caller's generator plus the task index, so results depend only on the
//! caller's seed and not on scheduling.

use crate::gp::crossover::crossover;
use crate::gp::evolution::EvolutionConfig;
use crate::gp::individual::{Individual, roll};
use crate::gp::node::Method;
use crate::gp::selection::selection;
use crate::problem::Problem;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Independent generator for the `index`-th task of a parallel phase.
fn task_rng(base_seed: u64, index: usize) -> SmallRng {
    SmallRng::seed_from_u64(base_seed.wrapping_add(index as u64))
}

/// Ramped half-and-half initialization.
///
/// Each individual gets a depth drawn uniformly from `[0, max_depth]` and is
/// grown with probability `grow_chance`, otherwise built full. Every
/// individual is evaluated before it is returned. Chances outside `[0, 1]`
/// are clamped; use [`EvolutionConfig::validate`] to reject them instead.
#[must_use]
pub fn new_population<R: Rng>(config: &EvolutionConfig, problem: &Problem, rng: &mut R) -> Vec<Individual> {
    let base_seed: u64 = rng.r#gen();

    (0..config.population_size)
        .into_par_iter()
        .map(|i| {
            let mut rng = task_rng(base_seed, i);
            let depth = rng.gen_range(0..=problem.max_depth);
            let method = if roll(&mut rng, config.grow_chance) {
                Method::Grow
            } else {
                Method::Full
            };
            Individual::new(&mut rng, problem, method, depth, config.penalty)
        })
        .collect()
}

/// Produce the next generation's offspring from `population`.
///
/// Parents are chosen by tournament; adjacent pairs are crossed over when
/// the crossover arity is 2; every child may be mutated and is always
/// re-evaluated. The result has exactly as many individuals as `population`.
/// Chances outside `[0, 1]` are clamped and NaN chances never fire.
#[must_use]
pub fn new_offspring<R: Rng>(
    config: &EvolutionConfig,
    problem: &Problem,
    population: &[Individual],
    rng: &mut R,
) -> Vec<Individual> {
    let mut offspring: Vec<Individual> = (0..population.len())
        .filter_map(|_| selection(config.selection.tournament_size, population, rng))
        .collect();

    if config.crossover.crossover_size == 2 {
        for pair in offspring.chunks_exact_mut(2) {
            let [a, b] = pair else {
                continue;
            };
            if roll(rng, config.crossover.crossover_chance) {
                crossover(config.crossover.internals_chance, a, b, rng);
            }
        }
    }

    let base_seed: u64 = rng.r#gen();
    offspring.par_iter_mut().enumerate().for_each(|(i, child)| {
        let mut rng = task_rng(base_seed, i);
        child.mutate(&mut rng, config.mutation.mutate_chance, problem);
        child.evaluate(&problem.dataset, config.penalty);
    });

    offspring
}
