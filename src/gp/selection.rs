//! Selection operators for genetic programming.
//!
//! Individuals are ranked by [`compare_fitness`]: a normal (finite,
//! non-zero, non-subnormal) fitness always beats a non-normal one, and
//! between normal values the smaller error wins. Tournament selection and
//! per-generation best tracking both use this ordering.

use crate::gp::individual::Individual;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Configuration for selection operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Number of individuals competing in each tournament.
    pub tournament_size: usize,
    /// Number of offspring slots overwritten by the generation's best.
    pub elitism_size: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tournament_size: 3,
            elitism_size: 2,
        }
    }
}

/// Order two individuals, `Less` meaning `a` is better than `b`.
///
/// Non-normal fitness values (NaN, infinite, zero, subnormal) compare equal
/// to each other and worse than any normal value.
#[must_use]
pub fn compare_fitness(a: &Individual, b: &Individual) -> Ordering {
    match (a.fitness().is_normal(), b.fitness().is_normal()) {
        (true, true) => a.fitness().total_cmp(&b.fitness()),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// The best individual of `population`, the first one on ties.
#[must_use]
pub fn best_of(population: &[Individual]) -> Option<&Individual> {
    population.iter().min_by(|a, b| compare_fitness(a, b))
}

/// Tournament selection: return a copy of the best of `size` contestants
/// drawn uniformly with replacement.
///
/// Returns `None` only for an empty population.
#[must_use]
pub fn selection<R: Rng>(size: usize, population: &[Individual], rng: &mut R) -> Option<Individual> {
    if population.is_empty() {
        return None;
    }

    (0..size.max(1))
        .map(|_| &population[rng.gen_range(0..population.len())])
        .min_by(|a, b| compare_fitness(a, b))
        .cloned()
}

/// Overwrite `size` random offspring slots with copies of `best`.
///
/// Slots are drawn with replacement, so the same slot may be hit twice.
/// The incoming copy is not compared with the occupant it replaces. When
/// `size` covers the whole population every slot is overwritten.
pub fn elitism<R: Rng>(best: &Individual, offspring: &mut [Individual], size: usize, rng: &mut R) {
    if offspring.is_empty() || size == 0 {
        return;
    }
    if size >= offspring.len() {
        offspring.fill(best.clone());
        return;
    }
    for _ in 0..size {
        let slot = rng.gen_range(0..offspring.len());
        offspring[slot] = best.clone();
    }
}
