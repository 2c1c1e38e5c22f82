//! Subtree crossover.
//!
//! One subtree is chosen in each parent and the two are swapped in place.
//! Each parent independently restricts its choice to internal nodes with
//! probability `internals_chance`, otherwise to leaves. Depth is not clamped
//! afterwards, so offspring may grow past the initial depth limit.

use crate::gp::individual::{Individual, roll};
use crate::gp::node::{Node, Target};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for crossover operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverConfig {
    /// Probability that an offspring pair is crossed over.
    pub crossover_chance: f64,
    /// Probability of picking an internal node rather than a leaf.
    pub internals_chance: f64,
    /// Arity of the crossover operator; only `2` enables pairwise crossover.
    pub crossover_size: usize,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            crossover_chance: 0.8,
            internals_chance: 0.9,
            crossover_size: 2,
        }
    }
}

/// Swap a random subtree of `a` with a random subtree of `b`.
///
/// `internals_chance` is clamped to `[0, 1]`. Both individuals keep stale
/// fitness until they are re-evaluated.
pub fn crossover<R: Rng>(internals_chance: f64, a: &mut Individual, b: &mut Individual, rng: &mut R) {
    let target_a = pick_target(a.root(), internals_chance, rng);
    let target_b = pick_target(b.root(), internals_chance, rng);

    if let (Some(left), Some(right)) = (a.root_mut().visit(target_a), b.root_mut().visit(target_b)) {
        std::mem::swap(left.node, right.node);
    }
}

/// Choose a crossover point, falling back to a leaf when there are no internals.
fn pick_target<R: Rng>(root: &Node, internals_chance: f64, rng: &mut R) -> Target {
    let size = root.size();
    if roll(rng, internals_chance) && size.internals > 0 {
        Target::Internal(rng.gen_range(0..size.internals))
    } else {
        Target::Leaf(rng.gen_range(0..size.leafs))
    }
}
