//! Subtree mutation.
//!
//! A mutated individual has one uniformly chosen subtree replaced by a
//! freshly grown random subtree. The replacement may only grow as deep as
//! the problem's depth limit still allows below the chosen node.

use crate::gp::individual::{Individual, roll};
use crate::gp::node::{Method, Node, Target};
use crate::problem::Problem;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for mutation operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Probability that an offspring is mutated.
    pub mutate_chance: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self { mutate_chance: 0.1 }
    }
}

impl Individual {
    /// With probability `chance`, replace a random subtree in place.
    ///
    /// `chance` is clamped to `[0, 1]` and NaN never mutates. Returns
    /// whether the tree changed. Cached fitness is left stale;
    /// call [`Individual::evaluate`] before comparing this individual.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R, chance: f64, problem: &Problem) -> bool {
        if !roll(rng, chance) {
            return false;
        }

        // Cached size may be stale after crossover
        let total = self.root().size().total();
        let index = rng.gen_range(0..total);
        let Some(visit) = self.root_mut().visit(Target::Any(index)) else {
            return false;
        };

        let budget = problem.max_depth.saturating_sub(visit.depth);
        *visit.node = Node::random(rng, Method::Grow, budget, &problem.constants());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn problem() -> Problem {
        Problem::new(vec![(1.0, 1.0), (2.0, 4.0), (3.0, 9.0)], 4, -5.0, 5.0)
    }

    #[test]
    fn test_zero_chance_is_noop() {
        let mut rng = SmallRng::seed_from_u64(1);
        let problem = problem();
        let mut individual = Individual::new(&mut rng, &problem, Method::Grow, 4, 0.0);
        let original = individual.clone();

        for _ in 0..100 {
            assert!(!individual.mutate(&mut rng, 0.0, &problem));
        }
        assert_eq!(individual, original);
    }

    #[test]
    fn test_mutation_respects_depth_limit() {
        let mut rng = SmallRng::seed_from_u64(2);
        let problem = problem();

        for _ in 0..200 {
            let mut individual = Individual::new(&mut rng, &problem, Method::Full, 4, 0.0);
            assert!(individual.mutate(&mut rng, 1.0, &problem));
            individual.evaluate(&problem.dataset, 0.0);
            assert!(individual.depth() <= problem.max_depth);
        }
    }

    #[test]
    fn test_mutation_changes_trees() {
        let mut rng = SmallRng::seed_from_u64(3);
        let problem = problem();

        let changed = (0..50)
            .filter(|_| {
                let mut individual = Individual::new(&mut rng, &problem, Method::Full, 3, 0.0);
                let before = individual.root().clone();
                individual.mutate(&mut rng, 1.0, &problem);
                *individual.root() != before
            })
            .count();
        assert!(changed > 25);
    }
}
