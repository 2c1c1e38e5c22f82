//! Individuals: an expression tree with cached structure and fitness.

// Size penalty and reporting use intentional casts
#![allow(clippy::cast_precision_loss)]

use crate::gp::node::{Method, Node, Size};
use crate::problem::Problem;
use rand::Rng;
use serde::Serialize;
use std::fmt::Write;

/// One candidate solution.
///
/// `size`, `depth` and `fitness` are caches refreshed by [`Individual::evaluate`].
/// They are stale after mutation or crossover until the next evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Individual {
    root: Node,
    size: Size,
    depth: usize,
    fitness: f64,
}

/// One sample of an individual's evaluation trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TracePoint {
    /// Sample input.
    pub input: f64,
    /// Value predicted by the tree.
    pub output: f64,
    /// Expected value.
    pub target: f64,
}

impl Individual {
    /// Build a random individual no deeper than `depth` and evaluate it.
    #[must_use]
    pub fn new<R: Rng>(
        rng: &mut R,
        problem: &Problem,
        method: Method,
        depth: usize,
        penalty: f64,
    ) -> Self {
        let root = Node::random(rng, method, depth, &problem.constants());
        Self::from_root(root, &problem.dataset, penalty)
    }

    /// Wrap an existing tree and evaluate it.
    #[must_use]
    pub fn from_root(root: Node, dataset: &[(f64, f64)], penalty: f64) -> Self {
        let mut individual = Self {
            root,
            size: Size::default(),
            depth: 0,
            fitness: 0.0,
        };
        individual.evaluate(dataset, penalty);
        individual
    }

    /// Recompute size, depth and fitness against `dataset`.
    ///
    /// Fitness is the square root of the summed squared error, plus
    /// `penalty * total_size` when `penalty` is non-zero. It may be NaN or
    /// infinite when the tree overflows.
    pub fn evaluate(&mut self, dataset: &[(f64, f64)], penalty: f64) -> f64 {
        self.size = self.root.size();
        self.depth = self.root.depth();

        let error: f64 = dataset
            .iter()
            .map(|&(x, target)| (self.root.evaluate(x) - target).powi(2))
            .sum();

        let mut fitness = error.sqrt();
        if penalty != 0.0 {
            fitness += penalty * self.size.total() as f64;
        }
        self.fitness = fitness;
        fitness
    }

    /// The expression tree.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Cached fitness; lower is better.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// `1 / (1 + fitness)`, higher is better.
    #[must_use]
    pub fn adjusted(&self) -> f64 {
        1.0 / (1.0 + self.fitness)
    }

    /// Cached structural size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Cached tree depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Human-readable description of the tree and its formula.
    #[must_use]
    pub fn formula(&self) -> String {
        format!(
            "Expression tree of size {} with {} internals and {} leafs has the following formula:\n{}\n",
            self.size.total(),
            self.size.internals,
            self.size.leafs,
            self.root
        )
    }

    /// Per-sample predictions against `dataset`.
    #[must_use]
    pub fn trace(&self, dataset: &[(f64, f64)]) -> Vec<TracePoint> {
        dataset
            .iter()
            .map(|&(input, target)| TracePoint {
                input,
                output: self.root.evaluate(input),
                target,
            })
            .collect()
    }

    /// Per-sample calculation listing with squared errors and the total.
    #[must_use]
    pub fn calculation(&self, dataset: &[(f64, f64)]) -> String {
        let mut out = String::new();
        let mut error = 0.0;
        for point in self.trace(dataset) {
            let squared = (point.output - point.target).powi(2);
            error += squared;
            let _ = writeln!(
                out,
                "f({}, {}) = {}, error = {}.",
                point.input, point.target, point.output, squared
            );
        }
        let _ = writeln!(out, "Total fitness: {}.", f64::sqrt(error));
        out
    }
}

/// Bernoulli trial with `p` limited to `[0, 1]`; NaN never fires.
pub(crate) fn roll<R: Rng>(rng: &mut R, p: f64) -> bool {
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    rng.gen_bool(p)
}
