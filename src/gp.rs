//! Genetic programming over symbolic expression trees.
//!
//! Candidate solutions are trees of arithmetic and trigonometric operators
//! over a single input `x`. A population is evolved by tournament
//! selection, subtree crossover, subtree mutation and elitism to fit the
//! samples of a [`Problem`](crate::problem::Problem).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │         Evolution Loop              │
//! ├─────────────────────────────────────┤
//! │  Selection │ Crossover │ Mutation   │
//! ├─────────────────────────────────────┤
//! │   Population / Individual fitness   │
//! ├─────────────────────────────────────┤
//! │         Expression Tree             │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use exprgp::gp::{EvolutionConfig, evolve};
//! use exprgp::problem::Problem;
//! use exprgp::report::MemoryLog;
//!
//! let config = EvolutionConfig::default();
//! let problem = Problem::default();
//! let outcome = evolve(&config, &problem, &mut MemoryLog::default())?;
//! println!("{}", outcome.best.formula());
//! # Ok::<(), exprgp::error::EvolutionError>(())
//! ```

mod crossover;
mod evolution;
mod individual;
mod mutation;
mod node;
mod population;
mod selection;

pub use crossover::{CrossoverConfig, crossover};
pub use evolution::{EvolutionConfig, EvolutionOutcome, EvolutionStats, evolve};
pub use individual::{Individual, TracePoint};
pub use mutation::MutationConfig;
pub use node::{BinaryOp, Method, Node, Size, Target, UnaryOp, Visit};
pub use population::{new_offspring, new_population};
pub use selection::{SelectionConfig, best_of, compare_fitness, elitism, selection};
