// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Exprgp: symbolic regression by genetic programming.
//!
//! This crate evolves expression trees that fit a set of `(input, target)`
//! samples:
//! - Fixed-arity tree nodes with protected operators
//! - Reproducible parallel evolution from a single seed
//! - Per-generation progress records for logs and plots
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     CLI (exprgp evolve / check)     │
//! ├─────────────────────────────────────┤
//! │   Evolution driver  │  Report sinks │
//! ├─────────────────────────────────────┤
//! │   Genetic operators and trees       │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod gp;
pub mod problem;
pub mod report;

pub use error::{ConfigError, EvolutionError, ProblemError};
pub use gp::{EvolutionConfig, EvolutionOutcome, Individual, Node, evolve};
pub use problem::{Builtin, Problem};
pub use report::{DatLog, GenerationRecord, MemoryLog, ProgressSink};
