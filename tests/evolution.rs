//! Integration tests for the evolution driver.
//!
//! These run complete evolutions on small populations and check the
//! generational invariants end to end.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_precision_loss)]

use exprgp::error::{ConfigError, EvolutionError};
use exprgp::gp::{EvolutionConfig, Individual, elitism, evolve, new_offspring, new_population};
use exprgp::problem::Problem;
use exprgp::report::{DatLog, MemoryLog};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::fs;

fn squares() -> Problem {
    Problem::new(vec![(1.0, 1.0), (2.0, 4.0), (3.0, 9.0)], 4, -10.0, 10.0)
}

fn config(population_size: usize, iterations: usize) -> EvolutionConfig {
    EvolutionConfig {
        population_size,
        iterations,
        seed: 2014,
        ..EvolutionConfig::default()
    }
}

fn same_individual(a: &Individual, b: &Individual) -> bool {
    a.root() == b.root() && a.fitness().to_bits() == b.fitness().to_bits()
}

#[test]
fn test_square_scenario() {
    let mut log = MemoryLog::default();
    let outcome = evolve(&config(20, 50), &squares(), &mut log).unwrap();

    let fitness = outcome.best.fitness();
    assert!(fitness.is_finite(), "best fitness {fitness} is not finite");
    assert!(fitness >= 0.0);
    assert_eq!(log.records.len(), 50);
    assert_eq!(outcome.stats.generations, 50);

    // Elitism keeps every generation's best in the next one
    for pair in log.records.windows(2) {
        let (prev, next) = (pair[0].best_score, pair[1].best_score);
        if prev.is_normal() && next.is_normal() {
            assert!(next <= prev, "best regressed from {prev} to {next}");
        }
    }
}

#[test]
fn test_full_elitism_freezes_population() {
    let mut run = config(10, 6);
    run.selection.elitism_size = 10;

    let mut log = MemoryLog::default();
    let outcome = evolve(&run, &squares(), &mut log).unwrap();

    let first = log.records[0];
    for record in &log.records[1..] {
        assert_eq!(record.best_score.to_bits(), first.best_score.to_bits());
        assert_eq!(record.best_size, first.best_size);
        assert_eq!(record.best_depth, first.best_depth);
        assert!((record.avg_size - first.best_size as f64).abs() < 1e-9);
        assert!((record.avg_depth - first.best_depth as f64).abs() < 1e-9);
        assert!((record.avg_fitness - first.best_fitness).abs() < 1e-9);
    }
    assert_eq!(outcome.best.fitness().to_bits(), first.best_score.to_bits());
}

#[test]
fn test_zero_variation_reproduces_parents() {
    let mut run = config(40, 1);
    run.crossover.crossover_chance = 0.0;
    run.mutation.mutate_chance = 0.0;
    let problem = squares();
    let mut rng = SmallRng::seed_from_u64(11);

    let population = new_population(&run, &problem, &mut rng);
    let offspring = new_offspring(&run, &problem, &population, &mut rng);

    assert_eq!(offspring.len(), population.len());
    for child in &offspring {
        assert!(
            population.iter().any(|parent| same_individual(parent, child)),
            "offspring {} has no identical parent",
            child.root()
        );
    }
}

#[test]
fn test_population_size_invariant() {
    let run = config(15, 0);
    let problem = squares();
    let mut rng = SmallRng::seed_from_u64(3);

    let mut population = new_population(&run, &problem, &mut rng);
    for _ in 0..20 {
        let best = exprgp::gp::best_of(&population).unwrap().clone();
        let mut offspring = new_offspring(&run, &problem, &population, &mut rng);
        elitism(&best, &mut offspring, run.selection.elitism_size, &mut rng);
        assert_eq!(offspring.len(), population.len());
        population = offspring;
    }
    assert_eq!(population.len(), 15);
}

#[test]
fn test_invalid_config_fails_before_running() {
    let mut run = config(5, 10);
    run.selection.tournament_size = 6;

    let mut log = MemoryLog::default();
    let result = evolve(&run, &squares(), &mut log);

    assert!(matches!(
        result,
        Err(EvolutionError::Config(ConfigError::TournamentSize {
            size: 6,
            population_size: 5
        }))
    ));
    assert!(log.records.is_empty());
}

#[test]
fn test_dat_log_run() {
    let dir = tempfile::tempdir().unwrap();
    let run = config(10, 5);
    let problem = squares();

    let mut log = DatLog::create(dir.path(), 99, 0, &run, &problem).unwrap();
    let outcome = evolve(&run, &problem, &mut log).unwrap();

    let text = fs::read_to_string(dir.path().join("99_0.dat")).unwrap();
    let data: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(data.len(), 5);
    for (i, line) in data.iter().enumerate() {
        let columns: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(columns.len(), 8);
        assert_eq!(columns[0], i.to_string());
    }
    assert!(text.contains(&outcome.best.root().to_string()));
    assert!(text.contains("# Elapsed time: "));
}

#[test]
fn test_same_seed_same_outcome() {
    let problem = squares();
    let mut first = MemoryLog::default();
    let mut second = MemoryLog::default();
    let a = evolve(&config(20, 5), &problem, &mut first).unwrap();
    let b = evolve(&config(20, 5), &problem, &mut second).unwrap();

    assert!(same_individual(&a.best, &b.best));
    for (x, y) in first.records.iter().zip(&second.records) {
        assert_eq!(x.best_score.to_bits(), y.best_score.to_bits());
        assert_eq!(x.avg_size.to_bits(), y.avg_size.to_bits());
    }
}
