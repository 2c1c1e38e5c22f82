//! Benchmarks for tree evaluation and offspring construction.
//!
//! Fitness evaluation dominates a generation, so both the single-tree and
//! whole-population paths are measured.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use exprgp::gp::{EvolutionConfig, Individual, Method, Node, new_offspring, new_population};
use exprgp::problem::{Builtin, Problem};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn bench_evaluate_tree(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let problem = Problem::sampled(Builtin::Sine, 6, -10.0, 10.0);
    let tree = Node::random(&mut rng, Method::Full, 6, &problem.constants());

    c.bench_function("evaluate_full_depth_6", |b| {
        b.iter(|| black_box(&tree).evaluate(black_box(0.5)));
    });
}

fn bench_individual_fitness(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let problem = Problem::sampled(Builtin::Cubic, 5, -10.0, 10.0);
    let mut individual = Individual::new(&mut rng, &problem, Method::Grow, 5, 0.0);

    c.bench_function("fitness_21_samples", |b| {
        b.iter(|| black_box(individual.evaluate(black_box(&problem.dataset), 0.0)));
    });
}

fn bench_new_offspring(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let problem = Problem::default();
    let config = EvolutionConfig {
        population_size: 500,
        ..EvolutionConfig::default()
    };
    let population = new_population(&config, &problem, &mut rng);

    c.bench_function("new_offspring_500", |b| {
        b.iter(|| {
            let offspring = new_offspring(black_box(&config), &problem, black_box(&population), &mut rng);
            black_box(offspring)
        });
    });
}

criterion_group!(benches, bench_evaluate_tree, bench_individual_fitness, bench_new_offspring);
criterion_main!(benches);
