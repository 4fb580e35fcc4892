use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecosim_core::brain::{BrainLogic, DecisionPolicy};
use ecosim_core::config::AppConfig;
use ecosim_core::evolution::{EvolutionController, PolicyPopulation};
use ecosim_data::{Brain, PolicyId, OBSERVATION_LEN};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Forward pass through the default-sized policy.
fn bench_brain_evaluate(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let brain = Brain::new_random_with_rng(12, 1.0, &mut rng);
    let observation = [0.5; OBSERVATION_LEN];

    c.bench_function("brain_evaluate", |b| {
        b.iter(|| {
            let result = brain.evaluate(black_box(&observation));
            black_box(result)
        })
    });
}

fn bench_brain_evaluate_saturated(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let brain = Brain::new_random_with_rng(12, 5.0, &mut rng);
    let observation = [1.0; OBSERVATION_LEN];

    c.bench_function("brain_evaluate_saturated", |b| {
        b.iter(|| {
            let result = brain.evaluate(black_box(&observation));
            black_box(result)
        })
    });
}

fn bench_brain_mutation(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let config = AppConfig::default();
    let mut brain = Brain::new_random_with_rng(12, 1.0, &mut rng);

    c.bench_function("brain_mutation", |b| {
        b.iter(|| {
            brain.mutate_with_config(&config, &mut rng);
            black_box(&brain);
        })
    });
}

fn bench_brain_crossover(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let a = Brain::new_random_with_rng(12, 1.0, &mut rng);
    let b2 = Brain::new_random_with_rng(12, 1.0, &mut rng);

    c.bench_function("brain_crossover", |b| {
        b.iter(|| {
            let child = a.crossover_with_rng(black_box(&b2), &mut rng);
            black_box(child)
        })
    });
}

/// One full generation step over the default population size.
fn bench_evolve_generation(c: &mut Criterion) {
    let config = AppConfig::default();

    c.bench_function("evolve_generation", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            let mut population = PolicyPopulation::new_random(&config, &mut rng);
            for i in 0..config.evolution.population_size as u64 {
                population.record_fitness(PolicyId(i), i as f64);
            }
            black_box(population.evolve_generation(&config, &mut rng))
        })
    });
}

criterion_group!(
    benches,
    bench_brain_evaluate,
    bench_brain_evaluate_saturated,
    bench_brain_mutation,
    bench_brain_crossover,
    bench_evolve_generation,
);
criterion_main!(benches);
