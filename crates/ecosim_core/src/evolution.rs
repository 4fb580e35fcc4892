//! Policy population and the evolution interface consumed by the world.

use crate::brain::{Brain, BrainLogic, PolicyHandle, PolicyId};
use crate::config::AppConfig;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scores policies and produces the next generation of them.
pub trait EvolutionController {
    /// Several creatures can share one policy; the best score is kept.
    fn record_fitness(&mut self, policy: PolicyId, score: f64);
    /// Consumes the recorded fitness and returns the new population.
    fn evolve_generation(
        &mut self,
        config: &AppConfig,
        rng: &mut dyn RngCore,
    ) -> BTreeMap<PolicyId, PolicyHandle>;
    fn population(&self) -> &[PolicyHandle];
    fn generation(&self) -> u64;
}

/// Elitism plus tournament selection, uniform crossover and weight mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyPopulation {
    pub generation: u64,
    next_id: u64,
    policies: Vec<PolicyHandle>,
    /// Keyed by raw policy id.
    fitness: BTreeMap<u64, f64>,
}

impl PolicyPopulation {
    pub fn new_random<R: Rng>(config: &AppConfig, rng: &mut R) -> Self {
        let mut population = Self {
            generation: 0,
            next_id: 0,
            policies: Vec::with_capacity(config.evolution.population_size),
            fitness: BTreeMap::new(),
        };
        for _ in 0..config.evolution.population_size.max(1) {
            let brain = Brain::new_random_with_rng(
                config.brain.hidden_size,
                config.brain.init_weight_range,
                rng,
            );
            let handle = population.adopt(brain);
            population.policies.push(handle);
        }
        population
    }

    /// Population made of the given brains, in order.
    pub fn from_brains<I: IntoIterator<Item = Brain>>(brains: I) -> Self {
        let mut population = Self {
            generation: 0,
            next_id: 0,
            policies: Vec::new(),
            fitness: BTreeMap::new(),
        };
        for brain in brains {
            let handle = population.adopt(brain);
            population.policies.push(handle);
        }
        population
    }

    fn adopt(&mut self, brain: Brain) -> PolicyHandle {
        let id = PolicyId(self.next_id);
        self.next_id += 1;
        PolicyHandle::new(id, brain)
    }

    /// Uniformly random member of the current population.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PolicyHandle> {
        if self.policies.is_empty() {
            return None;
        }
        Some(self.policies[rng.gen_range(0..self.policies.len())].clone())
    }

    #[must_use]
    pub fn fitness_of(&self, policy: PolicyId) -> Option<f64> {
        self.fitness.get(&policy.0).copied()
    }

    /// Policies sorted best first; unscored policies count as zero, ties by id.
    fn ranked(&self) -> Vec<(f64, &PolicyHandle)> {
        let mut ranked: Vec<(f64, &PolicyHandle)> = self
            .policies
            .iter()
            .map(|p| (self.fitness.get(&p.id.0).copied().unwrap_or(0.0), p))
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.id.cmp(&b.1.id)));
        ranked
    }

    fn tournament<'a>(
        ranked: &'a [(f64, &PolicyHandle)],
        size: usize,
        rng: &mut dyn RngCore,
    ) -> &'a Brain {
        let best = (0..size.max(1))
            .map(|_| rng.gen_range(0..ranked.len()))
            .min()
            .unwrap_or(0);
        &ranked[best].1.brain
    }
}

impl EvolutionController for PolicyPopulation {
    fn record_fitness(&mut self, policy: PolicyId, score: f64) {
        if !score.is_finite() {
            return;
        }
        self.fitness
            .entry(policy.0)
            .and_modify(|s| *s = s.max(score))
            .or_insert(score);
    }

    fn evolve_generation(
        &mut self,
        config: &AppConfig,
        rng: &mut dyn RngCore,
    ) -> BTreeMap<PolicyId, PolicyHandle> {
        let size = config.evolution.population_size.max(1);
        let offspring: Vec<Brain> = {
            let ranked = self.ranked();
            if ranked.is_empty() {
                Vec::new()
            } else {
                let elites = config.evolution.elite_count.min(size).min(ranked.len());
                let mut next: Vec<Brain> =
                    ranked[..elites].iter().map(|(_, p)| (*p.brain).clone()).collect();
                while next.len() < size {
                    let a = Self::tournament(&ranked, config.evolution.tournament_size, rng);
                    let b = Self::tournament(&ranked, config.evolution.tournament_size, rng);
                    let mut child = a.crossover_with_rng(b, rng);
                    child.mutate_with_config(config, rng);
                    next.push(child);
                }
                next
            }
        };

        let best = self.fitness.values().copied().fold(0.0, f64::max);
        let policies: Vec<PolicyHandle> = offspring.into_iter().map(|b| self.adopt(b)).collect();
        self.policies = policies;
        self.fitness.clear();
        self.generation += 1;
        tracing::info!(
            generation = self.generation,
            policies = self.policies.len(),
            best_fitness = best,
            "Evolved policy generation"
        );

        self.policies.iter().map(|p| (p.id, p.clone())).collect()
    }

    fn population(&self) -> &[PolicyHandle] {
        &self.policies
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
