use crate::model::config::FitnessMode;
use crate::model::history::{LiveEvent, PopulationSample};
use crate::model::world::World;
use crate::model::EvolutionController;
use ecosim_data::ArchetypeId;

impl World {
    /// Per-tick fitness bookkeeping for every surviving creature.
    pub(crate) fn update_fitness(&mut self) {
        match self.config.evolution.fitness_mode {
            FitnessMode::Accumulated => {
                for c in &mut self.creatures {
                    c.fitness += 1.0;
                }
            }
            FitnessMode::AgeOverwrite => {
                for c in &mut self.creatures {
                    c.fitness = c.age as f64;
                }
            }
        }
    }

    /// Scores live creatures, evolves the policy population and rebinds
    /// every creature to a member of the new generation.
    pub(crate) fn run_generation(&mut self) -> LiveEvent {
        for c in &self.creatures {
            self.controller.record_fitness(c.policy.id, c.fitness);
        }
        let best_fitness = self
            .controller
            .population()
            .iter()
            .filter_map(|p| self.controller.fitness_of(p.id))
            .fold(0.0, f64::max);

        let policies = self.controller.evolve_generation(&self.config, &mut self.rng);
        let reset = self.config.evolution.fitness_mode == FitnessMode::Accumulated;
        for c in &mut self.creatures {
            if let Some(policy) = self.controller.sample(&mut self.rng) {
                c.policy = policy;
            }
            if reset {
                c.fitness = 0.0;
            }
        }
        self.generation_timer = 0;

        LiveEvent::GenerationEvolved {
            generation: self.controller.generation(),
            policies: policies.len(),
            best_fitness,
            tick: self.tick,
            timestamp: LiveEvent::now(),
        }
    }

    /// Records one population sample at the start of each day.
    pub(crate) fn sample_population(&mut self) {
        if self.time.world_time != 0 {
            return;
        }
        self.population_history.push(PopulationSample {
            tick: self.tick,
            counts: self.population_counts(),
        });
    }

    /// Archetypes that had members before this tick and have none now, plus
    /// a total extinction event when nothing is left alive.
    pub(crate) fn check_extinctions(&self, before: [usize; 4]) -> Vec<LiveEvent> {
        let after = self.population_counts();
        let mut events = Vec::new();
        for archetype in ArchetypeId::ALL {
            let i = archetype.index();
            if before[i] > 0 && after[i] == 0 {
                tracing::warn!(tick = self.tick, archetype = archetype.key(), "Archetype extinct");
                events.push(LiveEvent::Extinction {
                    archetype: Some(archetype),
                    tick: self.tick,
                    timestamp: LiveEvent::now(),
                });
            }
        }
        if before.iter().sum::<usize>() > 0 && self.creatures.is_empty() {
            tracing::warn!(tick = self.tick, "All creatures extinct");
            events.push(LiveEvent::Extinction {
                archetype: None,
                tick: self.tick,
                timestamp: LiveEvent::now(),
            });
        }
        events
    }
}
