use crate::model::environment::roll_food_spawn;
use crate::model::history::LiveEvent;
use crate::model::lifecycle;
use crate::model::snapshot::{CreatureView, TickContext};
use crate::model::systems::{behavior, interaction};
use crate::model::world::World;
use crate::model::{ClockLogic, EvolutionController};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

/// Folds a creature id into 64 bits for its per-tick rng seed.
fn id_mix(id: &Uuid) -> u64 {
    let bits = id.as_u128();
    (bits as u64) ^ ((bits >> 64) as u64)
}

impl World {
    /// Advances the simulation by one tick.
    ///
    /// Order within a tick:
    /// 1. clock and seasonal food spawn
    /// 2. every creature perceives, decides and moves against a snapshot
    ///    taken at the start of the phase
    /// 3. feeding, hunting, reproduction and death, in list order
    /// 4. fitness bookkeeping and, on the generation boundary, evolution
    /// 5. daily population sample and extinction checks
    ///
    /// # Returns
    /// Every live event produced this tick, in the order it happened.
    pub fn update(&mut self) -> Vec<LiveEvent> {
        self.tick += 1;
        let before = self.population_counts();
        let mut events = Vec::new();

        if let Some(season) = self.time.advance(&self.config.time) {
            tracing::info!(tick = self.tick, ?season, "Season changed");
            events.push(LiveEvent::SeasonChanged {
                season,
                tick: self.tick,
                timestamp: LiveEvent::now(),
            });
        }

        if let Some(pos) = roll_food_spawn(&self.time, &self.terrain, &self.config, &mut self.rng) {
            let food = lifecycle::create_food(pos, self.config.world.food_energy, &mut self.rng);
            events.push(LiveEvent::FoodSpawned {
                id: food.id,
                pos,
                tick: self.tick,
                timestamp: LiveEvent::now(),
            });
            self.food.push(food);
        }

        self.policy_failures = self.step_creatures();

        let resolution = interaction::resolve(
            &mut self.creatures,
            &mut self.food,
            &self.config,
            &mut self.rng,
            self.tick,
        );
        for (policy, score) in &resolution.retired {
            self.controller.record_fitness(*policy, *score);
        }
        events.extend(resolution.events);

        self.update_fitness();

        self.generation_timer += 1;
        if self.generation_timer >= self.config.generation_period() {
            events.push(self.run_generation());
        }

        self.sample_population();
        events.extend(self.check_extinctions(before));

        for event in &events {
            self.log(event);
        }
        events
    }

    /// Runs perception, decision and movement for every creature in parallel.
    ///
    /// Each creature draws from its own rng, seeded from one value taken from
    /// the world rng and the creature's id, so results do not depend on
    /// thread scheduling. Returns the number of policy failures.
    fn step_creatures(&mut self) -> usize {
        let tick_seed: u64 = self.rng.gen();
        let views: Vec<CreatureView> = self.creatures.iter().map(CreatureView::from).collect();
        let ctx = TickContext {
            config: &self.config,
            terrain: &self.terrain,
            time: &self.time,
            creatures: &views,
            food: &self.food,
            tick: self.tick,
        };

        self.creatures
            .par_iter_mut()
            .map(|c| {
                let mut rng = ChaCha8Rng::seed_from_u64(tick_seed ^ id_mix(&c.id));
                let policy = Arc::clone(&c.policy.brain);
                let report = behavior::step_isolated(c, |c| {
                    behavior::step_creature(c, &ctx, policy.as_ref(), &mut rng)
                });
                usize::from(report.policy_error.is_some())
            })
            .sum()
    }
}
