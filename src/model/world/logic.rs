use crate::model::error::SimError;
use crate::model::history::{DeathCause, LiveEvent};
use crate::model::lifecycle;
use crate::model::world::World;
use crate::model::EvolutionController;
use ecosim_data::{ArchetypeId, Creature, Point};
use uuid::Uuid;

impl World {
    fn in_bounds(&self, pos: &Point) -> bool {
        let (width, height) = self.config.pixel_size();
        (0.0..width).contains(&pos.x) && (0.0..height).contains(&pos.y)
    }

    /// Places a food item at `pos`, regardless of terrain.
    pub fn spawn_food(&mut self, pos: Point) -> Result<Uuid, SimError> {
        if !self.in_bounds(&pos) {
            return Err(SimError::NoValidSpawnLocation { what: "food" });
        }
        let food = lifecycle::create_food(pos, self.config.world.food_energy, &mut self.rng);
        let id = food.id;
        self.food.push(food);
        self.log(&LiveEvent::FoodSpawned {
            id,
            pos,
            tick: self.tick,
            timestamp: LiveEvent::now(),
        });
        Ok(id)
    }

    /// Adds a creature nesting at `pos`, bound to a policy drawn from the
    /// current population.
    pub fn spawn_creature(
        &mut self,
        archetype: ArchetypeId,
        tribe: u8,
        pos: Point,
    ) -> Result<Uuid, SimError> {
        if !self.in_bounds(&pos) {
            return Err(SimError::NoValidSpawnLocation { what: "creature" });
        }
        let policy = self
            .controller
            .sample(&mut self.rng)
            .ok_or_else(|| SimError::Config("policy population is empty".to_string()))?;
        let creature =
            lifecycle::create_creature(archetype, tribe, pos, policy, &self.config, &mut self.rng);
        let id = creature.id;
        self.log(&LiveEvent::Birth {
            id,
            archetype,
            tribe,
            parents: None,
            tick: self.tick,
            timestamp: LiveEvent::now(),
        });
        self.creatures.push(creature);
        Ok(id)
    }

    /// Removes the single creature nearest to `pos` within `radius` and
    /// returns its id. Its fitness is still credited to its policy.
    pub fn remove_creature_near(&mut self, pos: Point, radius: f64) -> Option<Uuid> {
        let index = self
            .creatures
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.pos.distance(&pos)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)?;

        let removed = self.creatures.remove(index);
        self.controller
            .record_fitness(removed.policy.id, removed.fitness);
        tracing::info!(creature = %removed.id, archetype = removed.archetype.key(), "Creature removed");
        self.log(&LiveEvent::Death {
            id: removed.id,
            archetype: removed.archetype,
            age: removed.age,
            cause: DeathCause::Removed,
            tick: self.tick,
            timestamp: LiveEvent::now(),
        });
        Some(removed.id)
    }

    /// Closest creature to `pos`, if any are alive.
    #[must_use]
    pub fn nearest_creature(&self, pos: Point) -> Option<&Creature> {
        self.creatures
            .iter()
            .min_by(|a, b| a.pos.distance(&pos).total_cmp(&b.pos.distance(&pos)))
    }

    /// Live creatures per archetype, indexed by [`ArchetypeId::index`].
    #[must_use]
    pub fn population_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for c in &self.creatures {
            counts[c.archetype.index()] += 1;
        }
        counts
    }

    pub(crate) fn log(&mut self, event: &LiveEvent) {
        if let Err(e) = self.logger.log_event(event) {
            tracing::warn!(error = %e, "Failed to write live event");
        }
    }
}
