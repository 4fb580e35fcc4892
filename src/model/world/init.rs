use crate::model::config::AppConfig;
use crate::model::environment::random_cell_center;
use crate::model::error::SimError;
use crate::model::evolution::PolicyPopulation;
use crate::model::history::HistoryLogger;
use crate::model::lifecycle;
use crate::model::terrain::TerrainGrid;
use crate::model::world::World;
use crate::model::{EvolutionController, TerrainLogic};
use ecosim_data::{ArchetypeId, TimeState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

impl World {
    /// Builds a world whose events are not written anywhere.
    ///
    /// Fails only on invalid configuration or terrain input; spawns that find
    /// no eligible cell are skipped with a warning.
    pub fn new(config: AppConfig) -> Result<Self, SimError> {
        Self::with_logger(config, HistoryLogger::new_dummy())
    }

    /// Like [`World::new`], appending live events to `<log_dir>/live.jsonl`.
    pub fn new_at(config: AppConfig, log_dir: &str) -> anyhow::Result<Self> {
        let logger = HistoryLogger::new_at(log_dir)?;
        Ok(Self::with_logger(config, logger)?)
    }

    fn with_logger(config: AppConfig, logger: HistoryLogger) -> Result<Self, SimError> {
        config
            .validate()
            .map_err(|e| SimError::Config(e.to_string()))?;

        let seed = config.world.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let terrain = TerrainGrid::generate(
            config.world.width,
            config.world.height,
            seed,
            &config.terrain,
        )?;
        let controller = PolicyPopulation::new_random(&config, &mut rng);

        let mut world = Self {
            config,
            tick: 0,
            terrain: Arc::new(terrain),
            time: TimeState::default(),
            creatures: Vec::new(),
            food: Vec::new(),
            controller,
            rng,
            generation_timer: 0,
            population_history: Vec::new(),
            policy_failures: 0,
            logger,
        };
        world.seed_population();
        world.seed_food();

        tracing::info!(
            seed,
            width = world.config.world.width,
            height = world.config.world.height,
            creatures = world.creatures.len(),
            food = world.food.len(),
            "World created"
        );
        Ok(world)
    }

    /// Creature `i` gets archetype `i % 4`, tribe `i % tribes` and policy
    /// `i % population`, nesting on a random habitable cell.
    fn seed_population(&mut self) {
        let policies = self.controller.population().to_vec();
        let tribes = self.config.world.tribes_per_species.max(1);
        for i in 0..self.config.world.initial_population {
            let Some(nest) = random_cell_center(&self.terrain, &self.config, &mut self.rng, |k| {
                k.is_habitable()
            }) else {
                tracing::warn!(
                    error = %SimError::NoValidSpawnLocation { what: "creature" },
                    "Initial population truncated"
                );
                break;
            };
            let archetype = ArchetypeId::ALL[i % ArchetypeId::ALL.len()];
            let tribe = (i % tribes as usize) as u8;
            let policy = policies[i % policies.len()].clone();
            let creature = lifecycle::create_creature(
                archetype,
                tribe,
                nest,
                policy,
                &self.config,
                &mut self.rng,
            );
            self.creatures.push(creature);
        }
    }

    fn seed_food(&mut self) {
        for _ in 0..self.config.world.initial_food {
            let Some(pos) =
                random_cell_center(&self.terrain, &self.config, &mut self.rng, |k| k.is_fertile())
            else {
                tracing::warn!(
                    error = %SimError::NoValidSpawnLocation { what: "food" },
                    "Initial food truncated"
                );
                break;
            };
            let food = lifecycle::create_food(pos, self.config.world.food_energy, &mut self.rng);
            self.food.push(food);
        }
    }
}
