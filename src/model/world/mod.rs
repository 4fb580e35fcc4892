use crate::model::config::AppConfig;
use crate::model::evolution::PolicyPopulation;
use crate::model::history::{HistoryLogger, PopulationSample};
use crate::model::terrain::TerrainGrid;
use ecosim_data::{Creature, Food, TimeState};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

pub mod finalize;
pub mod init;
pub mod logic;
pub mod state;
pub mod update;

/// The whole simulation: static terrain, clock, creatures, food, the policy
/// controller and the one rng everything random draws from.
pub struct World {
    pub config: AppConfig,
    pub tick: u64,
    /// Generated once and never mutated.
    pub terrain: Arc<TerrainGrid>,
    pub time: TimeState,
    pub creatures: Vec<Creature>,
    pub food: Vec<Food>,
    pub controller: PolicyPopulation,
    pub rng: ChaCha8Rng,
    /// Ticks since the last generation boundary.
    pub generation_timer: u64,
    pub population_history: Vec<PopulationSample>,
    /// Creatures whose policy failed during the last tick.
    pub policy_failures: usize,
    pub logger: HistoryLogger,
}
