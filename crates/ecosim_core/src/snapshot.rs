use crate::config::AppConfig;
use crate::evolution::{EvolutionController, PolicyPopulation};
use crate::history::PopulationSample;
use crate::terrain::TerrainGrid;
use ecosim_data::{
    ArchetypeId, Brain, Creature, CreatureState, Food, Point, PolicyHandle, PolicyId, TimeState,
};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Read-only copy of the fields other creatures may observe, taken once at
/// the start of a tick so no creature sees another's updated position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatureView {
    pub id: Uuid,
    pub archetype: ArchetypeId,
    pub tribe: u8,
    pub pos: Point,
    pub heading: f64,
    pub state: CreatureState,
    pub reproduction_urge: f64,
}

impl From<&Creature> for CreatureView {
    fn from(c: &Creature) -> Self {
        Self {
            id: c.id,
            archetype: c.archetype,
            tribe: c.tribe,
            pos: c.pos,
            heading: c.heading,
            state: c.state,
            reproduction_urge: c.reproduction_urge,
        }
    }
}

/// Everything a creature may read while deciding its action.
pub struct TickContext<'a> {
    pub config: &'a AppConfig,
    pub terrain: &'a TerrainGrid,
    pub time: &'a TimeState,
    pub creatures: &'a [CreatureView],
    pub food: &'a [Food],
    pub tick: u64,
}

impl TickContext<'_> {
    #[must_use]
    pub fn world_size(&self) -> (f64, f64) {
        self.config.pixel_size()
    }
}

/// Complete, serializable simulation state.
///
/// Creatures serialize their policy by id only. Brains live in `controller`,
/// or in `policies` for bindings the controller does not own; call
/// [`WorldSnapshot::link_policies`] after deserializing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub config_fingerprint: String,
    pub tick: u64,
    pub terrain: TerrainGrid,
    pub time: TimeState,
    pub creatures: Vec<Creature>,
    pub food: Vec<Food>,
    pub controller: PolicyPopulation,
    #[serde(default)]
    pub policies: Vec<PolicyHandle>,
    pub rng: ChaCha8Rng,
    pub generation_timer: u64,
    pub population_history: Vec<PopulationSample>,
}

impl WorldSnapshot {
    /// Distinct creature policies missing from the controller's population,
    /// in order of first use.
    #[must_use]
    pub fn detached_policies(creatures: &[Creature], controller: &PolicyPopulation) -> Vec<PolicyHandle> {
        let mut seen: Vec<PolicyId> = controller.population().iter().map(|p| p.id).collect();
        let mut detached = Vec::new();
        for c in creatures {
            if !seen.contains(&c.policy.id) {
                seen.push(c.policy.id);
                detached.push(c.policy.clone());
            }
        }
        detached
    }

    /// Points every creature's handle at the shared brain for its id.
    pub fn link_policies(&mut self) -> Result<(), String> {
        let brains: BTreeMap<PolicyId, Arc<Brain>> = self
            .controller
            .population()
            .iter()
            .chain(&self.policies)
            .map(|p| (p.id, Arc::clone(&p.brain)))
            .collect();
        for c in &mut self.creatures {
            let brain = brains
                .get(&c.policy.id)
                .ok_or_else(|| format!("creature {} is bound to unknown {}", c.id, c.policy.id))?;
            c.policy.brain = Arc::clone(brain);
        }
        Ok(())
    }

    /// Structural checks that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let expected = self.terrain.width as usize * self.terrain.height as usize;
        if self.terrain.cells.len() != expected {
            return Err(format!(
                "terrain has {} cells, expected {}",
                self.terrain.cells.len(),
                expected
            ));
        }
        if let Some(c) = self
            .creatures
            .iter()
            .find(|c| !(c.pos.x.is_finite() && c.pos.y.is_finite() && c.energy.is_finite()))
        {
            return Err(format!("creature {} has non-finite state", c.id));
        }
        let mut ids: Vec<Uuid> = self.creatures.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return Err("duplicate creature id".to_string());
        }
        Ok(())
    }
}
