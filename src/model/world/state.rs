use crate::model::error::SimError;
use crate::model::snapshot::WorldSnapshot;
use crate::model::world::World;
use sha2::{Digest, Sha256};
use std::sync::Arc;

impl World {
    /// Captures everything needed to resume the run bit for bit.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            config_fingerprint: self.config.fingerprint(),
            tick: self.tick,
            terrain: (*self.terrain).clone(),
            time: self.time,
            creatures: self.creatures.clone(),
            food: self.food.clone(),
            controller: self.controller.clone(),
            policies: WorldSnapshot::detached_policies(&self.creatures, &self.controller),
            rng: self.rng.clone(),
            generation_timer: self.generation_timer,
            population_history: self.population_history.clone(),
        }
    }

    /// Replaces the simulation state with `snapshot`.
    ///
    /// The snapshot is validated first; on failure the current state is left
    /// untouched. A snapshot taken under different configuration is accepted
    /// with a warning.
    pub fn restore(&mut self, mut snapshot: WorldSnapshot) -> Result<(), SimError> {
        snapshot.validate().map_err(SimError::Snapshot)?;
        snapshot.link_policies().map_err(SimError::Snapshot)?;
        if snapshot.terrain.width != self.config.world.width
            || snapshot.terrain.height != self.config.world.height
        {
            return Err(SimError::Snapshot(format!(
                "terrain is {}x{}, world is {}x{}",
                snapshot.terrain.width,
                snapshot.terrain.height,
                self.config.world.width,
                self.config.world.height
            )));
        }
        let fingerprint = self.config.fingerprint();
        if snapshot.config_fingerprint != fingerprint {
            tracing::warn!(
                snapshot = %snapshot.config_fingerprint,
                current = %fingerprint,
                "Restoring snapshot taken under a different configuration"
            );
        }

        self.tick = snapshot.tick;
        self.terrain = Arc::new(snapshot.terrain);
        self.time = snapshot.time;
        self.creatures = snapshot.creatures;
        self.food = snapshot.food;
        self.controller = snapshot.controller;
        self.rng = snapshot.rng;
        self.generation_timer = snapshot.generation_timer;
        self.population_history = snapshot.population_history;
        self.policy_failures = 0;

        tracing::info!(
            tick = self.tick,
            creatures = self.creatures.len(),
            food = self.food.len(),
            "Snapshot restored"
        );
        Ok(())
    }

    /// SHA-256 over the serialized snapshot, hex encoded. Two worlds with the
    /// same hash are in the same state.
    pub fn deterministic_hash(&self) -> anyhow::Result<String> {
        let bytes = serde_json::to_vec(&self.snapshot())?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::AppConfig;
    use crate::model::EvolutionController;

    fn seeded(seed: u64) -> World {
        let mut config = AppConfig::default();
        config.world.seed = Some(seed);
        config.world.initial_population = 20;
        config.world.initial_food = 20;
        World::new(config).unwrap()
    }

    #[test]
    fn test_restore_resumes_identically() {
        let mut world = seeded(11);
        for _ in 0..20 {
            world.update();
        }
        let snap = world.snapshot();
        for _ in 0..30 {
            world.update();
        }
        let expected = world.deterministic_hash().unwrap();

        let mut other = seeded(11);
        for _ in 0..5 {
            other.update();
        }
        other.restore(snap).unwrap();
        for _ in 0..30 {
            other.update();
        }
        assert_eq!(other.deterministic_hash().unwrap(), expected);
    }

    #[test]
    fn test_invalid_snapshot_keeps_state() {
        let mut world = seeded(4);
        let before = world.deterministic_hash().unwrap();
        let mut snap = world.snapshot();
        snap.terrain.cells.pop();
        assert!(matches!(world.restore(snap), Err(SimError::Snapshot(_))));
        assert_eq!(world.deterministic_hash().unwrap(), before);
    }

    #[test]
    fn test_restore_relinks_shared_policies() {
        let world = seeded(8);
        let json = serde_json::to_string(&world.snapshot()).unwrap();
        assert_eq!(json.matches("weights_ih").count(), world.controller.population().len());

        let mut other = seeded(9);
        other.restore(serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(other.creatures, world.creatures);
        for c in &other.creatures {
            let owner = other
                .controller
                .population()
                .iter()
                .find(|p| p.id == c.policy.id)
                .unwrap();
            assert!(Arc::ptr_eq(&owner.brain, &c.policy.brain));
        }
    }

    #[test]
    fn test_unlinkable_snapshot_keeps_state() {
        let mut world = seeded(5);
        let before = world.deterministic_hash().unwrap();
        let mut snap = seeded(6).snapshot();
        snap.creatures[0].policy = ecosim_data::PolicyHandle::unlinked(ecosim_data::PolicyId(4242));
        snap.policies.clear();
        assert!(matches!(world.restore(snap), Err(SimError::Snapshot(_))));
        assert_eq!(world.deterministic_hash().unwrap(), before);
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let mut small = AppConfig::default();
        small.world.width = 10;
        small.world.height = 10;
        small.world.seed = Some(1);
        small.world.initial_population = 0;
        let snap = World::new(small).unwrap().snapshot();
        let mut world = seeded(2);
        assert!(world.restore(snap).is_err());
    }
}
