/// Asserts that a creature with the given ID has at least the specified amount of energy.
#[macro_export]
macro_rules! assert_energy_above {
    ($world:expr, $id:expr, $min_energy:expr) => {
        let creature = $world
            .creatures
            .iter()
            .find(|c| c.id == $id)
            .expect("Creature not found in world");
        assert!(
            creature.energy > $min_energy,
            "Creature {} energy {} is not above {}",
            $id,
            creature.energy,
            $min_energy
        );
    };
}

/// Asserts that a creature with the given ID is NOT present in the world.
#[macro_export]
macro_rules! assert_creature_dead {
    ($world:expr, $id:expr) => {
        let exists = $world.creatures.iter().any(|c| c.id == $id);
        assert!(!exists, "Creature {} should be dead but was found alive", $id);
    };
}

/// Asserts that the total population count matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!($world.creatures.len(), $count, "Population count mismatch");
    };
}

/// Asserts every live creature is inside the world with energy in range.
#[macro_export]
macro_rules! assert_creatures_valid {
    ($world:expr) => {
        let (width, height) = $world.config.pixel_size();
        for c in &$world.creatures {
            let max = ecosim_lib::model::ArchetypeLogic::archetype(c.archetype)
                .base
                .max_energy;
            assert!(
                (0.0..width).contains(&c.pos.x) && (0.0..height).contains(&c.pos.y),
                "Creature {} left the world at {:?}",
                c.id,
                c.pos
            );
            assert!(
                (0.0..=max).contains(&c.energy),
                "Creature {} energy {} outside [0, {}]",
                c.id,
                c.energy,
                max
            );
        }
    };
}
