use crate::archetypes::ArchetypeLogic;
use crate::config::AppConfig;
use ecosim_data::{
    ArchetypeId, Creature, CreatureState, Food, Memory, Pattern, Point, PolicyHandle, Rgb,
    VisualGenome, TRIBE_COLORS,
};
use rand::Rng;
use std::f64::consts::TAU;
use uuid::Uuid;

/// Random v4 id drawn from the simulation rng so runs stay reproducible.
pub fn new_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

#[must_use]
pub fn tribe_color(tribe: u8) -> Rgb {
    TRIBE_COLORS[tribe as usize % TRIBE_COLORS.len()]
}

fn jitter(channel: u8, rng: &mut (impl Rng + ?Sized)) -> u8 {
    (i16::from(channel) + rng.gen_range(-20..=20)).clamp(0, 255) as u8
}

pub fn random_visual<R: Rng + ?Sized>(tribe: u8, rng: &mut R) -> VisualGenome {
    let base = tribe_color(tribe);
    let pattern = match rng.gen_range(0..3) {
        0 => Pattern::None,
        1 => Pattern::Stripes,
        _ => Pattern::Spots,
    };
    VisualGenome {
        body_size_mod: rng.gen_range(0.9..1.1),
        pattern,
        pattern_color: [
            jitter(base[0], rng),
            jitter(base[1], rng),
            jitter(base[2], rng),
        ],
    }
}

/// Fresh creature standing on its nest with full energy.
pub fn create_creature<R: Rng + ?Sized>(
    archetype: ArchetypeId,
    tribe: u8,
    nest: Point,
    policy: PolicyHandle,
    config: &AppConfig,
    rng: &mut R,
) -> Creature {
    let arch = archetype.archetype();
    Creature {
        id: new_id(rng),
        archetype,
        tribe,
        tribe_color: tribe_color(tribe),
        visual: random_visual(tribe, rng),
        night_vision: rng.gen_bool(config.behavior.night_vision_chance.clamp(0.0, 1.0)),
        nest,
        pos: nest,
        heading: rng.gen_range(0.0..TAU),
        energy: arch.base.max_energy,
        age: 0,
        reproduction_urge: 0.0,
        tiredness: 0.0,
        state: CreatureState::Exploring,
        memory: Memory::default(),
        target: None,
        flee_timer: 0,
        fitness: 0.0,
        policy,
    }
}

/// Child of `parent`: same species, tribe, nest and policy handle, everything
/// dynamic reset, cosmetics and night vision redrawn.
pub fn offspring<R: Rng + ?Sized>(parent: &Creature, config: &AppConfig, rng: &mut R) -> Creature {
    create_creature(
        parent.archetype,
        parent.tribe,
        parent.nest,
        parent.policy.clone(),
        config,
        rng,
    )
}

pub fn create_food<R: Rng + ?Sized>(pos: Point, energy: f64, rng: &mut R) -> Food {
    Food {
        id: new_id(rng),
        pos,
        energy,
    }
}

/// Deterministic creature with a zeroed policy, for unit tests.
#[cfg(test)]
pub(crate) fn test_creature(archetype: ArchetypeId, tribe: u8, pos: Point) -> Creature {
    use crate::brain::BrainLogic;
    use ecosim_data::{Brain, PolicyId};
    use rand::SeedableRng;

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(pos.x.to_bits() ^ pos.y.to_bits().rotate_left(17));
    let policy = PolicyHandle::new(PolicyId(0), Brain::zeroed(4));
    let mut c = create_creature(archetype, tribe, pos, policy, &AppConfig::default(), &mut rng);
    c.night_vision = false;
    c.heading = 0.0;
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::BrainLogic;
    use ecosim_data::{Brain, PolicyId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn policy() -> PolicyHandle {
        PolicyHandle::new(PolicyId(7), Brain::zeroed(2))
    }

    #[test]
    fn test_new_creature_starts_full_at_nest() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let nest = Point::new(40.0, 56.0);
        let c = create_creature(ArchetypeId::Carnivore, 4, nest, policy(), &AppConfig::default(), &mut rng);
        assert_eq!(c.pos, nest);
        assert_eq!(c.energy, 1500.0);
        assert_eq!(c.tribe_color, TRIBE_COLORS[4]);
        assert_eq!(c.state, CreatureState::Exploring);
        assert!((0.0..TAU).contains(&c.heading));
        assert!((0.9..1.1).contains(&c.visual.body_size_mod));
    }

    #[test]
    fn test_offspring_inherits_identity_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut parent = create_creature(
            ArchetypeId::Human,
            1,
            Point::new(8.0, 8.0),
            policy(),
            &AppConfig::default(),
            &mut rng,
        );
        parent.pos = Point::new(300.0, 200.0);
        parent.age = 5000;
        parent.energy = 10.0;
        parent.reproduction_urge = 1.0;
        let child = offspring(&parent, &AppConfig::default(), &mut rng);
        assert_ne!(child.id, parent.id);
        assert_eq!(child.tribe, 1);
        assert_eq!(child.pos, parent.nest);
        assert_eq!(child.age, 0);
        assert_eq!(child.energy, 1300.0);
        assert_eq!(child.reproduction_urge, 0.0);
        assert_eq!(child.policy.id, parent.policy.id);
    }

    #[test]
    fn test_ids_are_reproducible() {
        let a = new_id(&mut ChaCha8Rng::seed_from_u64(5));
        let b = new_id(&mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a, b);
        assert_eq!(tribe_color(7), TRIBE_COLORS[2]);
    }
}
