//! Static species registry.
//!
//! Archetypes are immutable records shared by reference; creatures only
//! store an [`ArchetypeId`] and look the record up through [`ArchetypeLogic`].

use ecosim_data::ArchetypeId;

/// Gain used when an archetype defines neither a plant nor a kill reward.
pub const FALLBACK_ENERGY_PER_FOOD: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diet {
    pub plants: bool,
    pub meat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseAttributes {
    pub max_speed: f64,
    pub vision_radius: f64,
    pub max_energy: f64,
    pub energy_per_plant: Option<f64>,
    pub energy_per_kill: Option<f64>,
    pub reproduction_urge_threshold: f64,
    pub lifespan: u64,
}

#[derive(Debug, PartialEq)]
pub struct Archetype {
    pub id: ArchetypeId,
    pub name: &'static str,
    pub diet: Diet,
    pub prey: &'static [ArchetypeId],
    pub predators: &'static [ArchetypeId],
    pub base: BaseAttributes,
}

impl Archetype {
    #[must_use]
    pub fn hunts(&self, other: ArchetypeId) -> bool {
        self.diet.meat && self.prey.contains(&other)
    }

    #[must_use]
    pub fn fears(&self, other: ArchetypeId) -> bool {
        self.predators.contains(&other)
    }

    #[must_use]
    pub fn energy_per_kill(&self) -> f64 {
        self.base
            .energy_per_kill
            .or(self.base.energy_per_plant)
            .unwrap_or(FALLBACK_ENERGY_PER_FOOD)
    }
}

static REGISTRY: [Archetype; 4] = [
    Archetype {
        id: ArchetypeId::Herbivore,
        name: "Herbivore",
        diet: Diet {
            plants: true,
            meat: false,
        },
        prey: &[],
        predators: &[
            ArchetypeId::Carnivore,
            ArchetypeId::Feline,
            ArchetypeId::Human,
        ],
        base: BaseAttributes {
            max_speed: 2.5,
            vision_radius: 200.0,
            max_energy: 1200.0,
            energy_per_plant: Some(250.0),
            energy_per_kill: None,
            reproduction_urge_threshold: 800.0,
            lifespan: 15_000,
        },
    },
    Archetype {
        id: ArchetypeId::Carnivore,
        name: "Carnivore",
        diet: Diet {
            plants: false,
            meat: true,
        },
        prey: &[
            ArchetypeId::Herbivore,
            ArchetypeId::Human,
            ArchetypeId::Feline,
        ],
        predators: &[],
        base: BaseAttributes {
            max_speed: 3.0,
            vision_radius: 250.0,
            max_energy: 1500.0,
            energy_per_plant: None,
            energy_per_kill: Some(500.0),
            reproduction_urge_threshold: 900.0,
            lifespan: 20_000,
        },
    },
    Archetype {
        id: ArchetypeId::Human,
        name: "Human",
        diet: Diet {
            plants: true,
            meat: true,
        },
        prey: &[ArchetypeId::Herbivore, ArchetypeId::Feline],
        predators: &[ArchetypeId::Carnivore],
        base: BaseAttributes {
            max_speed: 2.8,
            vision_radius: 220.0,
            max_energy: 1300.0,
            energy_per_plant: Some(150.0),
            energy_per_kill: Some(400.0),
            reproduction_urge_threshold: 700.0,
            lifespan: 30_000,
        },
    },
    Archetype {
        id: ArchetypeId::Feline,
        name: "Feline",
        diet: Diet {
            plants: false,
            meat: true,
        },
        prey: &[ArchetypeId::Herbivore],
        predators: &[ArchetypeId::Carnivore],
        base: BaseAttributes {
            max_speed: 3.5,
            vision_radius: 280.0,
            max_energy: 1000.0,
            energy_per_plant: None,
            energy_per_kill: Some(450.0),
            reproduction_urge_threshold: 850.0,
            lifespan: 18_000,
        },
    },
];

pub trait ArchetypeLogic {
    fn archetype(self) -> &'static Archetype;
}

impl ArchetypeLogic for ArchetypeId {
    fn archetype(self) -> &'static Archetype {
        &REGISTRY[self.index()]
    }
}

/// Every registered archetype, in registry order.
#[must_use]
pub fn all() -> &'static [Archetype] {
    &REGISTRY
}
