use super::genotype::PolicyHandle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Rgb = [u8; 3];

/// Palette assigned to tribes by index, wrapping when a species has more tribes.
pub const TRIBE_COLORS: [Rgb; 5] = [
    [255, 0, 0],
    [0, 255, 0],
    [255, 255, 0],
    [0, 255, 255],
    [255, 0, 255],
];

/// World-space coordinate in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Unit vector pointing from `self` to `other`, or the zero vector when both coincide.
    #[must_use]
    pub fn direction_to(&self, other: &Point) -> (f64, f64) {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len > 0.0 {
            (dx / len, dy / len)
        } else {
            (0.0, 0.0)
        }
    }

    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Closed set of species. Creatures refer to their archetype by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArchetypeId {
    Herbivore,
    Carnivore,
    Human,
    Feline,
}

impl ArchetypeId {
    pub const ALL: [ArchetypeId; 4] = [
        ArchetypeId::Herbivore,
        ArchetypeId::Carnivore,
        ArchetypeId::Human,
        ArchetypeId::Feline,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            ArchetypeId::Herbivore => 0,
            ArchetypeId::Carnivore => 1,
            ArchetypeId::Human => 2,
            ArchetypeId::Feline => 3,
        }
    }

    /// Registry key, matching the keys used in configuration files.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ArchetypeId::Herbivore => "herbivore_generic",
            ArchetypeId::Carnivore => "carnivore_generic",
            ArchetypeId::Human => "human",
            ArchetypeId::Feline => "feline",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

/// Behavioural state of a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CreatureState {
    #[default]
    Exploring,
    GoingToSleep,
    Sleeping,
    Fleeing,
}

/// Whatever a creature is currently heading for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Food(Uuid),
    Creature(Uuid),
    Point(Point),
}

/// Last sensed positions. Overwritten when something new is sensed, never expired.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Memory {
    pub food: Option<Point>,
    pub threat: Option<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Pattern {
    #[default]
    None,
    Stripes,
    Spots,
}

/// Cosmetic traits consumed by renderers only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualGenome {
    pub body_size_mod: f32,
    pub pattern: Pattern,
    pub pattern_color: Rgb,
}

impl Default for VisualGenome {
    fn default() -> Self {
        Self {
            body_size_mod: 1.0,
            pattern: Pattern::None,
            pattern_color: [0, 0, 0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: Uuid,
    pub archetype: ArchetypeId,
    pub tribe: u8,
    pub tribe_color: Rgb,
    pub visual: VisualGenome,
    pub night_vision: bool,
    pub nest: Point,

    pub pos: Point,
    /// Radians. Not wrapped into `[0, 2π)`.
    pub heading: f64,
    pub energy: f64,
    pub age: u64,
    pub reproduction_urge: f64,
    pub tiredness: f64,
    pub state: CreatureState,
    pub memory: Memory,
    pub target: Option<Target>,
    pub flee_timer: u32,
    pub fitness: f64,
    #[serde(with = "super::genotype::policy_ref")]
    pub policy: PolicyHandle,
}

/// Consumable plant matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: Uuid,
    pub pos: Point,
    pub energy: f64,
}
