pub mod macros;

use ecosim_data::{ArchetypeId, Brain, Creature, CreatureState, Food, Point, PolicyHandle, PolicyId};
use ecosim_lib::model::config::AppConfig;
use ecosim_lib::model::terrain::{TerrainGrid, TerrainKind};
use ecosim_lib::model::world::World;
use ecosim_lib::model::BrainLogic;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use uuid::Uuid;

type TerrainMod = Box<dyn FnOnce(&mut TerrainGrid)>;

/// Empty, seeded world on uniform grassland unless told otherwise.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    creatures: Vec<CreatureBuilder>,
    food: Vec<(f64, f64)>,
    generated_terrain: bool,
    terrain_mods: Vec<TerrainMod>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.seed = Some(42);
        config.world.initial_population = 0;
        config.world.initial_food = 0;
        Self {
            config,
            creatures: Vec::new(),
            food: Vec::new(),
            generated_terrain: false,
            terrain_mods: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.config.world.width = width;
        self.config.world.height = height;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn without_food_spawns(mut self) -> Self {
        let t = &mut self.config.time;
        t.spawn_chance_spring = 0.0;
        t.spawn_chance_summer = 0.0;
        t.spawn_chance_fall = 0.0;
        t.spawn_chance_winter = 0.0;
        self
    }

    /// Keeps the noise-generated terrain instead of flattening it.
    pub fn with_generated_terrain(mut self) -> Self {
        self.generated_terrain = true;
        self
    }

    pub fn with_terrain(mut self, x: u16, y: u16, kind: TerrainKind) -> Self {
        self.terrain_mods
            .push(Box::new(move |grid| grid.set_cell_type(x, y, kind)));
        self
    }

    pub fn with_creature(mut self, creature: CreatureBuilder) -> Self {
        self.creatures.push(creature);
        self
    }

    pub fn with_food(mut self, x: f64, y: f64) -> Self {
        self.food.push((x, y));
        self
    }

    pub fn build(self) -> World {
        let mut world = World::new(self.config).expect("Failed to create world in test builder");
        if !self.generated_terrain {
            world.terrain = Arc::new(TerrainGrid::uniform(
                world.config.world.width,
                world.config.world.height,
                TerrainKind::Grassland,
            ));
        }
        for modifier in self.terrain_mods {
            modifier(Arc::make_mut(&mut world.terrain));
        }
        for (x, y) in self.food {
            world
                .spawn_food(Point::new(x, y))
                .expect("food inside the world");
        }
        for (i, builder) in self.creatures.into_iter().enumerate() {
            let creature = builder.build(&world, i as u64);
            world.creatures.push(creature);
        }
        world
    }
}

/// Creature with a fixed-output policy, placed directly into the world.
#[allow(dead_code)]
pub struct CreatureBuilder {
    archetype: ArchetypeId,
    tribe: u8,
    pos: Point,
    heading: f64,
    energy: Option<f64>,
    urge: f64,
    age: u64,
    night_vision: bool,
    state: CreatureState,
    output_bias: [f32; 3],
    id: Option<Uuid>,
}

#[allow(dead_code)]
impl CreatureBuilder {
    pub fn new(archetype: ArchetypeId) -> Self {
        Self {
            archetype,
            tribe: 0,
            pos: Point::new(100.0, 100.0),
            heading: 0.0,
            energy: None,
            urge: 0.0,
            age: 0,
            night_vision: false,
            state: CreatureState::Exploring,
            output_bias: [0.0, -1.0, -1.0],
            id: None,
        }
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.pos = Point::new(x, y);
        self
    }

    pub fn tribe(mut self, tribe: u8) -> Self {
        self.tribe = tribe;
        self
    }

    pub fn heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }

    pub fn energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn urge(mut self, urge: f64) -> Self {
        self.urge = urge;
        self
    }

    pub fn age(mut self, age: u64) -> Self {
        self.age = age;
        self
    }

    pub fn night_vision(mut self, on: bool) -> Self {
        self.night_vision = on;
        self
    }

    pub fn state(mut self, state: CreatureState) -> Self {
        self.state = state;
        self
    }

    /// Constant turn, speed and sleep outputs before `tanh`.
    pub fn outputs(mut self, turn: f32, speed: f32, sleep: f32) -> Self {
        self.output_bias = [turn, speed, sleep];
        self
    }

    /// `salt` keeps ids distinct between creatures built for the same world.
    pub fn build(self, world: &World, salt: u64) -> Creature {
        let policy = PolicyHandle::new(
            PolicyId(u64::MAX - salt),
            Brain::zeroed(2).with_output_bias(self.output_bias),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE ^ salt);
        let mut c = ecosim_lib::model::lifecycle::create_creature(
            self.archetype,
            self.tribe,
            self.pos,
            policy,
            &world.config,
            &mut rng,
        );
        if let Some(id) = self.id {
            c.id = id;
        }
        c.heading = self.heading;
        c.night_vision = self.night_vision;
        c.reproduction_urge = self.urge;
        c.age = self.age;
        c.state = self.state;
        if let Some(energy) = self.energy {
            c.energy = energy;
        }
        c
    }
}

#[allow(dead_code)]
pub fn food_at(world: &World, x: f64, y: f64) -> Option<Food> {
    world
        .food
        .iter()
        .copied()
        .find(|f| f.pos == Point::new(x, y))
}
