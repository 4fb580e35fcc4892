use crate::archetypes::{Archetype, ArchetypeLogic};
use crate::config::AppConfig;
use crate::environment::ClockLogic;
use crate::snapshot::{CreatureView, TickContext};
use crate::systems::flocking::{self, Boids};
use ecosim_data::{
    Creature, CreatureState, Food, Memory, Point, Target, TimeState, OBSERVATION_LEN,
};

/// Isolation score given to prey with no visible flockmates.
pub const ISOLATED_SCORE: f64 = 10_000.0;

/// Something sensed this tick, with where it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensed {
    pub target: Target,
    pub pos: Point,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Perception {
    pub vision: f64,
    pub food: Option<Sensed>,
    pub threat: Option<Sensed>,
    /// The threat was synthesized from a fleeing flockmate.
    pub panic: bool,
    pub mate: Option<Sensed>,
    pub rival: Option<Sensed>,
    pub flock_count: usize,
    pub flock_centroid: Option<Point>,
    pub boids: Boids,
}

impl Perception {
    #[must_use]
    pub fn threatened(&self) -> bool {
        self.threat.is_some()
    }
}

/// Base vision, cut to `night_vision_factor` at night unless the creature
/// carries the night-vision trait.
#[must_use]
pub fn effective_vision(
    base: f64,
    night_vision: bool,
    time: &TimeState,
    config: &AppConfig,
) -> f64 {
    if time.is_night(&config.time) && !night_vision {
        base * config.behavior.night_vision_factor
    } else {
        base
    }
}

fn nearest<'a, T, I>(items: I) -> Option<(&'a T, f64)>
where
    I: Iterator<Item = (&'a T, f64)>,
{
    items.min_by(|a, b| a.1.total_cmp(&b.1))
}

fn sensed_creature(c: &CreatureView, distance: f64) -> Sensed {
    Sensed {
        target: Target::Creature(c.id),
        pos: c.pos,
        distance,
    }
}

/// Picks the prey maximizing `isolation - 0.5 * distance`, where isolation is
/// the candidate's distance to the centroid of its own visible group.
fn best_prey(arch: &Archetype, visible: &[(&CreatureView, f64)]) -> Option<Sensed> {
    visible
        .iter()
        .filter(|(c, _)| arch.hunts(c.archetype))
        .map(|(candidate, distance)| {
            let group = flocking::centroid(
                visible
                    .iter()
                    .filter(|(o, _)| {
                        o.id != candidate.id
                            && o.archetype == candidate.archetype
                            && o.tribe == candidate.tribe
                    })
                    .map(|(o, _)| o.pos),
            );
            let isolation = group.map_or(ISOLATED_SCORE, |g| candidate.pos.distance(&g));
            (isolation - 0.5 * distance, sensed_creature(candidate, *distance))
        })
        .fold(None, |best: Option<(f64, Sensed)>, (score, s)| match best {
            Some((b, _)) if b >= score => best,
            _ => Some((score, s)),
        })
        .map(|(_, s)| s)
}

fn nearest_food(me: Point, food: &[Food], vision: f64) -> Option<Sensed> {
    nearest(
        food.iter()
            .map(|f| (f, me.distance(&f.pos)))
            .filter(|(_, d)| *d < vision),
    )
    .map(|(f, distance)| Sensed {
        target: Target::Food(f.id),
        pos: f.pos,
        distance,
    })
}

pub fn perceive(me: &Creature, ctx: &TickContext) -> Perception {
    let arch = me.archetype.archetype();
    let cfg = ctx.config;
    let vision = effective_vision(arch.base.vision_radius, me.night_vision, ctx.time, cfg);

    let visible: Vec<(&CreatureView, f64)> = ctx
        .creatures
        .iter()
        .filter(|c| c.id != me.id)
        .map(|c| (c, me.pos.distance(&c.pos)))
        .filter(|(_, d)| *d < vision)
        .collect();

    let plant = if arch.diet.plants {
        nearest_food(me.pos, ctx.food, vision)
    } else {
        None
    };
    let prey = if arch.diet.meat {
        best_prey(arch, &visible)
    } else {
        None
    };
    let food = match (prey, plant) {
        (Some(p), Some(f)) => Some(if p.distance < f.distance { p } else { f }),
        (p, f) => p.or(f),
    };

    let flockmates: Vec<&(&CreatureView, f64)> = visible
        .iter()
        .filter(|(c, _)| c.tribe == me.tribe && c.archetype == me.archetype)
        .collect();

    let mut panic = false;
    let threat = nearest(
        visible
            .iter()
            .filter(|(c, _)| arch.fears(c.archetype))
            .map(|(c, d)| (*c, *d)),
    )
    .map(|(c, d)| sensed_creature(c, d))
    .or_else(|| {
        let (leader, _) = nearest(
            flockmates
                .iter()
                .filter(|(c, _)| c.state == CreatureState::Fleeing)
                .map(|(c, d)| (*c, *d)),
        )?;
        panic = true;
        let behind = leader.pos.offset(
            -leader.heading.cos() * cfg.behavior.panic_distance,
            -leader.heading.sin() * cfg.behavior.panic_distance,
        );
        Some(Sensed {
            target: Target::Point(behind),
            pos: behind,
            distance: me.pos.distance(&behind),
        })
    });

    let mate = if me.reproduction_urge > cfg.behavior.mate_urge_threshold {
        nearest(
            flockmates
                .iter()
                .filter(|(c, _)| c.reproduction_urge > cfg.behavior.mate_urge_threshold)
                .map(|(c, d)| (*c, *d)),
        )
        .map(|(c, d)| sensed_creature(c, d))
    } else {
        None
    };

    let rival = nearest(
        visible
            .iter()
            .filter(|(c, _)| c.tribe != me.tribe)
            .map(|(c, d)| (*c, *d)),
    )
    .map(|(c, d)| sensed_creature(c, d));

    let mates: Vec<(Point, f64)> = flockmates.iter().map(|(c, _)| (c.pos, c.heading)).collect();
    let boids = flocking::compute(
        me.pos,
        &mates,
        cfg.behavior.separation_radius_cells * cfg.world.cell_size,
    );

    Perception {
        vision,
        food,
        threat,
        panic,
        mate,
        rival,
        flock_count: flockmates.len(),
        flock_centroid: flocking::centroid(mates.iter().map(|(p, _)| *p)),
        boids,
    }
}

/// Overwrites memory with whatever was sensed; nothing is ever forgotten.
pub fn remember(memory: &mut Memory, perception: &Perception) {
    if let Some(food) = perception.food {
        memory.food = Some(food.pos);
    }
    if let Some(threat) = perception.threat {
        memory.threat = Some(threat.pos);
    }
}

/// Unit vector toward `target`, zero when absent, coincident or beyond `max_dist`.
#[must_use]
pub fn vector_to(from: Point, target: Option<Point>, max_dist: f64) -> (f64, f64) {
    match target {
        Some(t) if from.distance(&t) <= max_dist => from.direction_to(&t),
        _ => (0.0, 0.0),
    }
}

/// Fixed-order observation vector fed to the decision policy.
#[must_use]
pub fn observation(me: &Creature, p: &Perception, ctx: &TickContext) -> [f32; OBSERVATION_LEN] {
    let cfg = ctx.config;
    let food = vector_to(me.pos, p.food.map(|s| s.pos).or(me.memory.food), p.vision);
    let threat = vector_to(me.pos, p.threat.map(|s| s.pos).or(me.memory.threat), p.vision);
    let mate = vector_to(me.pos, p.mate.map(|s| s.pos), p.vision);
    let flock = vector_to(me.pos, p.flock_centroid, f64::INFINITY);
    let rival = vector_to(me.pos, p.rival.map(|s| s.pos), p.vision);
    let nest = vector_to(me.pos, Some(me.nest), cfg.behavior.nest_max_distance);
    let b = p.boids;

    let channels: [f64; OBSERVATION_LEN] = [
        food.0,
        food.1,
        threat.0,
        threat.1,
        mate.0,
        mate.1,
        p.flock_count as f64 / 10.0,
        flock.0,
        flock.1,
        rival.0,
        rival.1,
        nest.0,
        nest.1,
        ctx.time.day_fraction(&cfg.time),
        me.tiredness / cfg.metabolism.max_tiredness,
        b.separation.0,
        b.separation.1,
        b.alignment.0,
        b.alignment.1,
        b.cohesion.0,
        b.cohesion.1,
        if me.state == CreatureState::Fleeing {
            1.0
        } else {
            0.0
        },
    ];
    channels.map(|v| v as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle;
    use crate::terrain::{TerrainGrid, TerrainKind};
    use ecosim_data::ArchetypeId;

    struct Scene {
        config: AppConfig,
        terrain: TerrainGrid,
        time: TimeState,
        creatures: Vec<Creature>,
        food: Vec<Food>,
    }

    impl Scene {
        fn new() -> Self {
            Self {
                config: AppConfig::default(),
                terrain: TerrainGrid::uniform(40, 40, TerrainKind::Grassland),
                time: TimeState::default(),
                creatures: Vec::new(),
                food: Vec::new(),
            }
        }

        fn add(&mut self, archetype: ArchetypeId, tribe: u8, x: f64, y: f64) -> usize {
            self.creatures
                .push(lifecycle::test_creature(archetype, tribe, Point::new(x, y)));
            self.creatures.len() - 1
        }

        fn perceive(&self, idx: usize) -> Perception {
            let views: Vec<CreatureView> = self.creatures.iter().map(CreatureView::from).collect();
            let ctx = TickContext {
                config: &self.config,
                terrain: &self.terrain,
                time: &self.time,
                creatures: &views,
                food: &self.food,
                tick: 0,
            };
            perceive(&self.creatures[idx], &ctx)
        }
    }

    #[test]
    fn test_night_vision_factor() {
        let config = AppConfig::default();
        let night = TimeState {
            world_time: config.time.day_length / 2,
            ..Default::default()
        };
        let day = TimeState::default();
        for arch in crate::archetypes::all() {
            let base = arch.base.vision_radius;
            assert_eq!(effective_vision(base, false, &day, &config), base);
            assert_eq!(effective_vision(base, false, &night, &config), base * 0.3);
            assert_eq!(effective_vision(base, true, &night, &config), base);
        }
    }

    #[test]
    fn test_plant_eater_senses_nearest_food() {
        let mut scene = Scene::new();
        let me = scene.add(ArchetypeId::Herbivore, 0, 100.0, 100.0);
        let near = Food {
            id: uuid::Uuid::from_u128(1),
            pos: Point::new(120.0, 100.0),
            energy: 250.0,
        };
        let far = Food {
            id: uuid::Uuid::from_u128(2),
            pos: Point::new(180.0, 100.0),
            energy: 250.0,
        };
        scene.food = vec![far, near];
        let p = scene.perceive(me);
        assert_eq!(p.food.unwrap().target, Target::Food(near.id));
    }

    #[test]
    fn test_meat_eater_ignores_plants() {
        let mut scene = Scene::new();
        let me = scene.add(ArchetypeId::Feline, 0, 100.0, 100.0);
        scene.food = vec![Food {
            id: uuid::Uuid::from_u128(1),
            pos: Point::new(110.0, 100.0),
            energy: 250.0,
        }];
        assert!(scene.perceive(me).food.is_none());
    }

    #[test]
    fn test_isolated_prey_preferred_over_guarded() {
        let mut scene = Scene::new();
        let hunter = scene.add(ArchetypeId::Feline, 0, 200.0, 200.0);
        // a tight herd close by
        let herd_a = scene.add(ArchetypeId::Herbivore, 1, 240.0, 200.0);
        scene.add(ArchetypeId::Herbivore, 1, 244.0, 200.0);
        scene.add(ArchetypeId::Herbivore, 1, 242.0, 204.0);
        // a lone herbivore of another tribe, further away
        let loner = scene.add(ArchetypeId::Herbivore, 2, 200.0, 320.0);
        let p = scene.perceive(hunter);
        let loner_id = scene.creatures[loner].id;
        assert_eq!(p.food.unwrap().target, Target::Creature(loner_id));
        assert_ne!(p.food.unwrap().target, Target::Creature(scene.creatures[herd_a].id));
    }

    #[test]
    fn test_threat_and_rival_detection() {
        let mut scene = Scene::new();
        let me = scene.add(ArchetypeId::Herbivore, 0, 100.0, 100.0);
        let cat = scene.add(ArchetypeId::Feline, 1, 150.0, 100.0);
        let p = scene.perceive(me);
        let cat_id = scene.creatures[cat].id;
        assert_eq!(p.threat.unwrap().target, Target::Creature(cat_id));
        assert_eq!(p.rival.unwrap().target, Target::Creature(cat_id));
        assert!(!p.panic);
    }

    #[test]
    fn test_panic_spreads_from_fleeing_flockmate() {
        let mut scene = Scene::new();
        let me = scene.add(ArchetypeId::Herbivore, 0, 100.0, 100.0);
        let mate = scene.add(ArchetypeId::Herbivore, 0, 120.0, 100.0);
        scene.creatures[mate].state = CreatureState::Fleeing;
        scene.creatures[mate].heading = 0.0;
        let p = scene.perceive(me);
        assert!(p.panic);
        let threat = p.threat.unwrap();
        assert_eq!(threat.pos, Point::new(120.0 - 48.0, 100.0));
        assert_eq!(p.flock_count, 1);
    }

    #[test]
    fn test_mate_requires_both_urges() {
        let mut scene = Scene::new();
        let me = scene.add(ArchetypeId::Human, 0, 100.0, 100.0);
        let other = scene.add(ArchetypeId::Human, 0, 110.0, 100.0);
        scene.creatures[other].reproduction_urge = 0.95;
        assert!(scene.perceive(me).mate.is_none());
        scene.creatures[me].reproduction_urge = 0.95;
        assert!(scene.perceive(me).mate.is_some());
    }

    #[test]
    fn test_observation_layout() {
        let mut scene = Scene::new();
        let me = scene.add(ArchetypeId::Herbivore, 0, 100.0, 100.0);
        scene.creatures[me].nest = Point::new(100.0, 300.0);
        scene.creatures[me].memory.food = Some(Point::new(130.0, 100.0));
        scene.creatures[me].tiredness = 75.0;
        let p = scene.perceive(me);
        let views: Vec<CreatureView> = scene.creatures.iter().map(CreatureView::from).collect();
        let ctx = TickContext {
            config: &scene.config,
            terrain: &scene.terrain,
            time: &scene.time,
            creatures: &views,
            food: &scene.food,
            tick: 0,
        };
        let obs = observation(&scene.creatures[me], &p, &ctx);
        // remembered food still steers when nothing is visible
        assert_eq!(&obs[0..2], &[1.0, 0.0]);
        assert_eq!(&obs[11..13], &[0.0, 1.0]);
        assert_eq!(obs[14], 0.5);
        assert_eq!(obs[21], 0.0);
        assert_eq!(obs.len(), OBSERVATION_LEN);
    }
}
