mod common;

use common::{CreatureBuilder, WorldBuilder};
use ecosim_data::{ArchetypeId, Brain, Point, PolicyHandle, PolicyId};
use ecosim_lib::model::BrainLogic;

#[test]
fn test_broken_policy_idles_without_affecting_others() {
    let mut world = WorldBuilder::new()
        .without_food_spawns()
        .with_creature(CreatureBuilder::new(ArchetypeId::Herbivore).at(100.0, 100.0))
        .with_creature(
            CreatureBuilder::new(ArchetypeId::Herbivore)
                .at(300.0, 300.0)
                .outputs(0.0, 3.0, -3.0),
        )
        .build();
    world.creatures[0].policy = PolicyHandle::new(
        PolicyId(7),
        Brain::zeroed(2).with_output_bias([f32::NAN, 0.0, 0.0]),
    );
    let heading = world.creatures[0].heading;

    world.update();

    assert_eq!(world.policy_failures, 1);
    let broken = &world.creatures[0];
    assert_eq!(broken.pos, Point::new(100.0, 100.0));
    assert_eq!(broken.heading, heading);
    assert_eq!(broken.age, 1);
    let healthy = &world.creatures[1];
    assert!(healthy.pos.x > 300.0);
}

#[test]
fn test_wrong_shape_policy_is_contained() {
    let mut world = WorldBuilder::new()
        .with_creature(CreatureBuilder::new(ArchetypeId::Feline))
        .build();
    let mut brain = Brain::zeroed(2);
    brain.inputs = 5;
    world.creatures[0].policy = PolicyHandle::new(PolicyId(8), brain);
    for _ in 0..5 {
        world.update();
    }
    assert_eq!(world.policy_failures, 1);
    assert_population!(world, 1);
}

#[test]
fn test_long_run_stays_consistent() {
    let mut world = WorldBuilder::new()
        .with_generated_terrain()
        .with_config(|c| {
            c.world.initial_population = 80;
            c.world.initial_food = 60;
            c.time.day_length = 200;
            c.time.season_length = 400;
        })
        .build();
    for _ in 0..1500 {
        world.update();
        assert_creatures_valid!(world);
    }
    assert!(world.controller.generation >= 1);
}
