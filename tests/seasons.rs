mod common;

use common::WorldBuilder;
use ecosim_data::{Season, TimeState};
use ecosim_lib::model::config::AppConfig;
use ecosim_lib::model::environment::roll_food_spawn;
use ecosim_lib::model::history::LiveEvent;
use ecosim_lib::model::terrain::{TerrainGrid, TerrainKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn test_winter_spawn_rate_matches_probability() {
    let config = AppConfig::default();
    let grid = TerrainGrid::uniform(config.world.width, config.world.height, TerrainKind::Forest);
    let time = TimeState {
        current_season: Season::Winter,
        ..TimeState::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let ticks = 100_000u32;
    let spawned = (0..ticks)
        .filter(|_| roll_food_spawn(&time, &grid, &config, &mut rng).is_some())
        .count() as f64;

    let p = config.time.spawn_chance_winter;
    let expected = p * f64::from(ticks);
    let sigma = (expected * (1.0 - p)).sqrt();
    assert!(
        (spawned - expected).abs() < 5.0 * sigma,
        "spawned {spawned}, expected {expected} ± {}",
        5.0 * sigma
    );
}

#[test]
fn test_no_spawn_without_fertile_cells() {
    let config = AppConfig::default();
    let grid = TerrainGrid::uniform(8, 8, TerrainKind::DeepWater);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut cfg = config.clone();
    cfg.time.spawn_chance_spring = 1.0;
    assert!(roll_food_spawn(&TimeState::default(), &grid, &cfg, &mut rng).is_none());
}

#[test]
fn test_seasons_cycle_in_order() {
    let mut world = WorldBuilder::new()
        .with_config(|c| {
            c.time.day_length = 10;
            c.time.season_length = 20;
        })
        .build();
    let mut seasons = Vec::new();
    for _ in 0..84 {
        for event in world.update() {
            if let LiveEvent::SeasonChanged { season, .. } = event {
                seasons.push(season);
            }
        }
    }
    assert_eq!(
        seasons,
        vec![Season::Summer, Season::Fall, Season::Winter, Season::Spring]
    );
    assert_eq!(world.time.current_season, Season::Spring);
}

#[test]
fn test_population_sampled_daily() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.time.day_length = 10)
        .build();
    for _ in 0..35 {
        world.update();
    }
    let ticks: Vec<u64> = world.population_history.iter().map(|s| s.tick).collect();
    assert_eq!(ticks, vec![10, 20, 30]);
}
