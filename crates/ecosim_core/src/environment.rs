//! Environmental clock: day/night phase, seasons and seasonal food spawning.

use crate::config::{AppConfig, TimeConfig};
use crate::terrain::{TerrainGrid, TerrainLogic};
pub use ecosim_data::{Season, TimeState};
use ecosim_data::Point;
use rand::Rng;

pub trait ClockLogic {
    /// Advances one tick. Returns the new season if it changed.
    fn advance(&mut self, cfg: &TimeConfig) -> Option<Season>;
    /// Position within the day in `[0, 1)`.
    fn day_fraction(&self, cfg: &TimeConfig) -> f64;
    fn is_night(&self, cfg: &TimeConfig) -> bool;
}

impl ClockLogic for TimeState {
    fn advance(&mut self, cfg: &TimeConfig) -> Option<Season> {
        self.world_time = (self.world_time + 1) % cfg.day_length;
        self.season_timer += 1;
        if self.season_timer > cfg.season_length {
            self.season_timer = 0;
            self.current_season = self.current_season.next();
            return Some(self.current_season);
        }
        None
    }

    fn day_fraction(&self, cfg: &TimeConfig) -> f64 {
        self.world_time as f64 / cfg.day_length as f64
    }

    fn is_night(&self, cfg: &TimeConfig) -> bool {
        let t = self.day_fraction(cfg);
        t > 0.25 && t < 0.75
    }
}

/// Bernoulli draw against the current season's spawn chance; on success picks
/// a uniformly random fertile cell and returns its centre.
///
/// Returns `None` when the draw fails or the map has no fertile cell.
pub fn roll_food_spawn<R: Rng>(
    time: &TimeState,
    grid: &TerrainGrid,
    config: &AppConfig,
    rng: &mut R,
) -> Option<Point> {
    let chance = config.time.spawn_chance(time.current_season);
    if !rng.gen_bool(chance.clamp(0.0, 1.0)) {
        return None;
    }
    random_cell_center(grid, config, rng, |kind| kind.is_fertile())
}

/// Uniformly random cell centre among cells matching `pred`.
///
/// Tries a bounded number of random draws first and falls back to a full scan,
/// so a sparse map still yields a valid cell if one exists.
pub fn random_cell_center<R, F>(
    grid: &TerrainGrid,
    config: &AppConfig,
    rng: &mut R,
    pred: F,
) -> Option<Point>
where
    R: Rng,
    F: Fn(crate::terrain::TerrainKind) -> bool,
{
    for _ in 0..config.world.spawn_attempts {
        let x = rng.gen_range(0..grid.width);
        let y = rng.gen_range(0..grid.height);
        if pred(grid.get(x, y)) {
            return Some(TerrainGrid::cell_center(x, y, config.world.cell_size));
        }
    }

    let candidates = grid.cells_where(pred);
    if candidates.is_empty() {
        return None;
    }
    let (x, y) = candidates[rng.gen_range(0..candidates.len())];
    Some(TerrainGrid::cell_center(x, y, config.world.cell_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn short_clock() -> TimeConfig {
        TimeConfig {
            day_length: 10,
            season_length: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_world_time_wraps() {
        let cfg = short_clock();
        let mut time = TimeState::default();
        for _ in 0..10 {
            time.advance(&cfg);
        }
        assert_eq!(time.world_time, 0);
    }

    #[test]
    fn test_season_advances_after_exceeding_length() {
        let cfg = short_clock();
        let mut time = TimeState::default();
        for _ in 0..20 {
            assert_eq!(time.advance(&cfg), None);
        }
        assert_eq!(time.season_timer, 20);
        assert_eq!(time.advance(&cfg), Some(Season::Summer));
        assert_eq!(time.season_timer, 0);
    }

    #[test]
    fn test_season_cycle_order() {
        let cfg = short_clock();
        let mut time = TimeState::default();
        let mut seen = Vec::new();
        for _ in 0..(21 * 4) {
            if let Some(s) = time.advance(&cfg) {
                seen.push(s);
            }
        }
        assert_eq!(
            seen,
            vec![Season::Summer, Season::Fall, Season::Winter, Season::Spring]
        );
    }

    #[test]
    fn test_night_phase_bounds() {
        let cfg = TimeConfig {
            day_length: 100,
            ..Default::default()
        };
        let at = |t| TimeState {
            world_time: t,
            ..Default::default()
        };
        assert!(!at(25).is_night(&cfg));
        assert!(at(26).is_night(&cfg));
        assert!(at(74).is_night(&cfg));
        assert!(!at(75).is_night(&cfg));
    }

    #[test]
    fn test_spawn_only_on_fertile_cells() {
        let config = AppConfig {
            time: TimeConfig {
                spawn_chance_spring: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut grid = TerrainGrid::uniform(6, 6, TerrainKind::Mountain);
        grid.set_cell_type(4, 1, TerrainKind::Forest);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = roll_food_spawn(&TimeState::default(), &grid, &config, &mut rng).unwrap();
        assert_eq!(p, Point::new(72.0, 24.0));
    }

    #[test]
    fn test_spawn_on_barren_map_is_noop() {
        let config = AppConfig {
            time: TimeConfig {
                spawn_chance_spring: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let grid = TerrainGrid::uniform(6, 6, TerrainKind::DeepWater);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(roll_food_spawn(&TimeState::default(), &grid, &config, &mut rng).is_none());
    }
}
