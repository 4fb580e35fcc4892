//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures mapping to a `config.toml` file.
//! Every field has a default, so a file only needs to list what it overrides.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command line flags of the headless runner (`--seed`)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 80
//! height = 45
//! initial_population = 150
//! seed = 42
//!
//! [time]
//! day_length = 2400
//!
//! [evolution]
//! mutation_rate = 0.1
//! fitness_mode = "Accumulated"
//! ```

use ecosim_data::Season;
use serde::{Deserialize, Serialize};

/// World-level simulation configuration.
///
/// Dimensions are expressed in cells; world-space coordinates are pixels,
/// `cell_size` pixels per cell.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u16,
    pub height: u16,
    pub cell_size: f64,
    pub seed: Option<u64>,
    pub initial_population: usize,
    pub initial_food: usize,
    pub food_energy: f64,
    pub tribes_per_species: u8,
    /// Random draws tried before falling back to a scan of every valid cell.
    pub spawn_attempts: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 45,
            cell_size: 16.0,
            seed: None,
            initial_population: 150,
            initial_food: 150,
            food_energy: 250.0,
            tribes_per_species: 3,
            spawn_attempts: 64,
        }
    }
}

/// Fractal noise parameters for terrain generation.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TerrainConfig {
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            scale: 80.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Day/season clock and seasonal food spawning.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TimeConfig {
    pub day_length: u64,
    pub season_length: u64,
    pub spawn_chance_spring: f64,
    pub spawn_chance_summer: f64,
    pub spawn_chance_fall: f64,
    pub spawn_chance_winter: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            day_length: 2400,
            season_length: 4 * 2400,
            spawn_chance_spring: 0.03,
            spawn_chance_summer: 0.05,
            spawn_chance_fall: 0.015,
            spawn_chance_winter: 0.005,
        }
    }
}

impl TimeConfig {
    /// Per-tick food spawn probability for a season.
    #[must_use]
    pub fn spawn_chance(&self, season: Season) -> f64 {
        match season {
            Season::Spring => self.spawn_chance_spring,
            Season::Summer => self.spawn_chance_summer,
            Season::Fall => self.spawn_chance_fall,
            Season::Winter => self.spawn_chance_winter,
        }
    }
}

/// Energy, ageing, fatigue and reproduction bookkeeping.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MetabolismConfig {
    pub base_decay: f64,
    pub movement_cost: f64,
    pub maturity_age: u64,
    pub urge_increment: f64,
    /// Fraction of max energy each parent pays for one offspring.
    pub reproduction_cost: f64,
    pub tiredness_rate: f64,
    pub max_tiredness: f64,
    pub sleep_energy_gain: f64,
    pub sleep_tiredness_recovery: f64,
    /// Fraction of max energy required before waking up.
    pub wake_energy_fraction: f64,
}

impl Default for MetabolismConfig {
    fn default() -> Self {
        Self {
            base_decay: 0.25,
            movement_cost: 0.1,
            maturity_age: 1000,
            urge_increment: 0.005,
            reproduction_cost: 0.4,
            tiredness_rate: 0.1,
            max_tiredness: 150.0,
            sleep_energy_gain: 2.0,
            sleep_tiredness_recovery: 1.5,
            wake_energy_fraction: 0.95,
        }
    }
}

/// Perception and state machine tuning.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BehaviorConfig {
    pub night_vision_factor: f64,
    pub night_vision_chance: f64,
    pub mate_urge_threshold: f64,
    pub sleep_intent_threshold: f32,
    pub flee_duration: u32,
    /// Distance behind a fleeing flockmate at which the virtual threat is placed.
    pub panic_distance: f64,
    pub separation_radius_cells: f64,
    pub nest_arrival_cells: f64,
    pub interaction_radius_cells: f64,
    /// Raw speed output used while heading home to sleep.
    pub nest_approach_output: f32,
    pub nest_max_distance: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            night_vision_factor: 0.3,
            night_vision_chance: 0.2,
            mate_urge_threshold: 0.9,
            sleep_intent_threshold: 0.5,
            flee_duration: 90,
            panic_distance: 48.0,
            separation_radius_cells: 2.5,
            nest_arrival_cells: 1.0,
            interaction_radius_cells: 1.0,
            nest_approach_output: 0.5,
            nest_max_distance: 10000.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BrainConfig {
    pub hidden_size: usize,
    pub init_weight_range: f32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            hidden_size: 12,
            init_weight_range: 1.0,
        }
    }
}

/// How per-creature fitness is tracked between generation boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FitnessMode {
    /// Age plus interaction rewards accumulated since the last boundary.
    #[default]
    Accumulated,
    /// Fitness is overwritten with age every tick; rewards are discarded.
    AgeOverwrite,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Generation period, in seasons.
    pub generation_seasons: u64,
    pub population_size: usize,
    pub elite_count: usize,
    pub tournament_size: usize,
    pub mutation_rate: f32,
    pub mutation_amount: f32,
    pub fitness_mode: FitnessMode,
    pub food_reward: f64,
    pub kill_reward: f64,
    pub reproduction_reward: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            generation_seasons: 2,
            population_size: 50,
            elite_count: 5,
            tournament_size: 3,
            mutation_rate: 0.1,
            mutation_amount: 0.5,
            fitness_mode: FitnessMode::Accumulated,
            food_reward: 5.0,
            kill_reward: 25.0,
            reproduction_reward: 20.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub terrain: TerrainConfig,
    pub time: TimeConfig,
    pub metabolism: MetabolismConfig,
    pub behavior: BehaviorConfig,
    pub brain: BrainConfig,
    pub evolution: EvolutionConfig,
}

impl AppConfig {
    /// World extent in pixels.
    #[must_use]
    pub fn pixel_size(&self) -> (f64, f64) {
        (
            f64::from(self.world.width) * self.world.cell_size,
            f64::from(self.world.height) * self.world.cell_size,
        )
    }

    /// Ticks between two evolution calls.
    #[must_use]
    pub fn generation_period(&self) -> u64 {
        self.time.season_length * self.evolution.generation_seasons
    }

    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    ///
    /// # Validation Rules
    /// - World dimensions must be positive and at most 1000 cells
    /// - Probabilities must lie in [0.0, 1.0]
    /// - Rates, costs and durations must be non-negative
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(self.world.width > 0, "World width must be positive");
        anyhow::ensure!(self.world.width <= 1000, "World width too large (max 1000)");
        anyhow::ensure!(self.world.height > 0, "World height must be positive");
        anyhow::ensure!(
            self.world.height <= 1000,
            "World height too large (max 1000)"
        );
        anyhow::ensure!(self.world.cell_size > 0.0, "Cell size must be positive");
        anyhow::ensure!(
            self.world.tribes_per_species > 0,
            "At least one tribe per species is required"
        );
        anyhow::ensure!(self.world.food_energy >= 0.0, "Food energy must be non-negative");

        // Terrain validation
        anyhow::ensure!(self.terrain.scale > 0.0, "Noise scale must be positive");
        anyhow::ensure!(self.terrain.octaves > 0, "At least one noise octave is required");
        anyhow::ensure!(
            self.terrain.octaves <= 16,
            "Too many noise octaves (max 16)"
        );

        // Clock validation
        anyhow::ensure!(self.time.day_length > 0, "Day length must be positive");
        anyhow::ensure!(self.time.season_length > 0, "Season length must be positive");
        for season in [Season::Spring, Season::Summer, Season::Fall, Season::Winter] {
            let chance = self.time.spawn_chance(season);
            anyhow::ensure!(
                (0.0..=1.0).contains(&chance),
                "{} spawn chance must be between 0.0 and 1.0",
                season.name()
            );
        }

        // Metabolism validation
        anyhow::ensure!(
            self.metabolism.base_decay >= 0.0,
            "Base decay must be non-negative"
        );
        anyhow::ensure!(
            self.metabolism.movement_cost >= 0.0,
            "Movement cost must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.metabolism.reproduction_cost),
            "Reproduction cost must be a fraction between 0.0 and 1.0"
        );
        anyhow::ensure!(
            self.metabolism.max_tiredness > 0.0,
            "Max tiredness must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.metabolism.wake_energy_fraction),
            "Wake energy fraction must be between 0.0 and 1.0"
        );

        // Behaviour validation
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.behavior.night_vision_factor),
            "Night vision factor must be between 0.0 and 1.0"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.behavior.night_vision_chance),
            "Night vision chance must be between 0.0 and 1.0"
        );
        anyhow::ensure!(
            self.behavior.interaction_radius_cells > 0.0,
            "Interaction radius must be positive"
        );

        // Brain & evolution validation
        anyhow::ensure!(self.brain.hidden_size > 0, "Brain needs at least one hidden neuron");
        anyhow::ensure!(
            self.evolution.generation_seasons > 0,
            "Generation period must be at least one season"
        );
        anyhow::ensure!(
            self.evolution.population_size > 0,
            "Policy population must not be empty"
        );
        anyhow::ensure!(
            self.evolution.elite_count <= self.evolution.population_size,
            "Elite count cannot exceed the policy population"
        );
        anyhow::ensure!(
            self.evolution.tournament_size > 0,
            "Tournament size must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.evolution.mutation_rate),
            "Mutation rate must be between 0.0 and 1.0"
        );
        anyhow::ensure!(
            self.evolution.mutation_amount >= 0.0,
            "Mutation amount must be non-negative"
        );

        Ok(())
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Digest of the sections that influence simulation outcomes.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.terrain).as_bytes());
        hasher.update(format!("{:?}", self.time).as_bytes());
        hasher.update(format!("{:?}", self.metabolism).as_bytes());
        hasher.update(format!("{:?}", self.behavior).as_bytes());
        hasher.update(format!("{:?}", self.brain).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_world_width() {
        let config = AppConfig {
            world: WorldConfig {
                width: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_world_height() {
        let config = AppConfig {
            world: WorldConfig {
                height: 1001,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_spawn_chance() {
        let config = AppConfig {
            time: TimeConfig {
                spawn_chance_winter: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_mutation_rate() {
        let config = AppConfig {
            evolution: EvolutionConfig {
                mutation_rate: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seasonal_spawn_extremes() {
        let time = TimeConfig::default();
        assert!(time.spawn_chance(Season::Summer) > time.spawn_chance(Season::Spring));
        assert!(time.spawn_chance(Season::Winter) < time.spawn_chance(Season::Fall));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [world]
            width = 10
            height = 10
            seed = 42

            [evolution]
            fitness_mode = "AgeOverwrite"
            "#,
        )
        .unwrap();
        assert_eq!(config.world.width, 10);
        assert_eq!(config.world.seed, Some(42));
        assert_eq!(config.world.cell_size, 16.0);
        assert_eq!(config.time.day_length, 2400);
        assert_eq!(config.evolution.fitness_mode, FitnessMode::AgeOverwrite);
    }

    #[test]
    fn test_generation_period_is_two_seasons() {
        let config = AppConfig::default();
        assert_eq!(config.generation_period(), 2 * 4 * 2400);
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());

        let mut config3 = AppConfig::default();
        config3.world.food_energy = 100.0;
        assert_ne!(config1.fingerprint(), config3.fingerprint());
    }
}
