//! # Ecosim Core
//!
//! Deterministic simulation logic for the ecosim creature ecosystem.
//!
//! This crate contains:
//! - Terrain generation from seeded fractal noise
//! - The environmental clock (day/night, seasons, food spawning)
//! - The static archetype registry
//! - Creature perception, flocking cues, the behavioural state machine and movement
//! - Sequential interaction resolution (feeding, hunting, reproduction, death)
//! - The decision-policy seam, a reference MLP policy and its evolution controller
//! - Metrics collection and structured logging
//!
//! ## Example
//!
//! ```
//! use ecosim_core::brain::{BrainLogic, DecisionPolicy};
//! use ecosim_data::{Brain, OBSERVATION_LEN};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let brain = Brain::new_random_with_rng(12, 1.0, &mut rng);
//!
//! let action = brain.evaluate(&[0.5; OBSERVATION_LEN]).unwrap();
//! assert!(action.iter().all(|v| (-1.0..=1.0).contains(v)));
//! ```

/// Static species definitions
pub mod archetypes;
/// Decision-policy trait and the reference feed-forward brain
pub mod brain;
/// Configuration management for simulation parameters
pub mod config;
/// Day/night cycle, seasons and food spawning
pub mod environment;
pub mod error;
/// Policy population and generation stepping
pub mod evolution;
/// Live events and population history
pub mod history;
/// Creature and food construction
pub mod lifecycle;
/// Performance metrics collection and logging
pub mod metrics;
/// Per-tick read-only views and the serializable world snapshot
pub mod snapshot;
/// Perception, behaviour, movement and interaction systems
pub mod systems;
/// Terrain grid and its generation
pub mod terrain;

pub use archetypes::ArchetypeLogic;
pub use brain::{BrainLogic, DecisionPolicy};
pub use environment::ClockLogic;
pub use evolution::{EvolutionController, PolicyPopulation};
pub use metrics::{init_logging, route_panics_to_tracing, Metrics};
pub use terrain::TerrainLogic;
