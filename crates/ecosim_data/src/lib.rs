//! # Ecosim Data
//!
//! Plain data types shared by every crate of the ecosystem simulation.
//! Logic over these types lives in `ecosim_core`; this crate only defines
//! their shape and serde representation.

pub mod data;

pub use data::entity::{
    ArchetypeId, Creature, CreatureState, Food, Memory, Pattern, Point, Rgb, Target,
    VisualGenome, TRIBE_COLORS,
};
pub use data::environment::{Season, TimeState};
pub use data::genotype::{Brain, PolicyHandle, PolicyId, ACTION_LEN, OBSERVATION_LEN};
pub use data::terrain::TerrainKind;
