use serde::{Deserialize, Serialize};

/// Terrain classification of a single grid cell.
///
/// Variants are ordered from the lowest to the highest elevation band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Open ocean, never a spawn location.
    #[default]
    DeepWater,
    ShallowWater,
    Beach,
    /// Fertile plains.
    Grassland,
    Forest,
    Mountain,
    Snow,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 7] = [
        TerrainKind::DeepWater,
        TerrainKind::ShallowWater,
        TerrainKind::Beach,
        TerrainKind::Grassland,
        TerrainKind::Forest,
        TerrainKind::Mountain,
        TerrainKind::Snow,
    ];
}
