pub use ecosim_data::TerrainKind;
use ecosim_data::Point;
use serde::{Deserialize, Serialize};

pub mod generation;

/// Static per-kind cell properties.
pub trait TerrainLogic {
    fn movement_cost(&self) -> f64;
    fn energy_cost(&self) -> f64;
    /// Food may spawn here.
    fn is_fertile(&self) -> bool;
    /// Creatures may spawn here.
    fn is_habitable(&self) -> bool;
}

impl TerrainLogic for TerrainKind {
    fn movement_cost(&self) -> f64 {
        match self {
            TerrainKind::DeepWater => 10.0,
            TerrainKind::ShallowWater => 4.0,
            TerrainKind::Beach => 1.5,
            TerrainKind::Grassland => 1.0,
            TerrainKind::Forest => 2.5,
            TerrainKind::Mountain => 5.0,
            TerrainKind::Snow => 6.0,
        }
    }

    fn energy_cost(&self) -> f64 {
        match self {
            TerrainKind::DeepWater => 2.0,
            TerrainKind::ShallowWater => 1.5,
            TerrainKind::Beach => 1.0,
            TerrainKind::Grassland => 1.0,
            TerrainKind::Forest => 1.0,
            TerrainKind::Mountain => 1.2,
            TerrainKind::Snow => 1.5,
        }
    }

    fn is_fertile(&self) -> bool {
        matches!(
            self,
            TerrainKind::Grassland | TerrainKind::Forest | TerrainKind::Beach
        )
    }

    fn is_habitable(&self) -> bool {
        !matches!(
            self,
            TerrainKind::DeepWater | TerrainKind::ShallowWater | TerrainKind::Mountain
        )
    }
}

/// Immutable terrain classification, row-major (`y * width + x`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<TerrainKind>,
}

impl TerrainGrid {
    /// Grid of a single terrain kind, mostly useful for tests and tools.
    #[must_use]
    pub fn uniform(width: u16, height: u16, kind: TerrainKind) -> Self {
        Self {
            width,
            height,
            cells: vec![kind; width as usize * height as usize],
        }
    }

    #[must_use]
    pub fn index(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> TerrainKind {
        if x >= self.width || y >= self.height {
            return TerrainKind::DeepWater;
        }
        self.cells[self.index(x, y)]
    }

    pub fn set_cell_type(&mut self, x: u16, y: u16, kind: TerrainKind) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells[idx] = kind;
        }
    }

    /// Cell containing a world-space point, clamped to the grid.
    #[must_use]
    pub fn cell_of(&self, p: &Point, cell_size: f64) -> (u16, u16) {
        let cx = (p.x / cell_size).floor().clamp(0.0, f64::from(self.width) - 1.0);
        let cy = (p.y / cell_size).floor().clamp(0.0, f64::from(self.height) - 1.0);
        (cx as u16, cy as u16)
    }

    #[must_use]
    pub fn kind_at(&self, p: &Point, cell_size: f64) -> TerrainKind {
        let (x, y) = self.cell_of(p, cell_size);
        self.get(x, y)
    }

    #[must_use]
    pub fn cell_center(x: u16, y: u16, cell_size: f64) -> Point {
        Point::new(
            f64::from(x) * cell_size + cell_size / 2.0,
            f64::from(y) * cell_size + cell_size / 2.0,
        )
    }

    /// Coordinates of every cell matching `pred`, in row-major order.
    pub fn cells_where<F>(&self, pred: F) -> Vec<(u16, u16)>
    where
        F: Fn(TerrainKind) -> bool,
    {
        let w = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| pred(**kind))
            .map(|(idx, _)| ((idx % w) as u16, (idx / w) as u16))
            .collect()
    }
}
