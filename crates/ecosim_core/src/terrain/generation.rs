use super::{TerrainGrid, TerrainKind};
use crate::config::TerrainConfig;
use crate::error::{Result, SimError};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Ken Perlin's reference permutation.
const PERM: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Ascending thresholds; the last one exceeded selects the kind.
const BANDS: [(f64, TerrainKind); 6] = [
    (-0.5, TerrainKind::ShallowWater),
    (-0.3, TerrainKind::Beach),
    (-0.2, TerrainKind::Grassland),
    (0.25, TerrainKind::Forest),
    (0.6, TerrainKind::Mountain),
    (0.75, TerrainKind::Snow),
];

#[inline]
fn perm(i: usize) -> usize {
    PERM[i & 255] as usize
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: usize, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

/// One octave of gradient noise whose lattice repeats every `repeat` units.
/// `base` offsets the permutation lookup.
fn perlin(x: f64, y: f64, repeat: (i64, i64), base: usize) -> f64 {
    let fx = x.floor();
    let fy = y.floor();
    let xf = x - fx;
    let yf = y - fy;

    let i = (fx as i64).rem_euclid(repeat.0);
    let j = (fy as i64).rem_euclid(repeat.1);
    let ii = (i + 1).rem_euclid(repeat.0);
    let jj = (j + 1).rem_euclid(repeat.1);

    let i = (i as usize & 255) + base;
    let j = (j as usize & 255) + base;
    let ii = (ii as usize & 255) + base;
    let jj = (jj as usize & 255) + base;

    let aa = perm(perm(i) + j);
    let ab = perm(perm(i) + jj);
    let ba = perm(perm(ii) + j);
    let bb = perm(perm(ii) + jj);

    let u = fade(xf);
    let v = fade(yf);
    lerp(
        lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u),
        lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u),
        v,
    )
}

/// Fractal sum of `octaves` layers, normalized by the total amplitude.
#[must_use]
pub fn fractal_noise(x: f64, y: f64, repeat: (u16, u16), seed: u64, cfg: &TerrainConfig) -> f64 {
    let base = (seed % 256) as usize;
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..cfg.octaves {
        let rx = ((f64::from(repeat.0) * frequency) as i64).max(1);
        let ry = ((f64::from(repeat.1) * frequency) as i64).max(1);
        total += perlin(x * frequency, y * frequency, (rx, ry), base) * amplitude;
        max_value += amplitude;
        amplitude *= cfg.persistence;
        frequency *= cfg.lacunarity;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}

#[must_use]
pub fn classify(value: f64) -> TerrainKind {
    BANDS
        .iter()
        .filter(|(threshold, _)| value > *threshold)
        .last()
        .map_or(TerrainKind::DeepWater, |(_, kind)| *kind)
}

impl TerrainGrid {
    /// Builds a grid from fractal noise. Same seed and dimensions give the same grid.
    pub fn generate(width: u16, height: u16, seed: u64, cfg: &TerrainConfig) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SimError::world_generation(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        if !(cfg.scale.is_finite() && cfg.scale > 0.0) {
            return Err(SimError::world_generation(format!(
                "noise scale must be a positive number, got {}",
                cfg.scale
            )));
        }
        if cfg.octaves == 0 {
            return Err(SimError::world_generation("at least one octave is required"));
        }

        let w = width as usize;
        let n = w * height as usize;
        let sample = |idx: usize| {
            let x = (idx % w) as f64;
            let y = (idx / w) as f64;
            classify(fractal_noise(x / cfg.scale, y / cfg.scale, (width, height), seed, cfg))
        };

        #[cfg(feature = "parallel")]
        let cells = (0..n).into_par_iter().map(sample).collect();
        #[cfg(not(feature = "parallel"))]
        let cells = (0..n).map(sample).collect();

        Ok(Self {
            width,
            height,
            cells,
        })
    }
}
