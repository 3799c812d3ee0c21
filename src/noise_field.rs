//! Layered coherent noise height fields.
//!
//! Each cell sums `octaves` layers of seeded Perlin noise. Layer `k` samples at
//! `frequency * lacunarity^k` and is weighted by `amplitude * persistence^k`.
//! The raw sums are then stretched over the grid's own min/max so the result
//! always spans [0, 1].

use noise::{NoiseFn, Perlin};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{check_dimensions, GenerationError};
use crate::tilemap::Tilemap;

/// How raw noise sums are remapped onto [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// Highest raw value maps to 0 and lowest to 1.
    ///
    /// This is the mapping the height bands and presets were tuned against,
    /// so it stays the default even though it reads upside down.
    #[default]
    Inverted,
    /// Lowest raw value maps to 0 and highest to 1.
    Direct,
}

/// Parameters for one noise field generation call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParameters {
    /// Offsets the sampling position and seeds the permutation table
    pub seed: i32,
    /// Base frequency ("scale"); higher values give smaller features
    pub frequency: f32,
    /// Weight of the first octave
    pub amplitude: f32,
    /// Frequency multiplier per octave
    pub lacunarity: f32,
    /// Amplitude multiplier per octave (0.0-1.0)
    pub persistence: f32,
    /// Number of layers, at least 1
    pub octaves: u32,
    pub normalization: Normalization,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            seed: 1337,
            frequency: 7.0,
            amplitude: 4.0,
            lacunarity: 1.0,
            persistence: 0.5,
            octaves: 8,
            normalization: Normalization::Inverted,
        }
    }
}

/// Largest sample coordinate handed to `Perlin` (2^53). Past this f64 can no
/// longer represent every lattice cell, and further out the lattice index
/// overflows inside the noise crate.
const MAX_SAMPLE_COORDINATE: f64 = 9_007_199_254_740_992.0;

/// Upper bound on the summed octave weights, leaving headroom for the
/// min/max subtraction during normalization.
const MAX_TOTAL_WEIGHT: f64 = 1.0e300;

impl NoiseParameters {
    /// Check octave count and that every float parameter is finite.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.octaves == 0 {
            return Err(GenerationError::InvalidArgument(
                "octaves must be at least 1".to_string(),
            ));
        }

        for (name, value) in [
            ("frequency", self.frequency),
            ("amplitude", self.amplitude),
            ("lacunarity", self.lacunarity),
            ("persistence", self.persistence),
        ] {
            if !value.is_finite() {
                return Err(GenerationError::InvalidArgument(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Check that sampling a `width` x `height` grid stays inside the range
    /// the noise lattice can index and that octave sums cannot overflow.
    pub fn validate_for(&self, width: usize, height: usize) -> Result<(), GenerationError> {
        self.validate()?;

        let steps = (self.octaves - 1).min(i32::MAX as u32) as i32;
        let growth = |factor: f32| (factor.abs() as f64).max(1.0).powi(steps);

        let span = (width.max(height) as f64 + (self.seed as f64).abs())
            / width.min(height).max(1) as f64;
        let max_coordinate = span * (self.frequency.abs() as f64) * growth(self.lacunarity);
        if !(max_coordinate <= MAX_SAMPLE_COORDINATE) {
            return Err(GenerationError::InvalidArgument(format!(
                "sample coordinates reach {:e}, limit is {:e}; lower frequency, lacunarity or octaves",
                max_coordinate, MAX_SAMPLE_COORDINATE
            )));
        }

        let total_weight =
            (self.amplitude.abs() as f64) * growth(self.persistence) * self.octaves as f64;
        if !(total_weight <= MAX_TOTAL_WEIGHT) {
            return Err(GenerationError::InvalidArgument(format!(
                "octave weights sum to {:e}; lower amplitude, persistence or octaves",
                total_weight
            )));
        }
        Ok(())
    }
}

/// Generate a normalized height grid.
///
/// Identical inputs always produce an identical grid. Rows are sampled in
/// parallel, but every cell depends only on its own coordinates and the
/// min/max reduction is order independent, so scheduling never leaks into
/// the result.
pub fn generate(
    width: usize,
    height: usize,
    params: &NoiseParameters,
) -> Result<Tilemap<f32>, GenerationError> {
    check_dimensions(width, height)?;
    let cells = width.checked_mul(height).ok_or_else(|| {
        GenerationError::InvalidArgument(format!("{}x{} grid is too large", width, height))
    })?;
    params.validate_for(width, height)?;

    let perlin = Perlin::new(params.seed as u32);

    let raw: Vec<f64> = (0..cells)
        .into_par_iter()
        .map(|idx| {
            let x = idx % width;
            let y = idx / width;
            layered_sample(&perlin, x, y, width, height, params)
        })
        .collect();

    let (min, max) = raw
        .par_iter()
        .fold(
            || (f64::MAX, f64::MIN),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
        .reduce(
            || (f64::MAX, f64::MIN),
            |(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)),
        );

    let normalized = raw
        .iter()
        .map(|&v| {
            let t = match params.normalization {
                Normalization::Inverted => inverse_lerp(max, min, v),
                Normalization::Direct => inverse_lerp(min, max, v),
            };
            t as f32
        })
        .collect();

    Ok(Tilemap::from_cells(width, height, normalized))
}

/// Raw (un-normalized) octave sum for one cell.
fn layered_sample(
    perlin: &Perlin,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    params: &NoiseParameters,
) -> f64 {
    let seed = params.seed as f64;
    let nx = (x as f64 + seed) / width as f64;
    let ny = (y as f64 + seed) / height as f64;

    let mut total = 0.0;
    let mut frequency = params.frequency as f64;
    let mut amplitude = params.amplitude as f64;

    for _ in 0..params.octaves {
        total += unit_noise(perlin, nx * frequency, ny * frequency) * amplitude;
        frequency *= params.lacunarity as f64;
        amplitude *= params.persistence as f64;
    }

    total
}

/// Perlin noise remapped from [-1, 1] to [0, 1].
fn unit_noise(perlin: &Perlin, x: f64, y: f64) -> f64 {
    (perlin.get([x, y]) * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// Position of `value` between `a` and `b`, clamped to [0, 1].
/// An empty range yields 0.
fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}
