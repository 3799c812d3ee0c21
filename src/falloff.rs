//! Edge falloff masks.
//!
//! The mask is 0 at the centre of the grid and rises towards 1 at the
//! borders along a square (Chebyshev) footprint. Subtracting it from a height
//! grid sinks the edges and leaves an island in the middle.

use serde::{Deserialize, Serialize};

use crate::error::{check_dimensions, GenerationError};
use crate::tilemap::Tilemap;

/// Shape exponents of the falloff curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FalloffParameters {
    /// Steepness of the transition
    pub a: f32,
    /// Midpoint of the transition (higher = island reaches further out)
    pub b: f32,
}

impl Default for FalloffParameters {
    fn default() -> Self {
        Self { a: 3.0, b: 2.2 }
    }
}

impl FalloffParameters {
    /// Exponents must be finite and strictly positive. A zero `b` turns the
    /// centre cell into 0/0.
    pub fn validate(&self) -> Result<(), GenerationError> {
        for (name, value) in [("a", self.a), ("b", self.b)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GenerationError::InvalidArgument(format!(
                    "falloff exponent {} must be finite and positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Generate a falloff mask of the given size.
pub fn generate_mask(
    width: usize,
    height: usize,
    a: f32,
    b: f32,
) -> Result<Tilemap<f32>, GenerationError> {
    check_dimensions(width, height)?;
    FalloffParameters { a, b }.validate()?;

    Ok(Tilemap::from_fn(width, height, |x, y| {
        let nx = x as f32 / width as f32 * 2.0 - 1.0;
        let ny = y as f32 / height as f32 * 2.0 - 1.0;
        evaluate(nx.abs().max(ny.abs()), a, b)
    }))
}

/// `v^a / (v^a + (b - b*v)^a)`, monotonic on [0, 1] with f(0) = 0 and f(1) = 1.
fn evaluate(v: f32, a: f32, b: f32) -> f32 {
    let va = v.powf(a);
    va / (va + (b - b * v).powf(a))
}

/// Subtract `mask` from `base` cell by cell, clamping to [0, 1].
pub fn apply_to(base: &Tilemap<f32>, mask: &Tilemap<f32>) -> Result<Tilemap<f32>, GenerationError> {
    if !base.same_size(mask) {
        return Err(GenerationError::InvalidArgument(format!(
            "mask is {}x{} but base grid is {}x{}",
            mask.width, mask.height, base.width, base.height
        )));
    }

    let mut result = base.clone();
    for ((_, _, out), (_, _, &m)) in result.iter_mut().zip(mask.iter()) {
        *out = (*out - m).clamp(0.0, 1.0);
    }
    Ok(result)
}

/// Build a mask matching `base` and apply it.
pub fn apply_falloff(
    base: &Tilemap<f32>,
    params: &FalloffParameters,
) -> Result<Tilemap<f32>, GenerationError> {
    let mask = generate_mask(base.width, base.height, params.a, params.b)?;
    apply_to(base, &mask)
}
