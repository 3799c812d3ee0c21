//! Generation pipeline and map settings.
//!
//! Bundles the dimensions, noise parameters and optional falloff of one map
//! request, and runs noise -> falloff -> band classification.

use serde::{Deserialize, Serialize};

use crate::bands::HeightBands;
use crate::error::GenerationError;
use crate::falloff::{self, FalloffParameters};
use crate::noise_field::{self, NoiseParameters};
use crate::tilemap::Tilemap;

// =============================================================================
// EDITOR RANGES
// =============================================================================

pub const MIN_MAP_SIZE: usize = 10;
pub const MAX_MAP_SIZE: usize = 2000;
pub const MAX_OCTAVES: u32 = 8;
pub const MAX_FREQUENCY: f32 = 50.0;
pub const MAX_LACUNARITY: f32 = 5.0;
pub const MIN_FALLOFF_EXPONENT: f32 = 1.0;
pub const MAX_FALLOFF_EXPONENT: f32 = 8.0;

/// Everything needed to generate one height grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Map width in tiles
    pub width: usize,
    /// Map height in tiles
    pub height: usize,
    pub noise: NoiseParameters,
    /// Island falloff, disabled when None
    pub falloff: Option<FalloffParameters>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            noise: NoiseParameters::default(),
            falloff: None,
        }
    }
}

impl MapSettings {
    /// Clamp every user-facing value into the range the editor allows.
    ///
    /// The generators themselves never clamp; they reject bad input instead.
    pub fn clamped(&self) -> Self {
        let clamp_f = |v: f32, lo: f32, hi: f32| if v.is_nan() { lo } else { v.clamp(lo, hi) };

        let noise = NoiseParameters {
            seed: self.noise.seed.max(0),
            frequency: clamp_f(self.noise.frequency, 0.0, MAX_FREQUENCY),
            amplitude: self.noise.amplitude,
            lacunarity: clamp_f(self.noise.lacunarity, 0.0, MAX_LACUNARITY),
            persistence: clamp_f(self.noise.persistence, 0.0, 1.0),
            octaves: self.noise.octaves.clamp(1, MAX_OCTAVES),
            normalization: self.noise.normalization,
        };

        let falloff = self.falloff.map(|f| FalloffParameters {
            a: clamp_f(f.a, MIN_FALLOFF_EXPONENT, MAX_FALLOFF_EXPONENT),
            b: clamp_f(f.b, MIN_FALLOFF_EXPONENT, MAX_FALLOFF_EXPONENT),
        });

        Self {
            width: self.width.clamp(MIN_MAP_SIZE, MAX_MAP_SIZE),
            height: self.height.clamp(MIN_MAP_SIZE, MAX_MAP_SIZE),
            noise,
            falloff,
        }
    }
}

/// Run the noise field and, when enabled, the falloff mask.
pub fn generate_map(settings: &MapSettings) -> Result<Tilemap<f32>, GenerationError> {
    let heightmap = noise_field::generate(settings.width, settings.height, &settings.noise)?;
    match &settings.falloff {
        Some(params) => falloff::apply_falloff(&heightmap, params),
        None => Ok(heightmap),
    }
}

/// A generated map: heights plus the tile id chosen for every cell.
#[derive(Clone, Debug)]
pub struct WorldMap {
    pub settings: MapSettings,
    pub heightmap: Tilemap<f32>,
    pub bands: HeightBands,
    /// Band id per cell, None where no band matched
    pub tiles: Tilemap<Option<usize>>,
}

impl WorldMap {
    pub fn generate(settings: &MapSettings, bands: &HeightBands) -> Result<Self, GenerationError> {
        let heightmap = generate_map(settings)?;
        let tiles = bands.classify_grid(&heightmap);
        Ok(Self {
            settings: *settings,
            heightmap,
            bands: bands.clone(),
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.heightmap.width
    }

    pub fn height(&self) -> usize {
        self.heightmap.height
    }

    /// Cells whose height fell outside every band.
    pub fn unclassified_count(&self) -> usize {
        self.tiles.iter().filter(|(_, _, t)| t.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_editor() {
        let settings = MapSettings::default();
        assert_eq!((settings.width, settings.height), (100, 100));
        assert_eq!(settings.noise.seed, 1337);
        assert_eq!(settings.noise.frequency, 7.0);
        assert_eq!(settings.noise.amplitude, 4.0);
        assert_eq!(settings.noise.lacunarity, 1.0);
        assert_eq!(settings.noise.persistence, 0.5);
        assert_eq!(settings.noise.octaves, 8);
        assert!(settings.falloff.is_none());
    }

    #[test]
    fn test_clamped_ranges() {
        let wild = MapSettings {
            width: 3,
            height: 50_000,
            noise: NoiseParameters {
                seed: -5,
                frequency: 120.0,
                amplitude: 4.0,
                lacunarity: -1.0,
                persistence: 3.0,
                octaves: 0,
                ..NoiseParameters::default()
            },
            falloff: Some(FalloffParameters { a: 0.0, b: 20.0 }),
        };

        let c = wild.clamped();
        assert_eq!((c.width, c.height), (MIN_MAP_SIZE, MAX_MAP_SIZE));
        assert_eq!(c.noise.seed, 0);
        assert_eq!(c.noise.frequency, MAX_FREQUENCY);
        assert_eq!(c.noise.lacunarity, 0.0);
        assert_eq!(c.noise.persistence, 1.0);
        assert_eq!(c.noise.octaves, 1);
        assert_eq!(c.falloff, Some(FalloffParameters { a: 1.0, b: 8.0 }));

        // Already valid settings pass through unchanged
        assert_eq!(MapSettings::default().clamped(), MapSettings::default());
    }

    #[test]
    fn test_generate_map_without_falloff_matches_noise() {
        let settings = MapSettings { width: 24, height: 16, ..MapSettings::default() };
        let map = generate_map(&settings).unwrap();
        let noise = noise_field::generate(24, 16, &settings.noise).unwrap();
        assert_eq!(map, noise);
    }

    #[test]
    fn test_falloff_lowers_edges() {
        let base = MapSettings { width: 32, height: 32, ..MapSettings::default() };
        let island = MapSettings { falloff: Some(FalloffParameters::default()), ..base };

        let plain = generate_map(&base).unwrap();
        let shaped = generate_map(&island).unwrap();

        assert_eq!(*shaped.get(0, 0), 0.0);
        for (x, y, &v) in shaped.iter() {
            assert!(v <= *plain.get(x, y));
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_world_map_classifies_everything() {
        let settings = MapSettings { width: 30, height: 20, ..MapSettings::default() };
        let bands = HeightBands::evenly_distributed(5).unwrap();
        let world = WorldMap::generate(&settings, &bands).unwrap();

        assert_eq!((world.width(), world.height()), (30, 20));
        assert_eq!(world.unclassified_count(), 0);
        for (x, y, &tile) in world.tiles.iter() {
            assert_eq!(tile, bands.classify(*world.heightmap.get(x, y)));
        }
    }

    #[test]
    fn test_generate_map_propagates_errors() {
        let settings = MapSettings { width: 0, ..MapSettings::default() };
        assert!(generate_map(&settings).is_err());
    }

    #[test]
    fn test_unbounded_amplitude_is_rejected_not_clamped() {
        // The editor puts no range on amplitude, so only generation can refuse it
        let mut settings = MapSettings::default();
        settings.noise.amplitude = f32::INFINITY;
        let clamped = settings.clamped();
        assert_eq!(clamped.noise.amplitude, f32::INFINITY);
        assert!(matches!(generate_map(&clamped), Err(GenerationError::InvalidArgument(_))));
    }
}
