//! Tile map world generation library
//!
//! Builds normalized height grids from layered noise and an optional island
//! falloff, and classifies them into tile bands.

pub mod ascii;
pub mod bands;
pub mod config;
pub mod error;
pub mod export;
pub mod falloff;
pub mod noise_field;
pub mod tilemap;
pub mod world;

pub use bands::{HeightBand, HeightBands};
pub use error::GenerationError;
pub use falloff::FalloffParameters;
pub use noise_field::{NoiseParameters, Normalization};
pub use tilemap::Tilemap;
pub use world::{MapSettings, WorldMap};
