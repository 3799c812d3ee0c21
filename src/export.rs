use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

use crate::bands::HeightBands;
use crate::tilemap::Tilemap;

/// Colour used for cells no band claims.
const UNCLASSIFIED: [u8; 3] = [0, 0, 0];

/// Default band palette, highest band first: snow, rock, forest, grass,
/// sand, shallow water, deep water.
pub const DEFAULT_PALETTE: [[u8; 3]; 7] = [
    [240, 240, 245],
    [120, 110, 100],
    [40, 100, 45],
    [90, 160, 70],
    [215, 200, 140],
    [60, 130, 200],
    [25, 60, 140],
];

/// Image row for grid row `y`. Tilemap y grows upwards, image rows grow down.
fn image_row(y: usize, height: usize) -> u32 {
    (height - 1 - y) as u32
}

/// Render a grid as an 8-bit grayscale image, 0.0 black and 1.0 white.
pub fn heightmap_image(heightmap: &Tilemap<f32>) -> GrayImage {
    let mut img: GrayImage = ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    for (x, y, &val) in heightmap.iter() {
        let level = (val.clamp(0.0, 1.0) * 255.0).round() as u8;
        img.put_pixel(x as u32, image_row(y, heightmap.height), Luma([level]));
    }

    img
}

/// Export a normalized heightmap as a grayscale PNG.
pub fn export_heightmap(heightmap: &Tilemap<f32>, path: &str) -> Result<(), image::ImageError> {
    heightmap_image(heightmap).save(path)
}

/// Palette colour for a band id. Ids past the palette cycle through it.
pub fn band_color(id: usize, palette: &[[u8; 3]]) -> [u8; 3] {
    if palette.is_empty() {
        return UNCLASSIFIED;
    }
    palette[id % palette.len()]
}

/// Render each cell in the colour of the band it falls into.
pub fn band_preview_image(
    heightmap: &Tilemap<f32>,
    bands: &HeightBands,
    palette: &[[u8; 3]],
) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    for (x, y, &val) in heightmap.iter() {
        let color = match bands.classify(val) {
            Some(id) => band_color(id, palette),
            None => UNCLASSIFIED,
        };
        img.put_pixel(x as u32, image_row(y, heightmap.height), Rgb(color));
    }

    img
}

/// Export a banded colour preview as PNG.
pub fn export_band_preview(
    heightmap: &Tilemap<f32>,
    bands: &HeightBands,
    palette: &[[u8; 3]],
    path: &str,
) -> Result<(), image::ImageError> {
    band_preview_image(heightmap, bands, palette).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Tilemap<f32> {
        // Rises along y: row 0 = 0.0, row 3 = 1.0
        Tilemap::from_fn(2, 4, |_, y| y as f32 / 3.0)
    }

    #[test]
    fn test_heightmap_image_levels_and_orientation() {
        let img = heightmap_image(&ramp());
        assert_eq!(img.dimensions(), (2, 4));
        // Grid row 0 is the bottom image row
        assert_eq!(img.get_pixel(0, 3).0, [0]);
        assert_eq!(img.get_pixel(1, 0).0, [255]);
        assert_eq!(img.get_pixel(0, 2).0, [85]);
    }

    #[test]
    fn test_band_preview_colors() {
        let bands = HeightBands::evenly_distributed(2).unwrap();
        let palette = [[255, 0, 0], [0, 0, 255]];
        let img = band_preview_image(&ramp(), &bands, &palette);

        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(0, 3).0, [0, 0, 255]);
    }

    #[test]
    fn test_unclassified_cells_are_black() {
        let bands = HeightBands::from_bounds(&[(1.0, 0.9)]).unwrap();
        let img = band_preview_image(&ramp(), &bands, &DEFAULT_PALETTE);
        assert_eq!(img.get_pixel(0, 3).0, UNCLASSIFIED);
        assert_eq!(img.get_pixel(0, 0).0, DEFAULT_PALETTE[0]);
    }

    #[test]
    fn test_band_color_cycles() {
        assert_eq!(band_color(7, &DEFAULT_PALETTE), DEFAULT_PALETTE[0]);
        assert_eq!(band_color(3, &[]), UNCLASSIFIED);
    }

    #[test]
    fn test_export_heightmap_writes_png() {
        let path = std::env::temp_dir().join(format!("worldmaker_export_{}.png", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        export_heightmap(&ramp(), &path_str).unwrap();
        let loaded = image::open(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((loaded.width(), loaded.height()), (2, 4));
    }
}
