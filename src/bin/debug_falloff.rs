//! Debug tool for comparing falloff exponents visually
//! Renders the same noise map under a 3x3 grid of (a, b) settings and
//! prints which cell holds which setting

use image::{ImageBuffer, Rgb, RgbImage};
use tilemap_worldmaker::export::{band_preview_image, DEFAULT_PALETTE};
use tilemap_worldmaker::{falloff, noise_field, FalloffParameters, HeightBands, NoiseParameters};

const SIZE: usize = 200;
const OUTPUT: &str = "falloff_comparison.png";
const COLS: usize = 3;
const ROWS: usize = 3;
const GUTTER: u32 = 4;

fn main() {
    println!("Generating falloff comparison grid...");

    let params = NoiseParameters::default();
    let base = match noise_field::generate(SIZE, SIZE, &params) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let bands = HeightBands::evenly_distributed(DEFAULT_PALETTE.len())
        .unwrap_or_else(|e| panic!("palette produced no bands: {}", e));

    let variants: Vec<Option<FalloffParameters>> = vec![
        None,
        Some(FalloffParameters { a: 1.0, b: 2.2 }),
        Some(FalloffParameters { a: 3.0, b: 2.2 }),
        Some(FalloffParameters { a: 8.0, b: 2.2 }),
        Some(FalloffParameters { a: 3.0, b: 1.0 }),
        Some(FalloffParameters { a: 3.0, b: 4.0 }),
        Some(FalloffParameters { a: 3.0, b: 8.0 }),
        Some(FalloffParameters { a: 2.17, b: 5.48 }),
        Some(FalloffParameters { a: 8.0, b: 8.0 }),
    ];

    let mut images: Vec<(String, RgbImage)> = Vec::new();

    for variant in &variants {
        let (label, grid) = match variant {
            None => ("no falloff".to_string(), base.clone()),
            Some(f) => match falloff::apply_falloff(&base, f) {
                Ok(grid) => (format!("a = {}, b = {}", f.a, f.b), grid),
                Err(e) => {
                    eprintln!("  Skipping a = {}, b = {}: {}", f.a, f.b, e);
                    continue;
                }
            },
        };
        println!("  Processing: {}", label);
        images.push((label, band_preview_image(&grid, &bands, &DEFAULT_PALETTE)));
    }

    let grid = create_grid(&images, COLS, ROWS);
    if let Err(e) = grid.save(OUTPUT) {
        eprintln!("Failed to save {}: {}", OUTPUT, e);
        std::process::exit(1);
    }

    println!("Saved {}", OUTPUT);
    println!("Layout (row, column):");
    for (idx, (label, _)) in images.iter().enumerate().take(COLS * ROWS) {
        println!("  ({}, {}) {}", idx / COLS, idx % COLS, label);
    }
}

/// Tile the images row by row with a dark gutter between cells.
fn create_grid(images: &[(String, RgbImage)], cols: usize, rows: usize) -> RgbImage {
    if images.is_empty() {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images[0].1.width() + GUTTER;
    let cell_height = images[0].1.height() + GUTTER;

    let mut grid: RgbImage = ImageBuffer::from_pixel(
        cell_width * cols as u32 + GUTTER,
        cell_height * rows as u32 + GUTTER,
        Rgb([30, 30, 30]),
    );

    for (idx, (_, img)) in images.iter().enumerate().take(cols * rows) {
        let x_offset = (idx % cols) as u32 * cell_width + GUTTER;
        let y_offset = (idx / cols) as u32 * cell_height + GUTTER;

        for (x, y, pixel) in img.enumerate_pixels() {
            grid.put_pixel(x_offset + x, y_offset + y, *pixel);
        }
    }

    grid
}
