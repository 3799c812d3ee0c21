//! ASCII rendering for height grids
//!
//! Renders either the raw height gradient or the band classification as text,
//! one character per cell, top row first.

use std::fs::File;
use std::io::{self, Write};

use crate::bands::HeightBands;
use crate::export::band_color;
use crate::tilemap::Tilemap;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AsciiMode {
    /// Show elevation gradient
    Height,
    /// Show band glyphs
    Bands,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Height => "Height",
            AsciiMode::Bands => "Bands",
        }
    }
}

/// Glyphs for band ids, highest band first.
pub const BAND_GLYPHS: &[char] = &['^', 'M', '#', '"', '.', '~', '='];

/// Character for an unclassified cell.
const UNCLASSIFIED_CHAR: char = ' ';

/// Get ASCII character for a normalized height
pub fn height_char(height: f32) -> char {
    // Low to high
    const CHARS: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
    let idx = (height.clamp(0.0, 1.0) * (CHARS.len() - 1) as f32).round() as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Get ASCII character for a band id. Ids past the glyph table cycle.
pub fn band_char(id: Option<usize>) -> char {
    match id {
        Some(id) => BAND_GLYPHS[id % BAND_GLYPHS.len()],
        None => UNCLASSIFIED_CHAR,
    }
}

pub fn render_ascii_map(heightmap: &Tilemap<f32>, bands: &HeightBands, mode: AsciiMode) -> String {
    let width = heightmap.width;
    let height = heightmap.height;
    let mut result = String::with_capacity((width + 1) * height);

    // Tilemap y grows upwards, so print the last row first
    for y in (0..height).rev() {
        for x in 0..width {
            let h = *heightmap.get(x, y);
            let ch = match mode {
                AsciiMode::Height => height_char(h),
                AsciiMode::Bands => band_char(bands.classify(h)),
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

/// Legend listing each band's glyph and height range.
pub fn band_legend(bands: &HeightBands) -> String {
    let mut legend = String::from("Bands:\n");
    for band in bands.bands() {
        legend.push_str(&format!(
            "  {} band {} [{:.3}, {:.3}]\n",
            band_char(Some(band.id)),
            band.id,
            band.min,
            band.max
        ));
    }
    legend
}

/// Print ASCII map to stdout
pub fn print_ascii_map(heightmap: &Tilemap<f32>, bands: &HeightBands, mode: AsciiMode) {
    print!("{}", render_ascii_map(heightmap, bands, mode));
}

/// Band map with ANSI true colour backgrounds from `palette`.
pub fn render_colored_band_map(
    heightmap: &Tilemap<f32>,
    bands: &HeightBands,
    palette: &[[u8; 3]],
) -> String {
    let mut result = String::new();

    for y in (0..heightmap.height).rev() {
        for x in 0..heightmap.width {
            match bands.classify(*heightmap.get(x, y)) {
                Some(id) => {
                    let [r, g, b] = band_color(id, palette);
                    result.push_str(&ansi_colored_char(band_char(Some(id)), (r, g, b)));
                }
                None => result.push(UNCLASSIFIED_CHAR),
            }
        }
        result.push('\n');
    }

    result
}

/// Format a single character on an ANSI true colour (24-bit) background
pub fn ansi_colored_char(ch: char, bg: (u8, u8, u8)) -> String {
    // Contrast text against the background
    let brightness = (bg.0 as u32 * 299 + bg.1 as u32 * 587 + bg.2 as u32 * 114) / 1000;
    let fg = if brightness > 128 { (0, 0, 0) } else { (255, 255, 255) };
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.0, fg.1, fg.2,
        bg.0, bg.1, bg.2,
        ch
    )
}

/// Write an ASCII map plus legend to a text file.
pub fn export_ascii(
    heightmap: &Tilemap<f32>,
    bands: &HeightBands,
    mode: AsciiMode,
    path: &str,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{} map {}x{}", mode.name(), heightmap.width, heightmap.height)?;
    writeln!(file)?;
    file.write_all(render_ascii_map(heightmap, bands, mode).as_bytes())?;
    if mode == AsciiMode::Bands {
        writeln!(file)?;
        file.write_all(band_legend(bands).as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_char_extremes() {
        assert_eq!(height_char(0.0), ' ');
        assert_eq!(height_char(1.0), '@');
        assert_eq!(height_char(-3.0), ' ');
        assert_eq!(height_char(7.0), '@');
    }

    #[test]
    fn test_render_bands_top_row_first() {
        let grid = Tilemap::from_fn(3, 2, |_, y| y as f32);
        let bands = HeightBands::evenly_distributed(2).unwrap();
        let text = render_ascii_map(&grid, &bands, AsciiMode::Bands);
        assert_eq!(text, "^^^\nMMM\n");
    }

    #[test]
    fn test_unclassified_renders_blank() {
        let grid = Tilemap::new_with(2, 1, 0.5f32);
        let bands = HeightBands::from_bounds(&[(1.0, 0.9)]).unwrap();
        assert_eq!(render_ascii_map(&grid, &bands, AsciiMode::Bands), "  \n");
    }

    #[test]
    fn test_legend_lists_every_band() {
        let bands = HeightBands::evenly_distributed(3).unwrap();
        let legend = band_legend(&bands);
        assert_eq!(legend.lines().count(), 4);
        assert!(legend.contains("band 2 [0.000,"));
    }
}
