use std::process::ExitCode;

use clap::Parser;
use rand::Rng;

use tilemap_worldmaker::ascii::{self, AsciiMode};
use tilemap_worldmaker::config::WorldConfig;
use tilemap_worldmaker::export::{self, DEFAULT_PALETTE};
use tilemap_worldmaker::{
    FalloffParameters, HeightBands, MapSettings, NoiseParameters, Normalization, WorldMap,
};

#[derive(Parser, Debug)]
#[command(name = "tilemap_worldmaker")]
#[command(about = "Generate noise-based tile map heightmaps with optional island falloff")]
struct Args {
    /// Width of the map in tiles
    #[arg(short = 'W', long, default_value = "100")]
    width: usize,

    /// Height of the map in tiles
    #[arg(short = 'H', long, default_value = "100")]
    height: usize,

    /// Noise seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<i32>,

    /// Base noise frequency (scale)
    #[arg(long, default_value = "7")]
    frequency: f32,

    /// Amplitude of the first octave
    #[arg(long, default_value = "4")]
    amplitude: f32,

    /// Frequency multiplier per octave
    #[arg(long, default_value = "1")]
    lacunarity: f32,

    /// Amplitude multiplier per octave
    #[arg(long, default_value = "0.5")]
    persistence: f32,

    /// Number of noise octaves (1-8)
    #[arg(long, default_value = "8")]
    octaves: u32,

    /// Map lowest noise to 0 instead of the default inverted mapping
    #[arg(long)]
    direct_normalization: bool,

    /// Apply island falloff
    #[arg(long)]
    falloff: bool,

    /// Falloff steepness exponent (1-8)
    #[arg(long, default_value = "3")]
    falloff_a: f32,

    /// Falloff midpoint exponent (1-8)
    #[arg(long, default_value = "2.2")]
    falloff_b: f32,

    /// Number of evenly distributed height bands (ignored if the config has bands)
    #[arg(long, default_value = "5")]
    bands: usize,

    /// Load settings from a JSON file instead of the flags above
    #[arg(long)]
    config: Option<String>,

    /// Save the effective settings to a JSON file
    #[arg(long)]
    save_config: Option<String>,

    /// Export grayscale heightmap PNG
    #[arg(short, long)]
    output: Option<String>,

    /// Export banded colour preview PNG
    #[arg(long)]
    preview: Option<String>,

    /// Print the band map as ASCII
    #[arg(long)]
    ascii: bool,

    /// Use ANSI true colour for the ASCII map
    #[arg(long)]
    color: bool,

    /// Write the ASCII band map and legend to a text file
    #[arg(long)]
    export_ascii: Option<String>,
}

impl Args {
    fn settings(&self) -> MapSettings {
        let normalization = if self.direct_normalization {
            Normalization::Direct
        } else {
            Normalization::Inverted
        };

        MapSettings {
            width: self.width,
            height: self.height,
            noise: NoiseParameters {
                seed: self.seed.unwrap_or_else(|| rand::thread_rng().gen_range(0..i32::MAX)),
                frequency: self.frequency,
                amplitude: self.amplitude,
                lacunarity: self.lacunarity,
                persistence: self.persistence,
                octaves: self.octaves,
                normalization,
            },
            falloff: self.falloff.then_some(FalloffParameters {
                a: self.falloff_a,
                b: self.falloff_b,
            }),
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            println!("Loading settings from {}", path);
            WorldConfig::load(path)?
        }
        None => WorldConfig {
            settings: args.settings(),
            bands: None,
        },
    };

    let settings = config.settings.clamped();
    if settings != config.settings {
        println!("Some settings were outside the allowed ranges and have been clamped");
    }

    let bands = match &config.bands {
        Some(bands) => bands.clone(),
        None => HeightBands::evenly_distributed(args.bands)?,
    };

    println!("Generating map with seed: {}", settings.noise.seed);
    println!("Map size: {}x{}", settings.width, settings.height);
    println!(
        "Noise: frequency {}, amplitude {}, lacunarity {}, persistence {}, {} octaves",
        settings.noise.frequency,
        settings.noise.amplitude,
        settings.noise.lacunarity,
        settings.noise.persistence,
        settings.noise.octaves
    );
    match &settings.falloff {
        Some(f) => println!("Falloff: a = {}, b = {}", f.a, f.b),
        None => println!("Falloff: disabled"),
    }

    let world = WorldMap::generate(&settings, &bands)?;

    if let Some((min_h, max_h)) = world.heightmap.value_range() {
        println!(
            "Height range: {:.3} to {:.3} (mean {:.3})",
            min_h,
            max_h,
            world.heightmap.mean()
        );
    }

    let total = (world.width() * world.height()) as f64;
    let counts = bands.histogram(&world.tiles);
    for band in bands.bands() {
        println!(
            "  Band {} [{:.3}, {:.3}]: {:.1}%",
            band.id,
            band.min,
            band.max,
            100.0 * counts[band.id] as f64 / total
        );
    }
    if world.unclassified_count() > 0 {
        println!("  Unclassified: {} cells", world.unclassified_count());
    }

    if let Some(path) = &args.save_config {
        let saved = WorldConfig {
            settings,
            bands: Some(bands.clone()),
        };
        saved.save(path)?;
        println!("Saved settings to {}", path);
    }

    if let Some(path) = &args.output {
        export::export_heightmap(&world.heightmap, path)?;
        println!("Exported heightmap to {}", path);
    }

    if let Some(path) = &args.preview {
        export::export_band_preview(&world.heightmap, &bands, &DEFAULT_PALETTE, path)?;
        println!("Exported band preview to {}", path);
    }

    if let Some(path) = &args.export_ascii {
        ascii::export_ascii(&world.heightmap, &bands, AsciiMode::Bands, path)?;
        println!("Exported ASCII map to {}", path);
    }

    if args.ascii {
        println!();
        if args.color {
            print!("{}", ascii::render_colored_band_map(&world.heightmap, &bands, &DEFAULT_PALETTE));
        } else {
            ascii::print_ascii_map(&world.heightmap, &bands, AsciiMode::Bands);
        }
        print!("{}", ascii::band_legend(&bands));
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
