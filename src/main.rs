use anyhow::{Context, Result};
use clap::Parser;
use prevalent::{Palette, DEFAULT_COLOR_COUNT, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Extract the most prevalent colors of an image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image to extract the palette from
    image: PathBuf,

    /// Number of colors in the palette
    #[arg(short = 'k', long, default_value_t = DEFAULT_COLOR_COUNT as u8, value_parser = clap::value_parser!(u8).range(3..=10))]
    colors: u8,

    /// Seed for the initial cluster centers
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Maximum number of k-means iterations
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Print every color on its own line together with its pixel count
    #[arg(short, long)]
    population: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "prevalent=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).without_time())
        .init();

    let args = Args::parse();

    let palette = Palette::open(&args.image)
        .with_context(|| format!("failed to read {}", args.image.display()))?
        .color_count(usize::from(args.colors))
        .seed(args.seed)
        .max_iterations(args.max_iterations)
        .generate()
        .context("failed to extract colors")?;

    if args.population {
        for swatch in palette.swatches() {
            println!("{} {}", swatch.hex(), swatch.population());
        }
    } else {
        println!("{}", palette.hex_codes().join(" | "));
    }

    Ok(())
}
