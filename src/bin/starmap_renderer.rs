//! Command-line star field renderer.
//!
//! Renders a window of the sky to a PNG, either from Tycho-2 catalog files
//! or from a built-in synthetic demo field when no catalog is given.

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::path::PathBuf;

use starmap::catalog::load_tycho2_file;
use starmap::imageio::save_image;
use starmap::render::RenderConfig;
use starmap::{ObserverWindow, StarMapRenderer, StarRecord};

#[derive(Parser, Debug)]
#[command(about = "Render a star field image for an observer window")]
struct Args {
    /// Right ascension of the window center, degrees
    #[arg(long, default_value_t = 0.0)]
    ra: f64,

    /// Declination of the window center, degrees
    #[arg(long, default_value_t = 0.0)]
    dec: f64,

    /// Field of view width in RA, degrees
    #[arg(long, default_value_t = 10.0)]
    fov_ra: f64,

    /// Field of view height in declination, degrees
    #[arg(long, default_value_t = 10.0)]
    fov_dec: f64,

    /// Output image width in pixels
    #[arg(long, default_value_t = 1024)]
    width: usize,

    /// Output image height in pixels
    #[arg(long, default_value_t = 1024)]
    height: usize,

    /// Faint-end magnitude cutoff; fainter sources are not rendered
    #[arg(long, default_value_t = 12.0)]
    mag_threshold: f64,

    /// Tycho-2 catalog file(s); omit to render a synthetic demo field
    #[arg(long)]
    catalog: Vec<PathBuf>,

    /// Epoch to propagate catalog positions to, Julian years
    #[arg(long, default_value_t = 2000.0)]
    epoch: f64,

    /// RNG seed for reproducible jitter and noise
    #[arg(long)]
    seed: Option<u64>,

    /// Output image path
    #[arg(long, default_value = "starmap.png")]
    output: PathBuf,
}

/// Synthetic field for running without catalog data: a bright star at the
/// window center surrounded by fainter random companions.
fn demo_field(window: &ObserverWindow, threshold: f64, seed: u64) -> Vec<StarRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sources = vec![StarRecord::new(
        window.center_ra_deg.rem_euclid(360.0),
        window.center_dec_deg,
        3.0,
    )];

    // Companions occupy the 4.0..threshold magnitude band; a tighter
    // cutoff leaves just the central star.
    if threshold > 4.0 {
        for _ in 0..400 {
            let ra = window.center_ra_deg
                + rng.gen_range(-window.fov_ra_deg / 2.0..window.fov_ra_deg / 2.0);
            let dec = window.center_dec_deg
                + rng.gen_range(-window.fov_dec_deg / 2.0..window.fov_dec_deg / 2.0);
            sources.push(StarRecord::new(
                ra.rem_euclid(360.0),
                dec,
                rng.gen_range(4.0..threshold),
            ));
        }
    }

    sources
}


fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let window = ObserverWindow::new(args.ra, args.dec, args.fov_ra, args.fov_dec);
    window.validate()?;

    let sources = if args.catalog.is_empty() {
        let field = demo_field(&window, args.mag_threshold, args.seed.unwrap_or(42));
        println!("No catalog given; rendering a {}-star demo field", field.len());
        field
    } else {
        let mut records = Vec::new();
        for path in &args.catalog {
            let mut loaded = load_tycho2_file(path, args.epoch)?;
            println!("Loaded {} records from {}", loaded.len(), path.display());
            records.append(&mut loaded);
        }
        // Narrow to the window up front so the render loop only walks
        // plausible candidates.
        let visible = window.par_filter_in_view(&records);
        println!("{} of {} records fall in the window", visible.len(), records.len());
        visible.into_iter().copied().collect()
    };

    let renderer = StarMapRenderer::with_config(RenderConfig::default());
    let image = renderer.render_with_seed(
        &sources,
        &window,
        args.width,
        args.height,
        args.mag_threshold,
        args.seed,
    )?;

    save_image(&image, &args.output)?;
    println!(
        "Rendered {}x{} star field to {}",
        args.width,
        args.height,
        args.output.display()
    );

    Ok(())
}
