//! Renders itinerary files into KML tours.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tour_planner::google::{GoogleConfig, GoogleGeocoder};
use tour_planner::itinerary::Itinerary;
use tour_planner::photos::{NoPhotoSearch, PhotoMode, PhotoProvider};
use tour_planner::picasa::{PicasaConfig, PicasaFeed};
use tour_planner::sequencer::{TourOutcome, TourSequencer};

#[derive(Parser)]
#[command(author, version, about = "Build KML flight tours from itineraries")]
struct Cli {
    /// Itinerary JSON files to render.
    #[arg(required = true)]
    itineraries: Vec<PathBuf>,

    /// Directory for the generated `.kml` files (defaults to each input's directory).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Skip photo search.
    #[arg(long)]
    no_photos: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Some(dir) = &cli.out_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    // Each tour is sequential; only separate itineraries run side by side.
    let failures: Vec<String> = cli
        .itineraries
        .par_iter()
        .filter_map(|path| match render(path, &cli) {
            Ok(out) => {
                println!("{} -> {}", path.display(), out);
                None
            }
            Err(err) => {
                error!("{}: {:#}", path.display(), err);
                Some(path.display().to_string())
            }
        })
        .collect();

    if !failures.is_empty() {
        bail!("failed to render: {}", failures.join(", "));
    }
    Ok(())
}

fn render(path: &Path, cli: &Cli) -> Result<String> {
    let itinerary = Itinerary::load(path).with_context(|| format!("loading {}", path.display()))?;
    let mut places = itinerary.places.clone();

    let geocoder = GoogleGeocoder::new(GoogleConfig::from_env()).context("building geocoder")?;
    let mode = PhotoMode::for_owner(itinerary.username.as_deref());

    let outcome: TourOutcome = if cli.no_photos {
        TourSequencer::new(geocoder, PhotoProvider::new(NoPhotoSearch, mode))
            .named(&itinerary.title)
            .run(&mut places)
    } else {
        let feed = PicasaFeed::new(PicasaConfig::from_env()).context("building photo client")?;
        TourSequencer::new(geocoder, PhotoProvider::new(feed, mode))
            .named(&itinerary.title)
            .run(&mut places)
    };

    let out_path = output_path(path, cli.out_dir.as_deref());
    fs::write(&out_path, &outcome.document)
        .with_context(|| format!("writing {}", out_path.display()))?;
    info!(
        itinerary = %path.display(),
        resolved = outcome.resolved.len(),
        skipped = outcome.skipped.len(),
        "wrote {}",
        out_path.display()
    );

    Ok(format!(
        "{} ({} km)",
        out_path.display(),
        outcome.total_distance_km.round()
    ))
}

fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let file = Path::new(stem).with_extension("kml");
    match out_dir {
        Some(dir) => dir.join(file),
        None => input.with_file_name(file),
    }
}
