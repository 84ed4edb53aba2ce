//! City Dataset Simulation
//!
//! Generates a synthetic dataset for Urban Pulse testing:
//! - Hourly readings for every catalog layer with a slow drift and Gaussian noise
//! - Optional injected spikes the anomaly detector should flag
//! - Issue reports scattered around a city centre, with one dense cluster
//!   that shows up as a hotspot
//!
//! # Usage
//! ```bash
//! ./simulation --days 14 --seed 42 --issues 120 > dataset.json
//! ./urban-pulse import dataset.json
//! ```

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use std::io::{self, Write};

use urban_pulse::analysis::intake;
use urban_pulse::types::{
    find_layer, issue_status, Dataset, LayerKind, LayerMeasurement, Measurement, NewIssue,
    LAYER_CATALOG,
};

// ============================================================================
// City Constants
// ============================================================================

/// Default city centre (Valencia)
const CENTER_LAT: f64 = 39.4699;
const CENTER_LNG: f64 = -0.3763;
/// Scatter radius for ordinary issues (degrees)
const SCATTER_DEG: f64 = 0.05;
/// Share of issues placed in the hotspot cluster
const CLUSTER_SHARE: f64 = 0.3;
/// Spike height in standard deviations
const SPIKE_SIGMA: f64 = 8.0;

const CATEGORIES: [&str; 7] = [
    "traffic",
    "pollution",
    "infrastructure",
    "noise",
    "waste",
    "lighting",
    "safety",
];

const DESCRIPTIONS: [&str; 8] = [
    "Pothole on the main road",
    "Streetlight out since last week",
    "Overflowing bins near the market",
    "Urgent: dangerous exposed cables",
    "Noticeable smell from the drain",
    "Major congestion every morning",
    "Recurring noise problem at night",
    "Graffiti on the park wall",
];

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "urban-pulse-simulation")]
#[command(about = "Synthetic city dataset generator for Urban Pulse testing")]
#[command(version = "1.0")]
struct Args {
    /// Days of history to generate (1-90)
    #[arg(short, long, default_value = "7", value_parser = clap::value_parser!(u32).range(1..=90))]
    days: u32,

    /// Readings per layer per day
    #[arg(long, default_value = "24", value_parser = clap::value_parser!(u32).range(1..=1440))]
    readings_per_day: u32,

    /// Number of issue reports
    #[arg(short, long, default_value = "60")]
    issues: usize,

    /// Spikes injected per layer
    #[arg(long, default_value = "1")]
    spikes: usize,

    /// Only generate these layers (comma-separated ids, default: all)
    #[arg(long, value_delimiter = ',')]
    layers: Vec<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Suppress the progress log on stderr
    #[arg(short, long)]
    quiet: bool,
}

// ============================================================================
// Layer Profiles
// ============================================================================

/// Baseline, spread and daily drift for a layer kind.
fn profile(kind: LayerKind) -> (f64, f64, f64) {
    match kind {
        LayerKind::Temperature => (18.0, 1.5, 0.2),
        LayerKind::Traffic => (850.0, 60.0, 5.0),
        LayerKind::Precipitation => (2.0, 0.5, 0.0),
        LayerKind::AirQuality => (55.0, 4.0, 1.5),
        LayerKind::WaterQuality => (70.0, 2.0, -0.3),
        LayerKind::GreenSpaces => (32.0, 0.3, 0.0),
    }
}

fn log(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("[simulation] {message}");
    }
}

fn generate_layer(
    rng: &mut StdRng,
    layer_id: &str,
    kind: LayerKind,
    start: DateTime<Utc>,
    args: &Args,
) -> Result<Vec<LayerMeasurement>> {
    let (base, spread, drift_per_day) = profile(kind);
    let noise = Normal::new(0.0, spread)?;
    let jitter = Normal::new(0.0, 0.01)?;
    let total = (args.days * args.readings_per_day) as usize;
    let step_minutes = 24 * 60 / i64::from(args.readings_per_day);

    let spike_at: Vec<usize> = (0..args.spikes.min(total))
        .map(|_| rng.gen_range(0..total))
        .collect();

    let readings = (0..total)
        .map(|i| {
            let day = i as f64 / f64::from(args.readings_per_day);
            let mut value = base + drift_per_day * day + noise.sample(rng);
            if spike_at.contains(&i) {
                value += SPIKE_SIGMA * spread;
            }
            LayerMeasurement {
                layer_id: layer_id.to_string(),
                measurement: Measurement::new(
                    CENTER_LAT + jitter.sample(rng),
                    CENTER_LNG + jitter.sample(rng),
                    value.max(0.0),
                    start + Duration::minutes(step_minutes * i as i64),
                ),
            }
        })
        .collect();
    Ok(readings)
}

fn generate_issues(rng: &mut StdRng, start: DateTime<Utc>, args: &Args) -> Vec<urban_pulse::Issue> {
    let window_minutes = i64::from(args.days) * 24 * 60;
    // Centre of a 0.01° cell a little north-east of the city centre
    let cluster_lat = (CENTER_LAT / 0.01).floor() * 0.01 + 0.015;
    let cluster_lng = (CENTER_LNG / 0.01).floor() * 0.01 + 0.015;

    (0..args.issues)
        .map(|_| {
            let clustered = rng.gen_bool(CLUSTER_SHARE);
            let (latitude, longitude) = if clustered {
                (
                    cluster_lat + rng.gen_range(-0.004..0.004),
                    cluster_lng + rng.gen_range(-0.004..0.004),
                )
            } else {
                (
                    CENTER_LAT + rng.gen_range(-SCATTER_DEG..SCATTER_DEG),
                    CENTER_LNG + rng.gen_range(-SCATTER_DEG..SCATTER_DEG),
                )
            };
            let category = if clustered { "traffic" } else { CATEGORIES[rng.gen_range(0..CATEGORIES.len())] };
            let description = DESCRIPTIONS[rng.gen_range(0..DESCRIPTIONS.len())];
            let created_at = start + Duration::minutes(rng.gen_range(0..window_minutes));

            let mut issue = intake(
                NewIssue {
                    title: description.to_string(),
                    description: description.to_string(),
                    category: category.to_string(),
                    latitude,
                    longitude,
                    priority: None,
                },
                created_at,
            );
            issue.status = match rng.gen_range(0..10) {
                0..=5 => issue_status::REPORTED,
                6..=7 => issue_status::IN_PROGRESS,
                _ => issue_status::RESOLVED,
            }
            .to_string();
            issue
        })
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let layers: Vec<_> = if args.layers.is_empty() {
        LAYER_CATALOG.iter().collect()
    } else {
        let mut selected = Vec::with_capacity(args.layers.len());
        for id in &args.layers {
            match find_layer(id) {
                Some(layer) => selected.push(layer),
                None => bail!("unknown layer '{id}'"),
            }
        }
        selected
    };

    let start = Utc::now() - Duration::days(i64::from(args.days));
    log(&format!("Generating {} day(s) from {}", args.days, start.to_rfc3339()), args.quiet);
    if let Some(seed) = args.seed {
        log(&format!("Random seed: {seed}"), args.quiet);
    }

    let mut dataset = Dataset::default();
    for layer in layers {
        let readings = generate_layer(&mut rng, layer.id, layer.kind, start, &args)?;
        log(&format!("{}: {} readings", layer.id, readings.len()), args.quiet);
        dataset.measurements.extend(readings);
    }
    dataset.issues = generate_issues(&mut rng, start, &args);
    log(&format!("{} issue reports", dataset.issues.len()), args.quiet);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, &dataset)?;
    writeln!(out)?;
    Ok(())
}
