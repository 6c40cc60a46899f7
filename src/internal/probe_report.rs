#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::{error::Error, path::Path, path::PathBuf};

use clap::Parser;
use keyset::{DEFAULT_C1, DEFAULT_C2, Key, ProbeStrategy, ProbingHashSet, TableError};
use log::{debug, info};
use plotters::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

// Chart styling
const FONT_FAMILY: &str = "sans-serif";
const TITLE_SIZE: i32 = 35;
const TEXT_SIZE: i32 = 16;
const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: i32 = 4;
const COLORS: [RGBColor; 3] = [
    RGBColor(220, 50, 50), // red
    RGBColor(50, 90, 220), // blue
    RGBColor(50, 180, 50), // green
];

// Load factors span this range
const MIN_LOAD: f64 = 0.1;
const MAX_LOAD: f64 = 0.95;

/// Compare probe counts of linear, quadratic and double-hashing inserts
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Slot count of every table
    #[arg(long, default_value_t = 10_007)]
    capacity: usize,

    /// Number of load factors measured between 10% and 95%
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Linear coefficient of quadratic probing
    #[arg(long, default_value_t = DEFAULT_C1, allow_hyphen_values = true)]
    c1: i64,

    /// Quadratic coefficient of quadratic probing
    #[arg(long, default_value_t = DEFAULT_C2, allow_hyphen_values = true)]
    c2: i64,

    /// Seed for the key generator, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Directory receiving the PNG charts
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

/// Outcome of filling one table
#[derive(Debug, Clone, Copy, Default)]
struct Sample {
    average_probes: f64,
    worst_probes: usize,
    failures: usize,
}

fn label(strategy: ProbeStrategy) -> String {
    match strategy {
        ProbeStrategy::Linear => "Linear Probing".to_string(),
        ProbeStrategy::Quadratic { c1, c2 } => format!("Quadratic Probing (c1 = {c1}, c2 = {c2})"),
        ProbeStrategy::DoubleHashing => "Double Hashing".to_string(),
    }
}

// Inserts every key, counting probes of the ones that found a slot
fn fill(capacity: usize, strategy: ProbeStrategy, keys: &[Key]) -> Result<Sample, TableError> {
    let mut table = ProbingHashSet::new(capacity)?;
    let mut total_probes = 0;
    let mut placed = 0;
    let mut sample = Sample::default();

    for &key in keys {
        match table.insert_with(key, strategy) {
            Ok(placement) => {
                total_probes += placement.probes;
                placed += 1;
                sample.worst_probes = sample.worst_probes.max(placement.probes);
            }
            Err(
                err @ (TableError::CapacityExhausted { .. } |
                TableError::DegenerateProbeSequence { .. }),
            ) => {
                debug!("{err}");
                sample.failures += 1;
            }
            Err(err) => return Err(err),
        }
    }

    if placed > 0 {
        sample.average_probes = total_probes as f64 / placed as f64;
    }
    Ok(sample)
}

fn draw_chart(
    path: &Path,
    caption: &str,
    y_desc: &str,
    load_factors: &[f64],
    series: &[(ProbeStrategy, Vec<f64>)],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series
        .iter()
        .flat_map(|(_, values)| values.iter())
        .fold(0.0, |max: f64, &x| max.max(x)) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT_FAMILY, TITLE_SIZE))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0.0..1.0, 0.0..max_y.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc(y_desc)
        .axis_desc_style((FONT_FAMILY, TEXT_SIZE))
        .draw()?;

    for (index, (strategy, values)) in series.iter().enumerate() {
        let color = COLORS.get(index).copied().unwrap_or(BLACK);
        let line_style = ShapeStyle::from(&color).stroke_width(LINE_WIDTH);

        chart
            .draw_series(LineSeries::new(
                load_factors.iter().copied().zip(values.iter().copied()),
                line_style,
            ))?
            .label(label(*strategy))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            load_factors
                .iter()
                .zip(values)
                .map(|(&x, &y)| Circle::new((x, y), MARKER_SIZE, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let steps = args.steps.max(2);
    let load_factors: Vec<f64> = (0..steps)
        .map(|i| MIN_LOAD + (MAX_LOAD - MIN_LOAD) * (i as f64) / ((steps - 1) as f64))
        .collect();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let keys: Vec<Key> = (0..args.capacity).map(|_| rng.random_range(0..1_000_000_000)).collect();
    info!("generated {} keys for tables of {} slots", keys.len(), args.capacity);

    let strategies = [
        ProbeStrategy::Linear,
        ProbeStrategy::Quadratic { c1: args.c1, c2: args.c2 },
        ProbeStrategy::DoubleHashing,
    ];
    let mut average: Vec<(ProbeStrategy, Vec<f64>)> =
        strategies.iter().map(|&strategy| (strategy, Vec::new())).collect();
    let mut worst = average.clone();

    for &load in &load_factors {
        let n_keys = ((args.capacity as f64) * load) as usize;
        let batch = keys.get(..n_keys).unwrap_or(&keys);
        println!("Load factor {load:.2} ({n_keys} keys)");

        for ((strategy, averages), (_, worsts)) in average.iter_mut().zip(worst.iter_mut()) {
            let sample = fill(args.capacity, *strategy, batch)?;
            println!(
                "  {}: avg probes = {:.2}, worst = {}, failed inserts = {}",
                label(*strategy),
                sample.average_probes,
                sample.worst_probes,
                sample.failures
            );
            averages.push(sample.average_probes);
            worsts.push(sample.worst_probes as f64);
        }
    }

    let average_path = args.output_dir.join("average_probes.png");
    draw_chart(
        &average_path,
        "Average Probes per Insert",
        "Average probes",
        &load_factors,
        &average,
    )?;

    let worst_path = args.output_dir.join("worst_case_probes.png");
    draw_chart(
        &worst_path,
        "Worst-Case Probes per Insert",
        "Worst-case probes",
        &load_factors,
        &worst,
    )?;

    println!("Generated plot images: {}, {}", average_path.display(), worst_path.display());

    Ok(())
}
