use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use log::{error, info};
use rayon::prelude::*;

use foot_measure_lib::image_io::{get_image_files_in_dir, load_image};
use foot_measure_lib::output::write_summary_csv;
use foot_measure_lib::{process_image, Config, MeasurementReport, Region};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "Foot length and width from a photo with an A4 reference sheet")]
struct Args {
    /// Path to input file or directory
    #[clap(short, long)]
    input: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file (defaults are used when omitted)
    #[clap(short, long)]
    config: Option<String>,

    /// Sizing region for the recommendation (overwrites config)
    #[clap(short, long, value_enum)]
    region: Option<Region>,

    /// Save overlay images of the detected sheet and foot
    #[clap(short, long)]
    debug: bool,
}

fn measure_path(path: &Path, config: &Config, debug: bool) -> anyhow::Result<(String, MeasurementReport)> {
    let input_image = load_image(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let filename = input_image.filename.clone();
    let report = process_image(input_image, config, debug)
        .with_context(|| format!("Failed to process {}", path.display()))?;
    Ok((filename, report))
}

fn print_report(filename: &str, report: &MeasurementReport) {
    println!("== {}", filename);
    for estimate in &report.estimates {
        match &estimate.outcome {
            Ok(m) => println!(
                "  {}: length {:.2} in, width {:.2} in ({})",
                estimate.name, m.length_inches, m.width_inches, m.method
            ),
            Err(_) => println!(
                "  {}: {}",
                estimate.name,
                estimate.failure_message().unwrap_or_default()
            ),
        }
    }
    if let (Some(avg), Some(rec)) = (&report.average, &report.recommendation) {
        println!(
            "  Average: length {:.2} in, width {:.2} in | {} men {} / women {}",
            avg.avg_length_inches, avg.avg_width_inches, rec.region, rec.men, rec.women
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(input) = args.input.clone() {
        config.input_path = input;
    }

    if let Some(output) = args.output.clone() {
        config.output_base_dir = output;
    }

    if let Some(region) = args.region {
        config.region = region;
    }

    config.validate()?;

    let start_time = Instant::now();
    let input_path = PathBuf::from(&config.input_path);

    let reports: Vec<(String, MeasurementReport)> = if input_path.is_file() {
        info!("Processing single file: {}", input_path.display());
        vec![measure_path(&input_path, &config, args.debug)?]
    } else if input_path.is_dir() {
        info!("Processing directory: {}", input_path.display());
        let image_files = get_image_files_in_dir(&input_path)?;
        info!("Found {} image files", image_files.len());

        let results: Vec<anyhow::Result<(String, MeasurementReport)>> = if config.use_parallel {
            image_files
                .par_iter()
                .map(|path| measure_path(path, &config, args.debug))
                .collect()
        } else {
            image_files
                .iter()
                .map(|path| measure_path(path, &config, args.debug))
                .collect()
        };

        // One unreadable photo should not sink the batch
        results
            .into_iter()
            .filter_map(|result| result.map_err(|e| error!("{:#}", e)).ok())
            .collect()
    } else {
        bail!("Invalid input path: {}", input_path.display());
    };

    for (filename, report) in &reports {
        print_report(filename, report);
    }

    write_summary_csv(&reports, &config.output_base_dir)?;

    info!(
        "Processed {} images in {:.2} seconds",
        reports.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
