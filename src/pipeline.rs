// src/pipeline.rs - One photo in, estimates, average and size recommendation out

use std::path::PathBuf;

use image::RgbaImage;
use log::{debug, info, warn};
use serde::Serialize;

use crate::aggregation::{aggregate, AveragedMeasurement};
use crate::algorithms::{run_all, Algorithm, MeasurementEstimate};
use crate::config::{Config, DEBUG_DIR};
use crate::errors::Result;
use crate::image_io::{save_image, InputImage};
use crate::image_utils::{create_debug_overlay, BoundingBox};
use crate::output::{write_estimates_csv, write_json_report};
use crate::size_chart::{recommend, Region, ShoeSizeRecommendation};

/// Everything measured for one photo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementReport {
    pub estimates: Vec<MeasurementEstimate>,
    /// Absent when every estimator failed
    pub average: Option<AveragedMeasurement>,
    /// Present exactly when `average` is
    pub recommendation: Option<ShoeSizeRecommendation>,
}

impl MeasurementReport {
    pub fn successful_estimates(&self) -> usize {
        self.estimates.iter().filter(|e| e.is_success()).count()
    }

    /// Reference sheet box from any successful estimate
    pub fn reference_bbox(&self) -> Option<BoundingBox> {
        self.estimates
            .iter()
            .find_map(|e| e.measurement())
            .map(|m| m.reference_bbox)
    }

    /// Foot box from the bounding-box estimator, if it succeeded
    pub fn foot_bbox(&self) -> Option<BoundingBox> {
        self.estimates
            .iter()
            .find(|e| e.algorithm == Algorithm::ContourBased)
            .and_then(|e| e.measurement())
            .map(|m| m.foot_bbox)
    }
}

/// Measure one raster. Pure: no I/O, no state kept between calls.
pub fn measure_image(image: &RgbaImage, region: Region, parallel: bool) -> MeasurementReport {
    let estimates = run_all(image, parallel);
    let average = aggregate(&estimates);
    // Match on the shown (2 decimal) average
    let recommendation = average.map(|avg| recommend(avg.avg_length_inches, region));

    MeasurementReport {
        estimates,
        average,
        recommendation,
    }
}

/// Measure a loaded photo and write its outputs
pub fn process_image(
    input_image: InputImage,
    config: &Config,
    debug: bool,
) -> Result<MeasurementReport> {
    let InputImage { image, path, filename } = input_image;
    let (width, height) = image.dimensions();
    debug!("Measuring {} ({}x{})", path.display(), width, height);

    let report = measure_image(&image, config.region, config.parallel_algorithms);

    for estimate in &report.estimates {
        match &estimate.outcome {
            Ok(m) => debug!(
                "{} | {}: {:.2} x {:.2} in ({:.4} mm/px)",
                filename, estimate.name, m.length_inches, m.width_inches, m.pixel_to_mm
            ),
            Err(_) => warn!(
                "{} | {}: {}",
                filename,
                estimate.name,
                estimate.failure_message().unwrap_or_default()
            ),
        }
    }

    match (&report.average, &report.recommendation) {
        (Some(avg), Some(rec)) => info!(
            "{}: {:.2} x {:.2} in from {} estimates -> {} men {} / women {}",
            filename,
            avg.avg_length_inches,
            avg.avg_width_inches,
            avg.sample_count,
            rec.region,
            rec.men,
            rec.women
        ),
        _ => warn!("{}: no estimator succeeded, nothing to average", filename),
    }

    write_estimates_csv(&report, &config.output_base_dir, &filename)?;

    if config.write_json_report {
        write_json_report(&report, &config.output_base_dir, &filename)?;
    }

    if debug {
        let debug_dir = PathBuf::from(&config.output_base_dir).join(DEBUG_DIR);
        std::fs::create_dir_all(&debug_dir)?;

        // Reuse the boxes the estimators already found
        let reference = report.reference_bbox();
        let foot = report.foot_bbox();
        let overlay = create_debug_overlay(&image, reference.as_ref(), foot.as_ref());
        save_image(&overlay, debug_dir.join(format!("{}_overlay.png", filename)))?;
    }

    Ok(report)
}
