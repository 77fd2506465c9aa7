// src/algorithms.rs - The three foot size estimators and their shared plumbing

use std::panic::{self, AssertUnwindSafe};

use image::RgbaImage;
use rayon::prelude::*;
use serde::Serialize;

use crate::errors::MeasurementError;
use crate::foreground::{detect_foreground_bounds, DEFAULT_FOOT_THRESHOLD, SENSITIVE_FOOT_THRESHOLD};
use crate::image_utils::{brightness_sum, row_extent, scan_bounds, BoundingBox};
use crate::reference_frame::{detect_reference_frame, ReferenceFrame};

/// Millimeters to inches
pub const MM_TO_INCHES: f64 = 0.0393701;

/// Brightness-sum below which a sampled pixel counts as foot (algorithms 2 and 3)
pub const DARK_SAMPLE_THRESHOLD: u32 = 300;
/// Row and column stride of the sparse extreme-point scan
pub const HULL_SAMPLE_STRIDE: u32 = 2;
/// Minimum number of sampled foot points for the extreme-point scan
pub const MIN_HULL_POINTS: usize = 10;
/// Number of rows sampled by the multi-section width scan
pub const WIDTH_SAMPLE_ROWS: u32 = 5;

#[inline]
fn is_dark_sample(pixel: &image::Rgba<u8>) -> bool {
    brightness_sum(pixel) < DARK_SAMPLE_THRESHOLD
}

/// The available estimators, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Algorithm {
    /// Foot bounding box from a full dark-pixel scan
    ContourBased,
    /// Extremes of a half-resolution dark-pixel sample
    ConvexHull,
    /// Foot length from the bounding box, width from the widest of five rows
    SkeletonBased,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::ContourBased,
        Algorithm::ConvexHull,
        Algorithm::SkeletonBased,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::ContourBased => "Algorithm 1: Contour-Based Edge Detection",
            Algorithm::ConvexHull => "Algorithm 2: Convex Hull Method",
            Algorithm::SkeletonBased => "Algorithm 3: Skeleton-Based Medial Axis",
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Algorithm::ContourBased => "Bounding box from dark pixel detection",
            Algorithm::ConvexHull => "Extreme point detection from sampled pixels",
            Algorithm::SkeletonBased => "Multi-section width sampling",
        }
    }

    /// Run this estimator. Panics inside the scan are turned into a failed
    /// estimate so the other estimators still complete.
    pub fn run(&self, image: &RgbaImage) -> MeasurementEstimate {
        let outcome = guarded(|| match self {
            Algorithm::ContourBased => measure_contour_based(image),
            Algorithm::ConvexHull => measure_convex_hull(image),
            Algorithm::SkeletonBased => measure_skeleton_based(image),
        });

        MeasurementEstimate {
            algorithm: *self,
            name: self.name(),
            outcome,
        }
    }
}

/// A successful estimate, in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FootMeasurement {
    pub length_inches: f64,
    pub width_inches: f64,
    pub pixel_to_mm: f64,
    pub method: &'static str,
    /// Detected reference sheet
    pub reference_bbox: BoundingBox,
    /// Foot region as this estimator saw it (sampled extent for the sparse scan)
    pub foot_bbox: BoundingBox,
}

impl FootMeasurement {
    fn from_pixels(
        reference: &ReferenceFrame,
        foot_bbox: BoundingBox,
        length_px: u32,
        width_px: u32,
        method: &'static str,
    ) -> Self {
        Self {
            length_inches: reference.to_mm(length_px) * MM_TO_INCHES,
            width_inches: reference.to_mm(width_px) * MM_TO_INCHES,
            pixel_to_mm: reference.pixel_to_mm,
            method,
            reference_bbox: reference.bbox,
            foot_bbox,
        }
    }
}

/// One estimator's result for one image: either a measurement or the reason it failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementEstimate {
    pub algorithm: Algorithm,
    pub name: &'static str,
    pub outcome: Result<FootMeasurement, MeasurementError>,
}

impl MeasurementEstimate {
    pub fn measurement(&self) -> Option<&FootMeasurement> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&MeasurementError> {
        self.outcome.as_ref().err()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Failure text shown for this estimate. The bounding-box estimator
    /// adds a retake hint, the other two keep the short message.
    pub fn failure_message(&self) -> Option<String> {
        let error = self.error()?;
        Some(match self.algorithm {
            Algorithm::ContourBased => error.detailed_message(),
            Algorithm::ConvexHull | Algorithm::SkeletonBased => error.to_string(),
        })
    }
}

fn guarded<F>(f: F) -> Result<FootMeasurement, MeasurementError>
where
    F: FnOnce() -> Result<FootMeasurement, MeasurementError>,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(MeasurementError::Unexpected(message))
    })
}

/// Algorithm 1: length and width straight from the foot bounding box
pub fn measure_contour_based(image: &RgbaImage) -> Result<FootMeasurement, MeasurementError> {
    let reference = detect_reference_frame(image)?;
    let foot = detect_foreground_bounds(image, DEFAULT_FOOT_THRESHOLD)?;

    Ok(FootMeasurement::from_pixels(
        &reference,
        foot,
        foot.height(),
        foot.width(),
        Algorithm::ContourBased.method(),
    ))
}

/// Algorithm 2: extent of the dark pixels found on a half-resolution grid.
/// This is the extent of the point set, not a true hull.
pub fn measure_convex_hull(image: &RgbaImage) -> Result<FootMeasurement, MeasurementError> {
    let reference = detect_reference_frame(image)?;
    let sample = scan_bounds(image, HULL_SAMPLE_STRIDE, is_dark_sample);

    let extent = match sample.bounds {
        Some(bbox) if sample.count >= MIN_HULL_POINTS => bbox,
        _ => return Err(MeasurementError::InsufficientSamplePoints),
    };

    Ok(FootMeasurement::from_pixels(
        &reference,
        extent,
        extent.height(),
        extent.width(),
        Algorithm::ConvexHull.method(),
    ))
}

/// Algorithm 3: bounding-box length, width as the widest of evenly spaced rows.
/// Each sampled row is scanned across the full image width.
pub fn measure_skeleton_based(image: &RgbaImage) -> Result<FootMeasurement, MeasurementError> {
    let reference = detect_reference_frame(image)?;
    let foot = detect_foreground_bounds(image, SENSITIVE_FOOT_THRESHOLD)?;

    let max_width = (0..WIDTH_SAMPLE_ROWS)
        .map(|i| {
            let offset = foot.height() as u64 * i as u64 / WIDTH_SAMPLE_ROWS as u64;
            foot.min_y + offset as u32
        })
        .filter_map(|y| row_extent(image, y, is_dark_sample))
        .map(|(left, right)| right - left)
        .max()
        .unwrap_or(0);

    Ok(FootMeasurement::from_pixels(
        &reference,
        foot,
        foot.height(),
        max_width,
        Algorithm::SkeletonBased.method(),
    ))
}

/// Run every estimator on the same raster, keeping report order.
pub fn run_all(image: &RgbaImage, parallel: bool) -> Vec<MeasurementEstimate> {
    let algorithms: &[Algorithm] = &Algorithm::ALL;

    if parallel {
        algorithms.par_iter().map(|a| a.run(image)).collect()
    } else {
        algorithms.iter().map(|a| a.run(image)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const FOOT: Rgba<u8> = Rgba([30, 30, 30, 255]);

    fn fill(image: &mut RgbaImage, x0: u32, x1: u32, y0: u32, y1: u32, color: Rgba<u8>) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                image.put_pixel(x, y, color);
            }
        }
    }

    /// Portrait sheet filling a 301 x 420 frame (0.7 mm per pixel) with a
    /// 100 x 300 pixel foot at (100, 50).
    fn scene() -> RgbaImage {
        let mut image = RgbaImage::from_pixel(301, 420, WHITE);
        fill(&mut image, 100, 200, 50, 350, FOOT);
        image
    }

    fn inches(pixels: f64) -> f64 {
        pixels * 0.7 * MM_TO_INCHES
    }

    #[test]
    fn all_estimators_agree_on_a_clean_rectangle() {
        let image = scene();
        for estimate in run_all(&image, false) {
            let m = estimate.measurement().expect("estimate should succeed");
            assert_approx_eq!(m.pixel_to_mm, 0.7);
            assert_approx_eq!(m.length_inches, inches(300.0));
            assert_approx_eq!(m.width_inches, inches(100.0));
            assert_eq!(m.method, estimate.algorithm.method());
        }
    }

    #[test]
    fn run_all_keeps_algorithm_order() {
        let estimates = run_all(&scene(), true);
        let order: Vec<Algorithm> = estimates.iter().map(|e| e.algorithm).collect();
        assert_eq!(order, Algorithm::ALL.to_vec());
        assert_eq!(estimates[1].name, "Algorithm 2: Convex Hull Method");
    }

    #[test]
    fn parallel_and_sequential_runs_are_identical() {
        let image = scene();
        assert_eq!(run_all(&image, true), run_all(&image, false));
    }

    #[test]
    fn uniform_bright_image_has_no_foot() {
        let image = RgbaImage::from_pixel(120, 100, WHITE);
        let estimates = run_all(&image, false);
        assert_eq!(estimates[0].error(), Some(&MeasurementError::ForegroundNotFound));
        assert_eq!(estimates[1].error(), Some(&MeasurementError::InsufficientSamplePoints));
        assert_eq!(estimates[2].error(), Some(&MeasurementError::ForegroundNotFound));
    }

    #[test]
    fn missing_sheet_fails_every_estimator_first() {
        let mut image = RgbaImage::from_pixel(120, 100, Rgba([120, 120, 120, 255]));
        fill(&mut image, 10, 60, 10, 90, FOOT);
        for estimate in run_all(&image, false) {
            assert_eq!(estimate.error(), Some(&MeasurementError::ReferenceNotFound));
        }
    }

    #[test]
    fn width_rows_skip_features_between_samples() {
        let mut image = scene();
        // A wide bar on rows the five-row sampler never visits (50, 110, 170, 230, 290)
        fill(&mut image, 60, 240, 120, 125, FOOT);

        let contour = measure_contour_based(&image).unwrap();
        let skeleton = measure_skeleton_based(&image).unwrap();
        assert_approx_eq!(contour.width_inches, inches(180.0));
        assert_approx_eq!(skeleton.width_inches, inches(100.0));
        assert_approx_eq!(skeleton.length_inches, contour.length_inches);
    }

    #[test]
    fn width_rows_take_the_widest_section() {
        let mut image = scene();
        fill(&mut image, 80, 230, 170, 172, FOOT);
        let skeleton = measure_skeleton_based(&image).unwrap();
        assert_approx_eq!(skeleton.width_inches, inches(150.0));
    }

    #[test]
    fn sparse_sampler_only_sees_even_coordinates() {
        let mut image = RgbaImage::from_pixel(301, 420, WHITE);
        fill(&mut image, 101, 201, 51, 351, FOOT);
        let hull = measure_convex_hull(&image).unwrap();
        assert_approx_eq!(hull.length_inches, inches(298.0));
        assert_approx_eq!(hull.width_inches, inches(98.0));
    }

    #[test]
    fn sensitive_threshold_only_affects_skeleton_estimator() {
        // sum 330 is foot for the skeleton bbox (< 360) but not for the others (< 300)
        let mut image = RgbaImage::from_pixel(301, 420, WHITE);
        fill(&mut image, 100, 200, 50, 350, Rgba([110, 110, 110, 255]));
        let estimates = run_all(&image, false);
        assert_eq!(estimates[0].error(), Some(&MeasurementError::ForegroundNotFound));
        assert_eq!(estimates[1].error(), Some(&MeasurementError::InsufficientSamplePoints));
        // rows hold no pixel under 300, so the width collapses to zero
        let skeleton = estimates[2].measurement().unwrap();
        assert_approx_eq!(skeleton.length_inches, inches(300.0));
        assert_approx_eq!(skeleton.width_inches, 0.0);
    }

    #[test]
    fn measurements_carry_the_detected_boxes() {
        let m = measure_contour_based(&scene()).unwrap();
        assert_eq!(m.reference_bbox, BoundingBox { min_x: 0, max_x: 300, min_y: 0, max_y: 419 });
        assert_eq!(m.foot_bbox, BoundingBox { min_x: 100, max_x: 200, min_y: 50, max_y: 350 });
    }

    #[test]
    fn only_the_bounding_box_estimator_adds_retake_hints() {
        let mut image = RgbaImage::from_pixel(120, 100, Rgba([120, 120, 120, 255]));
        fill(&mut image, 10, 60, 10, 90, FOOT);
        let estimates = run_all(&image, false);
        assert_eq!(
            estimates[0].failure_message().as_deref(),
            Some("A4 paper not detected. Ensure white A4 paper is visible.")
        );
        assert_eq!(estimates[1].failure_message().as_deref(), Some("A4 paper not detected"));
        assert_eq!(estimates[2].failure_message().as_deref(), Some("A4 paper not detected"));

        let blank = run_all(&RgbaImage::from_pixel(120, 100, WHITE), false);
        assert_eq!(
            blank[0].failure_message().as_deref(),
            Some("Foot not detected. Ensure foot is clearly visible.")
        );
        assert_eq!(blank[2].failure_message().as_deref(), Some("Foot not detected"));
        assert!(run_all(&scene(), false)[0].failure_message().is_none());
    }

    #[test]
    fn panics_become_failed_estimates() {
        let outcome = guarded(|| panic!("scan exploded"));
        assert_eq!(outcome, Err(MeasurementError::Unexpected("scan exploded".to_string())));
    }
}
