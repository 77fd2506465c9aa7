// src/reference_frame.rs - A4 reference sheet detection and pixel scale calibration

use image::RgbaImage;
use serde::Serialize;

use crate::errors::MeasurementError;
use crate::image_utils::{brightness_sum, scan_bounds, BoundingBox};

/// A4 short edge in millimeters
pub const A4_WIDTH_MM: f64 = 210.0;
/// A4 long edge in millimeters
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Brightness-sum above which a pixel counts as paper
pub const PAPER_BRIGHTNESS_THRESHOLD: u32 = 600;
/// Minimum number of paper pixels before the sheet is trusted
pub const MIN_PAPER_PIXELS: usize = 5000;

/// The detected sheet and the scale derived from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceFrame {
    pub bbox: BoundingBox,
    pub pixel_to_mm: f64,
}

impl ReferenceFrame {
    /// Build a frame from the sheet's pixel box.
    ///
    /// Orientation is taken from the box aspect: a box taller than wide is
    /// portrait and its width spans the 210 mm edge, otherwise the width spans
    /// the 297 mm edge. The scale is always computed against the box width.
    pub fn from_bbox(bbox: BoundingBox) -> Result<Self, MeasurementError> {
        if bbox.width() == 0 {
            return Err(MeasurementError::ReferenceNotFound);
        }

        let reference_width_mm = reference_width_mm(&bbox);
        Ok(Self {
            bbox,
            pixel_to_mm: reference_width_mm / bbox.width() as f64,
        })
    }

    pub fn is_portrait(&self) -> bool {
        is_portrait(&self.bbox)
    }

    /// Convert a pixel distance into millimeters
    pub fn to_mm(&self, pixels: u32) -> f64 {
        pixels as f64 * self.pixel_to_mm
    }
}

fn is_portrait(bbox: &BoundingBox) -> bool {
    bbox.height() > bbox.width()
}

/// Physical length assumed for the box width
pub fn reference_width_mm(bbox: &BoundingBox) -> f64 {
    if is_portrait(bbox) {
        A4_WIDTH_MM
    } else {
        A4_HEIGHT_MM
    }
}

/// Locate the bright reference sheet and derive the pixel to millimeter scale
pub fn detect_reference_frame(image: &RgbaImage) -> Result<ReferenceFrame, MeasurementError> {
    let scan = scan_bounds(image, 1, |p| brightness_sum(p) > PAPER_BRIGHTNESS_THRESHOLD);

    match scan.bounds {
        Some(bbox) if scan.count >= MIN_PAPER_PIXELS => ReferenceFrame::from_bbox(bbox),
        _ => Err(MeasurementError::ReferenceNotFound),
    }
}
