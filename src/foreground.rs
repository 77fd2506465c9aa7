use image::RgbaImage;

use crate::errors::MeasurementError;
use crate::image_utils::{brightness_sum, scan_bounds, BoundingBox};

/// Default per-channel darkness threshold for foot pixels
pub const DEFAULT_FOOT_THRESHOLD: u32 = 100;
/// More permissive threshold used by the multi-section estimator
pub const SENSITIVE_FOOT_THRESHOLD: u32 = 120;
/// Minimum number of dark pixels before a foot is trusted
pub const MIN_FOOT_PIXELS: usize = 1000;

/// Is this pixel dark enough to be foot at the given per-channel threshold?
#[inline]
pub fn is_foreground(pixel: &image::Rgba<u8>, threshold: u32) -> bool {
    brightness_sum(pixel) < threshold * 3
}

/// Bounding box of all pixels whose brightness-sum is below `threshold * 3`
pub fn detect_foreground_bounds(
    image: &RgbaImage,
    threshold: u32,
) -> Result<BoundingBox, MeasurementError> {
    let scan = scan_bounds(image, 1, |p| is_foreground(p, threshold));

    match scan.bounds {
        Some(bbox) if scan.count >= MIN_FOOT_PIXELS => Ok(bbox),
        _ => Err(MeasurementError::ForegroundNotFound),
    }
}
