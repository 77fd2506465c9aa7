use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use serde::Serialize;

/// Colors used when drawing debug overlays
pub const REFERENCE_OVERLAY_COLOR: [u8; 3] = [0, 200, 0];
pub const FOOT_OVERLAY_COLOR: [u8; 3] = [255, 0, 0];

/// Sum of the red, green and blue channels (0..=765). Alpha is ignored.
#[inline]
pub fn brightness_sum(pixel: &Rgba<u8>) -> u32 {
    pixel[0] as u32 + pixel[1] as u32 + pixel[2] as u32
}

/// Axis-aligned box in pixel coordinates, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// A box covering a single pixel
    pub fn at(x: u32, y: u32) -> Self {
        Self { min_x: x, max_x: x, min_y: y, max_y: y }
    }

    /// Grow the box so it contains (x, y)
    #[inline]
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Pixel distance between the extreme columns (max_x - min_x)
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    /// Pixel distance between the extreme rows (max_y - min_y)
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }
}

/// Outcome of one classification pass over a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelScan {
    /// Box around every matching pixel, `None` when nothing matched
    pub bounds: Option<BoundingBox>,
    /// Number of matching pixels that were visited
    pub count: usize,
}

/// Visit every `stride`-th row and column, starting at (0, 0), and collect the
/// bounding box and count of the pixels accepted by `predicate`.
///
/// Every detector in the crate is a call to this with a different brightness
/// predicate and stride.
pub fn scan_bounds<F>(image: &RgbaImage, stride: u32, predicate: F) -> PixelScan
where
    F: Fn(&Rgba<u8>) -> bool,
{
    let (width, height) = image.dimensions();
    let stride = stride.max(1) as usize;

    let mut bounds: Option<BoundingBox> = None;
    let mut count = 0;

    for y in (0..height).step_by(stride) {
        for x in (0..width).step_by(stride) {
            if predicate(image.get_pixel(x, y)) {
                count += 1;
                match bounds.as_mut() {
                    Some(b) => b.include(x, y),
                    None => bounds = Some(BoundingBox::at(x, y)),
                }
            }
        }
    }

    PixelScan { bounds, count }
}

/// Leftmost and rightmost column in row `y` accepted by `predicate`.
/// Returns `None` for rows outside the image or rows with no match.
pub fn row_extent<F>(image: &RgbaImage, y: u32, predicate: F) -> Option<(u32, u32)>
where
    F: Fn(&Rgba<u8>) -> bool,
{
    let (width, height) = image.dimensions();
    if y >= height {
        return None;
    }

    let mut extent: Option<(u32, u32)> = None;
    for x in 0..width {
        if predicate(image.get_pixel(x, y)) {
            extent = Some(match extent {
                Some((left, _)) => (left, x),
                None => (x, x),
            });
        }
    }

    extent
}

/// Draw a hollow rectangle around `bbox` (inclusive pixel bounds)
fn draw_box(image: &mut RgbaImage, bbox: &BoundingBox, color: [u8; 3]) {
    let rect = Rect::at(bbox.min_x as i32, bbox.min_y as i32)
        .of_size(bbox.width() + 1, bbox.height() + 1);
    draw_hollow_rect_mut(image, rect, Rgba([color[0], color[1], color[2], 255]));
}

/// Create a debug image with the detected reference sheet and foot outlined
pub fn create_debug_overlay(
    image: &RgbaImage,
    reference: Option<&BoundingBox>,
    foot: Option<&BoundingBox>,
) -> RgbaImage {
    let mut debug_image = image.clone();

    if let Some(bbox) = reference {
        draw_box(&mut debug_image, bbox, REFERENCE_OVERLAY_COLOR);
    }
    if let Some(bbox) = foot {
        draw_box(&mut debug_image, bbox, FOOT_OVERLAY_COLOR);
    }

    debug_image
}
