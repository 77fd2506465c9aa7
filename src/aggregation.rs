use serde::Serialize;

use crate::algorithms::MeasurementEstimate;

/// Decimal places estimates are shown with. Averaging and size matching
/// work on the shown values so the recommendation agrees with the display.
pub const DISPLAY_DECIMALS: i32 = 2;

/// Round to the displayed precision (2 decimals)
pub fn round_to_display(value: f64) -> f64 {
    let scale = 10f64.powi(DISPLAY_DECIMALS);
    (value * scale).round() / scale
}

/// Straight mean of the successful estimates, at display precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AveragedMeasurement {
    pub avg_length_inches: f64,
    pub avg_width_inches: f64,
    /// How many estimates went into the mean
    pub sample_count: usize,
}

/// Average length and width over the estimates that succeeded.
/// Each estimate is rounded to 2 decimals before averaging and the mean is
/// rounded again. Returns `None` when every estimate failed.
pub fn aggregate(estimates: &[MeasurementEstimate]) -> Option<AveragedMeasurement> {
    let (count, length_sum, width_sum) = estimates
        .iter()
        .filter_map(|e| e.measurement())
        .fold((0usize, 0.0, 0.0), |(n, l, w), m| {
            (
                n + 1,
                l + round_to_display(m.length_inches),
                w + round_to_display(m.width_inches),
            )
        });

    if count == 0 {
        return None;
    }

    Some(AveragedMeasurement {
        avg_length_inches: round_to_display(length_sum / count as f64),
        avg_width_inches: round_to_display(width_sum / count as f64),
        sample_count: count,
    })
}
