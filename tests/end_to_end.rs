use assert_approx_eq::assert_approx_eq;
use image::{Rgba, RgbaImage};

use foot_measure_lib::{
    detect_reference_frame, measure_contour_based, measure_image, Algorithm, MeasurementError,
    Region,
};

const PAPER: Rgba<u8> = Rgba([245, 245, 245, 255]);
const FOOT: Rgba<u8> = Rgba([40, 30, 30, 255]);

/// Portrait sheet spanning a 1001 x 1400 frame (1000 px wide box, 0.21 mm/px)
/// with an 800 x 200 pixel foot on it.
fn portrait_scene() -> RgbaImage {
    let mut image = RgbaImage::from_pixel(1001, 1400, PAPER);
    for y in 100..=900 {
        for x in 400..=600 {
            image.put_pixel(x, y, FOOT);
        }
    }
    image
}

#[test]
fn contour_estimate_on_portrait_sheet() {
    let image = portrait_scene();

    let frame = detect_reference_frame(&image).unwrap();
    assert!(frame.is_portrait());
    assert_approx_eq!(frame.pixel_to_mm, 0.21);

    let m = measure_contour_based(&image).unwrap();
    // 800 px * 0.21 = 168 mm, 200 px * 0.21 = 42 mm
    assert_approx_eq!(m.length_inches, 168.0 * 0.0393701);
    assert_approx_eq!(m.width_inches, 42.0 * 0.0393701);
    assert_eq!(format!("{:.2}", m.length_inches), "6.61");
    assert_eq!(format!("{:.2}", m.width_inches), "1.65");
}

#[test]
fn full_report_on_portrait_sheet() {
    let report = measure_image(&portrait_scene(), Region::Us, true);

    assert_eq!(report.estimates.len(), 3);
    for estimate in &report.estimates {
        let m = estimate.measurement().unwrap();
        assert_approx_eq!(m.length_inches, 168.0 * 0.0393701);
        assert_approx_eq!(m.width_inches, 42.0 * 0.0393701);
    }

    // Averages are taken over the shown 2-decimal values
    let avg = report.average.unwrap();
    assert_eq!(avg.sample_count, 3);
    assert_approx_eq!(avg.avg_length_inches, 6.61);
    assert_approx_eq!(avg.avg_width_inches, 1.65);

    // A 6.61 in foot is below every table; the smallest sizes are closest
    let rec = report.recommendation.unwrap();
    assert_eq!(rec.men, 6.0);
    assert_eq!(rec.women, 4.0);
}

#[test]
fn repeated_runs_are_bit_identical() {
    let image = portrait_scene();
    for algorithm in Algorithm::ALL {
        let first = algorithm.run(&image);
        let second = algorithm.run(&image);
        let (a, b) = (first.measurement().unwrap(), second.measurement().unwrap());
        assert_eq!(a.length_inches.to_bits(), b.length_inches.to_bits());
        assert_eq!(a.width_inches.to_bits(), b.width_inches.to_bits());
    }
}

#[test]
fn photo_without_paper_fails_everywhere() {
    let mut image = RgbaImage::from_pixel(400, 400, Rgba([100, 120, 140, 255]));
    for y in 50..350 {
        for x in 150..250 {
            image.put_pixel(x, y, FOOT);
        }
    }

    let report = measure_image(&image, Region::Eu, false);
    for estimate in &report.estimates {
        assert_eq!(estimate.error(), Some(&MeasurementError::ReferenceNotFound));
    }
    assert!(report.average.is_none());
    assert!(report.recommendation.is_none());
}

#[test]
fn blank_sheet_has_paper_but_no_foot() {
    let image = RgbaImage::from_pixel(300, 200, PAPER);
    let frame = detect_reference_frame(&image).unwrap();
    assert_eq!(frame.bbox.width(), 299);
    assert_eq!(frame.bbox.height(), 199);

    let report = measure_image(&image, Region::Us, false);
    assert_eq!(report.estimates[0].error(), Some(&MeasurementError::ForegroundNotFound));
    assert_eq!(report.estimates[1].error(), Some(&MeasurementError::InsufficientSamplePoints));
    assert_eq!(report.estimates[2].error(), Some(&MeasurementError::ForegroundNotFound));
    assert!(report.average.is_none());
}
