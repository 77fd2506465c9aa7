use std::fs;
use std::path::Path;
use csv::Writer;

use crate::config::{ESTIMATES_DIR, REPORTS_DIR};
use crate::errors::Result;
use crate::pipeline::MeasurementReport;

/// Summary CSV written after a batch
pub const SUMMARY_FILENAME: &str = "summary.csv";

/// Write one row per estimator for a single photo
pub fn write_estimates_csv<P: AsRef<Path>>(
    report: &MeasurementReport,
    output_dir: P,
    filename: &str,
) -> Result<()> {
    let output_path = output_dir.as_ref().join(ESTIMATES_DIR).join(format!("{}.csv", filename));

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(&output_path)?;

    writer.write_record([
        "Algorithm",
        "Status",
        "Length_in",
        "Width_in",
        "Pixel_To_Mm",
        "Method",
        "Error",
    ])?;

    for estimate in &report.estimates {
        match &estimate.outcome {
            Ok(m) => writer.write_record([
                estimate.name.to_string(),
                "ok".to_string(),
                format!("{:.2}", m.length_inches),
                format!("{:.2}", m.width_inches),
                format!("{:.4}", m.pixel_to_mm),
                m.method.to_string(),
                String::new(),
            ])?,
            Err(_) => writer.write_record([
                estimate.name.to_string(),
                "failed".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                estimate.failure_message().unwrap_or_default(),
            ])?,
        }
    }

    writer.flush()?;

    Ok(())
}

/// Write the full report for one photo as pretty JSON
pub fn write_json_report<P: AsRef<Path>>(
    report: &MeasurementReport,
    output_dir: P,
    filename: &str,
) -> Result<()> {
    let output_path = output_dir.as_ref().join(REPORTS_DIR).join(format!("{}.json", filename));

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(report)?;
    fs::write(output_path, content)?;

    Ok(())
}

/// Write one summary row per processed photo. Cells stay empty for photos
/// where nothing could be averaged.
pub fn write_summary_csv<P: AsRef<Path>>(
    reports: &[(String, MeasurementReport)],
    output_dir: P,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut writer = Writer::from_path(output_dir.join(SUMMARY_FILENAME))?;

    writer.write_record([
        "Filename",
        "Successful_Algorithms",
        "Avg_Length_in",
        "Avg_Width_in",
        "Region",
        "Men_Size",
        "Women_Size",
    ])?;

    for (filename, report) in reports {
        let (length, width) = report
            .average
            .map(|avg| {
                (
                    format!("{:.2}", avg.avg_length_inches),
                    format!("{:.2}", avg.avg_width_inches),
                )
            })
            .unwrap_or_default();

        let (region, men, women) = report
            .recommendation
            .map(|rec| (rec.region.to_string(), rec.men.to_string(), rec.women.to_string()))
            .unwrap_or_default();

        writer.write_record([
            filename.clone(),
            report.successful_estimates().to_string(),
            length,
            width,
            region,
            men,
            women,
        ])?;
    }

    writer.flush()?;

    Ok(())
}
