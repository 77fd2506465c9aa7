use serde::Serialize;
use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Expected, per-algorithm failures. A better photo is the fix for all of them.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum MeasurementError {
    #[error("A4 paper not detected")]
    ReferenceNotFound,

    #[error("Foot not detected")]
    ForegroundNotFound,

    #[error("Insufficient foot data detected")]
    InsufficientSamplePoints,

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl MeasurementError {
    /// Message with a hint on how to retake the photo.
    /// Only the detection failures carry a hint.
    pub fn detailed_message(&self) -> String {
        match self {
            MeasurementError::ReferenceNotFound => {
                format!("{}. Ensure white A4 paper is visible.", self)
            }
            MeasurementError::ForegroundNotFound => {
                format!("{}. Ensure foot is clearly visible.", self)
            }
            // No hint to give for these
            _ => self.to_string(),
        }
    }
}

/// Custom error types for the foot measurement tool
#[derive(Error, Debug)]
pub enum FootMeasureError {
    // Filesystem and decoding
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    // Configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    // Report writers
    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),

    // Per-algorithm failure surfaced as a crate error
    #[error("Measurement failed: {0}")]
    Measurement(#[from] MeasurementError),
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, FootMeasureError>;
