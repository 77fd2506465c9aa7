// src/lib.rs - Library interface for the foot measurement engine

pub mod aggregation;
pub mod algorithms;
pub mod config;
pub mod errors;
pub mod foreground;
pub mod image_io;
pub mod image_utils;
pub mod output;
pub mod pipeline;
pub mod reference_frame;
pub mod size_chart;

// Re-export commonly used types and functions
pub use errors::{FootMeasureError, MeasurementError, Result};
pub use config::Config;
pub use pipeline::{measure_image, process_image, MeasurementReport};
pub use image_io::{InputImage, load_image, save_image};

pub use aggregation::{aggregate, AveragedMeasurement};
pub use algorithms::{
    measure_contour_based,
    measure_convex_hull,
    measure_skeleton_based,
    run_all,
    Algorithm,
    FootMeasurement,
    MeasurementEstimate,
};
pub use foreground::detect_foreground_bounds;
pub use image_utils::BoundingBox;
pub use reference_frame::{detect_reference_frame, ReferenceFrame};
pub use size_chart::{match_shoe_size, recommend, Gender, Region, ShoeSizeRecommendation};
