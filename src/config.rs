use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::errors::{FootMeasureError, Result};
use crate::size_chart::Region;

/// Output subdirectory for per-image estimate CSVs
pub const ESTIMATES_DIR: &str = "estimates";
/// Output subdirectory for per-image JSON reports
pub const REPORTS_DIR: &str = "reports";
/// Output subdirectory for debug overlays
pub const DEBUG_DIR: &str = "debug";

/// Runtime configuration. Detection thresholds are fixed constants and
/// deliberately not part of this.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub input_path: String,
    pub output_base_dir: String,

    /// Region used for the shoe size recommendation
    #[serde(default = "default_region")]
    pub region: Region,

    /// Process batch images in parallel
    #[serde(default = "default_parallel")]
    pub use_parallel: bool,

    /// Run the three estimators of one image in parallel
    #[serde(default = "default_parallel")]
    pub parallel_algorithms: bool,

    #[serde(default = "default_write_json_report")]
    pub write_json_report: bool,
}

fn default_region() -> Region {
    Region::Us
}

fn default_parallel() -> bool {
    true
}

fn default_write_json_report() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: "./input".to_string(),
            output_base_dir: "./output".to_string(),
            region: default_region(),
            use_parallel: default_parallel(),
            parallel_algorithms: default_parallel(),
            write_json_report: default_write_json_report(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FootMeasureError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|source| FootMeasureError::ConfigLoad {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Check the input exists and create the output directories
    pub fn validate(&self) -> Result<()> {
        let input_path = PathBuf::from(&self.input_path);
        if !input_path.exists() {
            return Err(FootMeasureError::InvalidPath(input_path));
        }

        if self.output_base_dir.trim().is_empty() {
            return Err(FootMeasureError::Config(
                "output_base_dir must not be empty".to_string(),
            ));
        }

        let base_dir = PathBuf::from(&self.output_base_dir);
        for sub in [ESTIMATES_DIR, REPORTS_DIR] {
            fs::create_dir_all(base_dir.join(sub)).map_err(|e| {
                FootMeasureError::Io(io::Error::new(
                    ErrorKind::Other,
                    format!("Failed to create {} output directory: {}", sub, e),
                ))
            })?;
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            FootMeasureError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content)?;

        Ok(())
    }
}
