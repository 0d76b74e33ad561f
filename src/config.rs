//! Report Configuration Module
//! Everything the driver needs, loaded from JSON and overridable from the
//! command line.

use crate::stats::Metric;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Default location of the daily report checkout.
pub const DEFAULT_INPUT_PATH: &str = "COVID-19/csse_covid_19_data/csse_covid_19_daily_reports";

pub const DEFAULT_OUTPUT_DIR: &str = "charts";

/// The 50 US states, spelled exactly as the daily reports spell them.
pub const US_STATES: [&str; 50] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No regions configured")]
    NoRegions,
}

/// How the aggregated trends are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Interactive viewer window.
    #[default]
    Display,
    /// Small-multiples grid (plus requested single charts) written as PNG.
    Grid,
}

/// A single-series chart requested explicitly for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleChart {
    pub region: String,
    pub metric: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Root directory scanned for daily reports.
    pub input_path: PathBuf,
    /// Regions to aggregate, in display order.
    pub region_names: Vec<String>,
    pub output_mode: OutputMode,
    pub output_dir: PathBuf,
    /// Open written charts with the system image viewer.
    pub open_output: bool,
    pub single_charts: Vec<SingleChart>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            region_names: US_STATES.iter().map(|s| s.to_string()).collect(),
            output_mode: OutputMode::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            open_output: true,
            single_charts: Vec::new(),
        }
    }
}

impl ReportConfig {
    /// Load a JSON config file; missing keys fall back to the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Drop repeated region names (first occurrence wins) and reject an
    /// empty region list.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let mut seen = Vec::with_capacity(self.region_names.len());
        for name in self.region_names.drain(..) {
            if seen.contains(&name) {
                warn!(region = %name, "region listed more than once, ignoring repeat");
            } else {
                seen.push(name);
            }
        }
        self.region_names = seen;

        if self.region_names.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        Ok(self)
    }
}
