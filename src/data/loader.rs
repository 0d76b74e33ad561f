//! Daily Report Loader Module
//! Walks a report directory and loads every CSV snapshot using Polars.

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Extension a daily report file must carry to be loaded.
pub const REPORT_EXTENSION: &str = "csv";

/// Date formats tried when interpreting a file base name.
const DATE_FORMATS: [&str; 2] = ["%m-%d-%Y", "%Y-%m-%d"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to walk report directory: {0}")]
    Walk(#[from] glob::GlobError),
}

/// Identifier of one daily report, taken verbatim from the file base name.
///
/// Keys that look like `MM-DD-YYYY` or `YYYY-MM-DD` also carry the parsed
/// date and order chronologically. Anything else is kept as-is and sorts
/// ahead of every dated key, by raw text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    date: Option<NaiveDate>,
    raw: String,
}

impl DateKey {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let date = DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&raw, format).ok());
        Self { date, raw }
    }

    /// Derive the key from a report path (base name without extension).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_stem()
            .map(|stem| Self::new(stem.to_string_lossy().into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Every loaded daily report, ordered by date key.
pub type DailyTables = BTreeMap<DateKey, DataFrame>;

/// Loads daily report CSV files with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a single CSV report.
    ///
    /// Cells that do not parse as the inferred column type become null
    /// instead of failing the whole file.
    pub fn load_table(path: &Path) -> Result<DataFrame, LoaderError> {
        let to_error = |source: PolarsError| LoaderError::Csv {
            path: path.to_path_buf(),
            source,
        };

        LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()
            .map_err(to_error)?
            .collect()
            .map_err(to_error)
    }

    /// Recursively collect every `*.csv` file under `root`, keyed by its
    /// base name.
    pub fn collect_daily_tables(root: &Path) -> Result<DailyTables, LoaderError> {
        let pattern = format!(
            "{}/**/*.{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            REPORT_EXTENSION
        );

        let mut tables = DailyTables::new();
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            if !path.is_file() {
                continue;
            }
            let Some(key) = DateKey::from_path(&path) else {
                continue;
            };

            let df = Self::load_table(&path)?;
            debug!(date = %key, rows = df.height(), path = %path.display(), "loaded report");

            if let Some(previous) = tables.insert(key.clone(), df) {
                warn!(
                    date = %key,
                    replaced_rows = previous.height(),
                    path = %path.display(),
                    "duplicate report name, keeping the later file"
                );
            }
        }

        if tables.is_empty() {
            warn!(root = %root.display(), "no daily reports found");
        } else {
            info!(root = %root.display(), reports = tables.len(), "loaded daily reports");
        }

        Ok(tables)
    }
}
