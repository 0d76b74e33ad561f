//! Case Trends - Daily case report trend viewer
//!
//! Aggregates daily reports per region and either opens the interactive
//! viewer or writes PNG charts.

use anyhow::{Context, Result};
use case_trends::config::{OutputMode, ReportConfig};
use case_trends::{gui, report};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Display,
    Grid,
}

impl From<ModeArg> for OutputMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Display => OutputMode::Display,
            ModeArg::Grid => OutputMode::Grid,
        }
    }
}

/// Plot per-region case trends from daily report CSV files.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory scanned recursively for daily report CSV files.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Interactive viewer or PNG grid.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Where PNG charts are written in grid mode.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Region to aggregate (repeatable); replaces the configured list.
    #[arg(long = "region")]
    regions: Vec<String>,
    /// Do not open written charts.
    #[arg(long)]
    no_open: bool,
}

impl Args {
    fn into_config(self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)?,
            None => ReportConfig::default(),
        };

        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(mode) = self.mode {
            config.output_mode = mode.into();
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if !self.regions.is_empty() {
            config.region_names = self.regions;
        }
        if self.no_open {
            config.open_output = false;
        }

        Ok(config.validate()?)
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config = Args::parse().into_config().context("invalid configuration")?;
    info!(
        input = %config.input_path.display(),
        regions = config.region_names.len(),
        mode = ?config.output_mode,
        "starting report"
    );

    let trends = report::load_trends(&config).context("failed to aggregate daily reports")?;

    match config.output_mode {
        OutputMode::Display => {
            gui::run_viewer(trends.regions, trends.report_count)
                .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))?;
        }
        OutputMode::Grid => {
            let written =
                report::render_static(&config, &trends).context("failed to render charts")?;
            if config.open_output {
                for path in &written {
                    if let Err(e) = open::that(path) {
                        warn!(path = %path.display(), error = %e, "could not open chart");
                    }
                }
            }
            info!(charts = written.len(), dir = %config.output_dir.display(), "done");
        }
    }

    Ok(())
}
