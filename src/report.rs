//! Report Driver Module
//! Loads the daily reports once, aggregates every configured region and
//! renders the static charts.

use crate::charts::{GridCell, LineChartLabels, RenderError, StaticChartRenderer};
use crate::config::ReportConfig;
use crate::data::{DailyTables, DataLoader, LoaderError};
use crate::stats::{decode_reports, AggregateError, Metric, RegionAggregator};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// File name of the small-multiples chart in the output directory.
pub const GRID_FILE_NAME: &str = "confirmed_grid.png";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Chart requested for region `{0}` which is not in the region list")]
    UnknownRegion(String),
}

/// Aggregated trends for every configured region, in configuration order.
#[derive(Debug, Clone)]
pub struct RegionTrends {
    pub report_count: usize,
    pub regions: Vec<RegionAggregator>,
}

impl RegionTrends {
    pub fn get(&self, region: &str) -> Option<&RegionAggregator> {
        self.regions.iter().find(|r| r.region_name() == region)
    }
}

/// Decode every report once, then build one aggregator per region in
/// order. An unrecognized report aborts before any region is built.
pub fn build_region_trends<S: AsRef<str>>(
    tables: &DailyTables,
    regions: &[S],
) -> Result<Vec<RegionAggregator>, AggregateError> {
    let decoded = decode_reports(tables)?;
    let aggregators: Vec<RegionAggregator> = regions
        .iter()
        .map(|region| RegionAggregator::from_decoded(region.as_ref(), &decoded))
        .collect();
    info!(
        reports = decoded.len(),
        regions = aggregators.len(),
        "aggregated region trends"
    );
    Ok(aggregators)
}

/// Load the configured input tree and aggregate every configured region.
pub fn load_trends(config: &ReportConfig) -> Result<RegionTrends, ReportError> {
    info!(input = %config.input_path.display(), "collecting daily reports");
    let tables = DataLoader::collect_daily_tables(&config.input_path)?;
    let regions = build_region_trends(&tables, &config.region_names)?;

    Ok(RegionTrends {
        report_count: tables.len(),
        regions,
    })
}

/// Write the confirmed-cases grid and every requested single chart into
/// the output directory. Returns the written files, grid first.
pub fn render_static(
    config: &ReportConfig,
    trends: &RegionTrends,
) -> Result<Vec<PathBuf>, ReportError> {
    // Unknown regions are reported before anything is drawn.
    let singles = config
        .single_charts
        .iter()
        .map(|request| {
            trends
                .get(&request.region)
                .map(|region| (region, request.metric))
                .ok_or_else(|| ReportError::UnknownRegion(request.region.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut written = Vec::with_capacity(singles.len() + 1);

    let cells: Vec<GridCell<'_>> = trends
        .regions
        .iter()
        .map(|region| GridCell {
            data: region.confirmed_cases_trend(),
            label: region.region_name(),
        })
        .collect();
    let grid_path = config.output_dir.join(GRID_FILE_NAME);
    let drawn = StaticChartRenderer::render_grid(&grid_path, &cells)?;
    info!(path = %grid_path.display(), cells = drawn, "wrote region grid");
    written.push(grid_path);

    for (region, metric) in singles {
        let path = config.output_dir.join(single_chart_file_name(region.region_name(), metric));
        StaticChartRenderer::render_line_chart(
            &path,
            &metric.title(region.region_name()),
            region.trend(metric),
            LineChartLabels::default(),
        )?;
        info!(path = %path.display(), region = region.region_name(), %metric, "wrote trend chart");
        written.push(path);
    }

    Ok(written)
}

/// `New York` + deaths -> `new_york_deaths.png`
pub fn single_chart_file_name(region: &str, metric: Metric) -> String {
    let slug: String = region
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{slug}_{metric}.png")
}
