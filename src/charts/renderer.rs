//! Static Chart Renderer
//! Writes trend charts as PNG images with plotters.
//!
//! Two layouts:
//! 1. Single line chart: title, axis labels ("Days"/"Cases" by default), grid
//! 2. Small multiples: 7 x 8 cells, one region per cell, filled row by row,
//!    at most 50 cells, region name inside each cell, no grid lines

use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const GRID_ROWS: usize = 7;
pub const GRID_COLUMNS: usize = 8;
/// Cells actually populated in the small-multiples grid.
pub const GRID_LIMIT: usize = 50;

const LINE_CHART_SIZE: (u32, u32) = (1024, 768);
const GRID_CHART_SIZE: (u32, u32) = (2400, 1800);

// Colors
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180); // Trend line
const LABEL_COLOR: RGBColor = RGBColor(40, 40, 40); // Cell annotation

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to prepare output {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

fn drawing<E: Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

/// Axis labels of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineChartLabels<'a> {
    pub x: &'a str,
    pub y: &'a str,
}

impl Default for LineChartLabels<'_> {
    fn default() -> Self {
        Self {
            x: "Days",
            y: "Cases",
        }
    }
}

/// One small-multiples cell: a trend and the region it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct GridCell<'a> {
    pub data: &'a [f64],
    pub label: &'a str,
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one trend as a line chart with grid lines.
    pub fn render_line_chart(
        path: &Path,
        title: &str,
        data: &[f64],
        labels: LineChartLabels<'_>,
    ) -> Result<(), RenderError> {
        Self::prepare_output(path)?;

        let root = BitMapBackend::new(path, LINE_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let (y_min, y_max) = Self::value_range(data);
        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..Self::x_extent(data.len()), y_min..y_max)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .x_desc(labels.x)
            .y_desc(labels.y)
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(LineSeries::new(Self::points(data), &LINE_COLOR))
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        Ok(())
    }

    /// Render up to [`GRID_LIMIT`] trends into a 7 x 8 grid. Returns the
    /// number of cells drawn.
    pub fn render_grid(path: &Path, cells: &[GridCell<'_>]) -> Result<usize, RenderError> {
        Self::prepare_output(path)?;

        let root = BitMapBackend::new(path, GRID_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;
        let areas = root.split_evenly((GRID_ROWS, GRID_COLUMNS));

        let mut drawn = 0;
        for (index, cell) in cells.iter().enumerate() {
            let Some((row, column)) = Self::grid_position(index) else {
                break;
            };
            Self::draw_grid_cell(&areas[row * GRID_COLUMNS + column], cell)?;
            drawn += 1;
        }

        root.present().map_err(drawing)?;
        Ok(drawn)
    }

    /// Row and column of the `index`-th cell, or `None` past the cell limit.
    pub fn grid_position(index: usize) -> Option<(usize, usize)> {
        (index < GRID_LIMIT).then(|| (index / GRID_COLUMNS, index % GRID_COLUMNS))
    }

    /// Y axis range for a trend: starts at 0 (or the smallest value if
    /// negative), with 5% headroom above the largest value.
    pub fn value_range(data: &[f64]) -> (f64, f64) {
        let (min, max) = data
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0f64, 0.0f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        if max > min {
            (min, max + (max - min) * 0.05)
        } else {
            (min, min + 1.0)
        }
    }

    fn draw_grid_cell(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        cell: &GridCell<'_>,
    ) -> Result<(), RenderError> {
        let defaults = LineChartLabels::default();
        let y_label_area = 42;
        let (y_min, y_max) = Self::value_range(cell.data);

        let mut chart = ChartBuilder::on(area)
            .margin(6)
            .x_label_area_size(28)
            .y_label_area_size(y_label_area)
            .build_cartesian_2d(0f64..Self::x_extent(cell.data.len()), y_min..y_max)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(3)
            .y_labels(3)
            .label_style((FONT, 10))
            .axis_desc_style((FONT, 11))
            .x_desc(defaults.x)
            .y_desc(defaults.y)
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(LineSeries::new(Self::points(cell.data), &LINE_COLOR))
            .map_err(drawing)?;

        // Annotation sits at 10% from the left and 25% from the top of the plot.
        let (width, height) = area.dim_in_pixel();
        let plot_width = width as i32 - y_label_area as i32;
        let position = (y_label_area as i32 + plot_width / 10, height as i32 / 4);
        area.draw(&Text::new(
            cell.label.to_string(),
            position,
            (FONT, 14).into_font().color(&LABEL_COLOR),
        ))
        .map_err(drawing)?;

        Ok(())
    }

    fn points(data: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
        data.iter().enumerate().map(|(i, &v)| (i as f64, v))
    }

    fn x_extent(len: usize) -> f64 {
        len.saturating_sub(1).max(1) as f64
    }

    fn prepare_output(path: &Path) -> Result<(), RenderError> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                    path: parent.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }
}
