//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, TrendChart, LINE_COLOR};
pub use renderer::{
    GridCell, LineChartLabels, RenderError, StaticChartRenderer, GRID_COLUMNS, GRID_LIMIT,
    GRID_ROWS,
};
