//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;

pub use app::TrendViewerApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ViewMode, ViewSettings};

/// Open the interactive viewer and block until the window is closed.
pub fn run_viewer(
    regions: Vec<crate::stats::RegionAggregator>,
    report_count: usize,
) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Case Trends"),
        ..Default::default()
    };

    eframe::run_native(
        "Case Trends",
        options,
        Box::new(move |cc| Ok(Box::new(TrendViewerApp::new(cc, regions, report_count)))),
    )
}
