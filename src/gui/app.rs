//! Case Trends Viewer Application
//! Main window with control panel and chart viewer.

use crate::gui::{ChartViewer, ControlPanel};
use crate::stats::RegionAggregator;
use egui::SidePanel;

/// Main application window.
pub struct TrendViewerApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl TrendViewerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        regions: Vec<RegionAggregator>,
        report_count: usize,
    ) -> Self {
        let chart_viewer = ChartViewer::new(regions);
        let control_panel = ControlPanel::new(chart_viewer.region_names(), report_count);
        Self {
            control_panel,
            chart_viewer,
        }
    }
}

impl eframe::App for TrendViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("control_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                self.control_panel.show(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.control_panel.settings);
        });
    }
}
