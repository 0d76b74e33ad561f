//! Chart Viewer Widget
//! Central panel showing either one full size trend or the small-multiples grid.

use crate::charts::{ChartPlotter, TrendChart, GRID_COLUMNS, GRID_LIMIT};
use crate::gui::{ViewMode, ViewSettings};
use crate::stats::{Metric, RegionAggregator};
use egui::{RichText, ScrollArea};

const CELL_SPACING: f32 = 8.0;
const CELL_MIN_WIDTH: f32 = 120.0;
const CELL_HEIGHT: f32 = 110.0;

/// Displays the aggregated trends.
pub struct ChartViewer {
    regions: Vec<RegionAggregator>,
}

impl ChartViewer {
    pub fn new(regions: Vec<RegionAggregator>) -> Self {
        Self { regions }
    }

    pub fn region_names(&self) -> Vec<String> {
        self.regions
            .iter()
            .map(|r| r.region_name().to_string())
            .collect()
    }

    pub fn show(&self, ui: &mut egui::Ui, settings: &ViewSettings) {
        if self.regions.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        match settings.view_mode {
            ViewMode::Single => self.show_single(ui, settings),
            ViewMode::Grid => self.show_grid(ui),
        }
    }

    fn show_single(&self, ui: &mut egui::Ui, settings: &ViewSettings) {
        let Some(region) = self.regions.get(settings.selected_region) else {
            return;
        };

        let title = settings.metric.title(region.region_name());
        let id = format!("trend_{}_{}", region.region_name(), settings.metric);
        let chart = TrendChart::new(&id, &title, region.trend(settings.metric));
        let height = (ui.available_height() - 40.0).max(200.0);
        ChartPlotter::draw_trend_chart(ui, &chart, height);

        if let (Some(first), Some(last)) = (region.dates().first(), region.dates().last()) {
            ui.label(
                RichText::new(format!(
                    "{} entries, {} to {}",
                    region.dates().len(),
                    first,
                    last
                ))
                .size(11.0),
            );
        }
    }

    /// Confirmed cases for the first 50 regions, 8 per row.
    fn show_grid(&self, ui: &mut egui::Ui) {
        let avail_width = ui.available_width();
        let cell_width = ((avail_width - CELL_SPACING * GRID_COLUMNS as f32)
            / GRID_COLUMNS as f32)
            .max(CELL_MIN_WIDTH);
        let size = egui::vec2(cell_width, CELL_HEIGHT);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let shown = &self.regions[..self.regions.len().min(GRID_LIMIT)];
                for row in shown.chunks(GRID_COLUMNS) {
                    ui.horizontal(|ui| {
                        for region in row {
                            let id = format!("grid_{}", region.region_name());
                            let chart = TrendChart::new(
                                &id,
                                region.region_name(),
                                region.trend(Metric::Confirmed),
                            );
                            ChartPlotter::draw_grid_cell(ui, &chart, size);
                            ui.add_space(CELL_SPACING);
                        }
                    });
                    ui.add_space(CELL_SPACING);
                }
            });
    }
}
