//! Control Panel Widget
//! Left side panel: view mode, metric and region selection.

use crate::stats::Metric;
use egui::{Color32, ComboBox, RichText, ScrollArea};

/// What the chart viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// One region, one metric, full size.
    #[default]
    Single,
    /// Confirmed cases of every region as small multiples.
    Grid,
}

/// User selections driving the chart viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub view_mode: ViewMode,
    pub metric: Metric,
    pub selected_region: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::default(),
            metric: Metric::Confirmed,
            selected_region: 0,
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: ViewSettings,
    regions: Vec<String>,
    report_count: usize,
}

impl ControlPanel {
    pub fn new(regions: Vec<String>, report_count: usize) -> Self {
        Self {
            settings: ViewSettings::default(),
            regions,
            report_count,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 Case Trends")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new(format!("{} daily reports", self.report_count))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();

        ui.label(RichText::new("View").size(14.0).strong());
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.settings.view_mode, ViewMode::Single, "Single region");
            ui.selectable_value(&mut self.settings.view_mode, ViewMode::Grid, "All regions");
        });
        ui.add_space(5.0);

        ui.add_enabled_ui(self.settings.view_mode == ViewMode::Single, |ui| {
            ComboBox::from_label("Metric")
                .selected_text(self.settings.metric.to_string())
                .show_ui(ui, |ui| {
                    for metric in Metric::ALL {
                        ui.selectable_value(&mut self.settings.metric, metric, metric.to_string());
                    }
                });
        });
        ui.add_space(5.0);
        ui.separator();

        ui.label(RichText::new("Regions").size(14.0).strong());
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, region) in self.regions.iter().enumerate() {
                    let selected = self.settings.selected_region == index;
                    if ui.selectable_label(selected, region).clicked() {
                        self.settings.selected_region = index;
                        self.settings.view_mode = ViewMode::Single;
                    }
                }
            });
    }
}
