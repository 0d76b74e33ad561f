//! Chart Plotter Module
//! Interactive trend charts using egui_plot.

use egui::{Color32, RichText};
use egui_plot::{Line, Plot, PlotPoints};

/// Trend line color, matching the static renderer.
pub const LINE_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

/// Everything one interactive trend chart needs.
#[derive(Clone, Copy)]
pub struct TrendChart<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub data: &'a [f64],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> TrendChart<'a> {
    /// Chart with the default "Days"/"Cases" axis labels.
    pub fn new(id: &'a str, title: &'a str, data: &'a [f64]) -> Self {
        Self {
            id,
            title,
            data,
            x_label: "Days",
            y_label: "Cases",
        }
    }
}

/// Draws trend charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Full size line chart with title and grid.
    pub fn draw_trend_chart(ui: &mut egui::Ui, chart: &TrendChart<'_>, height: f32) {
        ui.label(RichText::new(chart.title).size(16.0).strong());

        Plot::new(chart.id)
            .height(height)
            .x_axis_label(chart.x_label)
            .y_axis_label(chart.y_label)
            .show_grid(true)
            .include_y(0.0)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(Self::plot_points(chart.data))
                        .color(LINE_COLOR)
                        .width(1.5)
                        .name(chart.title),
                );
            });
    }

    /// Small-multiples cell: no grid, region name drawn above the plot,
    /// no interaction.
    pub fn draw_grid_cell(ui: &mut egui::Ui, chart: &TrendChart<'_>, size: egui::Vec2) {
        ui.vertical(|ui| {
            ui.set_width(size.x);
            ui.label(RichText::new(chart.title).size(11.0));
            Plot::new(chart.id)
                .width(size.x)
                .height(size.y)
                .x_axis_label(chart.x_label)
                .y_axis_label(chart.y_label)
                .show_grid(false)
                .include_y(0.0)
                .allow_zoom(false)
                .allow_drag(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(Self::plot_points(chart.data))
                            .color(LINE_COLOR)
                            .width(1.0),
                    );
                });
        });
    }

    fn plot_points(data: &[f64]) -> PlotPoints {
        data.iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, v])
            .collect()
    }
}
