//! Dashboard Panel Widget
//! Central scrollable area: data preview, KPI metrics, both charts and the
//! download buttons.

use crate::charts::ChartPlotter;
use crate::dashboard::{DashboardView, DataPreview, Metric};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;
const METRIC_WIDTH: f32 = 220.0;

/// Actions triggered from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    None,
    ExportCsv,
    SaveTrendPng,
    SaveCountryPng,
}

pub struct DashboardPanel;

impl DashboardPanel {
    pub fn show(
        ui: &mut egui::Ui,
        title: &str,
        view: Option<&DashboardView>,
        error: Option<&str>,
    ) -> DashboardAction {
        let mut action = DashboardAction::None;

        ui.label(RichText::new(title).size(26.0).strong());
        ui.add_space(SECTION_SPACING);

        if let Some(error) = error {
            ui.label(
                RichText::new(format!("Error: {}", error))
                    .size(14.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
            return action;
        }

        let Some(view) = view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Loading data...").size(20.0));
            });
            return action;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::draw_preview(ui, &view.preview);
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("Key Performance Indicators").size(20.0).strong());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    for metric in &view.metrics {
                        Self::draw_metric(ui, metric);
                    }
                });
                ui.add_space(SECTION_SPACING);

                ChartPlotter::draw_sales_trend(ui, &view.by_day);
                if ui
                    .add_enabled(!view.by_day.is_empty(), egui::Button::new("💾 Save PNG"))
                    .clicked()
                {
                    action = DashboardAction::SaveTrendPng;
                }
                ui.add_space(SECTION_SPACING);

                ChartPlotter::draw_sales_by_country(ui, &view.by_country);
                if ui
                    .add_enabled(!view.by_country.is_empty(), egui::Button::new("💾 Save PNG"))
                    .clicked()
                {
                    action = DashboardAction::SaveCountryPng;
                }
                ui.add_space(SECTION_SPACING);

                let button = egui::Button::new(
                    RichText::new("Download Filtered Data as CSV").size(14.0),
                )
                .min_size(egui::vec2(260.0, 30.0));
                if ui.add(button).clicked() {
                    action = DashboardAction::ExportCsv;
                }
                // Room for the pinned footer
                ui.add_space(60.0);
            });

        action
    }

    fn draw_preview(ui: &mut egui::Ui, preview: &DataPreview) {
        ui.label(
            RichText::new(format!("Filtered rows: {}", preview.total_rows))
                .size(12.0)
                .color(Color32::GRAY),
        );
        ui.add_space(4.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::horizontal().id_salt("preview_scroll").show(ui, |ui| {
                    egui::Grid::new("data_preview")
                        .striped(true)
                        .min_col_width(60.0)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            for column in &preview.columns {
                                ui.label(RichText::new(column).strong().size(12.0));
                            }
                            ui.end_row();

                            for row in &preview.rows {
                                for cell in row {
                                    ui.label(RichText::new(cell).size(12.0));
                                }
                                ui.end_row();
                            }
                        });
                });
            });
    }

    fn draw_metric(ui: &mut egui::Ui, metric: &Metric) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(METRIC_WIDTH);
                ui.vertical(|ui| {
                    ui.label(RichText::new(metric.label).size(13.0).color(Color32::GRAY));
                    ui.label(RichText::new(&metric.value).size(24.0).strong());
                });
            });
    }
}
