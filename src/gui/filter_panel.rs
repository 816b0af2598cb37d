//! Filter Panel Widget
//! Left sidebar with the date range pickers and the country multi-select.

use crate::data::{FilterParams, SalesTable};
use chrono::NaiveDate;
use egui::{Color32, RichText, ScrollArea};
use egui_extras::DatePickerButton;

/// Sidebar state: the current filter inputs plus load status.
pub struct FilterPanel {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub countries: Vec<String>,
    pub selected: Vec<bool>,
    pub status: String,
    pub enabled: bool,
}

impl Default for FilterPanel {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            start: today,
            end: today,
            countries: Vec::new(),
            selected: Vec::new(),
            status: "Ready".to_string(),
            enabled: false,
        }
    }
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset inputs to the loaded table: full date range, no countries.
    pub fn reset_for_table(&mut self, table: &SalesTable) {
        if let Some((start, end)) = table.date_range() {
            self.start = start;
            self.end = end;
        }
        self.countries = table.countries().to_vec();
        self.selected = vec![false; self.countries.len()];
        self.enabled = true;
    }

    pub fn selected_countries(&self) -> Vec<String> {
        self.countries
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, &selected)| selected)
            .map(|(country, _)| country.clone())
            .collect()
    }

    pub fn params(&self) -> FilterParams {
        FilterParams::from_dates(self.start, self.end, self.selected_countries())
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the panel. Returns true when any filter input changed.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        ui.add_space(5.0);
        ui.label(RichText::new("Filters").size(20.0).strong());
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        ui.add_enabled_ui(self.enabled, |ui| {
            let label_width = 80.0;

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Start Date"));
                changed |= ui
                    .add(DatePickerButton::new(&mut self.start).id_salt("start_date"))
                    .changed();
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("End Date"));
                changed |= ui
                    .add(DatePickerButton::new(&mut self.end).id_salt("end_date"))
                    .changed();
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.label(RichText::new("Select Country").size(14.0).strong());
            ui.add_space(5.0);

            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                        for (i, country) in self.countries.iter().enumerate() {
                            if let Some(flag) = self.selected.get_mut(i) {
                                changed |= ui.checkbox(flag, country).changed();
                            }
                        }
                    });
                });

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.small_button("Clear All").clicked() {
                    self.selected.iter_mut().for_each(|v| *v = false);
                    changed = true;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataLoader, LoadOptions};

    #[test]
    fn test_reset_and_selection() {
        let csv = "InvoiceNo,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n\
                   1,1,2021-01-01 10:00,2.0,1,UK\n\
                   2,1,2021-01-09 18:00,2.0,1,France\n";
        let table = DataLoader::parse_csv_bytes(csv.as_bytes(), &LoadOptions::default()).unwrap();

        let mut panel = FilterPanel::new();
        panel.reset_for_table(&table);
        assert_eq!(panel.start, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(panel.end, NaiveDate::from_ymd_opt(2021, 1, 9).unwrap());
        assert!(panel.params().countries.is_empty());

        panel.selected[1] = true;
        assert_eq!(panel.selected_countries(), vec!["France".to_string()]);
    }
}
