//! Chart Plotter Module
//! Interactive sales charts using egui_plot.

use crate::dashboard::format_currency;
use crate::data::{epoch_days_to_date, CountrySales, DailySales};
use chrono::{Datelike, NaiveDate};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

pub const TREND_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const BAR_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green

const CHART_HEIGHT: f32 = 320.0;

/// Creates the two dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Days since the Unix epoch, used as the x coordinate of the trend line.
    pub fn day_to_x(day: NaiveDate) -> f64 {
        (day.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) as f64
    }

    pub fn x_to_day_label(x: f64) -> String {
        epoch_days_to_date(x.round() as i32)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn trend_points(by_day: &[DailySales]) -> Vec<[f64; 2]> {
        by_day
            .iter()
            .map(|d| [Self::day_to_x(d.day), d.total])
            .collect()
    }

    /// Line chart of summed TotalPrice per day.
    pub fn draw_sales_trend(ui: &mut egui::Ui, by_day: &[DailySales]) {
        ui.label(RichText::new("Sales Trend Over Time").size(16.0).strong());

        let points = Self::trend_points(by_day);

        Plot::new("sales_trend")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("InvoiceDate")
            .y_axis_label("TotalPrice")
            .x_axis_formatter(|mark, _range| Self::x_to_day_label(mark.value))
            .label_formatter(|_name, value| {
                format!(
                    "{}\n{}",
                    Self::x_to_day_label(value.x),
                    format_currency(value.y)
                )
            })
            .show(ui, |plot_ui| {
                if points.is_empty() {
                    return;
                }
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(TREND_COLOR)
                        .width(2.0)
                        .name("TotalPrice"),
                );
                // A single day has no segment to draw
                if points.len() == 1 {
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(points.iter().copied()))
                            .radius(4.0)
                            .color(TREND_COLOR),
                    );
                }
            });
    }

    /// Bar chart of summed TotalPrice per country.
    pub fn draw_sales_by_country(ui: &mut egui::Ui, by_country: &[CountrySales]) {
        ui.label(RichText::new("Sales by Country").size(16.0).strong());

        let labels: Vec<String> = by_country.iter().map(|c| c.country.clone()).collect();
        let bars: Vec<Bar> = by_country
            .iter()
            .enumerate()
            .map(|(i, c)| Bar::new(i as f64, c.total).name(&c.country).width(0.7))
            .collect();

        Plot::new("sales_by_country")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Country")
            .y_axis_label("TotalPrice")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("TotalPrice"));
            });
    }
}

// 1970-01-01 counted from 0001-01-01 (day 1)
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_x_round_trip() {
        let day = NaiveDate::from_ymd_opt(2010, 12, 1).unwrap();
        let x = ChartPlotter::day_to_x(day);
        assert_eq!(ChartPlotter::x_to_day_label(x), "2010-12-01");
        assert_eq!(
            ChartPlotter::day_to_x(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            0.0
        );
    }

    #[test]
    fn test_trend_points() {
        let by_day = vec![
            DailySales {
                day: NaiveDate::from_ymd_opt(1970, 1, 2).unwrap(),
                total: 10.0,
            },
            DailySales {
                day: NaiveDate::from_ymd_opt(1970, 1, 4).unwrap(),
                total: 2.5,
            },
        ];
        assert_eq!(
            ChartPlotter::trend_points(&by_day),
            vec![[1.0, 10.0], [3.0, 2.5]]
        );
    }
}
