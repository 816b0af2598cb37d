//! Static Chart Renderer
//! Renders the trend line and the country bars to PNG files with plotters,
//! for the "Save PNG" buttons under each chart.

use crate::charts::ChartPlotter;
use crate::data::{CountrySales, DailySales};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const BLUE: RGBColor = RGBColor(52, 152, 219);
const GREEN: RGBColor = RGBColor(46, 204, 113);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw")]
    NoData,
    #[error("Chart drawing failed: {0}")]
    Drawing(String),
}

fn drawing_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Value axis range with headroom; always contains zero.
    pub fn value_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if min == max {
            return (0.0, 1.0);
        }
        let pad = (max - min) * 0.1;
        (if min < 0.0 { min - pad } else { 0.0 }, max + pad)
    }

    /// "Sales Trend Over Time" as a line chart.
    pub fn render_sales_trend(
        path: &Path,
        by_day: &[DailySales],
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if by_day.is_empty() {
            return Err(RenderError::NoData);
        }

        let points = Self::trend_series(by_day);
        let (x_min, x_max) = Self::day_range(&points);
        let (y_min, y_max) = Self::value_range(by_day.iter().map(|d| d.total));

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Sales Trend Over Time", ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc("InvoiceDate")
            .y_desc("TotalPrice")
            .x_labels(by_day.len().clamp(2, 10))
            .x_label_formatter(&|x| ChartPlotter::x_to_day_label(*x))
            .draw()
            .map_err(drawing_error)?;

        Self::draw_trend_series(&mut chart, &points)?;

        root.present().map_err(drawing_error)?;
        info!(path = %path.display(), days = by_day.len(), "Saved trend chart");
        Ok(())
    }

    /// Trend points on a calendar axis: days since the Unix epoch.
    pub fn trend_series(by_day: &[DailySales]) -> Vec<(f64, f64)> {
        by_day
            .iter()
            .map(|d| (ChartPlotter::day_to_x(d.day), d.total))
            .collect()
    }

    /// x axis range of the trend points, one day either side of a lone point.
    pub fn day_range(points: &[(f64, f64)]) -> (f64, f64) {
        let (min, max) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| {
                (lo.min(x), hi.max(x))
            });
        if !min.is_finite() {
            return (0.0, 1.0);
        }
        if min == max {
            return (min - 1.0, max + 1.0);
        }
        (min, max)
    }

    /// Line through the points with a marker on each, so a single day still shows.
    fn draw_trend_series<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        points: &[(f64, f64)],
    ) -> Result<(), RenderError> {
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                BLUE.stroke_width(2),
            ))
            .map_err(drawing_error)?;
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 4, BLUE.filled())))
            .map_err(drawing_error)?;
        Ok(())
    }

    /// "Sales by Country" as a bar chart.
    pub fn render_sales_by_country(
        path: &Path,
        by_country: &[CountrySales],
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if by_country.is_empty() {
            return Err(RenderError::NoData);
        }

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let (y_min, y_max) = Self::value_range(by_country.iter().map(|c| c.total));
        let n = by_country.len();

        let mut chart = ChartBuilder::on(&root)
            .caption("Sales by Country", ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(90)
            .y_label_area_size(80)
            .build_cartesian_2d(0f64..n as f64, y_min..y_max)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Country")
            .y_desc("TotalPrice")
            .x_labels(n * 2 + 1)
            .x_label_formatter(&|x| {
                // Labels sit at bar centres (i + 0.5)
                let idx = (x - 0.5).round();
                if (x - 0.5 - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                by_country
                    .get(idx as usize)
                    .map(|c| c.country.clone())
                    .unwrap_or_default()
            })
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(by_country.iter().enumerate().map(|(i, c)| {
                let x = i as f64;
                Rectangle::new([(x + 0.15, 0.0), (x + 0.85, c.total)], GREEN.filled())
            }))
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        info!(path = %path.display(), countries = n, "Saved country chart");
        Ok(())
    }
}
