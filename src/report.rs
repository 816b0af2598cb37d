//! Plain-text report for headless runs.

use crate::dashboard::{format_currency, DashboardView};
use crate::data::{FilterParams, SalesTable};
use chrono::NaiveDate;
use std::io::{self, Write};

/// Filter selection from optional command-line bounds; missing bounds fall
/// back to the table's first and last day. `None` for an empty table with
/// no explicit bounds.
pub fn params_from_bounds(
    table: &SalesTable,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    countries: Vec<String>,
) -> Option<FilterParams> {
    let range = table.date_range();
    let start = start.or(range.map(|(first, _)| first))?;
    let end = end.or(range.map(|(_, last)| last))?;
    Some(FilterParams::from_dates(start, end, countries))
}

pub fn write_report<W: Write>(out: &mut W, view: &DashboardView) -> io::Result<()> {
    writeln!(out, "Sales Dashboard for E-commerce")?;
    writeln!(
        out,
        "Range: {} .. {}",
        view.params.start.format("%Y-%m-%d %H:%M:%S"),
        view.params.end.format("%Y-%m-%d %H:%M:%S")
    )?;
    if view.params.countries.is_empty() {
        writeln!(out, "Countries: all")?;
    } else {
        writeln!(out, "Countries: {}", view.params.countries.join(", "))?;
    }
    writeln!(out, "Rows: {}", view.preview.total_rows)?;
    writeln!(out)?;

    writeln!(out, "Key Performance Indicators")?;
    for metric in &view.metrics {
        writeln!(out, "  {:<16} {}", metric.label, metric.value)?;
    }
    writeln!(out)?;

    writeln!(out, "Sales Trend Over Time")?;
    for day in &view.by_day {
        writeln!(out, "  {}  {:>16}", day.day, format_currency(day.total))?;
    }
    writeln!(out)?;

    writeln!(out, "Sales by Country")?;
    for country in &view.by_country {
        writeln!(out, "  {:<24} {:>16}", country.country, format_currency(country.total))?;
    }
    Ok(())
}
