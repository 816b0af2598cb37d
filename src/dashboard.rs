//! Dashboard view model
//! One `render` call per filter change turns the memoized table and the
//! current selection into everything the window shows.

use crate::data::{
    filter_and_aggregate, CountrySales, CsvExport, DailySales, ExportError, FilterError,
    FilterParams, SalesTable,
};
use crate::stats::SalesKpis;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Head of the subset as display strings.
#[derive(Debug, Clone, Default)]
pub struct DataPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Row count of the whole subset
    pub total_rows: usize,
}

/// A labeled metric card.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

/// Everything rendered for one filter selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub params: FilterParams,
    pub preview: DataPreview,
    pub metrics: [Metric; 3],
    pub by_day: Vec<DailySales>,
    pub by_country: Vec<CountrySales>,
    pub export: CsvExport,
}

/// Build the view for `params` from the loaded table.
pub fn render(
    table: &SalesTable,
    params: &FilterParams,
    preview_rows: usize,
) -> Result<DashboardView, DashboardError> {
    let filtered = filter_and_aggregate(table, params)?;
    let preview = build_preview(&filtered.subset, preview_rows)?;
    let export = CsvExport::from_subset(&filtered.subset)?;

    Ok(DashboardView {
        params: params.clone(),
        preview,
        metrics: metrics(&filtered.kpis),
        by_day: filtered.by_day,
        by_country: filtered.by_country,
        export,
    })
}

pub fn metrics(kpis: &SalesKpis) -> [Metric; 3] {
    [
        Metric {
            label: "Total Sales",
            value: format_currency(kpis.total_sales),
        },
        Metric {
            label: "Avg Order Value",
            value: format_currency(kpis.avg_order_value),
        },
        Metric {
            label: "Total Orders",
            value: kpis.num_orders.to_string(),
        },
    ]
}

fn build_preview(subset: &DataFrame, n: usize) -> PolarsResult<DataPreview> {
    let head = subset.head(Some(n));
    let columns = head
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::with_capacity(head.height());
    for i in 0..head.height() {
        let row = head
            .get_columns()
            .iter()
            .map(|col| col.get(i).map(|v| format_cell(&v)))
            .collect::<PolarsResult<Vec<String>>>()?;
        rows.push(row);
    }

    Ok(DataPreview {
        columns,
        rows,
        total_rows: subset.height(),
    })
}

fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// `$` amount with two decimals and comma thousands separators.
/// NaN renders as `$nan`.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "$nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "$inf" } else { "$-inf" }.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("${}{}.{}", sign, group_thousands(int_part), frac_part)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataLoader, LoadOptions};
    use chrono::NaiveDate;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(10.0), "$10.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-27.5), "$-27.50");
        assert_eq!(format_currency(f64::NAN), "$nan");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    #[test]
    fn test_render_preview_is_capped() {
        let mut csv = String::from("InvoiceNo,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n");
        for i in 0..8 {
            csv.push_str(&format!("{},1,2021-01-01,2.0,1,UK\n", 1000 + i));
        }
        let table = DataLoader::parse_csv_bytes(csv.as_bytes(), &LoadOptions::default()).unwrap();
        let day = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let params = FilterParams::from_dates(day, day, Vec::new());

        let view = render(&table, &params, 5).unwrap();
        assert_eq!(view.preview.rows.len(), 5);
        assert_eq!(view.preview.total_rows, 8);
        assert_eq!(view.preview.columns.len(), 7);
        assert_eq!(view.preview.rows[0][0], "1000");
        assert_eq!(view.metrics[0].value, "$16.00");
        assert_eq!(view.metrics[1].value, "$2.00");
        assert_eq!(view.metrics[2].value, "8");
        assert_eq!(view.export.rows, 8);
    }

    #[test]
    fn test_render_empty_selection() {
        let csv = "InvoiceNo,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n\
                   1,1,2021-01-05,2.0,1,UK\n";
        let table = DataLoader::parse_csv_bytes(csv.as_bytes(), &LoadOptions::default()).unwrap();
        let params = FilterParams::from_dates(
            NaiveDate::from_ymd_opt(2021, 1, 6).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            Vec::new(),
        );

        let view = render(&table, &params, 5).unwrap();
        assert!(view.preview.rows.is_empty());
        assert_eq!(view.metrics[0].value, "$0.00");
        assert_eq!(view.metrics[1].value, "$nan");
        assert_eq!(view.metrics[2].value, "0");
        assert!(view.by_day.is_empty());
        assert!(view.by_country.is_empty());
    }
}
