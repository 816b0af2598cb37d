//! Filter & Aggregate Module
//! Applies the sidebar filters to the loaded table and builds the grouped
//! sales series shown in the charts.

use crate::data::{epoch_days_to_date, SalesTable, COUNTRY, INVOICE_DATE, TOTAL_PRICE};
use crate::stats::SalesKpis;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

const DAY: &str = "Day";

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Day {0} is outside the supported calendar")]
    DayOutOfRange(i32),
}

/// Current sidebar selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Inclusive lower bound on InvoiceDate
    pub start: NaiveDateTime,
    /// Inclusive upper bound on InvoiceDate
    pub end: NaiveDateTime,
    /// Empty means every country
    pub countries: Vec<String>,
}

impl FilterParams {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, countries: Vec<String>) -> Self {
        Self {
            start,
            end,
            countries,
        }
    }

    /// Bounds from picked calendar days. Both days resolve to midnight, so
    /// rows later on the end day fall outside the range.
    pub fn from_dates(start: NaiveDate, end: NaiveDate, countries: Vec<String>) -> Self {
        Self::new(
            start.and_time(chrono::NaiveTime::MIN),
            end.and_time(chrono::NaiveTime::MIN),
            countries,
        )
    }

    /// The initial selection: first to last day of the data, all countries.
    pub fn initial(table: &SalesTable) -> Option<Self> {
        table
            .date_range()
            .map(|(start, end)| Self::from_dates(start, end, Vec::new()))
    }
}

/// Sales total for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub day: NaiveDate,
    pub total: f64,
}

/// Sales total for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySales {
    pub country: String,
    pub total: f64,
}

/// Everything derived from one filter selection.
#[derive(Debug, Clone)]
pub struct FilteredView {
    pub subset: DataFrame,
    pub kpis: SalesKpis,
    /// Ascending by day
    pub by_day: Vec<DailySales>,
    /// Ascending by country name
    pub by_country: Vec<CountrySales>,
}

/// Rows of `df` inside the date bounds and, when given, the country set.
///
/// `df` may itself be a previous subset.
pub fn filter_subset(df: &DataFrame, params: &FilterParams) -> Result<DataFrame, FilterError> {
    let start = params.start.and_utc().timestamp_millis();
    let end = params.end.and_utc().timestamp_millis();

    let invoice_ms = || col(INVOICE_DATE).cast(DataType::Int64);
    let mut predicate = invoice_ms()
        .gt_eq(lit(start))
        .and(invoice_ms().lt_eq(lit(end)));

    // Exact, case-sensitive match against any selected country
    if let Some(countries) = params
        .countries
        .iter()
        .map(|c| col(COUNTRY).eq(lit(c.as_str())))
        .reduce(|acc, e| acc.or(e))
    {
        predicate = predicate.and(countries);
    }

    let subset = df.clone().lazy().filter(predicate).collect()?;
    Ok(subset)
}

/// Filter the table and compute KPIs plus both grouped aggregates.
pub fn filter_and_aggregate(
    table: &SalesTable,
    params: &FilterParams,
) -> Result<FilteredView, FilterError> {
    let subset = filter_subset(table.dataframe(), params)?;
    let kpis = SalesKpis::from_subset(&subset)?;
    let by_day = sales_by_day(&subset)?;
    let by_country = sales_by_country(&subset)?;

    debug!(
        start = %params.start,
        end = %params.end,
        countries = params.countries.len(),
        rows = subset.height(),
        days = by_day.len(),
        "Filtered sales"
    );

    Ok(FilteredView {
        subset,
        kpis,
        by_day,
        by_country,
    })
}

fn sales_by_day(subset: &DataFrame) -> Result<Vec<DailySales>, FilterError> {
    let grouped = subset
        .clone()
        .lazy()
        .group_by([col(INVOICE_DATE).cast(DataType::Date).alias(DAY)])
        .agg([col(TOTAL_PRICE).sum()])
        .sort_by_exprs([col(DAY)], SortMultipleOptions::default())
        .collect()?;

    let days = grouped.column(DAY)?.cast(&DataType::Int32)?;
    let totals = grouped.column(TOTAL_PRICE)?.f64()?;

    days.i32()?
        .into_iter()
        .zip(totals.into_iter())
        .filter_map(|(day, total)| day.map(|d| (d, total.unwrap_or(0.0))))
        .map(|(d, total)| -> Result<DailySales, FilterError> {
            let day = epoch_days_to_date(d).ok_or(FilterError::DayOutOfRange(d))?;
            Ok(DailySales { day, total })
        })
        .collect()
}

fn sales_by_country(subset: &DataFrame) -> Result<Vec<CountrySales>, FilterError> {
    let grouped = subset
        .clone()
        .lazy()
        .group_by([col(COUNTRY)])
        .agg([col(TOTAL_PRICE).sum()])
        .sort_by_exprs([col(COUNTRY)], SortMultipleOptions::default())
        .collect()?;

    let countries = grouped.column(COUNTRY)?.str()?;
    let totals = grouped.column(TOTAL_PRICE)?.f64()?;

    Ok(countries
        .into_iter()
        .zip(totals.into_iter())
        .filter_map(|(country, total)| {
            country.map(|c| CountrySales {
                country: c.to_string(),
                total: total.unwrap_or(0.0),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataLoader, LoadOptions};

    fn table() -> SalesTable {
        let csv = "InvoiceNo,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n\
                   1,2,2021-01-01 00:00,5.0,100,UK\n\
                   2,1,2021-01-02 00:00,10.0,200,France\n\
                   3,4,2021-01-02 15:30,1.5,100,UK\n\
                   3,1,2021-01-03 09:00,3.0,100,uk\n";
        DataLoader::parse_csv_bytes(csv.as_bytes(), &LoadOptions::default()).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    #[test]
    fn test_end_day_resolves_to_midnight() {
        let params = FilterParams::from_dates(day(1), day(2), Vec::new());
        let subset = filter_subset(table().dataframe(), &params).unwrap();
        // 15:30 on the end day is past the midnight bound
        assert_eq!(subset.height(), 2);
    }

    #[test]
    fn test_country_match_is_case_sensitive() {
        let params = FilterParams::from_dates(day(1), day(3), vec!["UK".to_string()]);
        let subset = filter_subset(table().dataframe(), &params).unwrap();
        let countries: Vec<&str> = subset
            .column(COUNTRY)
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(countries, vec!["UK", "UK"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let params = FilterParams::from_dates(day(1), day(3), vec!["UK".to_string()]);
        let once = filter_subset(table().dataframe(), &params).unwrap();
        let twice = filter_subset(&once, &params).unwrap();
        assert!(once.equals(&twice));
    }

    #[test]
    fn test_by_day_sums_and_sorts() {
        let table = table();
        let params = FilterParams::new(
            day(1).and_hms_opt(0, 0, 0).unwrap(),
            day(3).and_hms_opt(23, 59, 59).unwrap(),
            Vec::new(),
        );
        let view = filter_and_aggregate(&table, &params).unwrap();

        assert_eq!(
            view.by_day,
            vec![
                DailySales { day: day(1), total: 10.0 },
                DailySales { day: day(2), total: 16.0 },
                DailySales { day: day(3), total: 3.0 },
            ]
        );
    }

    #[test]
    fn test_by_country_sorted_by_name() {
        let table = table();
        let params = FilterParams::new(
            day(1).and_hms_opt(0, 0, 0).unwrap(),
            day(3).and_hms_opt(23, 59, 59).unwrap(),
            Vec::new(),
        );
        let view = filter_and_aggregate(&table, &params).unwrap();

        let order: Vec<&str> = view.by_country.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(order, vec!["France", "UK", "uk"]);
        assert_eq!(view.by_country[0].total, 10.0);
        assert_eq!(view.by_country[1].total, 16.0);
    }

    #[test]
    fn test_initial_params_cover_data_range() {
        let params = FilterParams::initial(&table()).unwrap();
        assert_eq!(params.start, day(1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(params.end, day(3).and_hms_opt(0, 0, 0).unwrap());
        assert!(params.countries.is_empty());
    }
}
