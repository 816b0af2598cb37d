//! CSV Data Loader Module
//! Reads the transaction CSV with Polars, drops rows without a customer,
//! derives TotalPrice and parses InvoiceDate into a Datetime column.

use crate::config::{AppConfig, SourceEncoding};
use crate::data::{
    millis_to_datetime, COUNTRY, CUSTOMER_ID, INVOICE_DATE, INVOICE_NO, QUANTITY, TOTAL_PRICE,
    UNIT_PRICE,
};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Source is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Unparseable InvoiceDate {value:?}")]
    InvalidDate { value: String },
}

/// Loader settings taken from the application config.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub encoding: SourceEncoding,
    pub date_formats: Vec<String>,
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for LoadOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            encoding: config.encoding,
            date_formats: config.date_formats.clone(),
            infer_schema_length: config.infer_schema_length,
        }
    }
}

/// The loaded, immutable transaction table.
///
/// Every row has a CustomerID, a TotalPrice equal to Quantity × UnitPrice
/// and a millisecond Datetime InvoiceDate.
#[derive(Debug, Clone)]
pub struct SalesTable {
    df: DataFrame,
    countries: Vec<String>,
    date_bounds: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl SalesTable {
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Distinct countries in order of first appearance.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Earliest and latest InvoiceDate, `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.date_bounds
    }

    /// Calendar days of the earliest and latest InvoiceDate.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_bounds.map(|(min, max)| (min.date(), max.date()))
    }
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load the CSV file at `path`.
    pub fn load_csv(path: &Path, options: &LoadOptions) -> Result<SalesTable, LoaderError> {
        debug!(path = %path.display(), "Reading CSV");
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse_csv_bytes(&bytes, options)?;
        info!(
            path = %path.display(),
            rows = table.height(),
            countries = table.countries().len(),
            "Loaded sales data"
        );
        Ok(table)
    }

    /// Build a table from raw CSV bytes in the configured encoding.
    pub fn parse_csv_bytes(bytes: &[u8], options: &LoadOptions) -> Result<SalesTable, LoaderError> {
        let text = decode(bytes, options.encoding)?;

        // Identifier-like columns stay textual: InvoiceNo carries "C" prefixes
        // for cancellations and dates are parsed below.
        let overwrite = Schema::from_iter([
            Field::new(INVOICE_NO.into(), DataType::String),
            Field::new(CUSTOMER_ID.into(), DataType::String),
            Field::new(COUNTRY.into(), DataType::String),
            Field::new(INVOICE_DATE.into(), DataType::String),
        ]);

        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(options.infer_schema_length))
            .with_schema_overwrite(Some(Arc::new(overwrite)))
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()?;
        let raw_height = raw.height();

        let mut df = raw
            .lazy()
            .filter(
                col(CUSTOMER_ID)
                    .is_not_null()
                    .and(col(CUSTOMER_ID).str().len_bytes().gt(lit(0))),
            )
            .with_column(
                (col(QUANTITY).cast(DataType::Float64) * col(UNIT_PRICE).cast(DataType::Float64))
                    .alias(TOTAL_PRICE),
            )
            .collect()?;
        debug!(
            dropped = raw_height - df.height(),
            "Dropped rows without CustomerID"
        );

        let millis = parse_invoice_dates(&df, &options.date_formats)?;
        let date_bounds = match (millis.iter().min(), millis.iter().max()) {
            (Some(&min), Some(&max)) => millis_to_datetime(min).zip(millis_to_datetime(max)),
            _ => None,
        };

        df.with_column(
            Int64Chunked::from_vec(INVOICE_DATE.into(), millis)
                .into_datetime(TimeUnit::Milliseconds, None)
                .into_series(),
        )?;

        let countries = distinct_in_order(&df, COUNTRY)?;

        Ok(SalesTable {
            df,
            countries,
            date_bounds,
        })
    }
}

fn decode(bytes: &[u8], encoding: SourceEncoding) -> Result<String, LoaderError> {
    match encoding {
        // Latin-1 maps every byte to the code point of the same value
        SourceEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        SourceEncoding::Utf8 => Ok(String::from_utf8(bytes.to_vec())?),
    }
}

/// Parse every InvoiceDate into epoch milliseconds. Any failure is fatal.
fn parse_invoice_dates(df: &DataFrame, formats: &[String]) -> Result<Vec<i64>, LoaderError> {
    let values: Vec<Option<&str>> = df.column(INVOICE_DATE)?.str()?.into_iter().collect();

    values
        .par_iter()
        .map(|value| {
            value
                .and_then(|v| parse_timestamp(v, formats))
                .map(|dt| dt.and_utc().timestamp_millis())
                .ok_or_else(|| LoaderError::InvalidDate {
                    value: value.unwrap_or_default().to_string(),
                })
        })
        .collect()
}

/// Try each format in order; date-only formats resolve to midnight.
pub fn parse_timestamp(value: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let value = value.trim();
    formats.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(value, fmt).ok().or_else(|| {
            NaiveDate::parse_from_str(value, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    })
}

fn distinct_in_order(df: &DataFrame, column: &str) -> Result<Vec<String>, LoaderError> {
    let mut seen = HashSet::new();
    Ok(df
        .column(column)?
        .str()?
        .into_iter()
        .flatten()
        .filter(|v| seen.insert(*v))
        .map(|v| v.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n";

    fn load(body: &str) -> Result<SalesTable, LoaderError> {
        let csv = format!("{HEADER}{body}");
        DataLoader::parse_csv_bytes(csv.as_bytes(), &LoadOptions::default())
    }

    #[test]
    fn test_drops_rows_without_customer() {
        let table = load(
            "536365,85123A,HEART HOLDER,6,12/1/2010 8:26,2.55,17850,United Kingdom\n\
             536366,71053,LANTERN,6,12/1/2010 8:28,3.39,,United Kingdom\n\
             536367,22633,HAND WARMER,2,12/2/2010 9:00,1.85,13047,France\n",
        )
        .unwrap();

        assert_eq!(table.height(), 2);
        let ids = table.dataframe().column(CUSTOMER_ID).unwrap();
        assert_eq!(ids.null_count(), 0);
    }

    #[test]
    fn test_total_price_is_quantity_times_price() {
        let table = load(
            "536365,85123A,HEART HOLDER,6,12/1/2010 8:26,2.55,17850,United Kingdom\n\
             C536379,D,Discount,-1,12/1/2010 9:41,27.5,14527,United Kingdom\n",
        )
        .unwrap();

        let df = table.dataframe();
        let totals: Vec<f64> = df
            .column(TOTAL_PRICE)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(totals, vec![6.0 * 2.55, -1.0 * 27.5]);
    }

    #[test]
    fn test_invoice_date_is_datetime() {
        let table =
            load("536365,85123A,HEART HOLDER,6,12/1/2010 8:26,2.55,17850,United Kingdom\n").unwrap();

        let dtype = table.dataframe().column(INVOICE_DATE).unwrap().dtype().clone();
        assert_eq!(dtype, DataType::Datetime(TimeUnit::Milliseconds, None));

        let (min, max) = table.date_bounds().unwrap();
        let expected = NaiveDate::from_ymd_opt(2010, 12, 1)
            .unwrap()
            .and_hms_opt(8, 26, 0)
            .unwrap();
        assert_eq!(min, expected);
        assert_eq!(max, expected);
    }

    #[test]
    fn test_bad_date_is_fatal() {
        let err = load("536365,85123A,HEART HOLDER,6,not a date,2.55,17850,United Kingdom\n")
            .unwrap_err();
        assert!(matches!(err, LoaderError::InvalidDate { ref value } if value == "not a date"));
    }

    #[test]
    fn test_countries_in_first_appearance_order() {
        let table = load(
            "1,A,x,1,2021-01-01,1.0,1,Spain\n\
             2,A,x,1,2021-01-01,1.0,1,France\n\
             3,A,x,1,2021-01-01,1.0,1,Spain\n",
        )
        .unwrap();
        assert_eq!(table.countries(), ["Spain".to_string(), "France".to_string()]);
    }

    #[test]
    fn test_latin1_decoding() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"1,A,CAF\xC9 MUG,1,2021-01-01,1.0,1,France\n");

        let table = DataLoader::parse_csv_bytes(&bytes, &LoadOptions::default()).unwrap();
        let description = table.dataframe().column("Description").unwrap();
        assert_eq!(description.str().unwrap().get(0), Some("CAFÉ MUG"));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"1,A,CAF\xC9 MUG,1,2021-01-01,1.0,1,France\n");
        let options = LoadOptions {
            encoding: SourceEncoding::Utf8,
            ..LoadOptions::default()
        };

        let err = DataLoader::parse_csv_bytes(&bytes, &options).unwrap_err();
        assert!(matches!(err, LoaderError::Encoding(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = DataLoader::load_csv(Path::new("/nonexistent/data.csv"), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let formats = LoadOptions::default().date_formats;
        let expected = NaiveDate::from_ymd_opt(2011, 12, 9)
            .unwrap()
            .and_hms_opt(12, 50, 0)
            .unwrap();

        assert_eq!(parse_timestamp("12/9/2011 12:50", &formats), Some(expected));
        assert_eq!(parse_timestamp("2011-12-09 12:50:00", &formats), Some(expected));
        assert_eq!(parse_timestamp("2011-12-09T12:50:00.000", &formats), Some(expected));
        assert_eq!(
            parse_timestamp("2011-12-09", &formats),
            NaiveDate::from_ymd_opt(2011, 12, 9).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("yesterday", &formats), None);
    }
}
