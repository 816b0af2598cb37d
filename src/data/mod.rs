//! Data module - CSV loading, filtering and export

mod export;
mod filter;
mod loader;
pub mod store;

pub use export::{CsvExport, ExportError, EXPORT_FILE_NAME, EXPORT_MIME};
pub use filter::{
    filter_and_aggregate, filter_subset, CountrySales, DailySales, FilterError, FilterParams,
    FilteredView,
};
pub use loader::{parse_timestamp, DataLoader, LoadOptions, LoaderError, SalesTable};
pub use store::{StoreError, TableCache};

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const INVOICE_NO: &str = "InvoiceNo";
pub const CUSTOMER_ID: &str = "CustomerID";
pub const COUNTRY: &str = "Country";
pub const INVOICE_DATE: &str = "InvoiceDate";
pub const QUANTITY: &str = "Quantity";
pub const UNIT_PRICE: &str = "UnitPrice";
pub const TOTAL_PRICE: &str = "TotalPrice";

/// Epoch milliseconds to a naive (UTC) timestamp.
pub fn millis_to_datetime(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// Days since the Unix epoch to a calendar date.
pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::days(days as i64))
}
