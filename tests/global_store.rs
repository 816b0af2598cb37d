//! The process-wide store. Kept in its own test binary since it installs
//! global state exactly once.

use sales_dashboard::data::store::{self, StoreError};
use sales_dashboard::data::LoadOptions;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

#[test]
fn test_install_then_load_once() {
    assert!(matches!(store::load(), Err(StoreError::NotInstalled)));

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "InvoiceNo,Quantity,InvoiceDate,UnitPrice,CustomerID,Country").unwrap();
    writeln!(file, "536365,6,12/1/2010 8:26,2.55,17850,United Kingdom").unwrap();

    store::install(file.path(), LoadOptions::default()).unwrap();

    let first = store::load().unwrap();
    let second = store::load().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.height(), 1);

    let err = store::install("other.csv", LoadOptions::default()).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyInstalled(_)));
}
