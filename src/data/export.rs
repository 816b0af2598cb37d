//! CSV export of the filtered subset.

use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Suggested file name for the download.
pub const EXPORT_FILE_NAME: &str = "filtered_sales_data.csv";
pub const EXPORT_MIME: &str = "text/csv";

const EXPORT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize CSV: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A serialized subset ready to be saved.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub rows: usize,
}

impl CsvExport {
    /// Serialize with a header row, comma separated, UTF-8.
    pub fn from_subset(subset: &DataFrame) -> Result<Self, ExportError> {
        let mut df = subset.clone();
        let mut bytes = Vec::new();
        CsvWriter::new(&mut bytes)
            .include_header(true)
            .with_separator(b',')
            .with_datetime_format(Some(EXPORT_DATETIME_FORMAT.to_string()))
            .finish(&mut df)?;

        Ok(Self {
            file_name: EXPORT_FILE_NAME,
            mime: EXPORT_MIME,
            bytes,
            rows: subset.height(),
        })
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        fs::write(path, &self.bytes).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), rows = self.rows, "Exported filtered data");
        Ok(())
    }
}
