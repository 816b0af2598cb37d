//! Memoized table store
//! The table is read once on first access and shared for the rest of the
//! process. Concurrent first callers block on the cell; only one reads.

use crate::data::{DataLoader, LoadOptions, LoaderError, SalesTable};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Data source already installed at {0}")]
    AlreadyInstalled(PathBuf),
    #[error("No data source installed")]
    NotInstalled,
    #[error(transparent)]
    Load(#[from] LoaderError),
}

/// Load-once holder for a single CSV source.
pub struct TableCache {
    path: PathBuf,
    options: LoadOptions,
    cell: OnceCell<Arc<SalesTable>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            options,
            cell: OnceCell::new(),
        }
    }

    /// Return the cached table, reading the file on first call.
    ///
    /// A failed load is not cached; the next call retries the read.
    pub fn get(&self) -> Result<Arc<SalesTable>, LoaderError> {
        if let Some(table) = self.cell.get() {
            debug!("Using memoized sales table");
            return Ok(Arc::clone(table));
        }
        self.cell
            .get_or_try_init(|| DataLoader::load_csv(&self.path, &self.options).map(Arc::new))
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

static SOURCE: OnceCell<TableCache> = OnceCell::new();

/// Fix the process-wide data source. Only the first call succeeds.
pub fn install(path: impl Into<PathBuf>, options: LoadOptions) -> Result<(), StoreError> {
    SOURCE
        .set(TableCache::new(path, options))
        .map_err(|rejected| StoreError::AlreadyInstalled(rejected.path))
}

/// The process-wide sales table.
pub fn load() -> Result<Arc<SalesTable>, StoreError> {
    let cache = SOURCE.get().ok_or(StoreError::NotInstalled)?;
    Ok(cache.get()?)
}
