//! How a table/database reader reaches its bytes, and how it loads a window.

use crate::error::Result;
use crate::fetch::{BlobFetcher, FilesystemFetcher};

/// Where a table/database lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    FileSystem,
    Http,
}

/// How `set_window` loads the groups it dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParallelMode {
    #[default]
    Sequential,
    Concurrent,
}

/// Builds a fresh fetcher rooted at `addr`. Called once per group reader so
/// that e.g. HTTP group readers each get their own connection.
pub fn make_fetcher(addr: &str, access_mode: AccessMode) -> Result<Box<dyn BlobFetcher>> {
    match access_mode {
        AccessMode::FileSystem => Ok(Box::new(FilesystemFetcher::new(addr))),
        #[cfg(feature = "http")]
        AccessMode::Http => Ok(Box::new(crate::fetch::HttpFetcher::new(addr)?)),
        #[cfg(not(feature = "http"))]
        AccessMode::Http => Err(crate::error::StoreError::SchemaInvalid(
            "HTTP access requested but the `http` feature is disabled".to_string(),
        )),
    }
}
