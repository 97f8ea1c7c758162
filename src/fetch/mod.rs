//! Blob fetchers: the narrow contract a group reader uses to pull bytes,
//! whatever the transport.

mod filesystem;
#[cfg(feature = "http")]
mod http;

pub use filesystem::FilesystemFetcher;
#[cfg(feature = "http")]
pub use http::HttpFetcher;

use crate::error::Result;

/// Fetches the `meta` record and individual group blobs by key. Each group
/// reader owns its own fetcher instance, so implementations that hold a
/// connection (e.g. HTTP) get one connection per group.
pub trait BlobFetcher: Send {
    fn read_meta(&self) -> Result<Vec<u8>>;
    fn read(&self, group_name: &str, blob_nr: u64) -> Result<Vec<u8>>;
}
