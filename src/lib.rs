#![forbid(unsafe_code)]
//! A columnar blob store for sequencing-read tables.
//!
//! Row-oriented tabular data (reads plus their per-cell attributes) is
//! grouped into column groups, serialized, compressed twice (once per
//! column, once per blob), and written as a sequence of small blobs per
//! group. The reader side supports random row access, windowed prefetch,
//! and either a local directory or HTTP as the backing store.

pub mod access;
pub mod compression;
pub mod database;
pub mod encoding;
pub mod error;
pub mod fetch;
pub mod group;
pub mod meta;
mod parallel;
pub mod schema;
pub mod table;

pub use access::{AccessMode, ParallelMode};
pub use compression::CompKind;
pub use encoding::Cell;
pub use error::{FetchError, StoreError};
pub use schema::{ColumnDef, GroupDef, TableSchema};
