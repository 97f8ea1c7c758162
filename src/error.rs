use thiserror::Error;

/// Errors raised while fetching a blob or the table's `meta` record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("connection lost while fetching {0}")]
    ConnectionLost(String),
    #[error("fetch of {0} timed out")]
    Timeout(String),
    #[error("underlying IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "http")]
    #[error("underlying HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors produced by the blob store engine.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Raised at schema-construction time.
    #[error("invalid schema: {0}")]
    SchemaInvalid(String),

    /// `write_cell` referenced a column absent from the schema.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A compressed buffer ended before the structural decoder expected it to.
    #[error("truncated data")]
    Truncated,

    /// A cell carried neither a `str_value` nor `int_values` tag.
    #[error("bad cell encoding")]
    BadCell,

    /// The group envelope (names / encoded_columns) failed to decode.
    #[error("bad envelope: {0}")]
    BadEnvelope(String),

    /// A `CompKind` tag in persisted data is not one this build understands.
    #[error("unknown compression kind: {0}")]
    UnknownComp(String),

    /// A codec's `decompress` call failed.
    #[error("decompression failed: {0}")]
    DecompressFailed(String),

    /// Groups disagreed about the table's total row count.
    #[error("inconsistent row count: group {group} has {found} rows, expected {expected}")]
    InconsistentRowCount {
        group: String,
        found: u64,
        expected: u64,
    },

    /// `get(row, col)` addressed a row or column outside the table.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// A blob fetch or decode failed.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("underlying IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` for blob store errors.
pub type Result<T> = std::result::Result<T, StoreError>;
