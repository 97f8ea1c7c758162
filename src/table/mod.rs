//! Table writer / table reader: a schema, its set of groups, and the
//! per-group blob-map that locates every row.

mod reader;
mod writer;

pub use reader::TableReader;
pub use writer::TableWriter;
