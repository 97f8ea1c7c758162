//! Group writer / group reader: each owns one column-group at a time.

mod reader;
mod writer;

pub use reader::GroupReader;
pub use writer::GroupWriter;
