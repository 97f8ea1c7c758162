//! Database writer / database reader: a named collection of independent
//! tables laid out as a directory-of-directories. The database adds no
//! cross-table invariants.

mod reader;
mod writer;

pub use reader::DatabaseReader;
pub use writer::DatabaseWriter;
