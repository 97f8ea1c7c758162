use crate::access::{AccessMode, ParallelMode};
use crate::error::Result;
use crate::table::TableReader;

/// Holds the configured address and modes for a directory-of-tables
/// database; `make_table_reader` builds a reader rooted at one table's
/// subdirectory.
pub struct DatabaseReader {
    addr: String,
    access_mode: AccessMode,
    parallel_mode: ParallelMode,
}

impl DatabaseReader {
    pub fn new(addr: impl Into<String>, access_mode: AccessMode, parallel_mode: ParallelMode) -> Self {
        Self {
            addr: addr.into(),
            access_mode,
            parallel_mode,
        }
    }

    pub fn make_table_reader(&self, table_name: &str, wanted: Option<&[String]>) -> Result<TableReader> {
        let root = join_path(&self.addr, table_name, self.access_mode);
        TableReader::new(&root, wanted, self.access_mode, self.parallel_mode)
    }
}

fn join_path(addr: &str, table_name: &str, access_mode: AccessMode) -> String {
    let sep = match access_mode {
        AccessMode::Http => '/',
        AccessMode::FileSystem => std::path::MAIN_SEPARATOR,
    };
    if addr.ends_with(sep) {
        format!("{addr}{table_name}")
    } else {
        format!("{addr}{sep}{table_name}")
    }
}
