use indexmap::IndexMap;

use crate::access::{make_fetcher, AccessMode, ParallelMode};
use crate::encoding::Cell;
use crate::error::{Result, StoreError};
use crate::group::GroupReader;
use crate::meta::TableMeta;
use crate::parallel;
use crate::schema::{ColumnDef, ColumnName, GroupDef, GroupName};

fn group_wanted(group_def: &GroupDef, wanted: Option<&[String]>) -> bool {
    match wanted {
        None => true,
        Some(wanted) if wanted.is_empty() => true,
        Some(wanted) => group_def
            .cols
            .iter()
            .any(|c| wanted.iter().any(|w| w == c)),
    }
}

/// Reads one table, either from a local directory or over HTTP, with
/// windowed random row access.
pub struct TableReader {
    meta: TableMeta,
    groups: IndexMap<GroupName, GroupReader>,
    total_rows: u64,
    parallel_mode: ParallelMode,
}

impl TableReader {
    /// `wanted`: column names to restrict which groups are loaded. `None` or
    /// an empty slice means "load every group".
    pub fn new(
        addr: &str,
        wanted: Option<&[String]>,
        access_mode: AccessMode,
        parallel_mode: ParallelMode,
    ) -> Result<Self> {
        let meta_fetcher = make_fetcher(addr, access_mode)?;
        let meta = TableMeta::deserialize(&meta_fetcher.read_meta()?)?;

        let mut groups = IndexMap::new();
        let mut total_rows: Option<u64> = None;

        for (group_name, group_def) in &meta.schema.groups {
            if !group_wanted(group_def, wanted) {
                continue;
            }
            let fetcher = make_fetcher(addr, access_mode)?;
            let column_meta: IndexMap<ColumnName, ColumnDef> = group_def
                .cols
                .iter()
                .map(|c| (c.clone(), meta.schema.columns[c].clone()))
                .collect();
            let row_map = meta
                .blobmap
                .get(group_name)
                .cloned()
                .unwrap_or_default();
            let reader = GroupReader::new(group_name.clone(), group_def, fetcher, row_map, column_meta);

            let rows = reader.total_rows();
            match total_rows {
                None => total_rows = Some(rows),
                Some(expected) if expected != rows => {
                    return Err(StoreError::InconsistentRowCount {
                        group: group_name.clone(),
                        found: rows,
                        expected,
                    });
                }
                _ => {}
            }
            groups.insert(group_name.clone(), reader);
        }

        Ok(Self {
            meta,
            groups,
            total_rows: total_rows.unwrap_or(0),
            parallel_mode,
        })
    }

    pub fn name(&self) -> &str {
        &self.meta.accession
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// Loads the requested window into every active group reader. Returns
    /// the number of rows actually available in `[start, start+count)`.
    pub fn set_window(&mut self, start: u64, count: u64) -> u64 {
        match self.parallel_mode {
            ParallelMode::Sequential => {
                for group in self.groups.values_mut() {
                    group.set_window(start, count);
                }
            }
            ParallelMode::Concurrent => {
                parallel::set_window_all(&mut self.groups, start, count);
            }
        }
        let available = self.total_rows.saturating_sub(start);
        count.min(available)
    }

    /// Returns the cell at `(row, col)`. `Ok(None)` means the owning blob is
    /// not currently resident; `Err(OutOfRange)` means `row` or `col` is not
    /// part of this table (or, when `col`'s group was excluded via `wanted`,
    /// not part of this reader).
    pub fn get(&self, row: u64, col: &str) -> Result<Option<Cell>> {
        if row >= self.total_rows {
            return Err(StoreError::OutOfRange(format!(
                "row {row} >= total_rows {}",
                self.total_rows
            )));
        }
        let group_name = self
            .meta
            .schema
            .group_of_column(col)
            .map_err(|_| StoreError::OutOfRange(format!("column `{col}` not in schema")))?;
        let group = self
            .groups
            .get(group_name)
            .ok_or_else(|| StoreError::OutOfRange(format!("column `{col}` is not loaded")))?;
        Ok(group.get(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::CompKind;
    use crate::schema::{GroupDef, TableSchema};
    use crate::table::TableWriter;

    fn write_sample(dir: &std::path::Path) -> TableSchema {
        let mut columns = IndexMap::new();
        columns.insert("READ".to_string(), ColumnDef::new(CompKind::None, 0, "g"));
        columns.insert("QUAL".to_string(), ColumnDef::new(CompKind::None, 0, "g"));
        let mut groups = IndexMap::new();
        groups.insert(
            "g".to_string(),
            GroupDef::new(
                CompKind::None,
                0,
                32,
                vec!["READ".to_string(), "QUAL".to_string()],
            ),
        );
        let schema = TableSchema::new(columns, groups).unwrap();

        let mut writer = TableWriter::new(dir, "SRR000001", schema.clone());
        for (read, qual) in [
            ("AAAA", "!!!!"),
            ("CCCCCC", "######"),
            ("G", "?"),
            ("TT", "@@"),
            ("ACGT", "BBBB"),
        ] {
            writer
                .write_cell("READ", Cell::Str(read.to_string()), read.len() as u64)
                .unwrap();
            writer
                .write_cell("QUAL", Cell::Str(qual.to_string()), qual.len() as u64)
                .unwrap();
            writer.close_row().unwrap();
        }
        writer.finish().unwrap();
        schema
    }

    #[test]
    fn round_trip_reads_back_written_values() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path());

        let mut reader = TableReader::new(
            dir.path().to_str().unwrap(),
            None,
            AccessMode::FileSystem,
            ParallelMode::Sequential,
        )
        .unwrap();
        assert_eq!(reader.total_rows(), 5);
        reader.set_window(0, 5);

        let expected = ["AAAA", "CCCCCC", "G", "TT", "ACGT"];
        for (i, value) in expected.iter().enumerate() {
            let cell = reader.get(i as u64, "READ").unwrap().unwrap();
            assert_eq!(cell.as_str().unwrap(), *value);
        }
    }

    #[test]
    fn out_of_range_row_and_column() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path());
        let mut reader = TableReader::new(
            dir.path().to_str().unwrap(),
            None,
            AccessMode::FileSystem,
            ParallelMode::Sequential,
        )
        .unwrap();
        reader.set_window(0, 5);
        assert!(matches!(
            reader.get(5, "READ"),
            Err(StoreError::OutOfRange(_))
        ));
        assert!(matches!(
            reader.get(0, "NOPE"),
            Err(StoreError::OutOfRange(_))
        ));
    }

    #[test]
    fn unresident_row_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path());
        let reader = TableReader::new(
            dir.path().to_str().unwrap(),
            None,
            AccessMode::FileSystem,
            ParallelMode::Sequential,
        )
        .unwrap();
        // no set_window call yet
        assert_eq!(reader.get(0, "READ").unwrap(), None);
    }
}
