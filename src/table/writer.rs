use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::encoding::Cell;
use crate::error::Result;
use crate::group::GroupWriter;
use crate::meta::TableMeta;
use crate::schema::{ColumnDef, ColumnName, TableSchema};

/// Owns a table's schema and the set of group writers that demultiplex
/// incoming cells by column. Not safe for concurrent `write_cell`/`close_row`
/// — the producer is expected to call in a strict sequence.
pub struct TableWriter {
    outdir: PathBuf,
    schema: TableSchema,
    groups: IndexMap<String, GroupWriter>,
    meta: TableMeta,
}

impl TableWriter {
    pub fn new(outdir: impl AsRef<Path>, accession: impl Into<String>, schema: TableSchema) -> Self {
        let outdir = outdir.as_ref().to_path_buf();
        let meta = TableMeta::new(accession, schema.clone());

        let groups = schema
            .groups
            .iter()
            .map(|(name, group_def)| {
                let col_defs: IndexMap<ColumnName, ColumnDef> = group_def
                    .cols
                    .iter()
                    .map(|c| (c.clone(), schema.columns[c].clone()))
                    .collect();
                let writer = GroupWriter::new(name.clone(), group_def, col_defs, &outdir);
                (name.clone(), writer)
            })
            .collect();

        Self {
            outdir,
            schema,
            groups,
            meta,
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Routes `value` to the group writer owning `col`'s column.
    pub fn write_cell(&mut self, col: &str, value: Cell, size: u64) -> Result<()> {
        let group_name = self.schema.group_of_column(col)?;
        self.groups
            .get_mut(group_name)
            .expect("every schema group has a writer")
            .write_cell(col, value, size)
    }

    /// Advances every group writer's row counter by one, so all groups stay
    /// aligned even when a row touches only some of them.
    pub fn close_row(&mut self) -> Result<()> {
        for (name, writer) in self.groups.iter_mut() {
            let blobmap = self.meta.blobmap.get_mut(name).expect("meta tracks every group");
            writer.close_row(blobmap)?;
        }
        Ok(())
    }

    /// Force-flushes every group writer's residual blob and persists the
    /// table's `meta` record.
    pub fn finish(mut self) -> Result<()> {
        for (name, writer) in self.groups.iter_mut() {
            let blobmap = self.meta.blobmap.get_mut(name).expect("meta tracks every group");
            writer.finish(blobmap)?;
        }

        let row_counts: Vec<u64> = self
            .meta
            .blobmap
            .values()
            .map(|map| map.iter().map(|(_, c)| c).sum())
            .collect();
        assert!(
            row_counts.windows(2).all(|w| w[0] == w[1]),
            "close_row is invoked uniformly across groups, so row counts must agree"
        );

        let bytes = self.meta.serialize()?;
        std::fs::write(self.outdir.join("meta"), bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::CompKind;
    use crate::schema::GroupDef;

    fn schema() -> TableSchema {
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
        TableSchema::new(columns, groups).unwrap()
    }

    #[test]
    fn write_and_finish_persists_meta() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TableWriter::new(dir.path(), "SRR000001", schema());

        for (read, qual) in [("AAAA", "!!!!"), ("CCCCCC", "######")] {
            writer
                .write_cell("READ", Cell::Str(read.to_string()), read.len() as u64)
                .unwrap();
            writer
                .write_cell("QUAL", Cell::Str(qual.to_string()), qual.len() as u64)
                .unwrap();
            writer.close_row().unwrap();
        }
        writer.finish().unwrap();

        assert!(dir.path().join("meta").exists());
    }

    #[test]
    fn empty_rows_still_advance_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TableWriter::new(dir.path(), "SRR000001", schema());
        writer.close_row().unwrap();
        writer.close_row().unwrap();
        writer.finish().unwrap();

        let meta = TableMeta::deserialize(&std::fs::read(dir.path().join("meta")).unwrap()).unwrap();
        let total: u64 = meta.blobmap["g"].iter().map(|(_, c)| c).sum();
        assert_eq!(total, 2);
    }
}
