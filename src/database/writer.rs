use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::schema::TableSchema;
use crate::table::TableWriter;

/// Owns a named collection of tables rooted at one output directory. Tables
/// are independent; no database-level metadata is persisted.
pub struct DatabaseWriter {
    outdir: PathBuf,
    accession: String,
}

impl DatabaseWriter {
    pub fn new(outdir: impl AsRef<Path>, accession: impl Into<String>) -> Self {
        Self {
            outdir: outdir.as_ref().to_path_buf(),
            accession: accession.into(),
        }
    }

    /// Creates `{outdir}/{table_name}/`, wiping any pre-existing contents,
    /// and returns a table writer rooted there.
    pub fn make_table_writer(&self, table_name: &str, schema: TableSchema) -> Result<TableWriter> {
        let sub_path = self.outdir.join(table_name);
        if sub_path.exists() {
            std::fs::remove_dir_all(&sub_path)?;
        }
        std::fs::create_dir_all(&sub_path)?;
        Ok(TableWriter::new(sub_path, self.accession.clone(), schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::CompKind;
    use crate::schema::{ColumnDef, GroupDef};
    use indexmap::IndexMap;

    #[test]
    fn make_table_writer_wipes_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let table_dir = dir.path().join("reads");
        std::fs::create_dir_all(&table_dir).unwrap();
        std::fs::write(table_dir.join("stale"), b"old").unwrap();

        let db = DatabaseWriter::new(dir.path(), "SRR000001");
        let mut columns = IndexMap::new();
        columns.insert("READ".to_string(), ColumnDef::new(CompKind::None, 0, "g"));
        let mut groups = IndexMap::new();
        groups.insert(
            "g".to_string(),
            GroupDef::new(CompKind::None, 0, 32, vec!["READ".to_string()]),
        );
        let schema = TableSchema::new(columns, groups).unwrap();

        let writer = db.make_table_writer("reads", schema).unwrap();
        drop(writer);

        assert!(!table_dir.join("stale").exists());
    }
}
