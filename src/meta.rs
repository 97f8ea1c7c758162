//! [`TableMeta`]: the one record persisted per table, tying an accession to
//! its schema and per-group row-range maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::schema::{GroupName, TableSchema};

/// One `(start_row, count)` entry per persisted blob, in blob-number order.
pub type BlobMap = Vec<(u64, u64)>;

/// Verifies blob-map contiguity: entry *i*'s `start_row` equals the sum of
/// all earlier counts, and the first entry starts at row 0.
pub fn sum_rows(map: &BlobMap) -> u64 {
    map.iter().map(|(_, count)| count).sum()
}

fn check_contiguous(group: &str, map: &BlobMap) -> Result<()> {
    let mut expected_start = 0u64;
    for (i, (start, count)) in map.iter().enumerate() {
        if *start != expected_start {
            return Err(StoreError::BadEnvelope(format!(
                "group `{group}` blob {i} starts at {start}, expected {expected_start}"
            )));
        }
        expected_start += count;
    }
    Ok(())
}

/// The per-table metadata record: accession, schema, and the row-range map
/// for every group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    pub accession: String,
    pub schema: TableSchema,
    pub blobmap: IndexMap<GroupName, BlobMap>,
}

impl TableMeta {
    pub fn new(accession: impl Into<String>, schema: TableSchema) -> Self {
        let blobmap = schema
            .groups
            .keys()
            .map(|name| (name.clone(), BlobMap::new()))
            .collect();
        Self {
            accession: accession.into(),
            schema,
            blobmap,
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| StoreError::BadEnvelope(e.to_string()))
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let meta: TableMeta =
            bincode::deserialize(bytes).map_err(|e| StoreError::BadEnvelope(e.to_string()))?;
        for (group, map) in &meta.blobmap {
            check_contiguous(group, map)?;
        }
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::CompKind;
    use crate::schema::{ColumnDef, GroupDef};

    fn sample_schema() -> TableSchema {
        let mut columns = IndexMap::new();
        columns.insert("READ".to_string(), ColumnDef::new(CompKind::None, 0, "g"));
        let mut groups = IndexMap::new();
        groups.insert(
            "g".to_string(),
            GroupDef::new(CompKind::None, 0, 32, vec!["READ".to_string()]),
        );
        TableSchema::new(columns, groups).unwrap()
    }

    #[test]
    fn roundtrip() {
        let mut meta = TableMeta::new("SRR000001", sample_schema());
        meta.blobmap.get_mut("g").unwrap().push((0, 3));
        meta.blobmap.get_mut("g").unwrap().push((3, 2));
        let bytes = meta.serialize().unwrap();
        let back = TableMeta::deserialize(&bytes).unwrap();
        assert_eq!(back.accession, "SRR000001");
        assert_eq!(back.blobmap["g"], vec![(0, 3), (3, 2)]);
    }

    #[test]
    fn non_contiguous_blobmap_is_rejected() {
        let mut meta = TableMeta::new("SRR000001", sample_schema());
        meta.blobmap.get_mut("g").unwrap().push((0, 3));
        meta.blobmap.get_mut("g").unwrap().push((4, 2));
        let bytes = meta.serialize().unwrap();
        assert!(TableMeta::deserialize(&bytes).is_err());
    }
}
