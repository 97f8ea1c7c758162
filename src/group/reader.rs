use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::compression::create_codec;
use crate::encoding::{self, Cell};
use crate::error::{Result, StoreError};
use crate::fetch::BlobFetcher;
use crate::meta::BlobMap;
use crate::schema::{ColumnDef, ColumnName, GroupDef};

/// One loaded, decoded blob: its cells by column, and the row range it
/// covers.
struct GroupBlob {
    values: IndexMap<ColumnName, Vec<Cell>>,
    first: u64,
    count: u64,
}

impl GroupBlob {
    fn get(&self, row: u64, col: &str) -> Option<&Cell> {
        if row < self.first || row >= self.first + self.count {
            return None;
        }
        self.values
            .get(col)
            .map(|cells| &cells[(row - self.first) as usize])
    }
}

/// Finds the blob index whose row range contains `row`, via binary search on
/// `row_map`'s (sorted, contiguous) start offsets.
fn row_to_blob_nr(row_map: &BlobMap, row: u64) -> Option<u64> {
    if row_map.is_empty() {
        return None;
    }
    let idx = row_map.partition_point(|&(start, _)| start <= row);
    if idx == 0 {
        return None;
    }
    let (start, count) = row_map[idx - 1];
    if row < start + count {
        Some((idx - 1) as u64)
    } else {
        None
    }
}

/// Owns one group's in-memory blob cache. Loads and evicts blobs as
/// `set_window` moves; `get` never performs I/O.
pub struct GroupReader {
    name: String,
    comp: crate::compression::CompKind,
    fetcher: Box<dyn BlobFetcher>,
    row_map: BlobMap,
    column_meta: IndexMap<ColumnName, ColumnDef>,
    blobs: HashMap<u64, Option<GroupBlob>>,
}

impl GroupReader {
    pub fn new(
        name: impl Into<String>,
        group_def: &GroupDef,
        fetcher: Box<dyn BlobFetcher>,
        row_map: BlobMap,
        column_meta: IndexMap<ColumnName, ColumnDef>,
    ) -> Self {
        Self {
            name: name.into(),
            comp: group_def.comp,
            fetcher,
            row_map,
            column_meta,
            blobs: HashMap::new(),
        }
    }

    pub fn total_rows(&self) -> u64 {
        self.row_map.last().map_or(0, |(start, count)| start + count)
    }

    fn load_blob(&self, blob_nr: u64) -> Option<GroupBlob> {
        let (first, count) = *self.row_map.get(blob_nr as usize)?;
        match self.try_load_blob(blob_nr, first, count) {
            Ok(blob) => Some(blob),
            Err(e) => {
                tracing::warn!(
                    group = %self.name,
                    blob_nr,
                    error = %e,
                    "failed to load blob; rows in this range will read as null until retried"
                );
                None
            }
        }
    }

    fn try_load_blob(&self, blob_nr: u64, first: u64, count: u64) -> Result<GroupBlob> {
        let data = self.fetcher.read(&self.name, blob_nr)?;
        let outer_codec = create_codec(self.comp)?;
        let decompressed = outer_codec.decompress(&data)?;
        let envelope = encoding::deserialize_envelope(&decompressed)?;

        let mut values = IndexMap::new();
        for (name, payload) in envelope.names.into_iter().zip(envelope.encoded_columns) {
            let def = self.column_meta.get(&name).ok_or_else(|| {
                StoreError::BadEnvelope(format!("blob names unknown column `{name}`"))
            })?;
            let codec = create_codec(def.comp)?;
            let decompressed = codec.decompress(&payload)?;
            let column = encoding::deserialize_column(&decompressed)?;
            values.insert(name, column.cells);
        }

        Ok(GroupBlob {
            values,
            first,
            count,
        })
    }

    /// Loads the blobs overlapping `[start, start+count)` (clamped to
    /// available rows) and evicts any resident blob outside that range.
    pub fn set_window(&mut self, start: u64, count: u64) {
        let total_rows = self.total_rows();
        if start >= total_rows || count == 0 {
            let stale: Vec<u64> = self.blobs.keys().copied().collect();
            for blob_nr in stale {
                self.blobs.remove(&blob_nr);
            }
            return;
        }
        let end = (start + count).min(total_rows);

        let first_blob = row_to_blob_nr(&self.row_map, start);
        let last_blob = row_to_blob_nr(&self.row_map, end - 1);
        let want: HashSet<u64> = match (first_blob, last_blob) {
            (Some(f), Some(l)) => (f..=l).collect(),
            _ => HashSet::new(),
        };

        let have: HashSet<u64> = self.blobs.keys().copied().collect();
        for blob_nr in have.difference(&want) {
            self.blobs.remove(blob_nr);
        }
        for &blob_nr in want.difference(&have) {
            let blob = self.load_blob(blob_nr);
            self.blobs.insert(blob_nr, blob);
        }
    }

    /// Returns the cell at `(row, col)`, or `None` if the owning blob is not
    /// currently resident (the caller must `set_window` first).
    pub fn get(&self, row: u64, col: &str) -> Option<Cell> {
        let blob_nr = row_to_blob_nr(&self.row_map, row)?;
        self.blobs
            .get(&blob_nr)
            .and_then(|b| b.as_ref())
            .and_then(|b| b.get(row, col))
            .cloned()
    }

    pub fn resident_blob_nrs(&self) -> HashSet<u64> {
        self.blobs.keys().copied().collect()
    }
}
