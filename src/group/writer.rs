use std::path::PathBuf;

use indexmap::IndexMap;

use crate::compression::create_codec;
use crate::encoding::{self, Cell, Column, GroupEnvelope};
use crate::error::{Result, StoreError};
use crate::meta::BlobMap;
use crate::schema::{ColumnDef, ColumnName, GroupDef};

/// Owns one column-group's accumulation buffer and flushes compressed blobs
/// to `{outdir}/{group_name}.{file_nr}` once `cutoff` is crossed.
pub struct GroupWriter {
    name: String,
    outdir: PathBuf,
    col_defs: IndexMap<ColumnName, ColumnDef>,
    comp: crate::compression::CompKind,
    level: i32,
    cutoff: u64,
    column_order: Vec<ColumnName>,

    blob: IndexMap<ColumnName, Vec<Cell>>,
    start_row: u64,
    row_count: u64,
    bytes_written: u64,
    file_nr: u64,
}

impl GroupWriter {
    pub fn new(
        name: impl Into<String>,
        group_def: &GroupDef,
        col_defs: IndexMap<ColumnName, ColumnDef>,
        outdir: impl Into<PathBuf>,
    ) -> Self {
        let mut writer = Self {
            name: name.into(),
            outdir: outdir.into(),
            col_defs,
            comp: group_def.comp,
            level: group_def.level,
            cutoff: group_def.cutoff,
            column_order: group_def.cols.clone(),
            blob: IndexMap::new(),
            start_row: 0,
            row_count: 0,
            bytes_written: 0,
            file_nr: 0,
        };
        writer.clear_blob();
        writer
    }

    fn clear_blob(&mut self) {
        self.blob = self
            .column_order
            .iter()
            .map(|c| (c.clone(), Vec::new()))
            .collect();
    }

    /// Appends `value` to column `col`. `size` is added to the pre-compression
    /// byte accumulator that drives the cutoff check.
    pub fn write_cell(&mut self, col: &str, value: Cell, size: u64) -> Result<()> {
        let cells = self
            .blob
            .get_mut(col)
            .ok_or_else(|| StoreError::UnknownColumn(col.to_string()))?;
        cells.push(value);
        self.bytes_written += size;
        Ok(())
    }

    /// Advances the row counter, null-pads any column a caller skipped this
    /// row, and flushes if the byte cutoff has been crossed.
    pub fn close_row(&mut self, blobmap: &mut BlobMap) -> Result<()> {
        self.row_count += 1;
        for cells in self.blob.values_mut() {
            while (cells.len() as u64) < self.row_count {
                cells.push(Cell::Null);
            }
        }
        if self.bytes_written > self.cutoff {
            self.flush_blob(blobmap)?;
        }
        Ok(())
    }

    /// Force-flushes a non-empty residual blob. No-op if nothing was
    /// accumulated since the last flush.
    pub fn finish(&mut self, blobmap: &mut BlobMap) -> Result<()> {
        if self.row_count > 0 {
            self.flush_blob(blobmap)?;
        }
        Ok(())
    }

    fn flush_blob(&mut self, blobmap: &mut BlobMap) -> Result<()> {
        let mut names = Vec::with_capacity(self.column_order.len());
        let mut encoded_columns = Vec::with_capacity(self.column_order.len());
        for col in &self.column_order {
            let def = self
                .col_defs
                .get(col)
                .expect("column_order entries are drawn from col_defs");
            let cells = self.blob.get(col).expect("cleared per column_order");
            let serialized = encoding::serialize_column(&Column {
                cells: cells.clone(),
            })?;
            let codec = create_codec(def.comp)?;
            let compressed = codec.compress(&serialized, def.level)?;
            names.push(col.clone());
            encoded_columns.push(compressed);
        }

        let envelope = encoding::serialize_envelope(&GroupEnvelope {
            names,
            encoded_columns,
        })?;
        let outer_codec = create_codec(self.comp)?;
        let to_write = outer_codec.compress(&envelope, self.level)?;

        let fname = self.outdir.join(format!("{}.{}", self.name, self.file_nr));
        std::fs::write(&fname, &to_write)?;
        tracing::debug!(
            group = %self.name,
            file_nr = self.file_nr,
            rows = self.row_count,
            bytes = to_write.len(),
            "flushed blob"
        );

        blobmap.push((self.start_row, self.row_count));
        self.start_row += self.row_count;
        self.row_count = 0;
        self.bytes_written = 0;
        self.file_nr += 1;
        self.clear_blob();
        Ok(())
    }
}
