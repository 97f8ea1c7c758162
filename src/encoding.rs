//! The structural encoder: a small, stable wire format for cells, columns and
//! the group envelope. Same logical input must always produce byte-identical
//! output, so every container here is order-preserving and the format is
//! never reinterpreted based on build configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// A single cell value. The discriminant (`Null`/`Str`/`IntList`) is carried
/// on the wire; an absent/unknown tag is a [`StoreError::BadCell`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Null,
    Str(String),
    IntList(Vec<i64>),
}

impl Cell {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            Cell::IntList(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

/// An ordered sequence of cells; row order within the blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub cells: Vec<Cell>,
}

/// The group blob envelope: parallel `names` / `encoded_columns` sequences.
/// `encoded_columns[i]` is the already-compressed payload for `names[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEnvelope {
    pub names: Vec<String>,
    pub encoded_columns: Vec<Vec<u8>>,
}

fn is_truncated(err: &bincode::Error) -> bool {
    matches!(
        err.as_ref(),
        bincode::ErrorKind::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof
    )
}

pub fn serialize_column(column: &Column) -> Result<Vec<u8>> {
    bincode::serialize(column).map_err(|e| {
        tracing::debug!(error = %e, "column encode failed");
        StoreError::BadCell
    })
}

pub fn deserialize_column(bytes: &[u8]) -> Result<Column> {
    bincode::deserialize(bytes).map_err(|e| {
        if is_truncated(&e) {
            StoreError::Truncated
        } else {
            StoreError::BadCell
        }
    })
}

pub fn serialize_envelope(envelope: &GroupEnvelope) -> Result<Vec<u8>> {
    bincode::serialize(envelope).map_err(|e| StoreError::BadEnvelope(e.to_string()))
}

pub fn deserialize_envelope(bytes: &[u8]) -> Result<GroupEnvelope> {
    bincode::deserialize(bytes).map_err(|e| {
        if is_truncated(&e) {
            StoreError::Truncated
        } else {
            StoreError::BadEnvelope(e.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_roundtrip() {
        let column = Column {
            cells: vec![
                Cell::Str("AAAA".to_string()),
                Cell::IntList(vec![1, -2, 3]),
                Cell::Null,
            ],
        };
        let bytes = serialize_column(&column).unwrap();
        let back = deserialize_column(&bytes).unwrap();
        assert_eq!(back.cells, column.cells);
    }

    #[test]
    fn envelope_roundtrip() {
        let envelope = GroupEnvelope {
            names: vec!["READ".to_string(), "QUAL".to_string()],
            encoded_columns: vec![vec![1, 2, 3], vec![4, 5]],
        };
        let bytes = serialize_envelope(&envelope).unwrap();
        let back = deserialize_envelope(&bytes).unwrap();
        assert_eq!(back.names, envelope.names);
        assert_eq!(back.encoded_columns, envelope.encoded_columns);
    }

    #[test]
    fn deterministic_wire_form() {
        let column = Column {
            cells: vec![Cell::Str("x".into())],
        };
        assert_eq!(
            serialize_column(&column).unwrap(),
            serialize_column(&column).unwrap()
        );
    }

    #[test]
    fn truncated_column_is_detected() {
        let column = Column {
            cells: vec![Cell::Str("hello".into())],
        };
        let mut bytes = serialize_column(&column).unwrap();
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            deserialize_column(&bytes),
            Err(StoreError::Truncated)
        ));
    }
}
