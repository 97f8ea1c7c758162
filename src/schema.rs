//! The data model: [`ColumnDef`], [`GroupDef`] and [`TableSchema`]. Schema
//! objects are created once by the writer's caller and are immutable
//! thereafter; invariants are validated at construction time.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::compression::CompKind;
use crate::error::{Result, StoreError};

pub type ColumnName = String;
pub type GroupName = String;

/// Per-column compression choice and the group the column belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub comp: CompKind,
    pub level: i32,
    pub group: GroupName,
}

impl ColumnDef {
    pub fn new(comp: CompKind, level: i32, group: impl Into<GroupName>) -> Self {
        Self {
            comp,
            level,
            group: group.into(),
        }
    }
}

/// A column group: the set of columns persisted together in one blob
/// sequence, the outer codec for the blob envelope, and the per-group blob
/// size budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDef {
    pub comp: CompKind,
    pub level: i32,
    /// Pre-compression byte budget per blob for this group.
    pub cutoff: u64,
    /// Ordered set of column names; order is the column order within a blob.
    pub cols: Vec<ColumnName>,
}

impl GroupDef {
    pub fn new(comp: CompKind, level: i32, cutoff: u64, cols: Vec<ColumnName>) -> Self {
        Self {
            comp,
            level,
            cutoff,
            cols,
        }
    }
}

/// A table's schema: the columns and the groups they are partitioned into.
///
/// Invariants enforced at construction: `columns`' keys equal the union of
/// all `groups[*].cols`, each column belongs to exactly one group, and every
/// column referenced by a group has a matching `ColumnDef` pointing back at
/// that group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: IndexMap<ColumnName, ColumnDef>,
    pub groups: IndexMap<GroupName, GroupDef>,
}

impl TableSchema {
    /// Builds a schema from its two mappings, validating the cross-reference
    /// invariants between `columns` and `groups`.
    pub fn new(
        columns: IndexMap<ColumnName, ColumnDef>,
        groups: IndexMap<GroupName, GroupDef>,
    ) -> Result<Self> {
        let schema = Self { columns, groups };
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for (group_name, group) in &self.groups {
            for col in &group.cols {
                if !seen.insert(col.clone()) {
                    return Err(StoreError::SchemaInvalid(format!(
                        "column `{col}` listed in more than one group"
                    )));
                }
                let col_def = self.columns.get(col).ok_or_else(|| {
                    StoreError::SchemaInvalid(format!(
                        "group `{group_name}` references undeclared column `{col}`"
                    ))
                })?;
                if &col_def.group != group_name {
                    return Err(StoreError::SchemaInvalid(format!(
                        "column `{col}` declares group `{}` but is listed under group `{group_name}`",
                        col_def.group
                    )));
                }
            }
        }

        for (col_name, col_def) in &self.columns {
            if !self.groups.contains_key(&col_def.group) {
                return Err(StoreError::SchemaInvalid(format!(
                    "column `{col_name}` declares unknown group `{}`",
                    col_def.group
                )));
            }
            if !seen.contains(col_name) {
                return Err(StoreError::SchemaInvalid(format!(
                    "column `{col_name}` is not listed in its declared group's `cols`"
                )));
            }
        }

        Ok(())
    }

    pub fn group_of_column(&self, col: &str) -> Result<&GroupName> {
        self.columns
            .get(col)
            .map(|def| &def.group)
            .ok_or_else(|| StoreError::UnknownColumn(col.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_ok() -> TableSchema {
        let mut columns = IndexMap::new();
        columns.insert("READ".to_string(), ColumnDef::new(CompKind::None, 0, "g"));
        columns.insert("QUAL".to_string(), ColumnDef::new(CompKind::None, 0, "g"));
        let mut groups = IndexMap::new();
        groups.insert(
            "g".to_string(),
            GroupDef::new(
                CompKind::Zstd,
                3,
                32,
                vec!["READ".to_string(), "QUAL".to_string()],
            ),
        );
        TableSchema::new(columns, groups).unwrap()
    }

    #[test]
    fn valid_schema_constructs() {
        schema_ok();
    }

    #[test]
    fn group_referencing_missing_column_is_rejected() {
        let mut columns = IndexMap::new();
        columns.insert("READ".to_string(), ColumnDef::new(CompKind::None, 0, "g"));
        let mut groups = IndexMap::new();
        groups.insert(
            "g".to_string(),
            GroupDef::new(CompKind::None, 0, 32, vec!["READ".to_string(), "MISSING".to_string()]),
        );
        assert!(matches!(
            TableSchema::new(columns, groups),
            Err(StoreError::SchemaInvalid(_))
        ));
    }

    #[test]
    fn column_pointing_at_wrong_group_is_rejected() {
        let mut columns = IndexMap::new();
        columns.insert("READ".to_string(), ColumnDef::new(CompKind::None, 0, "other"));
        let mut groups = IndexMap::new();
        groups.insert(
            "g".to_string(),
            GroupDef::new(CompKind::None, 0, 32, vec!["READ".to_string()]),
        );
        assert!(matches!(
            TableSchema::new(columns, groups),
            Err(StoreError::SchemaInvalid(_))
        ));
    }

    #[test]
    fn group_of_column_resolves() {
        let schema = schema_ok();
        assert_eq!(schema.group_of_column("READ").unwrap(), "g");
        assert!(schema.group_of_column("NOPE").is_err());
    }
}
