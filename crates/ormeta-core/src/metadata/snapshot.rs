//! Serializable snapshots of entity metadata.

use serde::Serialize;

use super::association::AssociatedColumn;
use crate::error::{MappingError, Result};
use crate::reflect::{FetchType, ScalarType};

/// Description of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    /// Simple name of the mapped type.
    pub entity: String,
    /// Table name.
    pub table: String,
    /// Identity column name.
    pub id_column: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnSnapshot>,
    /// One-to-many associations.
    pub one_to_many: Vec<AssociationSnapshot>,
}

/// Kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Scalar column.
    Field,
    /// Join column of a many-to-one association.
    ManyToOne,
}

/// Description of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSnapshot {
    /// Column name.
    pub name: String,
    /// `<table>.<column>`.
    pub alias: String,
    /// Name of the originating field.
    pub field: String,
    /// Scalar or join column.
    pub kind: ColumnKind,
    /// Scalar classification, absent for join columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scalar_type: Option<ScalarType>,
    /// Whether this is the identity column.
    pub id: bool,
    /// Whether the column rejects null.
    pub not_null: bool,
    /// Whether inserts write the column.
    pub insertable: bool,
    /// Whether the database generates the value.
    pub auto_increment: bool,
    /// Text length, for text columns only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_length: Option<u32>,
    /// Association of a join column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association: Option<AssociationSnapshot>,
}

/// Description of one association.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationSnapshot {
    /// Name of the association field.
    pub field: String,
    /// Simple name of the associated entity.
    pub target: String,
    /// Table name of the associated entity.
    pub target_table: String,
    /// Name of the join column.
    pub join_column: String,
    /// Declared fetch strategy.
    pub fetch: FetchType,
}

impl AssociationSnapshot {
    pub(crate) fn new(field: &str, association: &dyn AssociatedColumn) -> Self {
        Self {
            field: field.to_string(),
            target: association.join_column_type().simple_name().to_string(),
            target_table: association.associated_entity_table_name().to_string(),
            join_column: association.join_column_name().to_string(),
            fetch: association.fetch_type(),
        }
    }
}

impl EntitySnapshot {
    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| MappingError::Serialization(e.to_string()))
    }
}
