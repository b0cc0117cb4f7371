//! Column descriptors.

use std::ops::Deref;
use std::sync::Arc;

use super::association::ManyToOneColumn;
use crate::config::MappingConfig;
use crate::reflect::{FieldInfo, GenerationType, ScalarType, TypeRef};

/// Separator between a table name and a column name in alias-qualified names.
pub const ALIAS_DELIMITER: &str = ".";

/// Qualify a column name with its table name.
pub fn with_alias(table_name: &str, column_name: &str) -> String {
    format!("{table_name}{ALIAS_DELIMITER}{column_name}")
}

/// Contract shared by every column that lives on the entity's own table.
pub trait ColumnDef {
    /// Owning table name.
    fn table_name(&self) -> &str;

    /// Column name.
    fn name(&self) -> &str;

    /// `<table>.<column>`.
    fn name_with_alias(&self) -> String {
        with_alias(self.table_name(), self.name())
    }

    /// Declared value type of the originating field.
    fn value_type(&self) -> TypeRef;

    /// Scalar classification of the value type, if it is a scalar.
    fn scalar_type(&self) -> Option<ScalarType>;

    /// Whether the column rejects null.
    fn is_not_null(&self) -> bool;

    /// Whether inserts write the column.
    fn is_insertable(&self) -> bool;

    /// Whether the database generates the value.
    fn is_auto_increment(&self) -> bool;

    /// Whether the column holds text.
    fn is_string_valued(&self) -> bool {
        self.scalar_type().is_some_and(|s| s.is_text())
    }

    /// Text length. Only meaningful when [`ColumnDef::is_string_valued`].
    fn string_length(&self) -> u32;

    /// Name of the originating field.
    fn field_name(&self) -> &str;
}

/// A scalar column backed by one declared field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldColumn {
    table_name: String,
    name: String,
    value_type: TypeRef,
    scalar_type: Option<ScalarType>,
    string_length: u32,
    not_null: bool,
    insertable: bool,
    auto_increment: bool,
    id: bool,
    field_name: String,
}

impl FieldColumn {
    /// Build the column for `field` on `table_name`, applying defaults for
    /// absent hints.
    pub fn new(field: &FieldInfo, table_name: &str, config: &MappingConfig) -> Self {
        let hints = &field.hints;
        let column = hints.column.as_ref();

        Self {
            table_name: table_name.to_string(),
            name: column
                .and_then(|c| c.name())
                .unwrap_or(field.name.as_str())
                .to_string(),
            value_type: field.value_type,
            scalar_type: field.value_type.info().scalar,
            string_length: column
                .and_then(|c| c.length)
                .unwrap_or(config.default_string_length),
            not_null: column.is_some_and(|c| !c.nullable),
            insertable: column.map_or(true, |c| c.insertable),
            auto_increment: hints.generated == Some(GenerationType::Identity),
            id: hints.id,
            field_name: field.name.clone(),
        }
    }

    /// Whether this is the identity column.
    pub fn is_id(&self) -> bool {
        self.id
    }
}

impl ColumnDef for FieldColumn {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn value_type(&self) -> TypeRef {
        self.value_type
    }

    fn scalar_type(&self) -> Option<ScalarType> {
        self.scalar_type
    }

    fn is_not_null(&self) -> bool {
        self.not_null
    }

    fn is_insertable(&self) -> bool {
        self.insertable
    }

    fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    fn string_length(&self) -> u32 {
        self.string_length
    }

    fn field_name(&self) -> &str {
        &self.field_name
    }
}

/// A column of an entity: either a scalar field or the join column of a
/// many-to-one association.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityColumn {
    /// Scalar column.
    Field(FieldColumn),
    /// Join column of a many-to-one association.
    ManyToOne(ManyToOneColumn),
}

impl EntityColumn {
    /// Whether this is the identity column.
    pub fn is_id(&self) -> bool {
        match self {
            EntityColumn::Field(column) => column.is_id(),
            EntityColumn::ManyToOne(_) => false,
        }
    }

    /// The association, if this is a join column.
    pub fn as_many_to_one(&self) -> Option<&ManyToOneColumn> {
        match self {
            EntityColumn::ManyToOne(column) => Some(column),
            EntityColumn::Field(_) => None,
        }
    }

    /// The scalar column, if this is one.
    pub fn as_field(&self) -> Option<&FieldColumn> {
        match self {
            EntityColumn::Field(column) => Some(column),
            EntityColumn::ManyToOne(_) => None,
        }
    }

    fn def(&self) -> &dyn ColumnDef {
        match self {
            EntityColumn::Field(column) => column,
            EntityColumn::ManyToOne(column) => column,
        }
    }
}

impl ColumnDef for EntityColumn {
    fn table_name(&self) -> &str {
        self.def().table_name()
    }

    fn name(&self) -> &str {
        self.def().name()
    }

    fn value_type(&self) -> TypeRef {
        self.def().value_type()
    }

    fn scalar_type(&self) -> Option<ScalarType> {
        self.def().scalar_type()
    }

    fn is_not_null(&self) -> bool {
        self.def().is_not_null()
    }

    fn is_insertable(&self) -> bool {
        self.def().is_insertable()
    }

    fn is_auto_increment(&self) -> bool {
        self.def().is_auto_increment()
    }

    fn is_string_valued(&self) -> bool {
        self.def().is_string_valued()
    }

    fn string_length(&self) -> u32 {
        self.def().string_length()
    }

    fn field_name(&self) -> &str {
        self.def().field_name()
    }
}

/// Ordered, immutable column list of an entity. Cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityColumns(Arc<[EntityColumn]>);

impl EntityColumns {
    pub(crate) fn new(columns: Vec<EntityColumn>) -> Self {
        Self(columns.into())
    }

    /// Column names in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|c| c.name().to_string()).collect()
    }

    /// Alias-qualified column names in declaration order.
    pub fn names_with_alias(&self) -> Vec<String> {
        self.0.iter().map(|c| c.name_with_alias()).collect()
    }

    /// The identity column.
    pub fn id_column(&self) -> Option<&EntityColumn> {
        self.0.iter().find(|c| c.is_id())
    }

    /// The column backed by `field_name`.
    pub fn by_field(&self, field_name: &str) -> Option<&EntityColumn> {
        self.0.iter().find(|c| c.field_name() == field_name)
    }

    /// Join columns of many-to-one associations.
    pub fn many_to_one(&self) -> impl Iterator<Item = &ManyToOneColumn> {
        self.0.iter().filter_map(EntityColumn::as_many_to_one)
    }
}

impl Deref for EntityColumns {
    type Target = [EntityColumn];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a EntityColumns {
    type Item = &'a EntityColumn;
    type IntoIter = std::slice::Iter<'a, EntityColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
