//! Entity metadata.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::debug;

use super::association::{AssociatedColumn, ManyToOneColumn, OneToManyAssociation};
use super::builder;
use super::column::{ColumnDef, EntityColumn, EntityColumns};
use super::snapshot::{AssociationSnapshot, ColumnKind, ColumnSnapshot, EntitySnapshot};
use crate::config::MappingConfig;
use crate::error::Result;
use crate::reflect::{Reflect, TypeRef};

/// Relational shape of one mapped type: its table, its columns and its
/// associations.
///
/// Immutable once built and shared through [`Arc`]. Two metadata values are
/// equal when they describe the same type.
pub struct EntityMetadata {
    entity_type: TypeRef,
    table_name: String,
    columns: EntityColumns,
    id_index: usize,
    one_to_many: Vec<OneToManyAssociation>,
}

impl EntityMetadata {
    pub(crate) fn new(
        entity_type: TypeRef,
        table_name: String,
        columns: Vec<EntityColumn>,
        id_index: usize,
        one_to_many: Vec<OneToManyAssociation>,
    ) -> Self {
        Self {
            entity_type,
            table_name,
            columns: EntityColumns::new(columns),
            id_index,
            one_to_many,
        }
    }

    /// Build metadata for `T`.
    pub fn of<T: Reflect>() -> Result<Arc<Self>> {
        Self::from_type(TypeRef::of::<T>())
    }

    /// Build metadata for `entity_type` with the default configuration.
    ///
    /// Every entity reachable through associations is validated and built as
    /// well. Nothing is cached: repeated calls build fresh values.
    pub fn from_type(entity_type: TypeRef) -> Result<Arc<Self>> {
        Self::from_type_with_config(entity_type, &MappingConfig::default())
    }

    /// Build metadata for `entity_type` with an explicit configuration.
    pub fn from_type_with_config(entity_type: TypeRef, config: &MappingConfig) -> Result<Arc<Self>> {
        let batch = builder::build(entity_type, config, |_| None)?;
        debug!(
            entity = %entity_type,
            entities_built = batch.built.len(),
            "Built entity metadata"
        );
        Ok(batch.root)
    }

    /// The mapped type.
    pub fn entity_type(&self) -> TypeRef {
        self.entity_type
    }

    /// Table name: the declared override, else the type's simple name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Columns in declaration order, scalar and join columns alike.
    pub fn columns(&self) -> &EntityColumns {
        &self.columns
    }

    /// The identity column.
    pub fn id_column(&self) -> &EntityColumn {
        &self.columns[self.id_index]
    }

    /// Name of the identity column.
    pub fn id_column_name(&self) -> &str {
        self.id_column().name()
    }

    /// `<table>.<id column>`.
    pub fn id_column_name_with_alias(&self) -> String {
        self.id_column().name_with_alias()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.names()
    }

    /// Alias-qualified column names in declaration order.
    pub fn column_names_with_alias(&self) -> Vec<String> {
        self.columns.names_with_alias()
    }

    /// The column backed by `field_name`.
    pub fn column(&self, field_name: &str) -> Option<&EntityColumn> {
        self.columns.by_field(field_name)
    }

    /// Columns an insert statement writes: insertable and not generated by
    /// the database.
    pub fn insertable_columns(&self) -> impl Iterator<Item = &EntityColumn> {
        self.columns
            .iter()
            .filter(|c| c.is_insertable() && !c.is_auto_increment())
    }

    /// Many-to-one join columns.
    pub fn many_to_one_columns(&self) -> impl Iterator<Item = &ManyToOneColumn> {
        self.columns.many_to_one()
    }

    /// One-to-many associations.
    pub fn one_to_many_associations(&self) -> &[OneToManyAssociation] {
        &self.one_to_many
    }

    /// Every association, many-to-one first.
    pub fn associations(&self) -> impl Iterator<Item = &dyn AssociatedColumn> {
        self.many_to_one_columns()
            .map(|c| c as &dyn AssociatedColumn)
            .chain(self.one_to_many.iter().map(|a| a as &dyn AssociatedColumn))
    }

    /// Serializable description of the entity.
    pub fn snapshot(&self) -> EntitySnapshot {
        let columns = self
            .columns
            .iter()
            .map(|column| ColumnSnapshot {
                name: column.name().to_string(),
                alias: column.name_with_alias(),
                field: column.field_name().to_string(),
                kind: match column {
                    EntityColumn::Field(_) => ColumnKind::Field,
                    EntityColumn::ManyToOne(_) => ColumnKind::ManyToOne,
                },
                scalar_type: column.scalar_type(),
                id: column.is_id(),
                not_null: column.is_not_null(),
                insertable: column.is_insertable(),
                auto_increment: column.is_auto_increment(),
                string_length: column
                    .is_string_valued()
                    .then(|| column.string_length()),
                association: column
                    .as_many_to_one()
                    .map(|c| AssociationSnapshot::new(c.field_name(), c)),
            })
            .collect();

        EntitySnapshot {
            entity: self.entity_type.simple_name().to_string(),
            table: self.table_name.clone(),
            id_column: self.id_column_name().to_string(),
            columns,
            one_to_many: self
                .one_to_many
                .iter()
                .map(|a| AssociationSnapshot::new(a.field_name(), a))
                .collect(),
        }
    }
}

impl PartialEq for EntityMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.entity_type == other.entity_type
    }
}

impl Eq for EntityMetadata {}

impl Hash for EntityMetadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity_type.hash(state);
    }
}

impl fmt::Debug for EntityMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMetadata")
            .field("entity_type", &self.entity_type)
            .field("table_name", &self.table_name)
            .field("columns", &self.columns)
            .field("one_to_many", &self.one_to_many)
            .finish()
    }
}
