//! Entity metadata model.
//!
//! Describes the relational shape of mapped types: tables, columns and the
//! associations between entities.

mod association;
mod builder;
mod column;
mod entity;
mod plan;
mod snapshot;

pub(crate) use builder::build;

pub use association::{AssociatedColumn, ManyToOneColumn, OneToManyAssociation};
pub use column::{with_alias, ColumnDef, EntityColumn, EntityColumns, FieldColumn, ALIAS_DELIMITER};
pub use entity::EntityMetadata;
pub use plan::JOIN_COLUMN_DELIMITER;
pub use snapshot::{AssociationSnapshot, ColumnKind, ColumnSnapshot, EntitySnapshot};
