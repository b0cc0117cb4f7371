//! ormeta core - entity metadata for the object-relational mapping layer.
//!
//! Mapped types describe themselves through [`Reflect`]. This crate turns
//! those declarations into [`EntityMetadata`]: table names, column
//! descriptors and association descriptors, which the query layer uses to
//! build SQL. [`EntityMetadataProvider`] caches metadata per type and answers
//! graph questions over the associations between entities.

pub mod config;
pub mod error;
pub mod metadata;
pub mod provider;
pub mod reflect;
pub mod scanner;

pub use config::{MappingConfig, DEFAULT_STRING_LENGTH};
pub use error::{MappingError, Result};
pub use metadata::{
    with_alias, AssociatedColumn, AssociationSnapshot, ColumnDef, ColumnKind, ColumnSnapshot,
    EntityColumn, EntityColumns, EntityMetadata, EntitySnapshot, FieldColumn, ManyToOneColumn,
    OneToManyAssociation, ALIAS_DELIMITER, JOIN_COLUMN_DELIMITER,
};
pub use provider::EntityMetadataProvider;
pub use reflect::{
    AssociationHint, AssociationKind, ColumnHint, FetchType, FieldHints, FieldInfo,
    GenerationType, JoinColumnHint, Reflect, ScalarType, TypeInfo, TypeRef,
};
pub use scanner::{EntityScanner, TypeScanner};
