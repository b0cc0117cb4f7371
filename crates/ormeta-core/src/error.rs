//! Mapping error types.

use thiserror::Error;

/// Errors raised while resolving entity metadata.
///
/// Every variant names the offending type, and the field when one is involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The requested type does not carry the entity marker.
    #[error("{entity} is not an entity")]
    NotAnEntity {
        /// Simple name of the type.
        entity: String,
    },

    /// The entity declares no identity field.
    #[error("entity {entity} declares no id field")]
    MissingId {
        /// Simple name of the entity.
        entity: String,
    },

    /// The entity declares more than one identity field.
    #[error("entity {entity} declares multiple id fields: {}", fields.join(", "))]
    AmbiguousId {
        /// Simple name of the entity.
        entity: String,
        /// Names of the fields marked as id.
        fields: Vec<String>,
    },

    /// An association field points at a type that is not an entity.
    #[error("association {entity}.{field} targets {target}, which is not an entity")]
    TargetNotAnEntity {
        /// Simple name of the owning entity.
        entity: String,
        /// Name of the association field.
        field: String,
        /// Simple name of the declared target type.
        target: String,
    },

    /// The entity was not discovered by the provider's scanner.
    #[error("entity {entity} was not discovered by the scanner")]
    NotDiscovered {
        /// Simple name of the entity.
        entity: String,
    },

    /// Snapshot encoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl MappingError {
    /// Name of the type the error is about.
    pub fn entity(&self) -> Option<&str> {
        match self {
            MappingError::NotAnEntity { entity }
            | MappingError::MissingId { entity }
            | MappingError::AmbiguousId { entity, .. }
            | MappingError::TargetNotAnEntity { entity, .. }
            | MappingError::NotDiscovered { entity } => Some(entity),
            MappingError::Serialization(_) => None,
        }
    }
}

/// Result alias for metadata operations.
pub type Result<T> = std::result::Result<T, MappingError>;
