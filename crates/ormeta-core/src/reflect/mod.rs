//! Reflection surface.
//!
//! Types describe their mapping through [`Reflect`]; the metadata layer reads
//! those hints through [`TypeRef`] handles.

mod hints;
mod type_ref;
mod types;

pub use hints::{
    AssociationHint, AssociationKind, ColumnHint, FetchType, FieldHints, FieldInfo,
    GenerationType, JoinColumnHint, TypeInfo,
};
pub use type_ref::{Reflect, TypeRef};
pub use types::ScalarType;
