//! Declared mapping hints of types and fields.
//!
//! Hints are partial: anything left unset resolves to a documented default
//! when metadata is built.

use serde::Serialize;

use super::{Reflect, ScalarType, TypeRef};

/// Declared hints of one type.
#[derive(Debug, Clone, Default)]
pub struct TypeInfo {
    /// Entity marker.
    pub entity: bool,
    /// Table name override.
    pub table: Option<String>,
    /// Scalar classification, for value types.
    pub scalar: Option<ScalarType>,
    /// Declared fields, in declaration order.
    pub fields: Vec<FieldInfo>,
    /// Declared member types, for package-like scan roots.
    pub members: Vec<TypeRef>,
}

impl TypeInfo {
    /// Hints of a type carrying the entity marker.
    pub fn entity() -> Self {
        Self {
            entity: true,
            ..Self::default()
        }
    }

    /// Hints of a plain (unmapped) type.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Hints of a scalar value type.
    pub fn scalar(scalar: ScalarType) -> Self {
        Self {
            scalar: Some(scalar),
            ..Self::default()
        }
    }

    /// Override the table name.
    ///
    /// The default table name is the type's simple name with generic
    /// arguments stripped, so every instantiation of a generic entity maps to
    /// the same table unless each declares its own name here.
    pub fn with_table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
        self
    }

    /// Declare a field.
    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldInfo>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Declare a member type.
    pub fn with_member<T: Reflect>(mut self) -> Self {
        self.members.push(TypeRef::of::<T>());
        self
    }

    /// Check if the entity marker is present.
    pub fn is_entity(&self) -> bool {
        self.entity
    }

    /// The table name override, if declared and non-blank.
    pub fn table_name(&self) -> Option<&str> {
        non_blank(self.table.as_deref())
    }
}

/// One declared field.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Field name.
    pub name: String,
    /// Declared value type. For one-to-many fields this is the element type.
    pub value_type: TypeRef,
    /// Declared hints.
    pub hints: FieldHints,
}

impl FieldInfo {
    /// A field of value type `T` with no hints.
    pub fn new<T: Reflect>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: TypeRef::of::<T>(),
            hints: FieldHints::default(),
        }
    }

    /// A many-to-one association to `T`.
    pub fn many_to_one<T: Reflect>(name: impl Into<String>) -> Self {
        Self::new::<T>(name).association(AssociationKind::ManyToOne)
    }

    /// A one-to-many association to a collection of `T`.
    pub fn one_to_many<T: Reflect>(name: impl Into<String>) -> Self {
        Self::new::<T>(name).association(AssociationKind::OneToMany)
    }

    /// Mark as the identity field.
    pub fn id(mut self) -> Self {
        self.hints.id = true;
        self
    }

    /// Set the value generation strategy.
    pub fn generated(mut self, generation: GenerationType) -> Self {
        self.hints.generated = Some(generation);
        self
    }

    /// Set the column hint.
    pub fn column(mut self, column: ColumnHint) -> Self {
        self.hints.column = Some(column);
        self
    }

    /// Override the column name.
    pub fn column_name(mut self, name: impl Into<String>) -> Self {
        self.hints.column.get_or_insert_with(ColumnHint::default).name = Some(name.into());
        self
    }

    /// Declare the column non-nullable.
    pub fn not_null(mut self) -> Self {
        self.hints.column.get_or_insert_with(ColumnHint::default).nullable = false;
        self
    }

    /// Set the column length.
    pub fn length(mut self, length: u32) -> Self {
        self.hints.column.get_or_insert_with(ColumnHint::default).length = Some(length);
        self
    }

    /// Exclude the field from the mapping.
    pub fn transient(mut self) -> Self {
        self.hints.transient = true;
        self
    }

    /// Declare an association of the given kind.
    pub fn association(mut self, kind: AssociationKind) -> Self {
        self.hints.association = Some(AssociationHint { kind, fetch: None });
        self
    }

    /// Set the fetch strategy of the association.
    pub fn fetch(mut self, fetch: FetchType) -> Self {
        if let Some(association) = self.hints.association.as_mut() {
            association.fetch = Some(fetch);
        }
        self
    }

    /// Set the join column hint.
    pub fn join_column(mut self, join_column: JoinColumnHint) -> Self {
        self.hints.join_column = Some(join_column);
        self
    }

    /// Override the join column name.
    pub fn join_column_name(mut self, name: impl Into<String>) -> Self {
        self.hints.join_column.get_or_insert_with(JoinColumnHint::default).name =
            Some(name.into());
        self
    }

    /// The declared association kind, if any.
    pub fn association_kind(&self) -> Option<AssociationKind> {
        self.hints.association.as_ref().map(|a| a.kind)
    }
}

/// Declared hints of a field.
#[derive(Debug, Clone, Default)]
pub struct FieldHints {
    /// Identity field marker.
    pub id: bool,
    /// Value generation strategy.
    pub generated: Option<GenerationType>,
    /// Column hint.
    pub column: Option<ColumnHint>,
    /// Excluded from the mapping.
    pub transient: bool,
    /// Association hint.
    pub association: Option<AssociationHint>,
    /// Join column hint, for associations.
    pub join_column: Option<JoinColumnHint>,
}

/// Column hint. Unset attributes keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHint {
    /// Column name override.
    pub name: Option<String>,
    /// Whether the column accepts null.
    pub nullable: bool,
    /// Whether the column is written by inserts.
    pub insertable: bool,
    /// Text length.
    pub length: Option<u32>,
}

impl Default for ColumnHint {
    fn default() -> Self {
        Self {
            name: None,
            nullable: true,
            insertable: true,
            length: None,
        }
    }
}

/// Join column hint of an association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinColumnHint {
    /// Join column name override.
    pub name: Option<String>,
    /// Whether the join column accepts null.
    pub nullable: bool,
    /// Whether the join column is written by inserts.
    pub insertable: bool,
}

impl Default for JoinColumnHint {
    fn default() -> Self {
        Self {
            name: None,
            nullable: true,
            insertable: true,
        }
    }
}

impl JoinColumnHint {
    /// A join column hint with a name override.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The name override, if declared and non-blank.
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }
}

impl ColumnHint {
    /// The name override, if declared and non-blank.
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }
}

/// Association hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationHint {
    /// Association kind.
    pub kind: AssociationKind,
    /// Declared fetch strategy.
    pub fetch: Option<FetchType>,
}

/// Kind of association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    /// This entity holds the foreign key.
    ManyToOne,
    /// The target entity holds the foreign key.
    OneToMany,
}

/// When an association's target is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FetchType {
    /// Loaded together with the owner.
    Eager,
    /// Loaded on access.
    Lazy,
}

/// Value generation strategy of an identity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationType {
    /// Database auto-increment column.
    Identity,
    /// Database sequence.
    Sequence,
    /// Chosen by the persistence layer.
    Auto,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
