//! Association descriptors.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use super::builder::Materializer;
use super::column::{with_alias, ColumnDef, EntityColumns, FieldColumn};
use super::entity::EntityMetadata;
use super::plan::{EntityPlans, ManyToOnePlan, OneToManyPlan};
use crate::reflect::{FetchType, ScalarType, TypeRef};

/// Contract shared by every association, whichever side holds the foreign key.
pub trait AssociatedColumn {
    /// Declared fetch strategy.
    fn fetch_type(&self) -> FetchType;

    /// Whether the target is loaded on access.
    fn is_fetch_type_lazy(&self) -> bool {
        self.fetch_type() == FetchType::Lazy
    }

    /// Whether the target is loaded together with the owner.
    fn is_fetch_type_eager(&self) -> bool {
        self.fetch_type() == FetchType::Eager
    }

    /// The associated entity type.
    fn join_column_type(&self) -> TypeRef;

    /// Name of the column holding the foreign key.
    fn join_column_name(&self) -> &str;

    /// Alias-qualified name of the join column, used to disambiguate joined
    /// tables.
    fn name_with_alias_associated_entity(&self) -> String;

    /// Metadata of the associated entity.
    fn associated_entity_metadata(&self) -> Arc<EntityMetadata>;

    /// Table name of the associated entity.
    fn associated_entity_table_name(&self) -> &str;

    /// Columns of the associated entity.
    fn associated_entity_columns(&self) -> EntityColumns {
        self.associated_entity_metadata().columns().clone()
    }

    /// Alias-qualified column names of the associated entity.
    fn associated_entity_column_names_with_alias(&self) -> Vec<String> {
        self.associated_entity_metadata().column_names_with_alias()
    }

    /// Alias-qualified id column name of the associated entity.
    fn associated_entity_id_column_name_with_alias(&self) -> String {
        self.associated_entity_metadata().id_column_name_with_alias()
    }
}

/// Resolved target of an association.
///
/// Targets still under construction when the association was built (cycles
/// back to an ancestor) are held weakly, everything else strongly. A dropped
/// ancestor is rebuilt from its plan at most once per descriptor.
#[derive(Clone)]
pub(crate) enum AssociationTarget {
    Owned(Arc<EntityMetadata>),
    Ancestor {
        target: Weak<EntityMetadata>,
        plans: Arc<EntityPlans>,
        index: usize,
        rebuilt: OnceLock<Arc<EntityMetadata>>,
    },
}

impl AssociationTarget {
    pub(crate) fn ancestor(
        target: Weak<EntityMetadata>,
        plans: Arc<EntityPlans>,
        index: usize,
    ) -> Self {
        AssociationTarget::Ancestor {
            target,
            plans,
            index,
            rebuilt: OnceLock::new(),
        }
    }

    fn metadata(&self) -> Arc<EntityMetadata> {
        match self {
            AssociationTarget::Owned(metadata) => Arc::clone(metadata),
            AssociationTarget::Ancestor {
                target,
                plans,
                index,
                rebuilt,
            } => target.upgrade().unwrap_or_else(|| {
                let rebuilt = rebuilt
                    .get_or_init(|| Materializer::new(Arc::clone(plans)).materialize(*index));
                Arc::clone(rebuilt)
            }),
        }
    }
}

/// The owning side of a many-to-one association: a local join column holding
/// the target's id.
#[derive(Clone)]
pub struct ManyToOneColumn {
    column: FieldColumn,
    not_null: bool,
    insertable: bool,
    fetch_type: FetchType,
    join_column_name: String,
    target_table_name: String,
    target: AssociationTarget,
}

impl ManyToOneColumn {
    pub(crate) fn new(plan: &ManyToOnePlan, target: AssociationTarget) -> Self {
        Self {
            column: plan.column.clone(),
            not_null: plan.not_null,
            insertable: plan.insertable,
            fetch_type: plan.fetch_type,
            join_column_name: plan.join_column_name.clone(),
            target_table_name: plan.target_table_name.clone(),
            target,
        }
    }

    /// The field-backed column the association was declared on.
    pub fn field_column(&self) -> &FieldColumn {
        &self.column
    }
}

impl ColumnDef for ManyToOneColumn {
    fn table_name(&self) -> &str {
        self.column.table_name()
    }

    fn name(&self) -> &str {
        &self.join_column_name
    }

    fn value_type(&self) -> TypeRef {
        self.column.value_type()
    }

    fn scalar_type(&self) -> Option<ScalarType> {
        None
    }

    fn is_not_null(&self) -> bool {
        self.not_null
    }

    fn is_insertable(&self) -> bool {
        self.insertable
    }

    fn is_auto_increment(&self) -> bool {
        false
    }

    fn is_string_valued(&self) -> bool {
        false
    }

    fn string_length(&self) -> u32 {
        self.column.string_length()
    }

    fn field_name(&self) -> &str {
        self.column.field_name()
    }
}

impl AssociatedColumn for ManyToOneColumn {
    fn fetch_type(&self) -> FetchType {
        self.fetch_type
    }

    fn join_column_type(&self) -> TypeRef {
        self.column.value_type()
    }

    fn join_column_name(&self) -> &str {
        &self.join_column_name
    }

    fn name_with_alias_associated_entity(&self) -> String {
        with_alias(self.table_name(), self.name())
    }

    fn associated_entity_metadata(&self) -> Arc<EntityMetadata> {
        self.target.metadata()
    }

    fn associated_entity_table_name(&self) -> &str {
        &self.target_table_name
    }
}

impl PartialEq for ManyToOneColumn {
    fn eq(&self, other: &Self) -> bool {
        self.column == other.column
            && self.not_null == other.not_null
            && self.insertable == other.insertable
            && self.fetch_type == other.fetch_type
            && self.join_column_name == other.join_column_name
    }
}

impl fmt::Debug for ManyToOneColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManyToOneColumn")
            .field("table_name", &self.column.table_name())
            .field("join_column_name", &self.join_column_name)
            .field("field_name", &self.column.field_name())
            .field("target", &self.column.value_type())
            .field("fetch_type", &self.fetch_type)
            .field("not_null", &self.not_null)
            .field("insertable", &self.insertable)
            .finish()
    }
}

/// The inverse side of an association: the target entity holds the foreign
/// key, so there is no local column.
#[derive(Clone)]
pub struct OneToManyAssociation {
    field_name: String,
    owner_table_name: String,
    fetch_type: FetchType,
    join_column_name: String,
    target_type: TypeRef,
    target_table_name: String,
    target: AssociationTarget,
}

impl OneToManyAssociation {
    pub(crate) fn new(plan: &OneToManyPlan, target: AssociationTarget) -> Self {
        Self {
            field_name: plan.field_name.clone(),
            owner_table_name: plan.owner_table_name.clone(),
            fetch_type: plan.fetch_type,
            join_column_name: plan.join_column_name.clone(),
            target_type: plan.target_type,
            target_table_name: plan.target_table_name.clone(),
            target,
        }
    }

    /// Name of the collection field.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Table name of the owning entity.
    pub fn owner_table_name(&self) -> &str {
        &self.owner_table_name
    }
}

impl AssociatedColumn for OneToManyAssociation {
    fn fetch_type(&self) -> FetchType {
        self.fetch_type
    }

    fn join_column_type(&self) -> TypeRef {
        self.target_type
    }

    fn join_column_name(&self) -> &str {
        &self.join_column_name
    }

    /// The join column lives on the target table.
    fn name_with_alias_associated_entity(&self) -> String {
        with_alias(&self.target_table_name, &self.join_column_name)
    }

    fn associated_entity_metadata(&self) -> Arc<EntityMetadata> {
        self.target.metadata()
    }

    fn associated_entity_table_name(&self) -> &str {
        &self.target_table_name
    }
}

impl PartialEq for OneToManyAssociation {
    fn eq(&self, other: &Self) -> bool {
        self.field_name == other.field_name
            && self.owner_table_name == other.owner_table_name
            && self.fetch_type == other.fetch_type
            && self.join_column_name == other.join_column_name
            && self.target_type == other.target_type
    }
}

impl fmt::Debug for OneToManyAssociation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneToManyAssociation")
            .field("field_name", &self.field_name)
            .field("owner_table_name", &self.owner_table_name)
            .field("target", &self.target_type)
            .field("join_column_name", &self.join_column_name)
            .field("fetch_type", &self.fetch_type)
            .finish()
    }
}
