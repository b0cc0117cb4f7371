//! Plan pass of a metadata build.
//!
//! Discovers every not-yet-built entity reachable from a root through
//! association edges, validates it, and resolves every column up front. Join
//! column names only need the target's id column name, so the plan never
//! recurses into a target's own associations. Nothing is constructed until the
//! whole reachable graph has been validated.

use std::collections::HashMap;
use std::sync::Arc;

use super::column::{ColumnDef, FieldColumn};
use super::entity::EntityMetadata;
use crate::config::MappingConfig;
use crate::error::{MappingError, Result};
use crate::reflect::{AssociationKind, FetchType, FieldInfo, TypeInfo, TypeRef};

/// Separator between the field name and the target id column name of an
/// inferred join column name.
pub const JOIN_COLUMN_DELIMITER: &str = "_";

/// Target of an association in a plan.
#[derive(Clone)]
pub(crate) enum PlanTarget {
    /// Already built by an earlier batch.
    Built(Arc<EntityMetadata>),
    /// Built by this batch, at the given plan index.
    Planned(usize),
}

pub(crate) struct ManyToOnePlan {
    pub(crate) column: FieldColumn,
    pub(crate) not_null: bool,
    pub(crate) insertable: bool,
    pub(crate) fetch_type: FetchType,
    pub(crate) join_column_name: String,
    pub(crate) target_table_name: String,
    pub(crate) target: PlanTarget,
}

pub(crate) struct OneToManyPlan {
    pub(crate) field_name: String,
    pub(crate) owner_table_name: String,
    pub(crate) fetch_type: FetchType,
    pub(crate) join_column_name: String,
    pub(crate) target_type: TypeRef,
    pub(crate) target_table_name: String,
    pub(crate) target: PlanTarget,
}

pub(crate) enum ColumnPlan {
    Field(FieldColumn),
    ManyToOne(ManyToOnePlan),
}

pub(crate) struct EntityPlan {
    pub(crate) entity_type: TypeRef,
    pub(crate) table_name: String,
    pub(crate) columns: Vec<ColumnPlan>,
    pub(crate) id_index: usize,
    pub(crate) one_to_many: Vec<OneToManyPlan>,
}

/// Validated plans of one build batch. Index 0 is the root.
pub(crate) struct EntityPlans {
    plans: Vec<EntityPlan>,
}

impl EntityPlans {
    pub(crate) fn len(&self) -> usize {
        self.plans.len()
    }

    pub(crate) fn get(&self, index: usize) -> &EntityPlan {
        &self.plans[index]
    }
}

/// Facts about a discovered entity needed by the entities that reference it.
struct Shape {
    entity_type: TypeRef,
    info: TypeInfo,
    table_name: String,
    id_column_name: String,
}

pub(crate) struct Planner<'a, F> {
    config: &'a MappingConfig,
    lookup: F,
    shapes: Vec<Shape>,
    indices: HashMap<TypeRef, usize>,
}

impl<'a, F> Planner<'a, F>
where
    F: Fn(TypeRef) -> Option<Arc<EntityMetadata>>,
{
    /// `lookup` returns metadata already built by an earlier batch; such
    /// entities are referenced, not planned again.
    pub(crate) fn new(config: &'a MappingConfig, lookup: F) -> Self {
        Self {
            config,
            lookup,
            shapes: Vec::new(),
            indices: HashMap::new(),
        }
    }

    /// Plan `root` and every unbuilt entity reachable from it.
    pub(crate) fn plan(mut self, root: TypeRef) -> Result<EntityPlans> {
        self.discover(root)?;

        let mut plans = Vec::new();
        let mut next = 0;
        while next < self.shapes.len() {
            plans.push(self.plan_entity(next)?);
            next += 1;
        }

        Ok(EntityPlans { plans })
    }

    fn discover(&mut self, entity_type: TypeRef) -> Result<usize> {
        let info = entity_type.info();
        if !info.is_entity() {
            return Err(MappingError::NotAnEntity {
                entity: entity_type.simple_name().to_string(),
            });
        }

        let table_name = info
            .table_name()
            .unwrap_or(entity_type.simple_name())
            .to_string();

        let ids: Vec<&FieldInfo> = info
            .fields
            .iter()
            .filter(|f| f.hints.id && !f.hints.transient && f.hints.association.is_none())
            .collect();

        let id_column_name = match ids.as_slice() {
            [id] => FieldColumn::new(id, &table_name, self.config)
                .name()
                .to_string(),
            [] => {
                return Err(MappingError::MissingId {
                    entity: entity_type.simple_name().to_string(),
                })
            }
            _ => {
                return Err(MappingError::AmbiguousId {
                    entity: entity_type.simple_name().to_string(),
                    fields: ids.iter().map(|f| f.name.clone()).collect(),
                })
            }
        };

        let index = self.shapes.len();
        self.shapes.push(Shape {
            entity_type,
            info,
            table_name,
            id_column_name,
        });
        self.indices.insert(entity_type, index);
        Ok(index)
    }

    fn plan_entity(&mut self, index: usize) -> Result<EntityPlan> {
        let entity_type = self.shapes[index].entity_type;
        let table_name = self.shapes[index].table_name.clone();
        let id_column_name = self.shapes[index].id_column_name.clone();
        let fields = self.shapes[index].info.fields.clone();

        let mut columns = Vec::with_capacity(fields.len());
        let mut one_to_many = Vec::new();
        let mut id_index = 0;

        for field in fields.iter().filter(|f| !f.hints.transient) {
            match field.association_kind() {
                None => {
                    let column = FieldColumn::new(field, &table_name, self.config);
                    if column.is_id() {
                        id_index = columns.len();
                    }
                    columns.push(ColumnPlan::Field(column));
                }
                Some(AssociationKind::ManyToOne) => {
                    let (target, target_table_name, target_id_column) =
                        self.resolve_target(entity_type, field)?;
                    let join_column = field.hints.join_column.as_ref();

                    columns.push(ColumnPlan::ManyToOne(ManyToOnePlan {
                        column: FieldColumn::new(field, &table_name, self.config),
                        not_null: join_column.is_some_and(|j| !j.nullable),
                        insertable: join_column.map_or(true, |j| j.insertable),
                        fetch_type: fetch_type(field, FetchType::Eager),
                        join_column_name: join_column_name(field, &target_id_column),
                        target_table_name,
                        target,
                    }));
                }
                Some(AssociationKind::OneToMany) => {
                    let (target, target_table_name, _) = self.resolve_target(entity_type, field)?;

                    one_to_many.push(OneToManyPlan {
                        field_name: field.name.clone(),
                        owner_table_name: table_name.clone(),
                        fetch_type: fetch_type(field, FetchType::Lazy),
                        join_column_name: join_column_name(field, &id_column_name),
                        target_type: field.value_type,
                        target_table_name,
                        target,
                    });
                }
            }
        }

        Ok(EntityPlan {
            entity_type,
            table_name,
            columns,
            id_index,
            one_to_many,
        })
    }

    /// Returns the target, its table name and its id column name.
    fn resolve_target(
        &mut self,
        owner: TypeRef,
        field: &FieldInfo,
    ) -> Result<(PlanTarget, String, String)> {
        let target = field.value_type;

        if let Some(built) = (self.lookup)(target) {
            let table_name = built.table_name().to_string();
            let id_column_name = built.id_column_name().to_string();
            return Ok((PlanTarget::Built(built), table_name, id_column_name));
        }

        let index = match self.indices.get(&target) {
            Some(&index) => index,
            None if !target.is_entity() => {
                return Err(MappingError::TargetNotAnEntity {
                    entity: owner.simple_name().to_string(),
                    field: field.name.clone(),
                    target: target.simple_name().to_string(),
                })
            }
            None => self.discover(target)?,
        };

        let shape = &self.shapes[index];
        Ok((
            PlanTarget::Planned(index),
            shape.table_name.clone(),
            shape.id_column_name.clone(),
        ))
    }
}

fn fetch_type(field: &FieldInfo, default: FetchType) -> FetchType {
    field
        .hints
        .association
        .and_then(|a| a.fetch)
        .unwrap_or(default)
}

/// Explicit non-blank join column hint, else `<field><_><id column>`.
fn join_column_name(field: &FieldInfo, id_column_name: &str) -> String {
    field
        .hints
        .join_column
        .as_ref()
        .and_then(|j| j.name())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}{JOIN_COLUMN_DELIMITER}{id_column_name}", field.name))
}
