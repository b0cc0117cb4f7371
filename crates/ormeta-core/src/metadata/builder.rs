//! Materialize pass of a metadata build.
//!
//! Turns validated plans into shared [`EntityMetadata`] values, depth-first.
//! An association whose target is still being built points back at an
//! ancestor and holds it weakly, so strong references always form a DAG.

use std::sync::{Arc, Weak};

use super::association::{AssociationTarget, ManyToOneColumn, OneToManyAssociation};
use super::column::EntityColumn;
use super::entity::EntityMetadata;
use super::plan::{ColumnPlan, EntityPlans, PlanTarget, Planner};
use crate::config::MappingConfig;
use crate::error::Result;
use crate::reflect::TypeRef;

/// Metadata built by one batch. The root comes first.
pub(crate) struct Batch {
    pub(crate) root: Arc<EntityMetadata>,
    pub(crate) built: Vec<Arc<EntityMetadata>>,
}

/// Plan and materialize `root` together with every unbuilt entity reachable
/// from it. `lookup` supplies metadata built by earlier batches.
pub(crate) fn build<F>(root: TypeRef, config: &MappingConfig, lookup: F) -> Result<Batch>
where
    F: Fn(TypeRef) -> Option<Arc<EntityMetadata>>,
{
    let plans = Planner::new(config, lookup).plan(root)?;
    let mut materializer = Materializer::new(Arc::new(plans));
    let root = materializer.materialize(0);

    Ok(Batch {
        root,
        built: materializer.into_built(),
    })
}

pub(crate) struct Materializer {
    plans: Arc<EntityPlans>,
    built: Vec<Option<Arc<EntityMetadata>>>,
    in_progress: Vec<Option<Weak<EntityMetadata>>>,
}

impl Materializer {
    pub(crate) fn new(plans: Arc<EntityPlans>) -> Self {
        let len = plans.len();
        Self {
            plans,
            built: vec![None; len],
            in_progress: vec![None; len],
        }
    }

    pub(crate) fn materialize(&mut self, index: usize) -> Arc<EntityMetadata> {
        if let Some(built) = &self.built[index] {
            return Arc::clone(built);
        }

        let plans = Arc::clone(&self.plans);
        let plan = plans.get(index);

        let metadata = Arc::new_cyclic(|this| {
            self.in_progress[index] = Some(this.clone());

            let mut columns = Vec::with_capacity(plan.columns.len());
            for column in &plan.columns {
                columns.push(match column {
                    ColumnPlan::Field(field) => EntityColumn::Field(field.clone()),
                    ColumnPlan::ManyToOne(many_to_one) => EntityColumn::ManyToOne(
                        ManyToOneColumn::new(many_to_one, self.target(&many_to_one.target)),
                    ),
                });
            }

            let mut one_to_many = Vec::with_capacity(plan.one_to_many.len());
            for association in &plan.one_to_many {
                one_to_many.push(OneToManyAssociation::new(
                    association,
                    self.target(&association.target),
                ));
            }

            self.in_progress[index] = None;
            EntityMetadata::new(
                plan.entity_type,
                plan.table_name.clone(),
                columns,
                plan.id_index,
                one_to_many,
            )
        });

        self.built[index] = Some(Arc::clone(&metadata));
        metadata
    }

    fn target(&mut self, target: &PlanTarget) -> AssociationTarget {
        match target {
            PlanTarget::Built(metadata) => AssociationTarget::Owned(Arc::clone(metadata)),
            PlanTarget::Planned(index) => {
                if let Some(ancestor) = self.in_progress[*index].clone() {
                    AssociationTarget::ancestor(ancestor, Arc::clone(&self.plans), *index)
                } else {
                    AssociationTarget::Owned(self.materialize(*index))
                }
            }
        }
    }

    fn into_built(self) -> Vec<Arc<EntityMetadata>> {
        self.built.into_iter().flatten().collect()
    }
}
