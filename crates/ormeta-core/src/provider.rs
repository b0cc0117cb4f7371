//! Per-type metadata cache.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use crate::config::MappingConfig;
use crate::error::{MappingError, Result};
use crate::metadata::{self, AssociatedColumn, EntityMetadata};
use crate::reflect::{Reflect, TypeRef};
use crate::scanner::TypeScanner;

/// Resolves and caches [`EntityMetadata`] for the entities found by a
/// scanner.
///
/// Metadata is built on first request and shared afterwards: repeated
/// requests for one type return the same [`Arc`]. The provider is safe to
/// share between threads.
#[derive(Debug)]
pub struct EntityMetadataProvider {
    entity_types: HashSet<TypeRef>,
    cache: DashMap<TypeRef, Arc<EntityMetadata>>,
    build_lock: Mutex<()>,
    config: MappingConfig,
}

impl EntityMetadataProvider {
    /// Create a provider over the entities `scanner` discovers.
    pub fn from_scanner(scanner: &impl TypeScanner) -> Result<Self> {
        Self::with_config(scanner, MappingConfig::default())
    }

    /// Create a provider with an explicit configuration.
    ///
    /// With warm-up enabled every discovered entity is built immediately and
    /// the first failure is returned.
    pub fn with_config(scanner: &impl TypeScanner, config: MappingConfig) -> Result<Self> {
        let provider = Self {
            entity_types: scanner.scan(),
            cache: DashMap::new(),
            build_lock: Mutex::new(()),
            config,
        };

        info!(
            entities = provider.entity_types.len(),
            warm_up = provider.config.warm_up,
            "Created entity metadata provider"
        );

        if provider.config.warm_up {
            for ty in &provider.entity_types {
                provider.entity_metadata(*ty)?;
            }
        }

        Ok(provider)
    }

    /// Configuration in use.
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Metadata for `ty`, built and cached on first request.
    ///
    /// Under strict membership the check against the scanned types runs
    /// first, so entities cached only as association targets of a batch are
    /// still refused.
    #[instrument(skip(self, ty), fields(entity = %ty))]
    pub fn entity_metadata(&self, ty: TypeRef) -> Result<Arc<EntityMetadata>> {
        if self.config.strict_membership && !self.entity_types.contains(&ty) {
            let entity = ty.simple_name().to_string();
            return Err(if ty.is_entity() {
                MappingError::NotDiscovered { entity }
            } else {
                MappingError::NotAnEntity { entity }
            });
        }

        if let Some(cached) = self.cached(ty) {
            trace!("Metadata cache hit");
            return Ok(cached);
        }

        let _guard = self.build_lock.lock();
        if let Some(cached) = self.cached(ty) {
            return Ok(cached);
        }

        let batch = match metadata::build(ty, &self.config, |target| self.cached(target)) {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, "Failed to build entity metadata");
                return Err(e);
            }
        };

        debug!(entities_built = batch.built.len(), "Cached entity metadata");
        for built in batch.built {
            self.cache.insert(built.entity_type(), built);
        }

        Ok(batch.root)
    }

    /// Metadata for `T`.
    pub fn entity_metadata_of<T: Reflect>(&self) -> Result<Arc<EntityMetadata>> {
        self.entity_metadata(TypeRef::of::<T>())
    }

    /// Every entity that is the target of a one-to-many edge reachable from
    /// `metadata` through associations of any kind.
    ///
    /// The entity itself is never part of the result, even when a cycle
    /// leads back to it.
    #[instrument(skip(self, metadata), fields(entity = %metadata.entity_type()))]
    pub fn one_to_many_associated_entities_metadata(
        &self,
        metadata: &EntityMetadata,
    ) -> Result<HashSet<Arc<EntityMetadata>>> {
        let root = metadata.entity_type();
        let mut visited: HashSet<TypeRef> = HashSet::from([root]);
        let mut stack = vec![self.entity_metadata(root)?];
        let mut result = HashSet::new();

        while let Some(current) = stack.pop() {
            let edges = current
                .many_to_one_columns()
                .map(|c| (c.join_column_type(), false))
                .chain(
                    current
                        .one_to_many_associations()
                        .iter()
                        .map(|a| (a.join_column_type(), true)),
                )
                .collect::<Vec<_>>();

            for (target, one_to_many) in edges {
                if target == root {
                    continue;
                }

                let target_metadata = self.entity_metadata(target)?;
                if one_to_many {
                    result.insert(Arc::clone(&target_metadata));
                }
                if visited.insert(target) {
                    stack.push(target_metadata);
                }
            }
        }

        debug!(count = result.len(), "Resolved one-to-many closure");
        Ok(result)
    }

    /// Every discovered entity holding a one-to-many edge that points at
    /// `metadata`, directly or through other such owners.
    ///
    /// Owners are found by inspecting every scanned type, so this builds and
    /// caches metadata for all of them. The first invalid scanned entity
    /// fails the call, even when it is unrelated to `metadata`.
    #[instrument(skip(self, metadata), fields(entity = %metadata.entity_type()))]
    pub fn one_to_many_owners_metadata(
        &self,
        metadata: &EntityMetadata,
    ) -> Result<HashSet<Arc<EntityMetadata>>> {
        let mut owners: HashMap<TypeRef, Vec<Arc<EntityMetadata>>> = HashMap::new();
        for ty in &self.entity_types {
            let owner = self.entity_metadata(*ty)?;
            for association in owner.one_to_many_associations() {
                owners
                    .entry(association.join_column_type())
                    .or_default()
                    .push(Arc::clone(&owner));
            }
        }

        let root = metadata.entity_type();
        let mut visited: HashSet<TypeRef> = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        let mut result = HashSet::new();

        while let Some(current) = queue.pop_front() {
            for owner in owners.get(&current).into_iter().flatten() {
                if visited.insert(owner.entity_type()) {
                    queue.push_back(owner.entity_type());
                    result.insert(Arc::clone(owner));
                }
            }
        }

        debug!(count = result.len(), "Resolved one-to-many owners");
        Ok(result)
    }

    /// Every entity type discovered at construction.
    pub fn all_entity_types(&self) -> &HashSet<TypeRef> {
        &self.entity_types
    }

    /// Number of cached metadata values.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Check if metadata for `ty` is cached.
    pub fn is_cached(&self, ty: TypeRef) -> bool {
        self.cache.contains_key(&ty)
    }

    fn cached(&self, ty: TypeRef) -> Option<Arc<EntityMetadata>> {
        self.cache.get(&ty).map(|entry| Arc::clone(entry.value()))
    }
}
