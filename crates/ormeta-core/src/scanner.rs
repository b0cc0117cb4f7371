//! Entity discovery.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::reflect::{Reflect, TypeRef};

/// Source of the set of mapped types known to a provider.
pub trait TypeScanner {
    /// Every entity-marked type the scanner can find.
    fn scan(&self) -> HashSet<TypeRef>;
}

/// Scanner walking the declared hints of its roots.
///
/// A root is either an entity itself or a package-like type listing its
/// members. The walk follows member types and field value types
/// breadth-first, so entities reachable only through associations are found
/// as well.
#[derive(Debug, Clone)]
pub struct EntityScanner {
    roots: Vec<TypeRef>,
}

impl EntityScanner {
    /// Scanner starting from `root`.
    pub fn new(root: TypeRef) -> Self {
        Self { roots: vec![root] }
    }

    /// Scanner starting from `T`.
    pub fn of<T: Reflect>() -> Self {
        Self::new(TypeRef::of::<T>())
    }

    /// Add another root.
    pub fn with_root<T: Reflect>(mut self) -> Self {
        self.roots.push(TypeRef::of::<T>());
        self
    }

    /// Configured roots.
    pub fn roots(&self) -> &[TypeRef] {
        &self.roots
    }
}

impl TypeScanner for EntityScanner {
    fn scan(&self) -> HashSet<TypeRef> {
        let mut seen: HashSet<TypeRef> = HashSet::new();
        let mut queue: VecDeque<TypeRef> = VecDeque::new();
        let mut entities = HashSet::new();

        for root in &self.roots {
            if seen.insert(*root) {
                queue.push_back(*root);
            }
        }

        while let Some(ty) = queue.pop_front() {
            let info = ty.info();
            if info.is_entity() {
                entities.insert(ty);
            }

            let next = info
                .members
                .iter()
                .copied()
                .chain(info.fields.iter().map(|f| f.value_type));
            for candidate in next {
                if seen.insert(candidate) {
                    queue.push_back(candidate);
                }
            }
        }

        debug!(
            roots = self.roots.len(),
            visited = seen.len(),
            entities = entities.len(),
            "Scanned entity types"
        );

        entities
    }
}
