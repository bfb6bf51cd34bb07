//! Typed per-component storage.
//!
//! One [`ComponentStore`] exists per registered component name, holding
//! values of exactly one Rust type. The registry owns stores behind
//! type-erased handles; this module is the typed surface they re-expose.

use std::collections::BTreeMap;

use crate::entity::Entity;

/// Contract for types stored as components.
///
/// Components must be `Send + Sync + 'static` so their stores can live in
/// the engine's shared context and cross the tick-loop task boundary.
pub trait Component: Send + Sync + 'static {}

/// Maps entities to component values of a single type.
///
/// The store performs no existence checks against the entity manager:
/// attaching a component to an entity that was never created (or has been
/// destroyed) is permitted.
#[derive(Debug)]
pub struct ComponentStore<T> {
    entries: BTreeMap<Entity, T>,
}

impl<T> ComponentStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or overwrite the component for an entity.
    pub fn set(&mut self, entity: Entity, component: T) {
        self.entries.insert(entity, component);
    }

    /// Returns the component for an entity, if present.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.entries.get(&entity)
    }

    /// Returns a mutable reference to the component for an entity.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.entries.get_mut(&entity)
    }

    /// Returns `true` if the entity has a component in this store.
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.entries.contains_key(&entity)
    }

    /// Remove and return the component for an entity.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.entries.remove(&entity)
    }

    /// Returns the number of entities with a component in this store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(Entity, &T)` pairs in entity-id order.
    ///
    /// The iterator borrows the store, so the store cannot be mutated while
    /// it is being walked.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entries.iter().map(|(&entity, component)| (entity, component))
    }

    /// Iterate `(Entity, &mut T)` pairs in entity-id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entries
            .iter_mut()
            .map(|(&entity, component)| (entity, component))
    }
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
