//! Entity identity and allocation.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data.
//! The [`EntityManager`] issues ids and tracks which ones are alive.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::EntityError;

/// A unique entity identifier.
///
/// An entity carries no data of its own; the components attached to it
/// give it meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Issues entity ids and tracks the live set.
///
/// Ids start at 1 and increase strictly. An id is never reused within one
/// manager instance, even after the entity it named is destroyed.
///
/// Destroying an entity removes it from the live set and nothing else:
/// component stores are owned elsewhere and must be cleaned up by the
/// caller.
#[derive(Debug)]
pub struct EntityManager {
    next_id: u64,
    alive: BTreeSet<Entity>,
}

impl EntityManager {
    /// Create a new manager. Ids start at 1 (0 is reserved for
    /// [`Entity::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            alive: BTreeSet::new(),
        }
    }

    /// Allocate a fresh entity and add it to the live set.
    ///
    /// The returned id is strictly greater than every id issued before it.
    pub fn create(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        self.alive.insert(entity);
        entity
    }

    /// Remove an entity from the live set.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::NotFound`] if the entity was never created or
    /// has already been destroyed.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EntityError> {
        if self.alive.remove(&entity) {
            Ok(())
        } else {
            Err(EntityError::NotFound(entity))
        }
    }

    /// Returns `true` if the entity is currently alive.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    /// Returns `true` if no entities are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Iterate over live entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.iter().copied()
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}
