//! Name-keyed component registration and type-erased store access.
//!
//! The registry records a caller-owned schema descriptor and creates one
//! empty [`ComponentStore`] per registered name. Stores and schemas are
//! held behind `dyn Any` handles; every accessor takes the component type
//! at the call site and re-types the handle there.

use std::any::{Any, type_name};
use std::collections::HashMap;

use crate::entity::Entity;
use crate::error::ComponentError;
use crate::store::{Component, ComponentStore};

/// One registered component: the schema descriptor supplied by the caller
/// and the type-erased store holding its values.
struct Registration {
    schema: Box<dyn Any + Send + Sync>,
    store: Box<dyn Any + Send + Sync>,
    /// Rust type name of the store's value type, for error reporting.
    type_name: &'static str,
}

/// Registers component types by name and owns their stores.
///
/// The registry has no dependency on the
/// [`EntityManager`](crate::EntityManager): writing a component for an
/// entity that does not exist is permitted, and destroying an entity does
/// not touch its components.
#[derive(Default)]
pub struct ComponentRegistry {
    components: HashMap<String, Registration>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: HashMap::new(),
        }
    }

    /// Register component type `T` under `name`, recording the caller's
    /// schema descriptor and creating an empty store.
    ///
    /// The schema is opaque to the registry; it is stored as supplied and
    /// handed back by [`ComponentRegistry::schema`].
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::AlreadyRegistered`] if `name` is taken.
    /// The existing registration is left untouched.
    pub fn register<T: Component>(
        &mut self,
        name: impl Into<String>,
        schema: impl Any + Send + Sync,
    ) -> Result<(), ComponentError> {
        let name = name.into();
        if self.components.contains_key(&name) {
            return Err(ComponentError::AlreadyRegistered(name));
        }
        self.components.insert(
            name,
            Registration {
                schema: Box::new(schema),
                store: Box::new(ComponentStore::<T>::new()),
                type_name: type_name::<T>(),
            },
        );
        Ok(())
    }

    /// Returns `true` if a component is registered under `name`.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// The schema descriptor recorded for `name`, if it was registered with
    /// a descriptor of type `S`.
    #[must_use]
    pub fn schema<S: Any>(&self, name: &str) -> Option<&S> {
        self.components
            .get(name)
            .and_then(|registration| registration.schema.downcast_ref::<S>())
    }

    /// The store for `name`, typed as holding `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::NotFound`] if `name` was never registered,
    /// or [`ComponentError::TypeMismatch`] if the store holds a different
    /// type.
    pub fn store<T: Component>(&self, name: &str) -> Result<&ComponentStore<T>, ComponentError> {
        let registration = self
            .components
            .get(name)
            .ok_or_else(|| ComponentError::NotFound(name.to_string()))?;
        registration
            .store
            .downcast_ref::<ComponentStore<T>>()
            .ok_or_else(|| ComponentError::TypeMismatch {
                name: name.to_string(),
                stored: registration.type_name,
                requested: type_name::<T>(),
            })
    }

    /// Mutable access to the store for `name`, typed as holding `T`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ComponentRegistry::store`].
    pub fn store_mut<T: Component>(
        &mut self,
        name: &str,
    ) -> Result<&mut ComponentStore<T>, ComponentError> {
        let registration = self
            .components
            .get_mut(name)
            .ok_or_else(|| ComponentError::NotFound(name.to_string()))?;
        let stored = registration.type_name;
        registration
            .store
            .downcast_mut::<ComponentStore<T>>()
            .ok_or_else(|| ComponentError::TypeMismatch {
                name: name.to_string(),
                stored,
                requested: type_name::<T>(),
            })
    }

    /// The component for `(name, entity)`, if one has been set.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ComponentRegistry::store`].
    pub fn component_for_entity<T: Component>(
        &self,
        name: &str,
        entity: Entity,
    ) -> Result<Option<&T>, ComponentError> {
        Ok(self.store::<T>(name)?.get(entity))
    }

    /// Insert or overwrite the component for `(name, entity)`.
    ///
    /// No existence check is made on the entity side.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ComponentRegistry::store`].
    pub fn set_component_for_entity<T: Component>(
        &mut self,
        name: &str,
        entity: Entity,
        component: T,
    ) -> Result<(), ComponentError> {
        self.store_mut::<T>(name)?.set(entity, component);
        Ok(())
    }

    /// Remove and return the component for `(name, entity)`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ComponentRegistry::store`].
    pub fn remove_component_for_entity<T: Component>(
        &mut self,
        name: &str,
        entity: Entity,
    ) -> Result<Option<T>, ComponentError> {
        Ok(self.store_mut::<T>(name)?.remove(entity))
    }

    /// Iterate `(Entity, &T)` pairs for every entity with a `name`
    /// component, in entity-id order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ComponentRegistry::store`].
    pub fn entities_with<T: Component>(
        &self,
        name: &str,
    ) -> Result<impl Iterator<Item = (Entity, &T)>, ComponentError> {
        Ok(self.store::<T>(name)?.iter())
    }

    /// Iterate the names of all registered components.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Returns the number of registered component names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.component_names().collect();
        names.sort_unstable();
        f.debug_struct("ComponentRegistry")
            .field("components", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    impl Component for Position {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    impl Component for Velocity {}

    fn position_schema() -> serde_json::Value {
        serde_json::json!({ "x": "f32", "y": "f32" })
    }

    #[test]
    fn test_register_creates_empty_store() {
        let mut registry = ComponentRegistry::new();
        registry
            .register::<Position>("position", position_schema())
            .unwrap();
        assert!(registry.is_registered("position"));
        assert!(registry.store::<Position>("position").unwrap().is_empty());
    }

    #[test]
    fn test_register_twice_fails_and_keeps_first() {
        let mut registry = ComponentRegistry::new();
        registry
            .register::<Position>("position", position_schema())
            .unwrap();
        let e = Entity::from_raw(1);
        registry
            .set_component_for_entity("position", e, Position { x: 1.0, y: 2.0 })
            .unwrap();

        let err = registry
            .register::<Velocity>("position", "other schema")
            .unwrap_err();
        assert!(matches!(err, ComponentError::AlreadyRegistered(name) if name == "position"));

        // First registration's schema and store are unaffected.
        assert_eq!(
            registry.schema::<serde_json::Value>("position"),
            Some(&position_schema())
        );
        assert_eq!(
            registry
                .component_for_entity::<Position>("position", e)
                .unwrap(),
            Some(&Position { x: 1.0, y: 2.0 })
        );
    }

    #[test]
    fn test_store_not_found() {
        let registry = ComponentRegistry::new();
        let err = registry.store::<Position>("position").unwrap_err();
        assert!(matches!(err, ComponentError::NotFound(name) if name == "position"));
    }

    #[test]
    fn test_store_type_mismatch() {
        let mut registry = ComponentRegistry::new();
        registry
            .register::<Position>("position", position_schema())
            .unwrap();
        let err = registry.store::<Velocity>("position").unwrap_err();
        assert!(matches!(err, ComponentError::TypeMismatch { .. }));
    }

    #[test]
    fn test_schema_is_opaque_and_typed_at_call_site() {
        let mut registry = ComponentRegistry::new();
        registry
            .register::<Position>("position", position_schema())
            .unwrap();
        assert!(registry.schema::<serde_json::Value>("position").is_some());
        // Wrong descriptor type or unknown name both come back empty.
        assert!(registry.schema::<String>("position").is_none());
        assert!(registry.schema::<serde_json::Value>("velocity").is_none());
    }

    #[test]
    fn test_set_for_unknown_entity_is_permitted() {
        let mut registry = ComponentRegistry::new();
        registry
            .register::<Position>("position", position_schema())
            .unwrap();
        // Entity 99 was never created anywhere; the registry does not care.
        let ghost = Entity::from_raw(99);
        registry
            .set_component_for_entity("position", ghost, Position { x: 0.0, y: 0.0 })
            .unwrap();
        assert!(registry.store::<Position>("position").unwrap().has(ghost));
    }

    #[test]
    fn test_remove_component_for_entity() {
        let mut registry = ComponentRegistry::new();
        registry
            .register::<Position>("position", position_schema())
            .unwrap();
        let e = Entity::from_raw(1);
        registry
            .set_component_for_entity("position", e, Position { x: 3.0, y: 4.0 })
            .unwrap();
        let removed = registry
            .remove_component_for_entity::<Position>("position", e)
            .unwrap();
        assert_eq!(removed, Some(Position { x: 3.0, y: 4.0 }));
        assert_eq!(
            registry
                .remove_component_for_entity::<Position>("position", e)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_entities_with_iterates_in_id_order() {
        let mut registry = ComponentRegistry::new();
        registry
            .register::<Position>("position", position_schema())
            .unwrap();
        for id in [3u64, 1, 2] {
            registry
                .set_component_for_entity(
                    "position",
                    Entity::from_raw(id),
                    Position { x: id as f32, y: 0.0 },
                )
                .unwrap();
        }
        let ids: Vec<u64> = registry
            .entities_with::<Position>("position")
            .unwrap()
            .map(|(e, _)| e.id())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_component_names() {
        let mut registry = ComponentRegistry::new();
        registry
            .register::<Position>("position", position_schema())
            .unwrap();
        registry.register::<Velocity>("velocity", ()).unwrap();
        let mut names: Vec<&str> = registry.component_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["position", "velocity"]);
        assert_eq!(registry.len(), 2);
    }
}
