//! The shared subsystem bundle handed to plugins.

use std::any::Any;

use pulse_component::{Component, ComponentError, ComponentRegistry, EntityManager};
use pulse_runtime::{MessageBus, System, TickScheduler};

/// The bundle of subsystems a plugin wires against during setup.
///
/// The engine owns exactly one context at a time and rebuilds it from
/// scratch on reset; plugins and systems only ever borrow it. Systems do
/// not see this type: the scheduler hands them a
/// [`TickContext`](pulse_runtime::TickContext) view that excludes itself.
#[derive(Debug)]
pub struct EngineContext {
    /// Live entity set and id allocation.
    pub entities: EntityManager,
    /// The tick scheduler and its registered systems.
    pub scheduler: TickScheduler,
    /// Synchronous publish/subscribe channel.
    pub bus: MessageBus,
    /// Component schemas and stores.
    pub components: ComponentRegistry,
}

impl EngineContext {
    /// Create a context with empty subsystems.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: EntityManager::new(),
            scheduler: TickScheduler::new(),
            bus: MessageBus::new(),
            components: ComponentRegistry::new(),
        }
    }

    /// Register a system with the scheduler. Registration order is
    /// execution order.
    pub fn register_system(&mut self, system: System) {
        self.scheduler.register(system);
    }

    /// Register component type `T` under `name` with a caller-owned schema
    /// descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::AlreadyRegistered`] if `name` is taken.
    pub fn register_component<T: Component>(
        &mut self,
        name: impl Into<String>,
        schema: impl Any + Send + Sync,
    ) -> Result<(), ComponentError> {
        self.components.register::<T>(name, schema)
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
