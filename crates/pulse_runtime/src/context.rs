//! Per-tick execution context provided to system callbacks.

use pulse_component::{ComponentRegistry, EntityManager};

use crate::bus::MessageBus;

/// The world view handed to a system callback on each tick.
///
/// Everything a system may touch is reachable from here; there is no
/// ambient engine state. The scheduler builds one context per tick from
/// the engine's subsystems and threads it through every system in turn.
#[derive(Debug)]
pub struct TickContext<'a> {
    /// Live entity set and id allocation.
    pub entities: &'a mut EntityManager,
    /// Component schemas and stores.
    pub components: &'a mut ComponentRegistry,
    /// Synchronous publish/subscribe channel.
    pub bus: &'a mut MessageBus,
    /// Seconds elapsed since the previous tick.
    pub dt: f64,
    /// Monotonically increasing tick counter, starting at 1.
    pub tick_id: u64,
}
