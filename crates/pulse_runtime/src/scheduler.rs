//! The tick scheduler: one update pass over all systems per tick.

use std::time::{Duration, Instant};

use tracing::debug;

use pulse_component::{ComponentRegistry, EntityManager};

use crate::bus::MessageBus;
use crate::context::TickContext;
use crate::system::System;

/// Owns the registered systems and drives one update pass per tick.
///
/// Systems run strictly in registration order (FIFO). The `priority` field
/// on [`System`] is carried but not consulted for ordering.
#[derive(Debug)]
pub struct TickScheduler {
    systems: Vec<System>,
    last_tick: Instant,
    tick_id: u64,
}

impl TickScheduler {
    /// Create a scheduler with no systems. The delta for the first tick is
    /// measured from this moment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            last_tick: Instant::now(),
            tick_id: 0,
        }
    }

    /// Append a system. Registration order is execution order.
    pub fn register(&mut self, system: System) {
        debug!(system = %system.name(), "system registered");
        self.systems.push(system);
    }

    /// Run one pass over every registered system.
    ///
    /// The delta since the previous tick comes from a monotonic clock.
    /// Each system's update runs exactly once, synchronously, in
    /// registration order; an individual failure never stops the pass
    /// (isolation lives in [`System::update`]). Returns the delta that was
    /// handed to the systems.
    pub fn tick(
        &mut self,
        entities: &mut EntityManager,
        components: &mut ComponentRegistry,
        bus: &mut MessageBus,
    ) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.tick_id += 1;

        let mut ctx = TickContext {
            entities,
            components,
            bus,
            dt: dt.as_secs_f64(),
            tick_id: self.tick_id,
        };
        for system in &mut self.systems {
            system.update(&mut ctx);
        }
        dt
    }

    /// The number of ticks driven so far.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// The number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Iterate the registered systems in registration order.
    pub fn systems(&self) -> impl Iterator<Item = &System> {
        self.systems.iter()
    }

    /// Look up a system by name, e.g. to toggle it externally.
    pub fn system_mut(&mut self, name: &str) -> Option<&mut System> {
        self.systems.iter_mut().find(|system| system.name() == name)
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}
