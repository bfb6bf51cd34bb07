//! A named unit of per-tick behavior.
//!
//! Systems are registered with the [`TickScheduler`](crate::TickScheduler)
//! and run once per tick in registration order. A failing update is
//! isolated at the system: it is logged and flagged here, and the tick
//! pass carries on with the next system.

use tracing::error;

use crate::context::TickContext;

/// Signature of a system's update callback.
pub type UpdateFn = Box<dyn FnMut(&mut TickContext<'_>) -> anyhow::Result<()> + Send>;

/// A named, configurable update callback with enable/error state.
///
/// Reachable states per system: enabled, disabled by configuration,
/// disabled by error (`disable_on_error`), or retired after a `once` run.
/// The error flag is set by a failing update and never cleared
/// automatically.
pub struct System {
    name: String,
    label: Option<String>,
    description: Option<String>,
    enabled: bool,
    once: bool,
    priority: i32,
    disable_on_error: bool,
    error: bool,
    update_fn: Option<UpdateFn>,
}

impl System {
    /// Create a system with default flags: enabled, runs every tick,
    /// priority 0, failures keep it enabled.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            description: None,
            enabled: true,
            once: false,
            priority: 0,
            disable_on_error: false,
            error: false,
            update_fn: None,
        }
    }

    /// Set a display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority. The field is carried on the system but the
    /// scheduler does not consult it; execution order is registration
    /// order.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Retire the system after its first successful update.
    #[must_use]
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Disable the system when an update fails.
    #[must_use]
    pub fn disable_on_error(mut self) -> Self {
        self.disable_on_error = true;
        self
    }

    /// Start the system disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the update callback.
    #[must_use]
    pub fn on_update(
        mut self,
        update_fn: impl FnMut(&mut TickContext<'_>) -> anyhow::Result<()> + Send + 'static,
    ) -> Self {
        self.update_fn = Some(Box::new(update_fn));
        self
    }

    /// The system's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The display label, if set.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The declared priority.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns `true` if the system will run on the next tick.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if the system retires after one successful update.
    #[must_use]
    pub fn is_once(&self) -> bool {
        self.once
    }

    /// Returns `true` if an update has ever failed. The flag is never
    /// cleared automatically.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Enable the system, independent of the error flag.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable the system.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Run the update callback for one tick.
    ///
    /// Disabled systems are skipped. A callback error is logged, sets the
    /// error flag, and disables the system when `disable_on_error` is set;
    /// it never propagates to the scheduler. A failing update returns
    /// before the `once` check, so a `once` system that errors stays armed
    /// for the next tick. On success a `once` system disables itself.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) {
        if !self.enabled {
            return;
        }
        if let Some(update_fn) = self.update_fn.as_mut() {
            if let Err(err) = update_fn(ctx) {
                error!(system = %self.name, error = %err, "system update failed");
                self.error = true;
                if self.disable_on_error {
                    self.enabled = false;
                }
                return;
            }
        }
        if self.once {
            self.enabled = false;
        }
    }
}

impl std::fmt::Debug for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("System")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("once", &self.once)
            .field("priority", &self.priority)
            .field("disable_on_error", &self.disable_on_error)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pulse_component::{ComponentRegistry, EntityManager};

    use super::*;
    use crate::bus::MessageBus;

    fn with_context<R>(f: impl FnOnce(&mut TickContext<'_>) -> R) -> R {
        let mut entities = EntityManager::new();
        let mut components = ComponentRegistry::new();
        let mut bus = MessageBus::new();
        let mut ctx = TickContext {
            entities: &mut entities,
            components: &mut components,
            bus: &mut bus,
            dt: 0.016,
            tick_id: 1,
        };
        f(&mut ctx)
    }

    #[test]
    fn test_defaults() {
        let system = System::new("physics");
        assert_eq!(system.name(), "physics");
        assert!(system.is_enabled());
        assert!(!system.is_once());
        assert_eq!(system.priority(), 0);
        assert!(!system.has_error());
    }

    #[test]
    fn test_update_invokes_callback() {
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let c = counter.clone();
        let mut system = System::new("count").on_update(move |_| {
            c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });
        with_context(|ctx| system.update(ctx));
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(!system.has_error());
    }

    #[test]
    fn test_disabled_system_is_skipped() {
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let c = counter.clone();
        let mut system = System::new("idle").disabled().on_update(move |_| {
            c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });
        with_context(|ctx| system.update(ctx));
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_once_system_retires_after_one_run() {
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let c = counter.clone();
        let mut system = System::new("boot").once().on_update(move |_| {
            c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });
        with_context(|ctx| {
            system.update(ctx);
            system.update(ctx);
            system.update(ctx);
        });
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(!system.is_enabled());
        assert!(!system.has_error());
    }

    #[test]
    fn test_error_sets_flag_and_keeps_running() {
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let c = counter.clone();
        let mut system = System::new("flaky").on_update(move |_| {
            c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            anyhow::bail!("boom")
        });
        with_context(|ctx| {
            system.update(ctx);
            system.update(ctx);
        });
        // Without disable_on_error the system stays enabled and retries.
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert!(system.has_error());
        assert!(system.is_enabled());
    }

    #[test]
    fn test_disable_on_error_disables_after_one_failure() {
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let c = counter.clone();
        let mut system = System::new("fragile").disable_on_error().on_update(move |_| {
            c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            anyhow::bail!("boom")
        });
        with_context(|ctx| {
            system.update(ctx);
            system.update(ctx);
            system.update(ctx);
        });
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(system.has_error());
        assert!(!system.is_enabled());
    }

    #[test]
    fn test_failing_once_system_stays_armed() {
        let attempts = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let a = attempts.clone();
        let mut system = System::new("retry-boot").once().on_update(move |_| {
            let n = a.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if n == 0 {
                anyhow::bail!("first attempt fails")
            }
            Ok(())
        });
        with_context(|ctx| {
            system.update(ctx);
            // The failure returned before the once check, so it runs again.
            assert!(system.is_enabled());
            system.update(ctx);
        });
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert!(!system.is_enabled());
        assert!(system.has_error());
    }

    #[test]
    fn test_enable_disable_are_independent_of_error() {
        let mut system = System::new("manual").on_update(|_| anyhow::bail!("boom"));
        with_context(|ctx| system.update(ctx));
        assert!(system.has_error());
        system.disable();
        assert!(!system.is_enabled());
        system.enable();
        assert!(system.is_enabled());
        assert!(system.has_error());
    }

    #[test]
    fn test_system_without_callback_is_inert() {
        let mut system = System::new("empty").once();
        with_context(|ctx| system.update(ctx));
        // No callback to run; once still retires the system.
        assert!(!system.is_enabled());
        assert!(!system.has_error());
    }
}
