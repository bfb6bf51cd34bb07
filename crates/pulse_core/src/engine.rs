//! The engine lifecycle state machine and tick loop.
//!
//! [`EngineCore`] is the single owner of the runtime: it holds the shared
//! [`EngineContext`], the plugin list, and the handle of the loop task.
//! There is one logical thread of control: ticks never overlap, and the
//! loop task only yields between ticks, so `pause` and `reset` cancel the
//! scheduled continuation, never an in-flight update.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::context::EngineContext;
use crate::error::EngineError;
use crate::plugin::{Plugin, PluginManager};

/// Lifecycle states of [`EngineCore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed or reset; subsystems are empty.
    Uninitialized,
    /// Plugin setup is in progress.
    Initializing,
    /// Plugin setup finished; the loop has not started.
    Initialized,
    /// The tick loop is live.
    Running,
    /// The loop was cancelled. There is no resume path; `reset` and
    /// `start` rebuild the engine from scratch.
    Paused,
    /// Reserved for an orderly shutdown; no transition enters it yet.
    Stopped,
    /// Initialization failed; terminal until an explicit `reset`.
    Error,
}

/// The top-level engine: lifecycle state machine, subsystem owner, and
/// timer-driven tick loop.
#[derive(Debug)]
pub struct EngineCore {
    config: EngineConfig,
    state: EngineState,
    context: Arc<Mutex<EngineContext>>,
    plugins: PluginManager,
    loop_handle: Option<JoinHandle<()>>,
}

impl EngineCore {
    /// Create an engine in the `Uninitialized` state with empty
    /// subsystems.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: EngineState::Uninitialized,
            context: Arc::new(Mutex::new(EngineContext::new())),
            plugins: PluginManager::new(),
            loop_handle: None,
        }
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The engine's timing configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle to the shared context.
    ///
    /// The loop task locks the same handle for the duration of each tick;
    /// callers should lock it only between ticks (while paused, or from an
    /// async task that can afford to wait out the current tick).
    #[must_use]
    pub fn context(&self) -> Arc<Mutex<EngineContext>> {
        Arc::clone(&self.context)
    }

    /// Queue a plugin for setup. Registration order is setup order.
    pub fn register_plugin(&mut self, plugin: impl Plugin + 'static) {
        self.plugins.register(Box::new(plugin));
    }

    /// Bring the engine to `Running` and spawn the tick loop.
    ///
    /// From `Uninitialized` the subsystems are rebuilt and every
    /// registered plugin's setup hook runs first (`Initializing` →
    /// `Initialized`); a setup failure moves the engine to `Error` and
    /// propagates. From `Initializing` or `Initialized`, setup is skipped
    /// and the loop starts directly.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotStartable`] from any other state, leaving
    /// the state unchanged, or [`EngineError::Setup`] when a plugin fails.
    pub async fn start(&mut self) -> Result<(), EngineError> {
        match self.state {
            EngineState::Uninitialized
            | EngineState::Initializing
            | EngineState::Initialized => {}
            state => return Err(EngineError::NotStartable(state)),
        }

        if self.state == EngineState::Uninitialized {
            // Fresh subsystems. Plugin registrations are kept: their setup
            // hooks run in initialize below.
            self.context = Arc::new(Mutex::new(EngineContext::new()));
            if let Err(err) = self.initialize().await {
                self.state = EngineState::Error;
                return Err(err);
            }
        }

        self.state = EngineState::Running;
        self.spawn_loop();
        info!(
            tick_interval_ms = self.config.tick_interval.as_millis() as u64,
            "engine running"
        );
        Ok(())
    }

    /// Cancel the scheduled continuation of the loop.
    ///
    /// From `Running` the engine moves to `Paused` and no further ticks
    /// fire. From `Initialized` this is accepted as a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotPausable`] from any other state, leaving
    /// the state unchanged.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        match self.state {
            EngineState::Running => {
                self.cancel_loop();
                self.state = EngineState::Paused;
                info!("engine paused");
                Ok(())
            }
            EngineState::Initialized => Ok(()),
            state => Err(EngineError::NotPausable(state)),
        }
    }

    /// Discard all engine state: entities, component stores, systems,
    /// subscriptions, and plugins. Any pending loop continuation is
    /// cancelled and the engine returns to `Uninitialized`.
    pub fn reset(&mut self) {
        self.cancel_loop();
        self.context = Arc::new(Mutex::new(EngineContext::new()));
        self.plugins.clear();
        self.state = EngineState::Uninitialized;
        info!("engine reset");
    }

    async fn initialize(&mut self) -> Result<(), EngineError> {
        self.state = EngineState::Initializing;
        let mut context = self.context.lock().await;
        self.plugins.setup_all(&mut context)?;
        drop(context);
        self.state = EngineState::Initialized;
        info!(plugins = self.plugins.len(), "engine initialized");
        Ok(())
    }

    fn spawn_loop(&mut self) {
        let context = Arc::clone(&self.context);
        let tick_interval = self.config.tick_interval;
        let handle = tokio::spawn(async move {
            loop {
                let started = Instant::now();
                {
                    let mut context = context.lock().await;
                    let EngineContext {
                        entities,
                        scheduler,
                        bus,
                        components,
                    } = &mut *context;
                    scheduler.tick(entities, components, bus);
                }
                let elapsed = started.elapsed();
                let wait = tick_interval.saturating_sub(elapsed);
                if wait > Duration::ZERO {
                    tokio::time::sleep(wait).await;
                } else {
                    // A zero interval is a deliberate busy loop, not an
                    // overrun worth reporting.
                    if !tick_interval.is_zero() {
                        warn!(
                            elapsed_ms = elapsed.as_millis() as u64,
                            budget_ms = tick_interval.as_millis() as u64,
                            "tick exceeded time budget"
                        );
                    }
                    // Continue immediately, yielding so cancellation and
                    // other host work can interleave between ticks.
                    tokio::task::yield_now().await;
                }
            }
        });
        self.loop_handle = Some(handle);
    }

    fn cancel_loop(&mut self) {
        if let Some(handle) = self.loop_handle.take() {
            handle.abort();
        }
    }
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for EngineCore {
    fn drop(&mut self) {
        self.cancel_loop();
    }
}
