//! # pulse_core
//!
//! Engine lifecycle and plugin composition for the pulse runtime.
//!
//! [`EngineCore`] owns one [`EngineContext`] (entity manager, tick
//! scheduler, message bus, and component registry) plus the registered
//! plugins and the timer-driven tick loop. Plugins wire systems and
//! component schemas into the context during initialization; the loop then
//! drives the scheduler at a fixed interval on a dedicated tokio task.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod plugin;

pub use config::EngineConfig;
pub use context::EngineContext;
pub use engine::{EngineCore, EngineState};
pub use error::{EngineError, PluginError};
pub use plugin::{Plugin, PluginManager};
