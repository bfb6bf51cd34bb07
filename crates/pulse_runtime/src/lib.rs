//! # pulse_runtime
//!
//! Tick scheduling, systems, and messaging for the pulse runtime.
//!
//! This crate provides:
//!
//! - [`System`] — a named update callback with enable/once/error state.
//! - [`TickScheduler`] — drives every system once per tick, in
//!   registration order.
//! - [`MessageBus`] — synchronous publish/subscribe keyed by message kind.
//! - [`TickContext`] — the explicit world view handed to each system
//!   callback.
//!
//! Everything here runs on one logical thread: a tick is a single
//! synchronous pass over the registered systems, and no two ticks overlap.

pub mod bus;
pub mod context;
pub mod error;
pub mod scheduler;
pub mod system;

pub use bus::{Message, MessageBus};
pub use context::TickContext;
pub use error::BusError;
pub use scheduler::TickScheduler;
pub use system::{System, UpdateFn};
