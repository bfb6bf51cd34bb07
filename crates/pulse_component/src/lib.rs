//! # pulse_component
//!
//! Entity identity and typed component storage for the pulse runtime.
//!
//! This crate provides:
//!
//! - [`Entity`] — lightweight `u64` entity identifiers.
//! - [`EntityManager`] — monotonic id allocation and the live-entity set.
//! - [`ComponentStore`] — a typed store mapping entities to values of one
//!   component type.
//! - [`ComponentRegistry`] — name-keyed registration holding one
//!   type-erased store per component name, re-typed at each call site.
//!
//! The registry and the entity manager are deliberately independent:
//! destroying an entity does not touch its components, and a component may
//! be written for an entity that was never created.

pub mod entity;
pub mod error;
pub mod registry;
pub mod store;

pub use entity::{Entity, EntityManager};
pub use error::{ComponentError, EntityError};
pub use registry::ComponentRegistry;
pub use store::{Component, ComponentStore};
