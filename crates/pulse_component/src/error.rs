//! Storage-layer error types.

use crate::entity::Entity;

/// Errors from entity lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// The entity was never created or has already been destroyed.
    #[error("entity {0} does not exist")]
    NotFound(Entity),
}

/// Errors from component registration and store access.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// A component with this name is already registered.
    #[error("component \"{0}\" is already registered")]
    AlreadyRegistered(String),

    /// No component with this name has been registered.
    #[error("component \"{0}\" is not registered")]
    NotFound(String),

    /// The store for this name holds a different Rust type than the one
    /// requested at the call site.
    #[error("component \"{name}\" stores {stored}, not {requested}")]
    TypeMismatch {
        /// The registered component name.
        name: String,
        /// Rust type name recorded at registration.
        stored: &'static str,
        /// Rust type name requested by the caller.
        requested: &'static str,
    },
}
