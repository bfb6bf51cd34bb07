//! Engine lifecycle error types.

use crate::engine::EngineState;

/// Raised when a plugin's setup hook fails during engine initialization.
#[derive(Debug, thiserror::Error)]
#[error("plugin \"{plugin}\" setup failed: {source}")]
pub struct PluginError {
    /// Name of the failing plugin.
    pub plugin: String,
    /// The underlying setup failure.
    #[source]
    pub source: anyhow::Error,
}

/// Errors from engine lifecycle transitions.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `start` was called from a state it is not allowed in. The state is
    /// left unchanged.
    #[error("engine cannot start while {0:?}")]
    NotStartable(EngineState),

    /// `pause` was called from a state it is not allowed in. The state is
    /// left unchanged.
    #[error("engine cannot pause while {0:?}")]
    NotPausable(EngineState),

    /// Plugin setup failed during initialization. The engine is in the
    /// `Error` state until reset.
    #[error(transparent)]
    Setup(#[from] PluginError),
}
