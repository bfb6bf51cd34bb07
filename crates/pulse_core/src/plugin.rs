//! Plugin registration and setup.

use tracing::info;

use crate::context::EngineContext;
use crate::error::PluginError;

/// A setup-time unit that wires systems and component schemas into the
/// engine via the shared context.
///
/// Plugins do not run per tick; whatever behavior they contribute is
/// carried by the systems and subscriptions they register. `setup` is
/// called exactly once per plugin, during engine initialization, in
/// registration order.
pub trait Plugin: Send {
    /// Unique plugin name.
    fn name(&self) -> &str;

    /// Optional display label.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Optional description.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Optional version string.
    fn version(&self) -> Option<&str> {
        None
    }

    /// Wire this plugin into the engine.
    ///
    /// # Errors
    ///
    /// A setup failure aborts engine initialization; see
    /// [`PluginManager::setup_all`].
    fn setup(&mut self, context: &mut EngineContext) -> anyhow::Result<()>;
}

/// Holds registered plugins and runs their setup hooks in order.
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Append a plugin. Registration order is setup order.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Run every plugin's setup hook against the context, strictly in
    /// registration order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing plugin and returns its error wrapped
    /// with the plugin's name. Partial initialization is fatal to the
    /// engine, so setup failures are not isolated the way system updates
    /// are.
    pub fn setup_all(&mut self, context: &mut EngineContext) -> Result<(), PluginError> {
        for plugin in &mut self.plugins {
            info!(
                plugin = %plugin.name(),
                version = plugin.version().unwrap_or("-"),
                "running plugin setup"
            );
            plugin.setup(context).map_err(|source| PluginError {
                plugin: plugin.name().to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` if no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Drop every registered plugin.
    pub fn clear(&mut self) {
        self.plugins.clear();
    }
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("PluginManager").field("plugins", &names).finish()
    }
}
