//! Engine timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing configuration for [`EngineCore`](crate::EngineCore).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Target interval between ticks. A tick that finishes early sleeps
    /// out the remainder; a tick that overruns is followed immediately by
    /// the next one.
    pub tick_interval: Duration,
    /// Watchdog threshold for a single tick. Carried in the config but not
    /// enforced by the loop, which only logs budget overruns.
    pub tick_timeout: Duration,
}

impl EngineConfig {
    /// Default tick interval: 200 ms.
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

    /// Default tick timeout: 30 s.
    pub const DEFAULT_TICK_TIMEOUT: Duration = Duration::from_secs(30);

    /// Override the tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Override the tick timeout.
    #[must_use]
    pub fn with_tick_timeout(mut self, tick_timeout: Duration) -> Self {
        self.tick_timeout = tick_timeout;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            tick_timeout: Self::DEFAULT_TICK_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_interval, Duration::from_millis(200));
        assert_eq!(config.tick_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides() {
        let config = EngineConfig::default()
            .with_tick_interval(Duration::from_millis(16))
            .with_tick_timeout(Duration::from_secs(5));
        assert_eq!(config.tick_interval, Duration::from_millis(16));
        assert_eq!(config.tick_timeout, Duration::from_secs(5));
    }
}
