use rivulet_core::constants::DEFAULT_LIQUID_LOOP_MAX;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse liquid config RON: {0}")]
    ParseError(String),
    #[error("loop_max must be at least 1")]
    ZeroLoopMax,
}

fn default_loop_max() -> u32 {
    DEFAULT_LIQUID_LOOP_MAX
}

/// Tunables for one liquid system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidConfig {
    /// Most voxels processed per invocation.
    #[serde(default = "default_loop_max")]
    pub loop_max: u32,
    /// Seconds of continuous queue growth before old entries are dropped.
    /// 0 disables purging.
    #[serde(default)]
    pub queue_purge_secs: u32,
}

impl Default for LiquidConfig {
    fn default() -> Self {
        Self {
            loop_max: DEFAULT_LIQUID_LOOP_MAX,
            queue_purge_secs: 0,
        }
    }
}

impl LiquidConfig {
    /// Parse and validate a config from a RON string.
    pub fn from_ron(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: LiquidConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loop_max == 0 {
            return Err(ConfigError::ZeroLoopMax);
        }
        Ok(())
    }

    /// Purge window in milliseconds, or None when purging is disabled.
    pub fn purge_window_ms(&self) -> Option<u64> {
        (self.queue_purge_secs != 0).then(|| self.queue_purge_secs as u64 * 1000)
    }
}
