use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ComposeError, Result};
use crate::log::{default_options, DEFAULT_LOG_DRIVER};
use crate::restart::RestartPolicy;

/// Defaults applied by the host-config projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Log driver used when a spec sets none
    pub log_driver: String,

    /// Log options used when a spec sets neither driver nor options
    pub log_options: HashMap<String, String>,

    /// Restart policy for containers meant to keep running
    pub restart_when_running: RestartPolicy,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            log_driver: DEFAULT_LOG_DRIVER.to_string(),
            log_options: default_options(),
            restart_when_running: RestartPolicy::always(),
        }
    }
}

impl ConvertConfig {
    /// Parse from a YAML (or JSON) document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), driver = %config.log_driver, "Loaded convert config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.log_driver.trim().is_empty() {
            return Err(ComposeError::ConfigError(
                "log_driver must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
