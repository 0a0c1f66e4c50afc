use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MurmurError, Result};

/// Top-level configuration for the Murmur assistant.
///
/// Loaded from `~/.murmur/config.toml` by default. Each section corresponds
/// to one subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MurmurConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub decision: DecisionConfig,
    #[serde(default)]
    pub listener: ListenerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

impl MurmurConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MurmurConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MurmurError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the learning store and audit log.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.murmur/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Decision engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Minimum confidence for acting on the best intent match without
    /// asking for clarification.
    pub confidence_threshold: f32,
    /// Maximum number of candidate intents offered in a low-confidence
    /// clarification prompt.
    pub max_alternatives: usize,
    /// Number of recent turns retained for context boosting.
    pub context_window: usize,
    /// Whether successful decisions feed the per-intent preference counters.
    pub learning_enabled: bool,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            max_alternatives: 3,
            context_window: 5,
            learning_enabled: true,
        }
    }
}

/// Wake-word listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Trigger phrases. Detection is a lowercased "contains" check.
    pub wake_words: Vec<String>,
    /// Seconds to wait for a command after the wake word before reverting
    /// to idle listening.
    pub command_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            wake_words: vec!["murmur".to_string()],
            command_timeout_secs: 5,
        }
    }
}

/// Website permission lists, seeded into the domain gate at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Domains that are always allowed.
    pub trusted_sites: Vec<String>,
    /// Domains that are always denied.
    pub blocked_sites: Vec<String>,
}
