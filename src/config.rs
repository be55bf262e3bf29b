//! Engine configuration
//!
//! General settings are read from `~/.config/keychain/config.yaml`

use serde::Deserialize;

/// Default wait before an ambiguous key chain fires, in milliseconds
pub const DEFAULT_CMD_TIMEOUT_MS: u64 = 500;

/// Settings shared by every dispatcher
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// How long to wait for a longer binding after an ambiguous match.
    /// 0 runs the shorter binding immediately.
    #[serde(default = "default_cmd_timeout")]
    pub cmd_timeout: u64,
}

fn default_cmd_timeout() -> u64 {
    DEFAULT_CMD_TIMEOUT_MS
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cmd_timeout: default_cmd_timeout(),
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on error
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
