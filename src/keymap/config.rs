//! YAML binding source
//!
//! A keymap file holds named sections, each an ordered list of bindings:
//!
//! ```yaml
//! sections:
//!   normal:
//!     - key: "gg"
//!       command: scroll-top
//!     - key: "<Ctrl+Q>"
//!       command: quit
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::binding::KeySpec;
use super::table::BindingTable;

/// Default keymap YAML embedded at compile time
pub const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// Root structure of a keymap YAML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeymapConfig {
    #[serde(default)]
    pub sections: HashMap<String, Vec<BindingConfig>>,
}

/// A single binding entry from YAML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BindingConfig {
    pub key: String,
    pub command: String,
}

impl BindingConfig {
    pub fn new(key: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            command: command.into(),
        }
    }
}

impl KeymapConfig {
    /// Bindings of a section, in file order
    pub fn section(&self, name: &str) -> Result<&[BindingConfig], KeymapError> {
        self.sections
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| KeymapError::UnknownSection(name.to_string()))
    }

    pub fn with_section(mut self, name: impl Into<String>, bindings: Vec<BindingConfig>) -> Self {
        self.sections.insert(name.into(), bindings);
        self
    }
}

/// Load a keymap from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<KeymapConfig, KeymapError> {
    let content = std::fs::read_to_string(path)?;
    parse_keymap_yaml(&content)
}

/// Parse a keymap from a YAML string
pub fn parse_keymap_yaml(yaml: &str) -> Result<KeymapConfig, KeymapError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// The embedded keymap, replaced by the user's keymap file when one exists
pub fn load_default_keymap() -> KeymapConfig {
    if let Some(path) = crate::config_paths::keymap_file() {
        if path.exists() {
            match load_keymap_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded keymap from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load keymap from {}: {}", path.display(), e);
                }
            }
        }
    }

    match parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to parse embedded keymap: {}", e);
            KeymapConfig::default()
        }
    }
}

/// Build a binding table from one section's entries
///
/// Bracketed keys become special bindings. Other keys become chain bindings
/// when `supports_chains` is set and are skipped with a warning otherwise.
/// Malformed keys are skipped with a warning; they never abort the load.
pub fn build_table(bindings: &[BindingConfig], supports_chains: bool, section: &str) -> BindingTable {
    let mut table = BindingTable::new();
    if bindings.is_empty() {
        tracing::warn!("No keybindings defined in section \"{}\"!", section);
    }

    for entry in bindings {
        match KeySpec::parse(&entry.key) {
            Ok(KeySpec::Special(stroke)) => {
                tracing::debug!("registered special key: {} -> {}", stroke, entry.command);
                table.register_special(stroke, entry.command.as_str());
            }
            Ok(KeySpec::Chain(sequence)) if supports_chains => {
                tracing::debug!("registered key: {} -> {}", sequence, entry.command);
                table.register_chain(sequence, entry.command.as_str());
            }
            Ok(KeySpec::Chain(sequence)) => {
                tracing::warn!(
                    "Ignoring keychain \"{}\" in section \"{}\" because keychains are not supported there.",
                    sequence,
                    section
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring binding \"{}\" in section \"{}\": {}",
                    entry.key,
                    section,
                    e
                );
            }
        }
    }

    table
}

/// Errors that can occur when loading keymaps
#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Unknown keymap section: {0}")]
    UnknownSection(String),
    #[error("No keymap section has been designated yet")]
    NoSectionDefined,
}
