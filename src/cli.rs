//! Command-line argument parsing for the key script replayer
//!
//! Supports:
//! - Choosing the keymap file and section
//! - Overriding the ambiguous match timeout
//! - Turning off key chains or counts
//! - Watching the keymap file for changes

use clap::Parser;
use std::path::PathBuf;

use crate::keymap::DispatchConfig;

/// Replay key presses through a key chain dispatcher
#[derive(Parser, Debug)]
#[command(name = "keychain", version, about = "Replay key presses through vim-style key bindings")]
pub struct CliArgs {
    /// Key script to replay (reads stdin when omitted)
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Keymap file (defaults to the user keymap, then the built-in one)
    #[arg(short, long, value_name = "PATH")]
    pub keymap: Option<PathBuf>,

    /// Keymap section to bind
    #[arg(short, long, default_value = "normal")]
    pub section: String,

    /// Ambiguous match timeout in milliseconds (0 fires immediately)
    #[arg(short, long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Only special <Mod+Key> bindings, no key chains
    #[arg(long)]
    pub no_chains: bool,

    /// Disable the numeric count prefix
    #[arg(long)]
    pub no_count: bool,

    /// Reload the keymap when its file changes
    #[arg(short, long)]
    pub watch: bool,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub script: Option<PathBuf>,
    pub keymap: Option<PathBuf>,
    pub section: String,
    pub dispatch: DispatchConfig,
    pub watch: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    ///
    /// `default_timeout` comes from the engine config file.
    pub fn into_config(self, default_timeout: u64) -> Result<RunConfig, String> {
        if self.section.trim().is_empty() {
            return Err("Section name must not be empty".to_string());
        }
        if self.watch && self.keymap.is_none() && crate::config_paths::keymap_file().is_none() {
            return Err("--watch needs a keymap file".to_string());
        }

        let supports_chains = !self.no_chains;
        let dispatch = DispatchConfig::new(supports_chains)
            .with_count(supports_chains && !self.no_count)
            .with_timeout(self.timeout.unwrap_or(default_timeout));

        Ok(RunConfig {
            script: self.script,
            keymap: self.keymap,
            section: self.section,
            dispatch,
            watch: self.watch,
        })
    }
}
