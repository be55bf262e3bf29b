//! Keychain - vim-style key chain parsing
//!
//! This crate turns a live stream of key presses into command strings, with
//! multi-key chains, count prefixes, modifier shortcuts and timed resolution
//! of ambiguous bindings.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod fs_watcher;
pub mod keymap;
pub mod script;
pub mod tracing;

// Re-export commonly used types
pub use config::EngineConfig;
pub use keymap::{
    BindingTable, CommandExecutor, DispatchConfig, KeyEvent, KeyEventDispatcher, MatchOutcome,
    TriggerKind,
};
