//! Vim-style key chain parsing
//!
//! This module turns a stream of key presses into command strings:
//! - Special bindings (`<Ctrl+Q>`) fire on a single keystroke with modifiers
//! - Chain bindings (`gg`) are typed key by key into a buffer
//! - An optional count prefix (`5j`) is passed along with the command
//! - A binding that is also the start of a longer one fires after a timeout
//!
//! # Architecture
//!
//! ```text
//! KeyEvent → KeyEventDispatcher → classify(buffer, BindingTable) → CommandExecutor
//!                    ↓ ambiguous
//!          DisambiguationScheduler (deadline, polled by the event loop)
//! ```
//!
//! # Loading Keymaps
//!
//! ```ignore
//! let keymap = load_default_keymap();
//! let mut normal = KeyEventDispatcher::new(DispatchConfig::new(true), executor);
//! normal.read_config(&keymap, Some("normal"))?;
//! ```

mod binding;
mod command;
mod config;
mod dispatcher;
mod matcher;
mod scheduler;
mod table;
mod types;

pub use binding::{normalize_keystr, KeySpec};
pub use command::{CommandExecutor, CommandRunner, ExecutionError, RunOrFill, TriggerKind};
pub use config::{
    build_table, load_default_keymap, load_keymap_file, parse_keymap_yaml, BindingConfig,
    KeymapConfig, KeymapError, DEFAULT_KEYMAP_YAML,
};
pub use dispatcher::{DispatchConfig, KeyEventDispatcher, KeystringObserver};
pub use matcher::{classify, MatchOutcome};
pub use scheduler::{DisambiguationScheduler, PendingExecution, Scheduled, TimerHandle};
pub use table::BindingTable;
pub use types::{KeyCode, KeyEvent, KeySequence, Keystroke, Modifiers};
