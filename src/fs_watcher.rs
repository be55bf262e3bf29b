//! Keymap file watching
//!
//! Uses the `notify` crate with debouncing to notice edits to the binding
//! source so dispatchers can be reconfigured without a restart.

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

/// Watches a single keymap file
///
/// The parent directory is watched rather than the file itself, since editors
/// commonly save by writing a new file and renaming it over the old one.
pub struct BindingSourceWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    path: PathBuf,
}

impl BindingSourceWatcher {
    /// Start watching `path`; events are debounced by 200ms
    pub fn new(path: PathBuf) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(Duration::from_millis(200), tx)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debouncer
            .watcher()
            .watch(&dir, notify::RecursiveMode::NonRecursive)?;

        tracing::info!("Watching keymap file: {}", path.display());

        Ok(Self {
            _debouncer: debouncer,
            rx,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events (non-blocking); true if the keymap file changed
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;

        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    changed |= events.iter().any(|event| {
                        event.kind == DebouncedEventKind::Any && self.is_watched(&event.path)
                    });
                }
                Err(e) => {
                    tracing::warn!("Keymap watcher error: {:?}", e);
                }
            }
        }

        if changed {
            tracing::debug!("Keymap file {} changed", self.path.display());
        }
        changed
    }

    fn is_watched(&self, path: &Path) -> bool {
        path.file_name().is_some() && path.file_name() == self.path.file_name()
    }
}
