//! Key event dispatcher: the per-mode session turning key presses into commands
//!
//! Each press is routed in order:
//!
//! 1. special bindings (`<Ctrl+Q>`), which fire at once and never touch the
//!    typed buffer
//! 2. key chains, if this dispatcher supports them: the typed text is appended
//!    to the buffer, an optional count prefix is split off and the rest is
//!    classified against the chain bindings
//!
//! An ambiguous chain (bound, but also the start of a longer binding) waits
//! for `ambiguous_match_timeout_ms` before firing, unless another key arrives
//! first.

use std::time::Instant;

use super::command::{CommandExecutor, TriggerKind};
use super::config::{build_table, KeymapConfig, KeymapError};
use super::matcher::{classify, MatchOutcome};
use super::scheduler::{DisambiguationScheduler, Scheduled};
use super::table::BindingTable;
use super::types::{KeyEvent, KeySequence};
use crate::config::DEFAULT_CMD_TIMEOUT_MS;

/// Settings snapshot a dispatcher runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    pub supports_chains: bool,
    pub supports_count: bool,
    /// 0 fires ambiguous matches immediately
    pub ambiguous_match_timeout_ms: u64,
}

impl DispatchConfig {
    /// Count support follows chain support unless set explicitly
    pub fn new(supports_chains: bool) -> Self {
        Self {
            supports_chains,
            supports_count: supports_chains,
            ambiguous_match_timeout_ms: DEFAULT_CMD_TIMEOUT_MS,
        }
    }

    pub fn with_count(mut self, supports_count: bool) -> Self {
        self.supports_count = supports_count;
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.ambiguous_match_timeout_ms = timeout_ms;
        self
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Callback receiving the typed key buffer whenever it may have changed
pub type KeystringObserver = Box<dyn FnMut(&str)>;

/// Stateful key chain parser for one input mode
pub struct KeyEventDispatcher<E> {
    config: DispatchConfig,
    table: BindingTable,
    scheduler: DisambiguationScheduler,
    key_buffer: String,
    pending_count: Option<u32>,
    section: Option<String>,
    executor: E,
    observers: Vec<KeystringObserver>,
}

impl<E: CommandExecutor> KeyEventDispatcher<E> {
    pub fn new(config: DispatchConfig, executor: E) -> Self {
        Self::with_table(config, BindingTable::new(), executor)
    }

    pub fn with_table(config: DispatchConfig, table: BindingTable, executor: E) -> Self {
        Self {
            config,
            table,
            scheduler: DisambiguationScheduler::new(),
            key_buffer: String::new(),
            pending_count: None,
            section: None,
            executor,
            observers: Vec::new(),
        }
    }

    /// Subscribe to keystring changes
    pub fn on_keystring_updated(&mut self, observer: impl FnMut(&str) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Handle a key press at the current time
    pub fn handle(&mut self, event: &KeyEvent) -> bool {
        self.handle_at(event, Instant::now())
    }

    /// Handle a key press arriving at `now`
    ///
    /// Returns whether the press was consumed. A press that breaks a chain
    /// (no binding can match any more) is reported as not handled.
    pub fn handle_at(&mut self, event: &KeyEvent, now: Instant) -> bool {
        // A resolution whose deadline already passed happened before this key
        self.tick(now);

        let handled = self.handle_special_key(event);
        if handled || !self.config.supports_chains {
            return handled;
        }

        let handled = self.handle_single_key(event, now);
        self.emit_keystring();
        handled
    }

    /// Fire the delayed ambiguous match if its deadline has passed
    ///
    /// Call this from the event loop, waking up at [`Self::next_deadline`].
    /// Returns whether a command was executed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(pending) = self.scheduler.poll(now) else {
            return false;
        };

        tracing::debug!("Executing delayed command now!");
        self.clear_buffer();
        self.emit_keystring();
        self.executor
            .execute(&pending.command, TriggerKind::Chain, pending.count);
        true
    }

    /// When the event loop has to wake up for a pending resolution
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    fn handle_special_key(&mut self, event: &KeyEvent) -> bool {
        if event.is_modifier_only() {
            return false;
        }

        let stroke = event.keystroke();
        let Some(command) = self.table.lookup_special(&stroke) else {
            tracing::debug!("No binding found for {}.", stroke);
            return false;
        };

        let command = command.to_string();
        self.executor.execute(&command, TriggerKind::Special, None);
        true
    }

    fn handle_single_key(&mut self, event: &KeyEvent, now: Instant) -> bool {
        tracing::debug!("Got key: {:?} / text: \"{}\"", event.key, event.text);
        let txt = event.text.trim();
        // Checked before cancelling so a bare modifier press keeps the pending match alive
        if txt.is_empty() {
            tracing::debug!("Ignoring, no text");
            return false;
        }

        self.scheduler.cancel();
        self.key_buffer.push_str(txt);

        let (count, cmd_input) = split_count(&self.key_buffer, self.config.supports_count);
        let cmd_input = KeySequence::new(cmd_input);
        self.pending_count = count;

        // Only a count so far
        let Some(cmd_input) = cmd_input else {
            return true;
        };

        match classify(&cmd_input, &self.table) {
            MatchOutcome::Definitive(command) => {
                self.clear_buffer();
                self.executor.execute(&command, TriggerKind::Chain, count);
            }
            MatchOutcome::Ambiguous(command) => {
                self.handle_ambiguous_match(command, count, now);
            }
            MatchOutcome::Partial => {
                tracing::debug!("No match for \"{}\" (added {})", self.key_buffer, txt);
            }
            MatchOutcome::None => {
                tracing::debug!("Giving up with \"{}\", no matches", self.key_buffer);
                self.clear_buffer();
                return false;
            }
        }
        true
    }

    fn handle_ambiguous_match(&mut self, command: String, count: Option<u32>, now: Instant) {
        tracing::debug!("Ambiguous match for \"{}\"", self.key_buffer);
        let timeout = self.config.ambiguous_match_timeout_ms;
        if let Scheduled::FireNow(pending) = self.scheduler.schedule(command, count, timeout, now) {
            self.clear_buffer();
            self.executor
                .execute(&pending.command, TriggerKind::Chain, pending.count);
        }
    }

    /// Drop typed keys and any pending resolution
    pub fn reset(&mut self) {
        let had_state = !self.key_buffer.is_empty() || self.scheduler.is_pending();
        self.scheduler.cancel();
        self.clear_buffer();
        if had_state {
            self.emit_keystring();
        }
    }

    fn clear_buffer(&mut self) {
        self.key_buffer.clear();
        self.pending_count = None;
    }

    fn emit_keystring(&mut self) {
        for observer in &mut self.observers {
            observer(&self.key_buffer);
        }
    }

    /// Rebuild the binding table from a section of `source`
    ///
    /// Passing a section name designates it for later [`Self::reload`] calls.
    /// With `None` the previously designated section is read again.
    pub fn read_config(
        &mut self,
        source: &KeymapConfig,
        section: Option<&str>,
    ) -> Result<(), KeymapError> {
        let name = match section {
            Some(name) => name.to_string(),
            None => self.section.clone().ok_or(KeymapError::NoSectionDefined)?,
        };

        let bindings = source.section(&name)?;
        let table = build_table(bindings, self.config.supports_chains, &name);
        tracing::debug!(
            "Loaded section \"{}\": {} chain, {} special bindings",
            name,
            table.chain_len(),
            table.special_len()
        );

        self.reset();
        self.table = table;
        self.section = Some(name);
        Ok(())
    }

    /// Re-read the designated section
    pub fn reload(&mut self, source: &KeymapConfig) -> Result<(), KeymapError> {
        self.read_config(source, None)
    }

    /// Reload if `section` is the designated one. Returns whether it reloaded.
    pub fn on_config_changed(
        &mut self,
        source: &KeymapConfig,
        section: &str,
    ) -> Result<bool, KeymapError> {
        let Some(current) = self.section.as_deref() else {
            return Err(KeymapError::NoSectionDefined);
        };
        if current != section {
            return Ok(false);
        }
        self.reload(source)?;
        Ok(true)
    }

    /// Swap in new settings, dropping any in-flight chain
    ///
    /// Chain bindings are filtered at load time, so call [`Self::reload`] after
    /// changing `supports_chains`.
    pub fn set_config(&mut self, config: DispatchConfig) {
        self.reset();
        self.config = config;
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    /// Replace the binding table directly, dropping any in-flight chain
    pub fn set_table(&mut self, table: BindingTable) {
        self.reset();
        self.table = table;
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// The typed keys not yet resolved, count prefix included
    pub fn pending_keystring(&self) -> &str {
        &self.key_buffer
    }

    pub fn pending_count(&self) -> Option<u32> {
        self.pending_count
    }

    pub fn is_awaiting_disambiguation(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }
}

/// Split a leading run of ASCII digits off as the count
///
/// Counts too large for `u32` saturate.
fn split_count(keystring: &str, supports_count: bool) -> (Option<u32>, &str) {
    if !supports_count {
        return (None, keystring);
    }

    let end = keystring
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(keystring.len());
    let (digits, rest) = keystring.split_at(end);
    let count = if digits.is_empty() {
        None
    } else {
        Some(digits.parse().unwrap_or(u32::MAX))
    };
    (count, rest)
}
