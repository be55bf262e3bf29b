//! Binding table: chain bindings and special bindings

use std::collections::HashMap;

use super::types::{KeySequence, Keystroke};

/// The two binding maps a dispatcher matches against
///
/// Registering a key that is already bound replaces the previous command.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    chain_bindings: HashMap<KeySequence, String>,
    special_bindings: HashMap<Keystroke, String>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a chain binding, returning the displaced command
    pub fn register_chain(
        &mut self,
        sequence: KeySequence,
        command: impl Into<String>,
    ) -> Option<String> {
        self.chain_bindings.insert(sequence, command.into())
    }

    /// Insert or overwrite a special binding, returning the displaced command
    pub fn register_special(
        &mut self,
        key: Keystroke,
        command: impl Into<String>,
    ) -> Option<String> {
        self.special_bindings.insert(key, command.into())
    }

    pub fn lookup_chain_exact(&self, sequence: &KeySequence) -> Option<&str> {
        self.chain_bindings.get(sequence).map(String::as_str)
    }

    /// Whether some binding other than `sequence` itself could still be
    /// reached from it
    ///
    /// Only the last key of `sequence` is compared, against the key at the
    /// same offset in each candidate of at least the same length.
    pub fn lookup_chain_prefix_exists(&self, sequence: &KeySequence) -> bool {
        let offset = sequence.len() - 1;
        let last = sequence.last_key();
        self.chain_bindings.keys().any(|binding| {
            binding != sequence
                && binding.len() >= sequence.len()
                && binding.key_at(offset) == Some(last)
        })
    }

    pub fn lookup_special(&self, key: &Keystroke) -> Option<&str> {
        self.special_bindings.get(key).map(String::as_str)
    }

    /// Drop every binding, ahead of a rebuild from the binding source
    pub fn clear(&mut self) {
        self.chain_bindings.clear();
        self.special_bindings.clear();
    }

    pub fn chain_len(&self) -> usize {
        self.chain_bindings.len()
    }

    pub fn special_len(&self) -> usize {
        self.special_bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain_bindings.is_empty() && self.special_bindings.is_empty()
    }
}
