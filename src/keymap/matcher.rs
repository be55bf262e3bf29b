//! Classification of the typed key buffer against the chain bindings

use super::table::BindingTable;
use super::types::KeySequence;

/// Result of matching a key buffer against the bound chains
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The buffer is bound and nothing longer can still be reached
    Definitive(String),
    /// The buffer is bound, but a longer binding can still be reached
    Ambiguous(String),
    /// Not bound yet, but more keys may complete a binding
    Partial,
    /// Nothing bound and nothing reachable
    None,
}

impl MatchOutcome {
    /// The bound command, for definitive and ambiguous matches
    pub fn command(&self) -> Option<&str> {
        match self {
            MatchOutcome::Definitive(cmd) | MatchOutcome::Ambiguous(cmd) => Some(cmd),
            MatchOutcome::Partial | MatchOutcome::None => None,
        }
    }
}

/// Try to match a typed key sequence with any bound key chain
///
/// The partial test compares only the last typed key with the key at the same
/// offset of each longer (or equally long) binding. `ab` is therefore reported
/// as partial when `xby` is bound, even though `xby` does not start with `ab`.
pub fn classify(input: &KeySequence, table: &BindingTable) -> MatchOutcome {
    let definitive = table.lookup_chain_exact(input);
    let partial = table.lookup_chain_prefix_exists(input);

    match (definitive, partial) {
        (Some(cmd), true) => MatchOutcome::Ambiguous(cmd.to_string()),
        (Some(cmd), false) => MatchOutcome::Definitive(cmd.to_string()),
        (None, true) => MatchOutcome::Partial,
        (None, false) => MatchOutcome::None,
    }
}
