//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use keychain::keymap::{
    BindingTable, CommandExecutor, DispatchConfig, KeyEventDispatcher, KeySequence, TriggerKind,
};

pub type Call = (String, TriggerKind, Option<u32>);

/// Executor that records every execute request
#[derive(Default, Debug)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl CommandExecutor for Recorder {
    fn execute(&mut self, command: &str, kind: TriggerKind, count: Option<u32>) {
        self.calls.push((command.to_string(), kind, count));
    }
}

pub fn seq(keys: &str) -> KeySequence {
    KeySequence::new(keys).expect("non-empty key sequence")
}

pub fn chain(command: &str, count: Option<u32>) -> Call {
    (command.to_string(), TriggerKind::Chain, count)
}

pub fn special(command: &str) -> Call {
    (command.to_string(), TriggerKind::Special, None)
}

/// Build a table holding only the given chain bindings
pub fn chain_table(bindings: &[(&str, &str)]) -> BindingTable {
    let mut table = BindingTable::new();
    for (keys, command) in bindings {
        table.register_chain(seq(keys), *command);
    }
    table
}

/// A dispatcher over `table` plus the log of keystring updates it emits
pub fn test_dispatcher(
    config: DispatchConfig,
    table: BindingTable,
) -> (KeyEventDispatcher<Recorder>, Rc<RefCell<Vec<String>>>) {
    let mut dispatcher = KeyEventDispatcher::with_table(config, table, Recorder::default());
    let updates = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&updates);
    dispatcher.on_keystring_updated(move |keystring| sink.borrow_mut().push(keystring.to_string()));
    (dispatcher, updates)
}

/// Snapshot of the keystring updates emitted so far
pub fn updates_of(updates: &Rc<RefCell<Vec<String>>>) -> Vec<String> {
    updates.borrow().clone()
}
