//! Benchmarks for chain classification and key dispatch
//!
//! Run with: cargo bench matcher

use std::time::Instant;

use keychain::keymap::{
    classify, BindingTable, DispatchConfig, KeyEvent, KeyEventDispatcher, KeySequence, TriggerKind,
};

fn main() {
    divan::main();
}

/// Table of `size` three-key chains plus a few ambiguous short ones
fn build_table(size: usize) -> BindingTable {
    let letters: Vec<char> = ('a'..='z').collect();
    let mut table = BindingTable::new();
    for i in 0..size {
        let a = letters[i % 26];
        let b = letters[(i / 26) % 26];
        let c = letters[(i / 676) % 26];
        let keys = format!("{}{}{}", a, b, c);
        if let Some(seq) = KeySequence::new(&keys) {
            table.register_chain(seq, format!("cmd-{}", i));
        }
    }
    for (keys, command) in [("g", "go"), ("gg", "top"), ("d", "delete")] {
        if let Some(seq) = KeySequence::new(keys) {
            table.register_chain(seq, command);
        }
    }
    table
}

// ============================================================================
// Classification
// ============================================================================

#[divan::bench(args = [10, 100, 1000, 10000])]
fn classify_definitive(bencher: divan::Bencher, size: usize) {
    let table = build_table(size);
    let input = KeySequence::new("aaa").expect("non-empty");
    bencher.bench_local(|| divan::black_box(classify(&input, &table)));
}

#[divan::bench(args = [10, 100, 1000, 10000])]
fn classify_partial(bencher: divan::Bencher, size: usize) {
    let table = build_table(size);
    let input = KeySequence::new("ab").expect("non-empty");
    bencher.bench_local(|| divan::black_box(classify(&input, &table)));
}

#[divan::bench(args = [10, 100, 1000, 10000])]
fn classify_no_match(bencher: divan::Bencher, size: usize) {
    let table = build_table(size);
    let input = KeySequence::new("!?").expect("non-empty");
    bencher.bench_local(|| divan::black_box(classify(&input, &table)));
}

// ============================================================================
// Full dispatch path
// ============================================================================

#[divan::bench(args = [100, 1000])]
fn dispatch_counted_chain(bencher: divan::Bencher, size: usize) {
    let mut dispatcher = KeyEventDispatcher::with_table(
        DispatchConfig::new(true),
        build_table(size),
        |_: &str, _: TriggerKind, _: Option<u32>| {},
    );
    let keys: Vec<KeyEvent> = "12abc".chars().map(KeyEvent::char).collect();
    let now = Instant::now();

    bencher.bench_local(|| {
        for key in &keys {
            divan::black_box(dispatcher.handle_at(key, now));
        }
    });
}
