//! Key chain dispatch tests
//!
//! End-to-end scenarios through the public dispatcher API, driven with an
//! explicit clock so timer behaviour is deterministic.

mod common;

use std::time::{Duration, Instant};

use common::{chain, chain_table, seq, special, test_dispatcher, updates_of};
use keychain::keymap::{
    classify, BindingTable, DispatchConfig, KeyCode, KeyEvent, Keystroke, MatchOutcome, Modifiers,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn ctrl_q() -> Keystroke {
    Keystroke::new(KeyCode::Char('q'), Modifiers::CTRL)
}

// ========================================================================
// Scenarios
// ========================================================================

#[test]
fn test_partial_chain_completes() {
    let config = DispatchConfig::new(true).with_count(false).with_timeout(300);
    let (mut d, updates) = test_dispatcher(config, chain_table(&[("gg", "scroll-top")]));
    let t0 = Instant::now();

    assert!(d.handle_at(&KeyEvent::char('g'), t0));
    assert_eq!(updates_of(&updates), vec!["g"]);
    assert!(d.executor().calls.is_empty());

    assert!(d.handle_at(&KeyEvent::char('g'), t0 + ms(10)));
    assert_eq!(d.executor().calls, vec![chain("scroll-top", None)]);
    assert_eq!(updates_of(&updates), vec!["g", ""]);
}

#[test]
fn test_ambiguous_resolves_after_timeout() {
    let config = DispatchConfig::new(true).with_timeout(200);
    let (mut d, updates) =
        test_dispatcher(config, chain_table(&[("x", "cut"), ("xp", "paste-after")]));
    let t0 = Instant::now();

    assert!(d.handle_at(&KeyEvent::char('x'), t0));
    assert_eq!(d.pending_keystring(), "x");
    assert_eq!(d.next_deadline(), Some(t0 + ms(200)));
    assert!(d.executor().calls.is_empty());

    assert!(!d.tick(t0 + ms(150)));
    assert!(d.tick(t0 + ms(200)));
    assert_eq!(d.executor().calls, vec![chain("cut", None)]);
    assert_eq!(updates_of(&updates), vec!["x", ""]);
    assert_eq!(d.next_deadline(), None);
}

#[test]
fn test_ambiguous_redirected_to_longer_binding() {
    let config = DispatchConfig::new(true).with_timeout(200);
    let (mut d, updates) =
        test_dispatcher(config, chain_table(&[("x", "cut"), ("xp", "paste-after")]));
    let t0 = Instant::now();

    d.handle_at(&KeyEvent::char('x'), t0);
    assert!(d.handle_at(&KeyEvent::char('p'), t0 + ms(120)));
    assert_eq!(d.executor().calls, vec![chain("paste-after", None)]);
    assert_eq!(updates_of(&updates), vec!["x", ""]);

    assert!(!d.tick(t0 + ms(1_000)));
    assert_eq!(d.executor().calls.len(), 1);
}

#[test]
fn test_ambiguous_with_zero_timeout() {
    let config = DispatchConfig::new(true).with_timeout(0);
    let (mut d, updates) =
        test_dispatcher(config, chain_table(&[("x", "cut"), ("xp", "paste-after")]));

    assert!(d.handle_at(&KeyEvent::char('x'), Instant::now()));
    assert_eq!(d.executor().calls, vec![chain("cut", None)]);
    assert_eq!(d.pending_keystring(), "");
    assert!(!d.is_awaiting_disambiguation());
    assert_eq!(updates_of(&updates), vec![""]);
}

#[test]
fn test_count_prefix() {
    let (mut d, updates) =
        test_dispatcher(DispatchConfig::new(true), chain_table(&[("j", "move-down")]));
    let t0 = Instant::now();

    assert!(d.handle_at(&KeyEvent::char('5'), t0));
    assert_eq!(d.pending_keystring(), "5");
    assert!(d.executor().calls.is_empty());

    assert!(d.handle_at(&KeyEvent::char('j'), t0));
    assert_eq!(d.executor().calls, vec![chain("move-down", Some(5))]);
    assert_eq!(updates_of(&updates), vec!["5", ""]);
}

#[test]
fn test_multi_digit_count() {
    let (mut d, _) =
        test_dispatcher(DispatchConfig::new(true), chain_table(&[("gg", "scroll-top")]));
    let t0 = Instant::now();

    for c in "12gg".chars() {
        assert!(d.handle_at(&KeyEvent::char(c), t0));
    }
    assert_eq!(d.executor().calls, vec![chain("scroll-top", Some(12))]);
}

#[test]
fn test_digits_are_keys_without_count_support() {
    let config = DispatchConfig::new(true).with_count(false);
    let (mut d, _) = test_dispatcher(config, chain_table(&[("5j", "five-j")]));
    let t0 = Instant::now();

    d.handle_at(&KeyEvent::char('5'), t0);
    d.handle_at(&KeyEvent::char('j'), t0);
    assert_eq!(d.executor().calls, vec![chain("five-j", None)]);
}

#[test]
fn test_special_key_priority() {
    let mut table = chain_table(&[("gg", "scroll-top")]);
    table.register_special(ctrl_q(), "quit");
    let (mut d, updates) = test_dispatcher(DispatchConfig::new(true), table);
    let t0 = Instant::now();

    d.handle_at(&KeyEvent::char('g'), t0);
    assert!(d.handle_at(&KeyEvent::chord(KeyCode::Char('q'), Modifiers::CTRL), t0));
    assert_eq!(d.executor().calls, vec![special("quit")]);
    assert_eq!(d.pending_keystring(), "g");
    // Only the chain key produced a keystring update
    assert_eq!(updates_of(&updates), vec!["g"]);

    // The chain carries on where it left off
    d.handle_at(&KeyEvent::char('g'), t0);
    assert_eq!(
        d.executor().calls,
        vec![special("quit"), chain("scroll-top", None)]
    );
}

#[test]
fn test_special_key_without_chains() {
    let mut table = BindingTable::new();
    table.register_special(ctrl_q(), "quit");
    let (mut d, updates) = test_dispatcher(DispatchConfig::new(false), table);

    assert!(d.handle(&KeyEvent::chord(KeyCode::Char('q'), Modifiers::CTRL)));
    assert!(!d.handle(&KeyEvent::char('q')));
    assert_eq!(d.executor().calls, vec![special("quit")]);
    assert!(updates_of(&updates).is_empty());
}

#[test]
fn test_special_key_does_not_cancel_pending_resolution() {
    let mut table = chain_table(&[("x", "cut"), ("xp", "paste-after")]);
    table.register_special(ctrl_q(), "quit");
    let (mut d, _) = test_dispatcher(DispatchConfig::new(true).with_timeout(200), table);
    let t0 = Instant::now();

    d.handle_at(&KeyEvent::char('x'), t0);
    d.handle_at(&KeyEvent::chord(KeyCode::Char('q'), Modifiers::CTRL), t0 + ms(50));
    assert!(d.is_awaiting_disambiguation());
    d.tick(t0 + ms(200));
    assert_eq!(d.executor().calls, vec![special("quit"), chain("cut", None)]);
}

#[test]
fn test_failed_chain_is_unhandled() {
    let (mut d, updates) =
        test_dispatcher(DispatchConfig::new(true), chain_table(&[("gg", "scroll-top")]));
    let t0 = Instant::now();

    assert!(d.handle_at(&KeyEvent::char('3'), t0));
    assert!(d.handle_at(&KeyEvent::char('g'), t0));
    assert!(!d.handle_at(&KeyEvent::char('z'), t0));
    assert_eq!(d.pending_keystring(), "");
    assert_eq!(d.pending_count(), None);
    assert_eq!(updates_of(&updates), vec!["3", "3g", ""]);
    assert!(d.executor().calls.is_empty());
}

#[test]
fn test_non_text_key_is_ignored() {
    let (mut d, updates) =
        test_dispatcher(DispatchConfig::new(true), chain_table(&[("gg", "scroll-top")]));

    d.handle(&KeyEvent::char('g'));
    assert!(!d.handle(&KeyEvent::chord(KeyCode::Up, Modifiers::NONE)));
    assert!(!d.handle(&KeyEvent::modifier(Modifiers::CTRL)));
    assert_eq!(d.pending_keystring(), "g");
    // An update is still emitted after every chain-processing step
    assert_eq!(updates_of(&updates), vec!["g", "g", "g"]);
}

// ========================================================================
// Properties
// ========================================================================

#[test]
fn test_at_most_one_timer_across_ambiguous_keys() {
    // "a" and "b" are both bound and both reach longer bindings
    let table = chain_table(&[("a", "alpha"), ("ab", "alpha-beta"), ("b", "beta"), ("bb", "beta-beta")]);
    let (mut d, _) = test_dispatcher(DispatchConfig::new(true).with_timeout(100), table);
    let t0 = Instant::now();

    d.handle_at(&KeyEvent::char('a'), t0);
    assert_eq!(d.next_deadline(), Some(t0 + ms(100)));

    // "ab" is itself ambiguous with "bb" (shared 'b' at offset 1)
    d.handle_at(&KeyEvent::char('b'), t0 + ms(60));
    assert_eq!(d.next_deadline(), Some(t0 + ms(160)));

    assert!(!d.tick(t0 + ms(100)));
    assert!(d.tick(t0 + ms(160)));
    assert_eq!(d.executor().calls, vec![chain("alpha-beta", None)]);
    assert!(!d.tick(t0 + ms(1_000)));
}

#[test]
fn test_classification_is_exclusive() {
    let table = chain_table(&[("gg", "scroll-top"), ("g", "go"), ("x", "cut"), ("yy", "yank")]);
    for input in ["g", "gg", "x", "y", "yy", "z", "ggg", "xy"] {
        let outcome = classify(&seq(input), &table);
        let tags = [
            matches!(outcome, MatchOutcome::Definitive(_)),
            matches!(outcome, MatchOutcome::Ambiguous(_)),
            outcome == MatchOutcome::Partial,
            outcome == MatchOutcome::None,
        ];
        assert_eq!(tags.iter().filter(|t| **t).count(), 1, "input {:?}", input);
        assert_eq!(
            outcome.command().is_some(),
            tags[0] || tags[1],
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_positional_match_looseness_is_kept() {
    // Only the last typed key is compared with the same offset of each binding,
    // so "ab" keeps accumulating towards "xbc" even though it is no real prefix
    let table = chain_table(&[("xbc", "xbc"), ("c", "charlie")]);
    let config = DispatchConfig::new(true).with_count(false).with_timeout(0);
    let (mut d, _) = test_dispatcher(config, table);
    let t0 = Instant::now();

    assert!(!d.handle_at(&KeyEvent::char('a'), t0));
    assert_eq!(classify(&seq("ab"), d.table()), MatchOutcome::Partial);

    // "xa" breaks off since 'a' is not at offset 1 of any binding
    assert!(d.handle_at(&KeyEvent::char('x'), t0));
    assert!(!d.handle_at(&KeyEvent::char('a'), t0));
    assert_eq!(d.pending_keystring(), "");
    assert!(d.executor().calls.is_empty());
}
