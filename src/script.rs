//! Key scripts: text files describing key presses to replay
//!
//! One step per line:
//! - `gg` - plain keys, each character is one press
//! - `<Ctrl+Q>` - a single keystroke with modifiers
//! - `<Shift>` - a bare modifier press
//! - `@wait 300` - let 300ms pass
//! - `@reload` - reload the keymap
//!
//! Blank lines and lines starting with `#` are skipped.

use std::time::Duration;

use crate::keymap::{KeyEvent, KeySpec, Modifiers};

/// One parsed script step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Keys(Vec<KeyEvent>),
    Wait(Duration),
    Reload,
}

/// Parse a script line; `None` for blank lines and comments
pub fn parse_line(line: &str) -> Result<Option<ScriptStep>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if let Some(directive) = line.strip_prefix('@') {
        let mut parts = directive.split_whitespace();
        return match (parts.next(), parts.next(), parts.next()) {
            (Some("wait"), Some(ms), None) => ms
                .parse::<u64>()
                .map(|ms| Some(ScriptStep::Wait(Duration::from_millis(ms))))
                .map_err(|e| format!("Invalid wait '{}': {}", ms, e)),
            (Some("reload"), None, None) => Ok(Some(ScriptStep::Reload)),
            _ => Err(format!("Unknown directive: {}", line)),
        };
    }

    if let Some(modifier) = parse_bare_modifier(line) {
        return Ok(Some(ScriptStep::Keys(vec![KeyEvent::modifier(modifier)])));
    }

    match KeySpec::parse(line).map_err(|e| e.to_string())? {
        KeySpec::Special(stroke) => Ok(Some(ScriptStep::Keys(vec![KeyEvent::chord(
            stroke.key,
            stroke.mods,
        )]))),
        KeySpec::Chain(keys) => Ok(Some(ScriptStep::Keys(
            keys.as_str().chars().map(KeyEvent::char).collect(),
        ))),
    }
}

fn parse_bare_modifier(line: &str) -> Option<Modifiers> {
    let inner = line.strip_prefix('<')?.strip_suffix('>')?;
    match inner.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some(Modifiers::CTRL),
        "alt" => Some(Modifiers::ALT),
        "shift" => Some(Modifiers::SHIFT),
        "meta" => Some(Modifiers::META),
        _ => None,
    }
}
