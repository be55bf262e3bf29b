//! Key-spec classification: special `<Mod+Key>` bindings vs plain key chains

use super::config::KeymapError;
use super::types::{KeyCode, KeySequence, Keystroke, Modifiers};

/// A parsed key-spec from a binding source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    /// Bracketed single keystroke with modifiers, e.g. `<Ctrl+Q>`
    Special(Keystroke),
    /// Bare typed sequence, e.g. `gg`
    Chain(KeySequence),
}

impl KeySpec {
    /// Classify and parse a raw key-spec
    pub fn parse(spec: &str) -> Result<KeySpec, KeymapError> {
        if let Some(inner) = spec.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            return parse_special(inner).map(KeySpec::Special);
        }
        KeySequence::new(spec)
            .map(KeySpec::Chain)
            .ok_or_else(|| KeymapError::InvalidKey("empty key chain".to_string()))
    }

    pub fn is_special(&self) -> bool {
        matches!(self, KeySpec::Special(_))
    }
}

/// Rewrite alternative modifier spellings into the canonical `Mod+` form
///
/// `Control-q` becomes `Ctrl+q`, `Mod4+x` becomes `Meta+x`.
pub fn normalize_keystr(keystr: &str) -> String {
    const REPLACEMENTS: [(&str, &str); 4] = [
        ("Control", "Ctrl"),
        ("Windows", "Meta"),
        ("Mod1", "Alt"),
        ("Mod4", "Meta"),
    ];

    let mut normalized = keystr.to_string();
    for (orig, repl) in REPLACEMENTS {
        normalized = normalized.replace(orig, repl);
    }
    for modifier in ["Ctrl", "Meta", "Alt", "Shift"] {
        normalized = normalized.replace(&format!("{}-", modifier), &format!("{}+", modifier));
    }
    normalized
}

/// Parse the inside of a `<...>` spec into a keystroke
fn parse_special(inner: &str) -> Result<Keystroke, KeymapError> {
    let normalized = normalize_keystr(inner);
    if normalized.is_empty() {
        return Err(KeymapError::InvalidKey(format!("<{}>", inner)));
    }

    // A trailing '+' is the plus key itself, as in `<+>` or `<Ctrl++>`
    let (mod_part, key_part) = if normalized == "+" {
        ("", "+")
    } else {
        match normalized.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match normalized.rsplit_once('+') {
                Some((mods, key)) => (mods, key),
                None => ("", normalized.as_str()),
            },
        }
    };

    let mut mods = Modifiers::NONE;
    for part in mod_part.split('+').filter(|p| !p.is_empty()) {
        let flag = match part.to_ascii_lowercase().as_str() {
            "ctrl" => Modifiers::CTRL,
            "alt" => Modifiers::ALT,
            "shift" => Modifiers::SHIFT,
            "meta" => Modifiers::META,
            _ => {
                return Err(KeymapError::InvalidKey(format!(
                    "unknown modifier '{}' in <{}>",
                    part, inner
                )))
            }
        };
        mods = mods | flag;
    }

    let key = KeyCode::from_name(key_part)
        .ok_or_else(|| KeymapError::InvalidKey(format!("unknown key '{}' in <{}>", key_part, inner)))?;

    Ok(Keystroke::new(key, mods))
}
