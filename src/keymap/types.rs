//! Core types for the keymap system: Modifiers, KeyCode, Keystroke, KeyEvent, KeySequence

use std::fmt;

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const ALT: Modifiers = Modifiers(0b0010);
    pub const SHIFT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000);

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & Self::CTRL.0 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & Self::META.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    /// Canonical order is Ctrl, Alt, Shift, Meta, each followed by `+`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Self::CTRL, "Ctrl"),
            (Self::ALT, "Alt"),
            (Self::SHIFT, "Shift"),
            (Self::META, "Meta"),
        ] {
            if self.contains(flag) {
                write!(f, "{}+", name)?;
            }
        }
        Ok(())
    }
}

/// A key code representing a logical key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key (normalized to lowercase)
    Char(char),

    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    Up,
    Down,
    Left,
    Right,

    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    /// F1-F35
    F(u8),

    /// A bare modifier key (Ctrl, Alt, Shift, Meta) pressed on its own
    Modifier,
}

impl KeyCode {
    /// Parse a key name as written in a special binding (`q`, `Escape`, `F5`)
    ///
    /// Names are case-insensitive; single characters are lowercased.
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::Char(c.to_ascii_lowercase()));
        }

        let lower = name.to_ascii_lowercase();
        let code = match lower.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Space,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pgup" | "pageup" => KeyCode::PageUp,
            "pgdown" | "pagedown" => KeyCode::PageDown,
            "ins" | "insert" => KeyCode::Insert,
            _ => {
                let n = lower.strip_prefix('f')?.parse::<u8>().ok()?;
                if (1..=35).contains(&n) {
                    KeyCode::F(n)
                } else {
                    return None;
                }
            }
        };
        Some(code)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c.to_uppercase()),
            KeyCode::Enter => write!(f, "Return"),
            KeyCode::Escape => write!(f, "Esc"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Del"),
            KeyCode::Space => write!(f, "Space"),
            KeyCode::Up => write!(f, "Up"),
            KeyCode::Down => write!(f, "Down"),
            KeyCode::Left => write!(f, "Left"),
            KeyCode::Right => write!(f, "Right"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
            KeyCode::PageUp => write!(f, "PgUp"),
            KeyCode::PageDown => write!(f, "PgDown"),
            KeyCode::Insert => write!(f, "Ins"),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Modifier => Ok(()),
        }
    }
}

/// A single keystroke: a key with modifiers
///
/// This is the normalized form special bindings are keyed by. Two physical
/// presses of the same key with the same modifiers always compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Create a keystroke with no modifiers
    pub const fn key(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mods, self.key)
    }
}

/// A normalized key press as delivered by the platform adapter
///
/// `text` is what the key would type, and is empty for bare modifier presses
/// and for non-printing keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub mods: Modifiers,
    pub text: String,
}

impl KeyEvent {
    pub fn new(key: KeyCode, mods: Modifiers, text: impl Into<String>) -> Self {
        Self {
            key,
            mods,
            text: text.into(),
        }
    }

    /// A plain character press that types itself
    pub fn char(c: char) -> Self {
        Self {
            key: KeyCode::Char(c.to_ascii_lowercase()),
            mods: if c.is_ascii_uppercase() {
                Modifiers::SHIFT
            } else {
                Modifiers::NONE
            },
            text: c.to_string(),
        }
    }

    /// A modifier chord such as Ctrl+Q; produces no chain text
    pub fn chord(key: KeyCode, mods: Modifiers) -> Self {
        Self {
            key,
            mods,
            text: String::new(),
        }
    }

    /// A bare modifier key press
    pub fn modifier(mods: Modifiers) -> Self {
        Self::chord(KeyCode::Modifier, mods)
    }

    pub fn keystroke(&self) -> Keystroke {
        Keystroke::new(self.key, self.mods)
    }

    pub fn is_modifier_only(&self) -> bool {
        self.key == KeyCode::Modifier
    }
}

/// An ordered, non-empty run of typed keys
///
/// Used both as a chain binding's trigger and as the live input buffer. Keys
/// are addressed by character position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeySequence(String);

impl KeySequence {
    /// Returns `None` for an empty string
    pub fn new(keys: impl Into<String>) -> Option<Self> {
        let keys = keys.into();
        if keys.is_empty() {
            None
        } else {
            Some(Self(keys))
        }
    }

    /// Number of keys in the sequence
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Never true for a sequence built through [`KeySequence::new`]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn key_at(&self, index: usize) -> Option<char> {
        self.0.chars().nth(index)
    }

    pub fn last_key(&self) -> char {
        self.0.chars().next_back().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
