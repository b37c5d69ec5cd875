//! Key identities recognized by the calculator.
//!
//! A [`Key`] is one discrete user action. The [`KEYPAD`] catalog lists all
//! 20 keys in the order a 4-column keypad presents them.

mod input;

pub use input::parse_keys;

use std::fmt;
use std::str::FromStr;

/// A binary operator that can be pending between two operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Operator {
    /// All operators, in keypad order.
    pub const ALL: [Operator; 5] = [Self::Mod, Self::Div, Self::Mul, Self::Sub, Self::Add];

    /// The glyph shown on the key and in the display.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }

    /// Look up an operator by its display glyph.
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.glyph() == glyph)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// A single key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A digit key. Values above 9 are clamped to 9; use [`Key::digit`] to
    /// reject them instead.
    Digit(u8),
    DecimalPoint,
    Operator(Operator),
    Clear,
    Delete,
    /// Flip the sign of the operand being entered.
    Negate,
    Equals,
}

impl Key {
    /// The glyph printed on the key.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Digit(d) => DIGIT_GLYPHS[usize::from(*d).min(9)],
            Self::DecimalPoint => ".",
            Self::Operator(op) => op.glyph(),
            Self::Clear => "C",
            Self::Delete => "Del",
            Self::Negate => "+/-",
            Self::Equals => "=",
        }
    }

    /// Build a digit key, rejecting anything outside `0..=9`.
    pub fn digit(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self::Digit(value))
    }

    /// Check if this key edits the operand being typed (digits, point, sign).
    pub fn is_entry_key(&self) -> bool {
        matches!(self, Self::Digit(_) | Self::DecimalPoint | Self::Negate)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Error returned when text does not name a known key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key: {0:?}")]
pub struct KeyParseError(pub String);

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(op) = Operator::from_glyph(trimmed) {
            return Ok(Self::Operator(op));
        }

        if let Ok(d) = trimmed.parse::<u8>()
            && trimmed.len() == 1
            && let Some(key) = Self::digit(d)
        {
            return Ok(key);
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "." | "," => Ok(Self::DecimalPoint),
            "c" | "clear" | "ac" => Ok(Self::Clear),
            "del" | "delete" | "backspace" | "bs" => Ok(Self::Delete),
            "+/-" | "neg" | "negate" | "±" => Ok(Self::Negate),
            "=" | "equals" | "enter" => Ok(Self::Equals),
            "add" | "plus" => Ok(Self::Operator(Operator::Add)),
            "sub" | "minus" => Ok(Self::Operator(Operator::Sub)),
            "mul" | "times" | "x" => Ok(Self::Operator(Operator::Mul)),
            "div" | "divide" => Ok(Self::Operator(Operator::Div)),
            "mod" => Ok(Self::Operator(Operator::Mod)),
            _ => Err(KeyParseError(trimmed.to_string())),
        }
    }
}

const DIGIT_GLYPHS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Number of keys per keypad row.
pub const KEYPAD_COLUMNS: usize = 4;

/// The full keypad, row by row.
pub const KEYPAD: [Key; 20] = [
    Key::Operator(Operator::Mod),
    Key::Clear,
    Key::Delete,
    Key::Operator(Operator::Div),
    Key::Digit(7),
    Key::Digit(8),
    Key::Digit(9),
    Key::Operator(Operator::Mul),
    Key::Digit(4),
    Key::Digit(5),
    Key::Digit(6),
    Key::Operator(Operator::Sub),
    Key::Digit(1),
    Key::Digit(2),
    Key::Digit(3),
    Key::Operator(Operator::Add),
    Key::Negate,
    Key::Digit(0),
    Key::DecimalPoint,
    Key::Equals,
];

/// Iterate over the keypad in rows of [`KEYPAD_COLUMNS`] keys.
pub fn keypad_rows() -> impl Iterator<Item = &'static [Key]> {
    KEYPAD.chunks(KEYPAD_COLUMNS)
}
