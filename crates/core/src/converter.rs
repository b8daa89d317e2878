//! Argument converters.
//!
//! A keyword in a command specification either names a literal word or a
//! typed placeholder. Placeholders resolve to a [`Converter`], which decides
//! whether a typed fragment fits the slot and turns it into a [`Value`].
//!
//! | kind     | argspec  | keyword  | fragment |
//! |----------|----------|----------|----------|
//! | variable | `FOO`    | `FOO`    | `blah`   |
//! | vararg   | `.FOO`   | `FOO`    | `blah`   |
//! | range    | `<1-20>` | `<1-20>` | `5`      |

use std::fmt::{Display, Formatter};

/// A fragment after expansion or conversion.
///
/// Literal keywords expand to [`Value::Word`], as do variable arguments.
/// Range arguments convert to [`Value::Integer`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Integer(i64),
    Word(String),
}

impl Value {
    pub fn word<S: Into<String>>(word: S) -> Self {
        Self::Word(word.into())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Word(word) => Some(word),
            Self::Integer(_) => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Word(_) => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Word(word) => formatter.write_str(word),
        }
    }
}

impl From<&str> for Value {
    fn from(word: &str) -> Self {
        Self::Word(word.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// The closed set of argument converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// `WORD`: any fragment, passed through verbatim.
    Variable,
    /// `<N-M>`: an integer within `[start, end]`.
    Range { start: i64, end: i64 },
}

impl Converter {
    /// Finds the converter for a keyword, if it is a placeholder.
    ///
    /// Converters are tried in order and the first structural match wins.
    #[must_use]
    pub fn resolve(keyword: &str) -> Option<Self> {
        variable(keyword).or_else(|| range(keyword))
    }

    /// Converts a fragment, returning `None` when it does not fit this slot.
    #[must_use]
    pub fn apply(&self, fragment: &str) -> Option<Value> {
        match *self {
            Self::Variable => Some(Value::word(fragment)),
            Self::Range { start, end } => fragment
                .parse::<i64>()
                .ok()
                .filter(|value| (start..=end).contains(value))
                .map(Value::Integer),
        }
    }
}

fn variable(keyword: &str) -> Option<Converter> {
    if !keyword.is_empty() && keyword.chars().all(|c| c.is_ascii_uppercase()) {
        Some(Converter::Variable)
    } else {
        None
    }
}

fn range(keyword: &str) -> Option<Converter> {
    let (start, end) = keyword
        .strip_prefix('<')?
        .strip_suffix('>')?
        .split_once('-')?;

    Some(Converter::Range {
        start: bound(start)?,
        end: bound(end)?,
    })
}

fn bound(digits: &str) -> Option<i64> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
