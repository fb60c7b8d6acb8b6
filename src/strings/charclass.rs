//! Character classes for random strings

use crate::error::GenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Set of byte values string characters are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Uppercase,
    Lowercase,
    Numeric,
    Printable,
    /// Raw bytes; its `(0, 0)` bounds disable remapping entirely
    Binary,
}

impl CharClass {
    pub const ALL: [CharClass; 5] = [
        CharClass::Uppercase,
        CharClass::Lowercase,
        CharClass::Numeric,
        CharClass::Printable,
        CharClass::Binary,
    ];

    /// `[low, high)` byte bounds
    pub fn bounds(self) -> (u8, u8) {
        match self {
            CharClass::Uppercase => (65, 91),
            CharClass::Lowercase => (97, 123),
            CharClass::Numeric => (48, 58),
            CharClass::Printable => (32, 127),
            CharClass::Binary => (0, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CharClass::Uppercase => "uppercase",
            CharClass::Lowercase => "lowercase",
            CharClass::Numeric => "numeric",
            CharClass::Printable => "printable",
            CharClass::Binary => "binary",
        }
    }

    /// Whether `byte` can be drawn for this class
    pub fn contains(self, byte: u8) -> bool {
        let (low, high) = self.bounds();
        low == high || (low..high).contains(&byte)
    }
}

impl FromStr for CharClass {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharClass::ALL
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GenError::UnknownCharClass(s.to_string()))
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
