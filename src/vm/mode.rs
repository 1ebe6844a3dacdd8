//! ParameterMode - Addressing modes packed above the opcode digits
//!
//! ```text
//! word = ... C B A O O
//!            │ │ │ └─┴─ opcode (word % 100)
//!            │ │ └───── mode of parameter 1
//!            │ └─────── mode of parameter 2
//!            └───────── mode of parameter 3
//! ```
//!
//! Missing digits are leading zeros, i.e. `Position`.

use std::fmt;

use super::Word;

/// Addressing mode of a single parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ParameterMode {
    /// Parameter is an address
    #[default]
    Position = 0,
    /// Parameter is the literal value (never valid for a destination)
    Immediate = 1,
    /// Parameter is an offset from the relative base
    Relative = 2,
}

impl ParameterMode {
    pub const ALL: [ParameterMode; 3] = [Self::Position, Self::Immediate, Self::Relative];

    /// Parse a single mode digit
    pub fn from_digit(digit: Word) -> Option<Self> {
        match digit {
            0 => Some(Self::Position),
            1 => Some(Self::Immediate),
            2 => Some(Self::Relative),
            _ => None,
        }
    }

    pub const fn digit(self) -> Word {
        self as u8 as Word
    }
}

impl fmt::Display for ParameterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => write!(f, "position"),
            Self::Immediate => write!(f, "immediate"),
            Self::Relative => write!(f, "relative"),
        }
    }
}
