//! Opcode - Operation selectors for the Intcode VM
//!
//! The opcode is the low two decimal digits of an instruction word.
//!
//! | Code | Mnemonic | Arity | Effect                                   |
//! |------|----------|-------|------------------------------------------|
//! | 1    | add      | 3     | c = a + b                                |
//! | 2    | mul      | 3     | c = a * b                                |
//! | 3    | in       | 1     | a = pop input (stalls when queue empty)  |
//! | 4    | out      | 1     | push a to output                         |
//! | 5    | jnz      | 2     | if a != 0 { pc = b }                     |
//! | 6    | jz       | 2     | if a == 0 { pc = b }                     |
//! | 7    | lt       | 3     | c = (a < b) as word                      |
//! | 8    | eq       | 3     | c = (a == b) as word                     |
//! | 9    | arb      | 1     | relative_base += a                       |
//! | 98   | dump     | 0     | log engine state (debug aid)             |
//! | 99   | halt     | 0     | stop                                     |

use std::fmt;

use super::Word;

/// Operation opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Add = 1,
    Multiply = 2,
    Input = 3,
    Output = 4,
    JumpIfTrue = 5,
    JumpIfFalse = 6,
    LessThan = 7,
    Equals = 8,
    AdjustRelativeBase = 9,
    /// Auxiliary state dump, not part of the puzzle-facing instruction set
    Dump = 98,
    Halt = 99,
}

impl Opcode {
    /// Every recognized opcode, in code order
    pub const ALL: [Opcode; 11] = [
        Opcode::Add,
        Opcode::Multiply,
        Opcode::Input,
        Opcode::Output,
        Opcode::JumpIfTrue,
        Opcode::JumpIfFalse,
        Opcode::LessThan,
        Opcode::Equals,
        Opcode::AdjustRelativeBase,
        Opcode::Dump,
        Opcode::Halt,
    ];

    /// Look up an opcode by its two-digit code
    pub fn from_code(code: Word) -> Option<Self> {
        let op = match code {
            1 => Self::Add,
            2 => Self::Multiply,
            3 => Self::Input,
            4 => Self::Output,
            5 => Self::JumpIfTrue,
            6 => Self::JumpIfFalse,
            7 => Self::LessThan,
            8 => Self::Equals,
            9 => Self::AdjustRelativeBase,
            98 => Self::Dump,
            99 => Self::Halt,
            _ => return None,
        };
        Some(op)
    }

    /// Two-digit code as stored in memory
    pub const fn code(self) -> Word {
        self as u8 as Word
    }

    /// Number of parameters following the instruction word
    pub const fn arity(self) -> usize {
        match self {
            Self::Add | Self::Multiply | Self::LessThan | Self::Equals => 3,
            Self::JumpIfTrue | Self::JumpIfFalse => 2,
            Self::Input | Self::Output | Self::AdjustRelativeBase => 1,
            Self::Dump | Self::Halt => 0,
        }
    }

    /// Instruction width in words (opcode word plus parameters)
    pub const fn width(self) -> usize {
        1 + self.arity()
    }

    /// Index of the parameter this opcode writes to, if any
    pub const fn destination(self) -> Option<usize> {
        match self {
            Self::Add | Self::Multiply | Self::LessThan | Self::Equals => Some(2),
            Self::Input => Some(0),
            _ => None,
        }
    }

    /// Assembly mnemonic
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Multiply => "mul",
            Self::Input => "in",
            Self::Output => "out",
            Self::JumpIfTrue => "jnz",
            Self::JumpIfFalse => "jz",
            Self::LessThan => "lt",
            Self::Equals => "eq",
            Self::AdjustRelativeBase => "arb",
            Self::Dump => "dump",
            Self::Halt => "halt",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup_matches_table() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_code(op.code()), Some(op));
        }
        assert_eq!(Opcode::from_code(0), None);
        assert_eq!(Opcode::from_code(10), None);
        assert_eq!(Opcode::from_code(97), None);
    }

    #[test]
    fn test_arities() {
        assert_eq!(Opcode::Add.arity(), 3);
        assert_eq!(Opcode::Equals.arity(), 3);
        assert_eq!(Opcode::JumpIfFalse.arity(), 2);
        assert_eq!(Opcode::AdjustRelativeBase.arity(), 1);
        assert_eq!(Opcode::Halt.arity(), 0);
        assert_eq!(Opcode::Multiply.width(), 4);
    }

    #[test]
    fn test_destinations() {
        assert_eq!(Opcode::Input.destination(), Some(0));
        assert_eq!(Opcode::LessThan.destination(), Some(2));
        assert_eq!(Opcode::Output.destination(), None);
        assert_eq!(Opcode::JumpIfTrue.destination(), None);
    }
}
