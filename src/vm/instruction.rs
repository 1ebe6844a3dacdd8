//! Instruction - Decoded form of an Intcode instruction word
//!
//! ## Format
//!
//! ```text
//! 1002 = 0 1 0 02
//!        │ │ │ └── opcode 2 (mul)
//!        │ │ └──── parameter 1: position
//!        │ └────── parameter 2: immediate
//!        └──────── parameter 3: position
//! ```
//!
//! Only as many mode digits as the opcode declares parameters are read;
//! higher digits are ignored.

use std::fmt;

use super::{Opcode, ParameterMode, Word};
use crate::error::IntcodeError;

/// Most parameters any opcode takes
pub const MAX_PARAMS: usize = 3;

/// Why an instruction word failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Opcode digits not in the recognized set
    UnknownOpcode(Word),
    /// A declared parameter carries a mode digit outside {0, 1, 2}
    InvalidMode(Word),
}

impl DecodeError {
    /// Attach the address of the offending word
    pub fn at(self, pc: usize, word: Word) -> IntcodeError {
        match self {
            Self::UnknownOpcode(_) => IntcodeError::UnknownOpcode { pc, word },
            Self::InvalidMode(mode) => IntcodeError::InvalidParameterMode { pc, mode },
        }
    }
}

/// A decoded instruction word: opcode plus one mode per declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    modes: [ParameterMode; MAX_PARAMS],
}

impl Instruction {
    /// Build an instruction from explicit modes
    ///
    /// `modes` shorter than the arity is padded with `Position`; extra
    /// entries are ignored.
    pub fn new(opcode: Opcode, modes: &[ParameterMode]) -> Self {
        let mut packed = [ParameterMode::Position; MAX_PARAMS];
        for (slot, mode) in packed.iter_mut().zip(modes).take(opcode.arity()) {
            *slot = *mode;
        }
        Self { opcode, modes: packed }
    }

    /// Split an instruction word into opcode and parameter modes
    pub fn decode(word: Word) -> Result<Self, DecodeError> {
        if word < 0 {
            return Err(DecodeError::UnknownOpcode(word));
        }
        let opcode = Opcode::from_code(word % 100).ok_or(DecodeError::UnknownOpcode(word))?;

        let mut digits = word / 100;
        let mut modes = [ParameterMode::Position; MAX_PARAMS];
        for slot in modes.iter_mut().take(opcode.arity()) {
            let digit = digits % 10;
            *slot = ParameterMode::from_digit(digit).ok_or(DecodeError::InvalidMode(digit))?;
            digits /= 10;
        }

        Ok(Self { opcode, modes })
    }

    /// Pack back into an instruction word
    pub fn encode(&self) -> Word {
        self.modes()
            .iter()
            .enumerate()
            .fold(self.opcode.code(), |word, (i, mode)| {
                word + mode.digit() * 10_i64.pow(i as u32 + 2)
            })
    }

    /// Modes of the declared parameters, in parameter order
    pub fn modes(&self) -> &[ParameterMode] {
        &self.modes[..self.opcode.arity()]
    }

    /// Mode of parameter `index` (0-based)
    pub fn mode(&self, index: usize) -> ParameterMode {
        self.modes[index]
    }

    pub fn arity(&self) -> usize {
        self.opcode.arity()
    }

    pub fn width(&self) -> usize {
        self.opcode.width()
    }
}

/// Decode an instruction word into `(opcode, modes)`
pub fn decode(word: Word) -> Result<(Opcode, Vec<ParameterMode>), DecodeError> {
    let instr = Instruction::decode(word)?;
    Ok((instr.opcode, instr.modes().to_vec()))
}

/// Encode an opcode and its parameter modes into an instruction word
pub fn encode(opcode: Opcode, modes: &[ParameterMode]) -> Word {
    Instruction::new(opcode, modes).encode()
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for (i, mode) in self.modes().iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            let sigil = match mode {
                ParameterMode::Position => "@",
                ParameterMode::Immediate => "#",
                ParameterMode::Relative => "~",
            };
            write!(f, "{}{}{}", sep, sigil, i + 1)?;
        }
        Ok(())
    }
}
