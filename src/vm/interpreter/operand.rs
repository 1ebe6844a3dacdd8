//! Operand resolution for the Interpreter
//!
//! Turns a raw parameter and its mode into either an effective address or
//! a literal value. Sources dereference addresses; destinations must be
//! addresses.

use super::{Engine, Instruction};
use crate::error::{IntcodeError, Result};
use crate::vm::{Memory, ParameterMode, Word};

/// A resolved parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Effective memory address (Position or Relative mode)
    Address(usize),
    /// Literal value (Immediate mode)
    Value(Word),
}

/// Resolve `raw` under `mode`
///
/// `pc` is the address of the instruction, used for error context.
pub fn resolve(raw: Word, mode: ParameterMode, relative_base: Word, pc: usize) -> Result<Operand> {
    match mode {
        ParameterMode::Position => Memory::address(raw, pc).map(Operand::Address),
        ParameterMode::Immediate => Ok(Operand::Value(raw)),
        ParameterMode::Relative => {
            let address = relative_base
                .checked_add(raw)
                .ok_or(IntcodeError::ArithmeticOverflow { pc })?;
            Memory::address(address, pc).map(Operand::Address)
        }
    }
}

impl Engine {
    fn operand(&self, instr: &Instruction, index: usize) -> Result<Operand> {
        let raw = self.memory.get(self.pc + 1 + index);
        resolve(raw, instr.mode(index), self.relative_base, self.pc)
    }

    /// Value of source parameter `index`
    pub(super) fn read_param(&self, instr: &Instruction, index: usize) -> Result<Word> {
        Ok(match self.operand(instr, index)? {
            Operand::Address(addr) => self.memory.get(addr),
            Operand::Value(value) => value,
        })
    }

    /// Address of destination parameter `index`
    pub(super) fn write_address(&self, instr: &Instruction, index: usize) -> Result<usize> {
        match self.operand(instr, index)? {
            Operand::Address(addr) => Ok(addr),
            Operand::Value(_) => Err(IntcodeError::ImmediateDestination { pc: self.pc }),
        }
    }

    pub(super) fn write(&mut self, addr: usize, value: Word) {
        self.memory.set(addr, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_modes() {
        assert_eq!(
            resolve(7, ParameterMode::Position, 100, 0),
            Ok(Operand::Address(7))
        );
        assert_eq!(
            resolve(7, ParameterMode::Immediate, 100, 0),
            Ok(Operand::Value(7))
        );
        assert_eq!(
            resolve(-3, ParameterMode::Relative, 100, 0),
            Ok(Operand::Address(97))
        );
        assert_eq!(
            resolve(-3, ParameterMode::Immediate, 0, 0),
            Ok(Operand::Value(-3))
        );
    }

    #[test]
    fn test_resolve_negative() {
        assert_eq!(
            resolve(-1, ParameterMode::Position, 0, 9),
            Err(IntcodeError::NegativeAddress { pc: 9, address: -1 })
        );
        assert_eq!(
            resolve(2, ParameterMode::Relative, -5, 4),
            Err(IntcodeError::NegativeAddress { pc: 4, address: -3 })
        );
        assert_eq!(
            resolve(1, ParameterMode::Relative, Word::MAX, 0),
            Err(IntcodeError::ArithmeticOverflow { pc: 0 })
        );
    }
}
