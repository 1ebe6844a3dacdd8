//! Arithmetic and comparison implementations for the Interpreter

use super::{Engine, Instruction, StepResult};
use crate::error::{IntcodeError, Result};
use crate::vm::Word;

impl Engine {
    /// dst = f(a, b); `None` from `f` is an overflow
    fn execute_binary(
        &mut self,
        instr: &Instruction,
        f: impl FnOnce(Word, Word) -> Option<Word>,
    ) -> Result<StepResult> {
        let a = self.read_param(instr, 0)?;
        let b = self.read_param(instr, 1)?;
        let dst = self.write_address(instr, 2)?;
        let value = f(a, b).ok_or(IntcodeError::ArithmeticOverflow { pc: self.pc })?;
        self.write(dst, value);
        Ok(self.advance(instr))
    }

    pub(super) fn execute_add(&mut self, instr: &Instruction) -> Result<StepResult> {
        self.execute_binary(instr, Word::checked_add)
    }

    pub(super) fn execute_multiply(&mut self, instr: &Instruction) -> Result<StepResult> {
        self.execute_binary(instr, Word::checked_mul)
    }

    pub(super) fn execute_less_than(&mut self, instr: &Instruction) -> Result<StepResult> {
        self.execute_binary(instr, |a, b| Some(Word::from(a < b)))
    }

    pub(super) fn execute_equals(&mut self, instr: &Instruction) -> Result<StepResult> {
        self.execute_binary(instr, |a, b| Some(Word::from(a == b)))
    }
}
