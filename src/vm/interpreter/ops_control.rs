//! Control flow operation implementations for the Interpreter

use super::{Engine, Instruction, StepResult};
use crate::error::{IntcodeError, Result};
use crate::vm::Memory;

impl Engine {
    /// Absolute jump to parameter 2 when `(a != 0) == when`
    pub(super) fn execute_jump(&mut self, instr: &Instruction, when: bool) -> Result<StepResult> {
        let condition = self.read_param(instr, 0)? != 0;
        if condition != when {
            return Ok(self.advance(instr));
        }
        let target = self.read_param(instr, 1)?;
        self.pc = Memory::address(target, self.pc)?;
        Ok(StepResult::Continue)
    }

    pub(super) fn execute_adjust_base(&mut self, instr: &Instruction) -> Result<StepResult> {
        let delta = self.read_param(instr, 0)?;
        self.relative_base = self
            .relative_base
            .checked_add(delta)
            .ok_or(IntcodeError::ArithmeticOverflow { pc: self.pc })?;
        Ok(self.advance(instr))
    }

    pub(super) fn execute_dump(&mut self) -> Result<StepResult> {
        log::debug!(
            "dump: pc={} relative_base={} memory_len={} pending_inputs={} outputs={:?}",
            self.pc,
            self.relative_base,
            self.memory.len(),
            self.input.len(),
            self.output,
        );
        self.pc += 1;
        Ok(StepResult::Continue)
    }
}
