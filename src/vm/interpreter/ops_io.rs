//! Input/output queue operations for the Interpreter

use super::{Engine, Instruction, StepResult};
use crate::error::Result;

impl Engine {
    /// Pop the input queue into the destination, or stall in place
    pub(super) fn execute_input(&mut self, instr: &Instruction) -> Result<StepResult> {
        let dst = self.write_address(instr, 0)?;
        match self.input.pop_front() {
            Some(value) => {
                self.write(dst, value);
                Ok(self.advance(instr))
            }
            None => Ok(StepResult::NeedsInput),
        }
    }

    pub(super) fn execute_output(&mut self, instr: &Instruction) -> Result<StepResult> {
        let value = self.read_param(instr, 0)?;
        self.output.push(value);
        Ok(self.advance(instr))
    }
}
