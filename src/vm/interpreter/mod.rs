//! Interpreter - Fetch/decode/execute engine for the Intcode VM
//!
//! An [`Engine`] owns its memory, program counter, relative base and two
//! FIFO queues. Execution is an explicit state machine:
//!
//! ```text
//!            run()                 input queue empty
//!   Running ───────► step loop ───────────────────────► WaitingForInput
//!      ▲                 │                                    │
//!      │                 │ halt                               │ add_input + run()
//!      │                 ▼                                    │
//!      │              Halted (terminal)                       │
//!      └──────────────────────────────────────────────────────┘
//! ```
//!
//! A stalled input instruction does not advance the program counter, so the
//! next `run()` retries the same read.

mod operand;
mod ops_arith;
mod ops_control;
mod ops_io;

pub use operand::{resolve, Operand};

use std::collections::VecDeque;

use super::{Instruction, Memory, Opcode, Word};
use crate::error::{IntcodeError, Result};

/// Execution state of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// Executing (or ready to execute) instructions
    Running,
    /// Stalled on an input instruction with an empty queue
    WaitingForInput,
    /// Stop instruction reached; never left
    Halted,
}

/// Result of executing a single instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    NeedsInput,
    Halted,
}

/// Engine behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Reject instructions whose parameters run past the loaded program text.
    /// Only active until memory first grows past the program; never active
    /// for engines resumed from a snapshot.
    pub check_program_end: bool,
    /// Accept the auxiliary dump opcode (98).
    pub allow_dump: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            check_program_end: true,
            allow_dump: true,
        }
    }
}

impl EngineConfig {
    /// Puzzle-facing instruction set only: the dump opcode is rejected.
    pub fn strict() -> Self {
        Self {
            allow_dump: false,
            ..Self::default()
        }
    }

    /// No program-end check.
    pub fn permissive() -> Self {
        Self {
            check_program_end: false,
            ..Self::default()
        }
    }
}

/// Intcode execution engine
#[derive(Debug, Clone)]
pub struct Engine {
    memory: Memory,
    pc: usize,
    relative_base: Word,
    state: ExecState,
    input: VecDeque<Word>,
    output: Vec<Word>,
    config: EngineConfig,
    /// Program length while the end check applies
    program_end: Option<usize>,
    fault: Option<IntcodeError>,
    steps: u64,
}

impl Engine {
    /// Load `program` at address 0 and seed the input queue
    pub fn new(program: &[Word], inputs: impl IntoIterator<Item = Word>) -> Self {
        Self::with_config(program, inputs, EngineConfig::default())
    }

    pub fn with_config(
        program: &[Word],
        inputs: impl IntoIterator<Item = Word>,
        config: EngineConfig,
    ) -> Self {
        let program_end = config.check_program_end.then_some(program.len());
        let mut engine = Self::from_parts(Memory::from_program(program), 0, 0, inputs, config);
        engine.program_end = program_end;
        engine
    }

    /// Assemble an engine from previously captured state
    pub(crate) fn from_parts(
        memory: Memory,
        pc: usize,
        relative_base: Word,
        inputs: impl IntoIterator<Item = Word>,
        config: EngineConfig,
    ) -> Self {
        Self {
            memory,
            pc,
            relative_base,
            state: ExecState::Running,
            input: inputs.into_iter().collect(),
            output: Vec::new(),
            config,
            program_end: None,
            fault: None,
            steps: 0,
        }
    }

    // =========================================================================
    // Queues
    // =========================================================================

    /// Append values to the back of the input queue
    pub fn add_input(&mut self, values: impl IntoIterator<Item = Word>) {
        self.input.extend(values);
    }

    /// Return and clear every output produced since the last drain
    pub fn drain_outputs(&mut self) -> Vec<Word> {
        std::mem::take(&mut self.output)
    }

    /// Outputs produced since the last drain, without clearing them
    pub fn outputs(&self) -> &[Word] {
        &self.output
    }

    /// Number of inputs queued but not yet consumed
    pub fn pending_inputs(&self) -> usize {
        self.input.len()
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Run until the engine halts or stalls on input
    pub fn run(&mut self) -> Result<ExecState> {
        loop {
            match self.step()? {
                StepResult::Continue => {}
                StepResult::NeedsInput | StepResult::Halted => return Ok(self.state),
            }
        }
    }

    /// Execute exactly one instruction
    ///
    /// A fault is sticky: once an instruction fails, every later call
    /// returns the same error.
    pub fn step(&mut self) -> Result<StepResult> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if self.state == ExecState::Halted {
            return Ok(StepResult::Halted);
        }
        if self.state == ExecState::WaitingForInput {
            log::debug!("resuming at {} with {} input(s)", self.pc, self.input.len());
        }
        self.state = ExecState::Running;

        let result = match self.execute() {
            Ok(result) => result,
            Err(e) => {
                log::debug!("engine fault: {}", e);
                self.fault = Some(e.clone());
                return Err(e);
            }
        };

        match result {
            StepResult::Continue => {}
            StepResult::NeedsInput => {
                log::debug!("stalled on input at {}", self.pc);
                self.state = ExecState::WaitingForInput;
            }
            StepResult::Halted => {
                log::debug!("halted at {} after {} steps", self.pc, self.steps);
                self.state = ExecState::Halted;
            }
        }
        Ok(result)
    }

    fn execute(&mut self) -> Result<StepResult> {
        let word = self.memory.get(self.pc);
        let instr = Instruction::decode(word).map_err(|e| e.at(self.pc, word))?;
        if instr.opcode == Opcode::Dump && !self.config.allow_dump {
            return Err(IntcodeError::UnknownOpcode { pc: self.pc, word });
        }
        self.check_program_end(&instr)?;
        log::trace!("{:>6}: {}", self.pc, instr);

        let result = match instr.opcode {
            // Arithmetic and comparison (ops_arith.rs)
            Opcode::Add => self.execute_add(&instr),
            Opcode::Multiply => self.execute_multiply(&instr),
            Opcode::LessThan => self.execute_less_than(&instr),
            Opcode::Equals => self.execute_equals(&instr),

            // Queues (ops_io.rs)
            Opcode::Input => self.execute_input(&instr),
            Opcode::Output => self.execute_output(&instr),

            // Control flow (ops_control.rs)
            Opcode::JumpIfTrue => self.execute_jump(&instr, true),
            Opcode::JumpIfFalse => self.execute_jump(&instr, false),
            Opcode::AdjustRelativeBase => self.execute_adjust_base(&instr),
            Opcode::Dump => self.execute_dump(),
            Opcode::Halt => Ok(StepResult::Halted),
        }?;

        if result != StepResult::NeedsInput {
            self.steps += 1;
        }
        Ok(result)
    }

    /// Best-effort guard against instructions truncated by the end of the
    /// program text. Dropped as soon as memory grows.
    fn check_program_end(&mut self, instr: &Instruction) -> Result<()> {
        let Some(end) = self.program_end else {
            return Ok(());
        };
        if self.memory.len() > end {
            self.program_end = None;
            return Ok(());
        }
        if self.pc + instr.width() > end {
            return Err(IntcodeError::PrematureEnd {
                pc: self.pc,
                needed: instr.width(),
                available: end.saturating_sub(self.pc),
            });
        }
        Ok(())
    }

    /// Move past the current instruction
    #[inline]
    pub(super) fn advance(&mut self, instr: &Instruction) -> StepResult {
        self.pc += instr.width();
        StepResult::Continue
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> ExecState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == ExecState::Halted
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn relative_base(&self) -> Word {
        self.relative_base
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Instructions completed so far (stalled reads are not counted)
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Error that stopped this engine, if any
    pub fn fault(&self) -> Option<&IntcodeError> {
        self.fault.as_ref()
    }

    /// Read memory at `addr`
    pub fn peek(&self, addr: usize) -> Word {
        self.memory.get(addr)
    }

    /// Patch memory at `addr`
    pub fn poke(&mut self, addr: usize, value: Word) {
        self.memory.set(addr, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_halt(program: &[Word], inputs: &[Word]) -> Engine {
        let mut engine = Engine::new(program, inputs.iter().copied());
        assert_eq!(engine.run().unwrap(), ExecState::Halted);
        engine
    }

    #[test]
    fn test_engine_creation() {
        let engine = Engine::new(&[99], []);
        assert_eq!(engine.pc(), 0);
        assert_eq!(engine.relative_base(), 0);
        assert_eq!(engine.state(), ExecState::Running);
        assert_eq!(engine.steps(), 0);
    }

    #[test]
    fn test_add_in_place() {
        let engine = run_to_halt(&[1, 0, 0, 0, 99], &[]);
        assert_eq!(engine.memory().as_slice(), &[2, 0, 0, 0, 99]);
    }

    #[test]
    fn test_multiply_immediate() {
        let engine = run_to_halt(&[1002, 4, 3, 4, 33], &[]);
        assert_eq!(engine.memory().as_slice(), &[1002, 4, 3, 4, 99]);
    }

    #[test]
    fn test_small_programs() {
        let engine = run_to_halt(&[2, 3, 0, 3, 99], &[]);
        assert_eq!(engine.memory().as_slice(), &[2, 3, 0, 6, 99]);

        let engine = run_to_halt(&[2, 4, 4, 5, 99, 0], &[]);
        assert_eq!(engine.memory().as_slice(), &[2, 4, 4, 5, 99, 9801]);

        let engine = run_to_halt(&[1, 1, 1, 4, 99, 5, 6, 0, 99], &[]);
        assert_eq!(engine.memory().as_slice(), &[30, 1, 1, 4, 2, 5, 6, 0, 99]);
    }

    #[test]
    fn test_gravity_assist_sample() {
        let engine = run_to_halt(&[1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50], &[]);
        assert_eq!(engine.peek(0), 3500);
        assert_eq!(engine.steps(), 3);
    }

    #[test]
    fn test_echo() {
        let mut engine = run_to_halt(&[3, 0, 4, 0, 99], &[-17]);
        assert_eq!(engine.drain_outputs(), vec![-17]);
        assert!(engine.drain_outputs().is_empty());
    }

    #[test]
    fn test_comparisons() {
        // position mode: input == 8
        let eq8 = [3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8];
        assert_eq!(run_to_halt(&eq8, &[8]).outputs(), &[1]);
        assert_eq!(run_to_halt(&eq8, &[7]).outputs(), &[0]);

        // immediate mode: input < 8
        let lt8 = [3, 3, 1107, -1, 8, 3, 4, 3, 99];
        assert_eq!(run_to_halt(&lt8, &[5]).outputs(), &[1]);
        assert_eq!(run_to_halt(&lt8, &[8]).outputs(), &[0]);
    }

    #[test]
    fn test_jumps() {
        let pos = [3, 12, 6, 12, 15, 1, 13, 14, 13, 4, 13, 99, -1, 0, 1, 9];
        assert_eq!(run_to_halt(&pos, &[0]).outputs(), &[0]);
        assert_eq!(run_to_halt(&pos, &[4]).outputs(), &[1]);

        let imm = [3, 3, 1105, -1, 9, 1101, 0, 0, 12, 4, 12, 99, 1];
        assert_eq!(run_to_halt(&imm, &[0]).outputs(), &[0]);
        assert_eq!(run_to_halt(&imm, &[-3]).outputs(), &[1]);
    }

    #[test]
    fn test_compare_to_eight() {
        let program = [
            3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36, 98, 0,
            0, 1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101, 1000, 1, 20, 4,
            20, 1105, 1, 46, 98, 99,
        ];
        assert_eq!(run_to_halt(&program, &[7]).outputs(), &[999]);
        assert_eq!(run_to_halt(&program, &[8]).outputs(), &[1000]);
        assert_eq!(run_to_halt(&program, &[9]).outputs(), &[1001]);
    }

    #[test]
    fn test_quine() {
        let program = [
            109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99,
        ];
        let engine = run_to_halt(&program, &[]);
        assert_eq!(engine.outputs(), &program);
    }

    #[test]
    fn test_large_numbers() {
        let engine = run_to_halt(&[104, 1125899906842624, 99], &[]);
        assert_eq!(engine.outputs(), &[1125899906842624]);

        let engine = run_to_halt(&[1102, 34915192, 34915192, 7, 4, 7, 99, 0], &[]);
        assert_eq!(engine.outputs(), &[1219070632396864]);
    }

    #[test]
    fn test_relative_base_addressing() {
        assert_eq!(run_to_halt(&[109, -1, 4, 1, 99], &[]).outputs(), &[-1]);
        assert_eq!(run_to_halt(&[109, -1, 104, 1, 99], &[]).outputs(), &[1]);
        assert_eq!(run_to_halt(&[109, -1, 204, 1, 99], &[]).outputs(), &[109]);

        // relative-mode destination
        let engine = run_to_halt(&[109, 10, 203, -3, 204, -3, 99], &[55]);
        assert_eq!(engine.peek(7), 55);
        assert_eq!(engine.outputs(), &[55]);
        assert_eq!(engine.relative_base(), 10);
    }

    #[test]
    fn test_stall_and_resume() {
        let mut engine = Engine::new(&[3, 7, 4, 7, 99, 0, 0, 0], []);
        assert_eq!(engine.run().unwrap(), ExecState::WaitingForInput);
        assert_eq!(engine.pc(), 0);
        assert_eq!(engine.peek(7), 0);

        // running again without input stalls at the same instruction
        assert_eq!(engine.run().unwrap(), ExecState::WaitingForInput);
        assert_eq!(engine.pc(), 0);

        engine.add_input([42]);
        assert_eq!(engine.run().unwrap(), ExecState::Halted);
        assert_eq!(engine.peek(7), 42);
        assert_eq!(engine.drain_outputs(), vec![42]);
        assert_eq!(engine.pending_inputs(), 0);
    }

    #[test]
    fn test_stalled_read_happens_once() {
        // count reads in address 20: in [21]; add [20] 1 -> [20]; out [20]; jump back
        let program = [
            3, 21, 1001, 20, 1, 20, 4, 20, 1105, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        let mut engine = Engine::new(&program, []);
        assert_eq!(engine.run().unwrap(), ExecState::WaitingForInput);
        assert!(engine.outputs().is_empty());

        engine.add_input([5]);
        assert_eq!(engine.run().unwrap(), ExecState::WaitingForInput);
        assert_eq!(engine.drain_outputs(), vec![1]);
        assert_eq!(engine.peek(21), 5);
        assert_eq!(engine.pc(), 0);

        engine.add_input([6, 7]);
        assert_eq!(engine.run().unwrap(), ExecState::WaitingForInput);
        assert_eq!(engine.drain_outputs(), vec![2, 3]);
    }

    #[test]
    fn test_halted_is_terminal() {
        let mut engine = Engine::new(&[99], []);
        assert_eq!(engine.run().unwrap(), ExecState::Halted);
        engine.add_input([1]);
        assert_eq!(engine.run().unwrap(), ExecState::Halted);
        assert_eq!(engine.step().unwrap(), StepResult::Halted);
        assert_eq!(engine.pending_inputs(), 1);
    }

    #[test]
    fn test_unknown_opcode_is_sticky() {
        let mut engine = Engine::new(&[1101, 1, 1, 5, 42, 0], []);
        let err = engine.run().unwrap_err();
        assert_eq!(err, IntcodeError::UnknownOpcode { pc: 4, word: 42 });
        assert_eq!(engine.run().unwrap_err(), err);
        assert_eq!(engine.fault(), Some(&err));
    }

    #[test]
    fn test_invalid_mode() {
        let mut engine = Engine::new(&[301, 0, 0, 0, 99], []);
        assert_eq!(
            engine.run().unwrap_err(),
            IntcodeError::InvalidParameterMode { pc: 0, mode: 3 }
        );
    }

    #[test]
    fn test_negative_address() {
        let mut engine = Engine::new(&[109, -5, 204, 1, 99], []);
        assert_eq!(
            engine.run().unwrap_err(),
            IntcodeError::NegativeAddress { pc: 2, address: -4 }
        );

        let mut engine = Engine::new(&[4, -1, 99], []);
        assert_eq!(
            engine.run().unwrap_err(),
            IntcodeError::NegativeAddress { pc: 0, address: -1 }
        );

        let mut engine = Engine::new(&[1105, 1, -7, 99], []);
        assert_eq!(
            engine.run().unwrap_err(),
            IntcodeError::NegativeAddress { pc: 0, address: -7 }
        );
    }

    #[test]
    fn test_immediate_destination() {
        let mut engine = Engine::new(&[11101, 1, 1, 0, 99], []);
        assert_eq!(
            engine.run().unwrap_err(),
            IntcodeError::ImmediateDestination { pc: 0 }
        );
    }

    #[test]
    fn test_overflow() {
        let mut engine = Engine::new(&[1102, i64::MAX, 2, 0, 99], []);
        assert_eq!(
            engine.run().unwrap_err(),
            IntcodeError::ArithmeticOverflow { pc: 0 }
        );
    }

    #[test]
    fn test_premature_end() {
        let mut engine = Engine::new(&[1, 0, 0], []);
        assert_eq!(
            engine.run().unwrap_err(),
            IntcodeError::PrematureEnd {
                pc: 0,
                needed: 4,
                available: 3
            }
        );

        // same text without the check: missing parameters read as zero
        let mut engine = Engine::with_config(&[1, 0, 0], [], EngineConfig::permissive());
        assert!(matches!(
            engine.run(),
            Err(IntcodeError::UnknownOpcode { pc: 4, word: 0 })
        ));
        assert_eq!(engine.peek(0), 2);
    }

    #[test]
    fn test_program_end_check_lifts_after_growth() {
        // writes to 10 then runs off its own text into zeroed memory
        let mut engine = Engine::new(&[1101, 2, 3, 10, 104], []);
        let err = engine.run().unwrap_err();
        assert_eq!(err, IntcodeError::UnknownOpcode { pc: 6, word: 0 });
        assert_eq!(engine.outputs(), &[0]);
    }

    #[test]
    fn test_dump_opcode() {
        let mut engine = Engine::new(&[98, 104, 3, 99], []);
        assert_eq!(engine.run().unwrap(), ExecState::Halted);
        assert_eq!(engine.outputs(), &[3]);

        let mut strict = Engine::with_config(&[98, 99], [], EngineConfig::strict());
        assert_eq!(
            strict.run().unwrap_err(),
            IntcodeError::UnknownOpcode { pc: 0, word: 98 }
        );
    }

    #[test]
    fn test_step_by_step() {
        let mut engine = Engine::new(&[1101, 2, 3, 5, 99, 0], []);
        assert_eq!(engine.step().unwrap(), StepResult::Continue);
        assert_eq!(engine.pc(), 4);
        assert_eq!(engine.peek(5), 5);
        assert_eq!(engine.step().unwrap(), StepResult::Halted);
        assert!(engine.is_halted());
    }

    #[test]
    fn test_far_address_write_and_read() {
        let far = 4_611_686_018_427_387_904;
        let mut engine = Engine::new(&[1101, 1, 1, far, 4, far, 99], []);
        assert_eq!(engine.run().unwrap(), ExecState::Halted);
        assert_eq!(engine.outputs(), &[2]);
        assert_eq!(engine.peek(far as usize), 2);
        assert_eq!(engine.memory().as_slice().len(), 7);
    }
}
