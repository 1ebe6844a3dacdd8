//! Intcode VM - Stored-program machine over an auto-growing word memory
//!
//! Programs are flat sequences of signed words. Each instruction is an
//! instruction word (opcode plus packed parameter modes) followed by its
//! parameters:
//!
//! ```text
//! [ MODES | OPCODE ] [P1] [P2] [P3]
//!   ABC      DE
//!
//! DE  = word % 100         opcode
//! C   = word / 100 % 10    mode of P1
//! B   = word / 1000 % 10   mode of P2
//! A   = word / 10000 % 10  mode of P3
//! ```
//!
//! ## Addressing Modes
//!
//! ```text
//! 0 Position   P is an address
//! 1 Immediate  P is the value (sources only)
//! 2 Relative   relative_base + P is an address
//! ```
//!
//! ## Execution
//!
//! An [`Engine`] runs until it halts or stalls on an input instruction with
//! an empty queue. A stalled engine resumes at the same instruction once
//! input arrives. [`Snapshot`] captures {memory, pc, relative base} so a
//! state can be forked into independent engines.

mod instruction;
mod interpreter;
mod memory;
mod mode;
mod opcode;
mod snapshot;
pub mod validator;

pub use instruction::{decode, encode, DecodeError, Instruction, MAX_PARAMS};
pub use interpreter::{resolve, Engine, EngineConfig, ExecState, Operand, StepResult};
pub use memory::Memory;
pub use mode::ParameterMode;
pub use opcode::Opcode;
pub use snapshot::Snapshot;
pub use validator::{validate_program, Diagnostic, DiagnosticLevel, ValidationReport};

/// Machine word
pub type Word = i64;
