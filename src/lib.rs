//! # Intcode - Stored-program virtual machine
//!
//! A small machine whose programs are flat lists of signed words. Code and
//! data share one memory, programs rewrite themselves, and I/O goes through
//! FIFO queues so engines can be wired together.
//!
//! ## Core Components
//!
//! - **Engine**: Decode/execute loop with halt and input-stall states
//! - **Memory**: Word store that grows on write and reads zero past the end
//! - **Snapshot**: Forkable {memory, pc, relative base} state
//! - **Orchestrator**: Run-to-completion, feedback rings and frontier search
//!
//! ## Example
//!
//! ```ignore
//! use intcode::{loader, Engine, ExecState};
//!
//! let program = loader::parse_program("3,9,8,9,10,9,4,9,99,-1,8")?;
//! let mut engine = Engine::new(&program, [8]);
//! assert_eq!(engine.run()?, ExecState::Halted);
//! assert_eq!(engine.drain_outputs(), vec![1]);
//! ```

// Error types
mod error;
pub use error::{IntcodeError, Result};

// Intcode VM
pub mod vm;
pub use vm::{
    // Core types
    Engine, EngineConfig, ExecState, StepResult, Word,
    Instruction, Opcode, ParameterMode, Memory, Snapshot,
    // Static checks
    validate_program, ValidationReport,
};

// Program text
pub mod loader;
pub use loader::{format_program, load_file, parse_program};

// Multi-engine drivers
pub mod orchestrator;
pub use orchestrator::{
    run_to_completion, FeedbackRing, max_signal,
    Direction, Explorer, Exploration, Point, Tile,
};
