//! Error types for intcode

use thiserror::Error;

use crate::vm::Word;

/// Intcode error type
///
/// Every VM-internal variant is fatal for the engine that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntcodeError {
    /// Opcode outside the recognized set (or a negative instruction word)
    #[error("unknown opcode in word {word} at address {pc}")]
    UnknownOpcode { pc: usize, word: Word },

    /// Mode digit outside {0, 1, 2}
    #[error("invalid parameter mode {mode} at address {pc}")]
    InvalidParameterMode { pc: usize, mode: Word },

    /// Effective address (or jump target) resolved below zero
    #[error("negative address {address} at address {pc}")]
    NegativeAddress { pc: usize, address: Word },

    /// Instruction parameters run past the loaded program text
    #[error("instruction at {pc} needs {needed} words, only {available} available")]
    PrematureEnd {
        pc: usize,
        needed: usize,
        available: usize,
    },

    /// Immediate mode used for a parameter that is written to
    #[error("immediate-mode destination at address {pc}")]
    ImmediateDestination { pc: usize },

    /// Add or multiply overflowed the word width
    #[error("arithmetic overflow at address {pc}")]
    ArithmeticOverflow { pc: usize },

    /// Engine stalled on input after every supplied value was consumed
    #[error("input exhausted at address {pc}")]
    InputExhausted { pc: usize },

    /// Program source could not be parsed
    #[error("parse error at item {position}: {token:?}")]
    Parse { position: usize, token: String },

    /// Every live engine in a feedback ring is stalled with no input pending
    #[error("feedback ring deadlocked: all live engines wait for input")]
    RingDeadlock,

    /// Feedback ring finished without a signal from its last engine
    #[error("feedback ring produced no signal")]
    NoSignal,

    /// Phase search was given no phases
    #[error("phase set is empty")]
    EmptyPhaseSet,

    /// World program answered a move with an unrecognized status code
    #[error("unexpected status code {value}")]
    UnexpectedStatus { value: Word },

    /// World program answered a move with no output at all
    #[error("no status produced for move")]
    MissingStatus,
}

pub type Result<T> = std::result::Result<T, IntcodeError>;
