//! Validator - Static best-effort checks over program text
//!
//! Decodes linearly from address 0 until the first halt. Intcode freely
//! mixes code and data and rewrites itself, so a clean report does not
//! prove the program runs, and words skipped by jumps may be flagged even
//! though they are never executed.

use std::fmt;

use super::{DecodeError, Instruction, Opcode, ParameterMode, Word};

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// The linear decode cannot continue past this point.
    Error,
    /// Suspicious but possibly intended.
    Warning,
}

/// A single validation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    /// Address of the offending instruction word (if applicable).
    pub address: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    fn error(address: usize, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            address: Some(address),
            message: message.into(),
        }
    }

    fn warning(address: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            address,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_str = match self.level {
            DiagnosticLevel::Error => "ERROR",
            DiagnosticLevel::Warning => "WARN",
        };
        if let Some(addr) = self.address {
            write!(f, "[{}] address {}: {}", level_str, addr, self.message)
        } else {
            write!(f, "[{}] {}", level_str, self.message)
        }
    }
}

/// Outcome of a linear decode pass
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Instructions decoded before stopping
    pub instructions: usize,
    /// Address of the first halt, if reached
    pub halt_at: Option<usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn is_ok(&self) -> bool {
        !self.has_errors()
    }
}

/// Decode `program` from address 0 up to its first halt
pub fn validate_program(program: &[Word]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut pc = 0;

    while pc < program.len() {
        let word = program[pc];
        let instr = match Instruction::decode(word) {
            Ok(instr) => instr,
            Err(DecodeError::UnknownOpcode(_)) => {
                report
                    .diagnostics
                    .push(Diagnostic::error(pc, format!("unknown opcode in word {}", word)));
                return report;
            }
            Err(DecodeError::InvalidMode(mode)) => {
                report.diagnostics.push(Diagnostic::error(
                    pc,
                    format!("invalid parameter mode {} in word {}", mode, word),
                ));
                return report;
            }
        };

        if pc + instr.width() > program.len() {
            report.diagnostics.push(Diagnostic::error(
                pc,
                format!(
                    "{} needs {} words, only {} left (premature end)",
                    instr.opcode,
                    instr.width(),
                    program.len() - pc
                ),
            ));
            return report;
        }

        if let Some(dst) = instr.opcode.destination() {
            if instr.mode(dst) == ParameterMode::Immediate {
                report.diagnostics.push(Diagnostic::error(
                    pc,
                    format!("{} writes through an immediate parameter", instr.opcode),
                ));
            }
        }

        report.instructions += 1;
        if instr.opcode == Opcode::Halt {
            report.halt_at = Some(pc);
            return report;
        }
        pc += instr.width();
    }

    report
        .diagnostics
        .push(Diagnostic::warning(None, "no halt reached by linear decode"));
    report
}
