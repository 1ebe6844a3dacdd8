//! Snapshot - Point-in-time engine capture for forking and replay
//!
//! A snapshot holds its own copy of memory plus the program counter and
//! relative base. Queues are not captured: a resumed engine starts with a
//! fresh input queue holding only the inputs given to `resume`, and an
//! empty output queue.
//!
//! Resuming the same snapshot any number of times yields engines that
//! share no state with each other or with the snapshot.

use serde::{Deserialize, Serialize};

use super::{Engine, EngineConfig, Memory, Word};

/// Captured {memory, pc, relative base}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    memory: Memory,
    pc: usize,
    relative_base: Word,
}

impl Snapshot {
    /// Fresh engine continuing from this state
    pub fn resume(&self, inputs: impl IntoIterator<Item = Word>) -> Engine {
        self.resume_with(EngineConfig::default(), inputs)
    }

    pub fn resume_with(
        &self,
        config: EngineConfig,
        inputs: impl IntoIterator<Item = Word>,
    ) -> Engine {
        log::debug!("resuming snapshot at pc={} rb={}", self.pc, self.relative_base);
        Engine::from_parts(self.memory.clone(), self.pc, self.relative_base, inputs, config)
    }

    /// Resume without copying memory, consuming the snapshot
    pub fn into_engine(self, inputs: impl IntoIterator<Item = Word>) -> Engine {
        Engine::from_parts(
            self.memory,
            self.pc,
            self.relative_base,
            inputs,
            EngineConfig::default(),
        )
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
}

impl Engine {
    /// Capture memory, pc and relative base
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            memory: self.memory().clone(),
            pc: self.pc(),
            relative_base: self.relative_base(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::{ExecState, StepResult};

    /// Reads a value into 20, accumulates it into 21, outputs both cells,
    /// then waits for the next input.
    const FORK_PROGRAM: [Word; 22] = [
        3, 20, 1, 20, 21, 21, 4, 20, 4, 21, 1105, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];

    #[test]
    fn test_resume_keeps_position() {
        let mut engine = Engine::new(&[109, 3, 3, 10, 204, 7, 99], []);
        assert_eq!(engine.run().unwrap(), ExecState::WaitingForInput);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.pc(), 2);
        assert_eq!(snapshot.relative_base(), 3);

        let mut resumed = snapshot.resume([11]);
        assert_eq!(resumed.run().unwrap(), ExecState::Halted);
        assert_eq!(resumed.drain_outputs(), vec![11]);
    }

    #[test]
    fn test_forks_are_independent() {
        let mut parent = Engine::new(&FORK_PROGRAM, []);
        assert_eq!(parent.run().unwrap(), ExecState::WaitingForInput);
        let snapshot = parent.snapshot();

        let mut a = snapshot.resume([100]);
        let mut b = snapshot.resume([-100]);
        a.run().unwrap();
        b.run().unwrap();

        assert_eq!(a.peek(20), 100);
        assert_eq!(b.peek(20), -100);
        assert_eq!(a.drain_outputs(), vec![100, 100]);
        assert_eq!(b.drain_outputs(), vec![-100, -100]);

        // snapshot and parent untouched
        assert_eq!(snapshot.memory().get(20), 0);
        assert_eq!(parent.peek(20), 0);

        // continuing one fork never leaks into the other
        a.add_input([1]);
        a.run().unwrap();
        assert_eq!(a.drain_outputs(), vec![1, 101]);
        assert_eq!(b.peek(21), -100);
    }

    #[test]
    fn test_resumed_engine_has_fresh_queues() {
        let mut engine = Engine::new(&FORK_PROGRAM, [5]);
        engine.run().unwrap();
        assert!(!engine.outputs().is_empty());

        let mut resumed = engine.snapshot().resume([]);
        assert!(resumed.outputs().is_empty());
        assert_eq!(resumed.pending_inputs(), 0);
        assert_eq!(resumed.run().unwrap(), ExecState::WaitingForInput);
    }

    #[test]
    fn test_resumed_engine_skips_program_end_check() {
        let engine = Engine::new(&[1, 0, 0], []);
        let mut resumed = engine.snapshot().into_engine([]);
        assert_eq!(resumed.step().unwrap(), StepResult::Continue);
        assert_eq!(resumed.peek(0), 2);
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut engine = Engine::new(&FORK_PROGRAM, [9]);
        engine.run().unwrap();
        let snapshot = engine.snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);

        let mut resumed = restored.resume([4]);
        resumed.run().unwrap();
        assert_eq!(resumed.drain_outputs(), vec![4, 13]);
    }
}
