//! Feedback ring - N engines wired output-to-input in a cycle
//!
//! ```text
//!   seed ─► E0 ─► E1 ─► ... ─► E(n-1) ─┬─► signal
//!           ▲                          │
//!           └──────────────────────────┘
//! ```
//!
//! Each engine is seeded with one phase setting. Engines take turns in a
//! queue: the head engine receives everything its upstream neighbour has
//! produced since its last turn, runs until it halts or stalls, and its
//! outputs are routed to the next engine in ring order. Stalled engines go
//! back on the queue. The ring finishes when every engine has halted; the
//! last value produced by the final engine is the signal.
//!
//! A series (non-feedback) chain is the same ring where every engine halts
//! after its first turn.

use std::collections::VecDeque;

use crate::error::{IntcodeError, Result};
use crate::vm::{Engine, ExecState, Word};

/// Ring of engines sharing one program
#[derive(Debug, Clone)]
pub struct FeedbackRing {
    engines: Vec<Engine>,
}

impl FeedbackRing {
    /// One engine per phase, each seeded with its phase setting
    pub fn new(program: &[Word], phases: &[Word]) -> Self {
        let engines = phases
            .iter()
            .map(|&phase| Engine::new(program, [phase]))
            .collect();
        Self { engines }
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Feed `seed` to the first engine and run the ring until every engine halts
    pub fn run(&mut self, seed: Word) -> Result<Word> {
        let n = self.engines.len();
        if n == 0 {
            return Err(IntcodeError::EmptyPhaseSet);
        }

        let mut pending: Vec<Vec<Word>> = vec![Vec::new(); n];
        pending[0].push(seed);
        let mut turns: VecDeque<usize> = (0..n).collect();
        let mut signal = None;
        // turns in a row where no engine consumed, produced or halted
        let mut idle = 0;

        while let Some(i) = turns.pop_front() {
            let inbox = std::mem::take(&mut pending[i]);
            let fed = !inbox.is_empty();
            let engine = &mut self.engines[i];
            engine.add_input(inbox);

            let state = engine.run()?;
            let outputs = engine.drain_outputs();
            log::trace!("ring turn: engine {} -> {:?}, {} output(s)", i, state, outputs.len());

            let progressed = fed || !outputs.is_empty() || state == ExecState::Halted;
            idle = if progressed { 0 } else { idle + 1 };

            if i == n - 1 {
                if let Some(&last) = outputs.last() {
                    signal = Some(last);
                }
            }
            pending[(i + 1) % n].extend(outputs);

            if state != ExecState::Halted {
                turns.push_back(i);
            }
            if idle > turns.len() {
                return Err(IntcodeError::RingDeadlock);
            }
        }

        log::debug!("ring of {} halted, signal {:?}", n, signal);
        signal.ok_or(IntcodeError::NoSignal)
    }
}

/// Try every ordering of `phases` and return the largest signal with the
/// ordering that produced it
///
/// Orderings are generated lexicographically by position in `phases`; the
/// first ordering reaching the maximum wins.
pub fn max_signal(program: &[Word], phases: &[Word]) -> Result<(Word, Vec<Word>)> {
    if phases.is_empty() {
        return Err(IntcodeError::EmptyPhaseSet);
    }

    let mut best: Option<(Word, Vec<Word>)> = None;
    for order in Permutations::new(phases) {
        let signal = FeedbackRing::new(program, &order).run(0)?;
        if best.as_ref().map_or(true, |(top, _)| signal > *top) {
            log::info!("new best signal {} from phases {:?}", signal, order);
            best = Some((signal, order));
        }
    }
    best.ok_or(IntcodeError::EmptyPhaseSet)
}

/// Lexicographic permutations of a slice (by position, not value)
pub struct Permutations<'a> {
    items: &'a [Word],
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl<'a> Permutations<'a> {
    pub fn new(items: &'a [Word]) -> Self {
        Self {
            items,
            indices: (0..items.len()).collect(),
            started: false,
            done: false,
        }
    }

    /// Step `indices` to the next lexicographic arrangement
    fn advance(&mut self) -> bool {
        let idx = &mut self.indices;
        let Some(i) = (1..idx.len()).rev().find(|&i| idx[i - 1] < idx[i]) else {
            return false;
        };
        let pivot = i - 1;
        let Some(j) = (i..idx.len()).rev().find(|&j| idx[j] > idx[pivot]) else {
            return false;
        };
        idx.swap(pivot, j);
        idx[i..].reverse();
        true
    }
}

impl Iterator for Permutations<'_> {
    type Item = Vec<Word>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started {
            if !self.advance() {
                self.done = true;
                return None;
            }
        } else {
            self.started = true;
        }
        Some(self.indices.iter().map(|&i| self.items[i]).collect())
    }
}
