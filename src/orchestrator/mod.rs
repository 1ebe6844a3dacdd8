//! Orchestrator - Composition patterns over one or more engines
//!
//! - [`run`]: a single engine run to completion with pre-seeded inputs
//! - [`ring`]: engines wired output-to-input in a ring, stepped
//!   cooperatively until all halt, plus the phase-permutation search
//! - [`frontier`]: breadth-first exploration of a world simulated by the VM,
//!   forking one engine per candidate move from a parent snapshot
//!
//! Exactly one engine executes at a time. Engines never share memory or
//! queues; values cross between them only as copies.

pub mod frontier;
pub mod ring;
pub mod run;

pub use frontier::{Cell, Direction, Exploration, Explorer, Point, Status, Tile};
pub use ring::{max_signal, FeedbackRing, Permutations};
pub use run::{find_noun_verb, run_to_completion, run_with_noun_verb};
