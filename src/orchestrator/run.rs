//! Run-to-completion helpers

use crate::error::{IntcodeError, Result};
use crate::vm::{Engine, ExecState, Word};

/// Run `program` with every input supplied up front and collect its outputs
///
/// Stalling on input after the supplied values are used up is an error.
pub fn run_to_completion(program: &[Word], inputs: &[Word]) -> Result<Vec<Word>> {
    let mut engine = Engine::new(program, inputs.iter().copied());
    match engine.run()? {
        ExecState::Halted => Ok(engine.drain_outputs()),
        _ => Err(IntcodeError::InputExhausted { pc: engine.pc() }),
    }
}

/// Patch addresses 1 and 2, run to halt, return address 0
pub fn run_with_noun_verb(program: &[Word], noun: Word, verb: Word) -> Result<Word> {
    let mut engine = Engine::new(program, []);
    engine.poke(1, noun);
    engine.poke(2, verb);
    match engine.run()? {
        ExecState::Halted => Ok(engine.peek(0)),
        _ => Err(IntcodeError::InputExhausted { pc: engine.pc() }),
    }
}

/// Search nouns and verbs in 0..=99 for the pair producing `target`
///
/// Pairs whose run faults are skipped.
pub fn find_noun_verb(program: &[Word], target: Word) -> Option<(Word, Word)> {
    (0..=99)
        .flat_map(|noun| (0..=99).map(move |verb| (noun, verb)))
        .find(|&(noun, verb)| {
            run_with_noun_verb(program, noun, verb).map_or(false, |value| value == target)
        })
}
