//! Memory - Auto-growing word store
//!
//! Addresses are non-negative; reads past the materialized region return 0.
//! There is no upper bound. Cells live in a dense region from address 0;
//! writes near its end extend it with zeros, writes far beyond it land in a
//! sparse map. The dense region absorbs sparse cells it grows over.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Word;
use crate::error::{IntcodeError, Result};

/// How far past the dense region a write may land and still extend it
const DENSE_SLACK: usize = 4096;

/// Word-addressed memory, zero by default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<Word>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    sparse: BTreeMap<usize, Word>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory initialized from program text, address 0 upward
    pub fn from_program(program: &[Word]) -> Self {
        Self::from(program.to_vec())
    }

    /// Convert a raw effective address, rejecting negatives
    ///
    /// `pc` is only used for error context.
    pub fn address(raw: Word, pc: usize) -> Result<usize> {
        usize::try_from(raw).map_err(|_| IntcodeError::NegativeAddress { pc, address: raw })
    }

    #[inline]
    pub fn get(&self, addr: usize) -> Word {
        match self.cells.get(addr) {
            Some(&value) => value,
            None => self.sparse.get(&addr).copied().unwrap_or(0),
        }
    }

    #[inline]
    pub fn set(&mut self, addr: usize, value: Word) {
        if addr < self.cells.len() {
            self.cells[addr] = value;
        } else if addr - self.cells.len() < DENSE_SLACK {
            self.grow(addr + 1);
            self.cells[addr] = value;
        } else {
            self.sparse.insert(addr, value);
        }
    }

    /// Extend the dense region to `len` cells, pulling in sparse cells below it
    fn grow(&mut self, len: usize) {
        self.cells.resize(len, 0);
        let high = self.sparse.split_off(&len);
        for (addr, value) in std::mem::replace(&mut self.sparse, high) {
            self.cells[addr] = value;
        }
    }

    /// Read a signed address; fails only below zero
    pub fn read(&self, addr: Word) -> Result<Word> {
        Ok(self.get(Self::address(addr, 0)?))
    }

    /// Write a signed address; fails only below zero
    pub fn write(&mut self, addr: Word, value: Word) -> Result<()> {
        self.set(Self::address(addr, 0)?, value);
        Ok(())
    }

    /// One past the highest materialized address
    pub fn len(&self) -> usize {
        match self.sparse.last_key_value() {
            Some((&addr, _)) => addr + 1,
            None => self.cells.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.sparse.is_empty()
    }

    /// The dense region from address 0
    pub fn as_slice(&self) -> &[Word] {
        &self.cells
    }

    /// Cells written far past the dense region
    pub fn sparse_cells(&self) -> impl Iterator<Item = (usize, Word)> + '_ {
        self.sparse.iter().map(|(&addr, &value)| (addr, value))
    }
}

impl From<Vec<Word>> for Memory {
    fn from(cells: Vec<Word>) -> Self {
        Self {
            cells,
            sparse: BTreeMap::new(),
        }
    }
}
