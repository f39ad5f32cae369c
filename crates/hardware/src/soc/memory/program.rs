//! Instruction Memory.
//!
//! Holds the program as raw instruction words keyed by address. Words are
//! decoded when fetched, so an undecodable word only faults once the program
//! counter reaches it.

use std::collections::BTreeMap;

use crate::common::constants::INSTRUCTION_LENGTH;
use crate::common::error::SimError;
use crate::isa::decode::decode_at;
use crate::isa::instruction::Instruction;

/// Program memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstructionMemory {
    words: BTreeMap<u32, u32>,
}

impl InstructionMemory {
    /// Creates an empty instruction memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instruction memory with `words` laid out contiguously from `base`.
    pub fn from_words(base: u32, words: &[u32]) -> Self {
        let mut mem = Self::new();
        mem.load(base, words);
        mem
    }

    /// Places `words` contiguously starting at `base`, replacing existing words.
    pub fn load(&mut self, base: u32, words: &[u32]) {
        let mut addr = base;
        for &word in words {
            let _ = self.words.insert(addr, word);
            addr = addr.wrapping_add(INSTRUCTION_LENGTH);
        }
    }

    /// Appends `words` directly after the highest occupied address (or at 0 if empty).
    pub fn append(&mut self, words: &[u32]) {
        let next = self
            .words
            .last_key_value()
            .map_or(0, |(&addr, _)| addr.wrapping_add(INSTRUCTION_LENGTH));
        self.load(next, words);
    }

    /// Returns `true` if an instruction word is stored at `addr`.
    pub fn contains(&self, addr: u32) -> bool {
        self.words.contains_key(&addr)
    }

    /// Raw word stored at `addr`.
    pub fn word_at(&self, addr: u32) -> Option<u32> {
        self.words.get(&addr).copied()
    }

    /// Fetches and decodes the instruction at `addr`.
    ///
    /// # Returns
    ///
    /// `None` if no word is stored there, otherwise the decoded instruction or a
    /// `SimError::Decode` naming the address.
    pub fn fetch(&self, addr: u32) -> Option<Result<Instruction, SimError>> {
        self.word_at(addr).map(|word| decode_at(addr, word))
    }

    /// Number of stored instruction words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates `(address, word)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.words.iter().map(|(&addr, &word)| (addr, word))
    }
}
