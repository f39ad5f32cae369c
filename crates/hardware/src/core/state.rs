//! Architectural State.
//!
//! This module defines `ArchitecturalState`, the programmer-visible machine state
//! that stage behaviors read and mutate. It holds:
//! 1. **Registers:** The integer register file and the CSR file.
//! 2. **Memories:** Data memory and the program's instruction memory.
//! 3. **Program Counter:** The address of the next instruction to fetch.
//! 4. **Statistics:** Performance counters updated as instructions move through the stages.
//!
//! The pipeline orchestrator never touches register or memory contents; only
//! stage behaviors do. Drivers use the read accessors for display.

use crate::common::error::SimError;
use crate::config::Config;
use crate::core::arch::csr::CsrFile;
use crate::core::arch::gpr::Gpr;
use crate::isa::instruction::Instruction;
use crate::soc::memory::{DataMemory, InstructionMemory};
use crate::stats::SimStats;

/// Programmer-visible machine state.
#[derive(Clone, Debug, Default)]
pub struct ArchitecturalState {
    /// Integer register file.
    pub registers: Gpr,
    /// Control and status registers.
    pub csrs: CsrFile,
    /// Data memory.
    pub memory: DataMemory,
    /// Program memory.
    pub instruction_memory: InstructionMemory,
    /// Address of the next instruction to fetch.
    pub program_counter: u32,
    /// Performance counters.
    pub stats: SimStats,
}

impl ArchitecturalState {
    /// Creates an empty state with default memory window and PC 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state holding `program` at `config.general.start_pc`.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the start PC and the data memory window.
    /// * `program` - Encoded instruction words, laid out contiguously.
    pub fn with_program(config: &Config, program: &[u32]) -> Self {
        Self {
            memory: DataMemory::from_config(&config.memory),
            instruction_memory: InstructionMemory::from_words(config.general.start_pc, program),
            program_counter: config.general.start_pc,
            ..Self::default()
        }
    }

    /// Returns `true` if an instruction is stored at the current program counter.
    pub fn instruction_at_pc(&self) -> bool {
        self.instruction_memory.contains(self.program_counter)
    }

    /// Fetches the instruction at `addr`, if any.
    pub fn fetch(&self, addr: u32) -> Option<Result<Instruction, SimError>> {
        self.instruction_memory.fetch(addr)
    }

    /// Value of register `idx`.
    pub fn register(&self, idx: usize) -> u32 {
        self.registers.read(idx)
    }

    /// Current program counter.
    pub const fn pc(&self) -> u32 {
        self.program_counter
    }

    /// Reads a word of data memory for display, or `None` if outside the window.
    pub fn memory_word(&self, addr: u32) -> Option<u32> {
        self.memory.load_word(addr).ok()
    }
}
