//! Simulator: owns the architectural state and the pipeline side-by-side.
//!
//! The simulator is the driver-facing entry point. It builds the machine from a
//! `Config` and a program, counts cycles, enforces the cycle budget, and halts
//! forward progress after the first fault.

use crate::common::error::SimError;
use crate::config::Config;
use crate::core::arch::gpr::Gpr;
use crate::core::pipeline::Pipeline;
use crate::core::state::ArchitecturalState;
use crate::sim::loader::Program;
use crate::stats::SimStats;

/// Top-level simulator: architectural state + pipeline.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// Architectural state (registers, memories, PC, stats).
    pub state: ArchitecturalState,
    /// Pipeline selected by the configuration.
    pub pipeline: Pipeline,
    max_cycles: u64,
}

impl Simulator {
    /// Creates a simulator running `program` from `config.general.start_pc`.
    ///
    /// # Arguments
    ///
    /// * `config` - Simulator configuration.
    /// * `program` - Encoded instruction words, laid out contiguously.
    ///
    /// # Returns
    ///
    /// `SimError::Configuration` if the pipeline cannot be built.
    pub fn new(config: &Config, program: &[u32]) -> Result<Self, SimError> {
        Self::from_state(config, ArchitecturalState::with_program(config, program))
    }

    /// Creates a simulator for a loaded program image.
    pub fn from_program(config: &Config, program: &Program) -> Result<Self, SimError> {
        let mut state = ArchitecturalState::with_program(config, &[]);
        program.place(&mut state)?;
        Self::from_state(config, state)
    }

    /// Creates a simulator around an existing architectural state.
    pub fn from_state(config: &Config, state: ArchitecturalState) -> Result<Self, SimError> {
        Ok(Self {
            state,
            pipeline: Pipeline::from_config(config)?,
            max_cycles: config.general.max_cycles,
        })
    }

    /// Advances the simulator by one clock cycle.
    ///
    /// # Returns
    ///
    /// The fault raised during this cycle. Once a fault occurred, every later
    /// call returns it again without advancing.
    pub fn step(&mut self) -> Result<(), SimError> {
        if let Some(fault) = self.pipeline.fault() {
            return Err(fault.clone());
        }
        self.state.stats.cycles += 1;
        self.pipeline.step(&mut self.state).inspect_err(|e| {
            tracing::warn!(cycle = self.state.stats.cycles, error = %e, "simulation halted");
        })
    }

    /// Runs until the pipeline is done.
    ///
    /// # Returns
    ///
    /// The first fault, or `SimError::CycleLimit` if `max_cycles` (when nonzero)
    /// cycles elapsed first.
    pub fn run(&mut self) -> Result<(), SimError> {
        while !self.is_done() {
            if self.max_cycles != 0 && self.state.stats.cycles >= self.max_cycles {
                return Err(SimError::CycleLimit {
                    cycles: self.state.stats.cycles,
                });
            }
            self.step()?;
        }
        tracing::debug!(
            cycles = self.state.stats.cycles,
            retired = self.state.stats.instructions_retired,
            "simulation finished"
        );
        Ok(())
    }

    /// Returns `true` if no further work can enter the pipeline.
    pub fn is_done(&self) -> bool {
        self.pipeline.is_done(&self.state)
    }

    /// Returns `true` if no instruction is in flight.
    pub fn is_empty(&self) -> bool {
        self.pipeline.is_empty()
    }

    /// The fault that halted the run, if any.
    pub const fn fault(&self) -> Option<&SimError> {
        self.pipeline.fault()
    }

    /// Value of register `idx`.
    pub fn register(&self, idx: usize) -> u32 {
        self.state.register(idx)
    }

    /// The integer register file.
    pub const fn registers(&self) -> &Gpr {
        &self.state.registers
    }

    /// Current program counter.
    pub const fn pc(&self) -> u32 {
        self.state.pc()
    }

    /// Reads a word of data memory, or `None` if outside the window.
    pub fn memory_word(&self, addr: u32) -> Option<u32> {
        self.state.memory_word(addr)
    }

    /// Performance counters.
    pub const fn stats(&self) -> &SimStats {
        &self.state.stats
    }
}
