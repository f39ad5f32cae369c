//! Core processor implementation.
//!
//! This module contains the processor model: the architectural state the program
//! sees, the instruction pipeline that advances it, and the functional units the
//! pipeline stages use.

/// Architecture-specific components (integer register file, CSR file).
pub mod arch;

/// Instruction pipeline implementation (engine, stages, latches, hazards, signals).
pub mod pipeline;

/// Programmer-visible machine state shared by the stages.
pub mod state;

/// Execution units (ALU, branch resolution, LSU).
pub mod units;

pub use self::pipeline::Pipeline;
pub use self::state::ArchitecturalState;
