//! Simulator fault definitions.
//!
//! This module defines the error handling for the simulator core. It provides:
//! 1. **Driver-facing faults:** `SimError`, every failure the core reports to its driver.
//! 2. **Execution faults:** `ExecutionError`, what went wrong while an instruction executed.
//!
//! No fault is retried or swallowed; the driver decides whether to restart a fresh run.

use thiserror::Error;

/// Failure raised while a single instruction was being executed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// A load or store touched a byte outside the configured data memory window.
    ///
    /// `min` and `max` are the inclusive bounds of the window.
    #[error("memory address {address:#010x} is outside the data memory range [{min:#x}, {max:#x}]")]
    MemoryAccess {
        /// First byte address that fell outside the window.
        address: u32,
        /// Lowest valid address.
        min: u32,
        /// Highest valid address.
        max: u32,
    },

    /// The instruction decodes but has no behavior in this simulator.
    #[error("{0} is not supported")]
    Unsupported(&'static str),

    /// A CSR instruction tried to modify a read-only CSR.
    #[error("csr {0:#05x} is read-only")]
    ReadOnlyCsr(u16),
}

/// Errors reported by the simulator core to its driver.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// The word at `address` does not match any supported RV32I encoding.
    #[error("cannot decode instruction word {word:#010x} at address {address:#x}")]
    Decode {
        /// Address the word was fetched from.
        address: u32,
        /// The raw instruction word.
        word: u32,
    },

    /// An instruction failed while executing.
    #[error("instruction `{instruction}` at address {address:#x} failed: {source}")]
    Execution {
        /// Address of the failing instruction.
        address: u32,
        /// Disassembly of the failing instruction.
        instruction: String,
        /// Underlying failure.
        source: ExecutionError,
    },

    /// The pipeline or configuration is inconsistent and cannot be built.
    #[error("invalid pipeline configuration: {0}")]
    Configuration(String),

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// The program could not be read or parsed.
    #[error("failed to load program: {0}")]
    Load(String),

    /// The run exceeded its cycle budget without finishing.
    #[error("cycle limit of {cycles} reached before the program finished")]
    CycleLimit {
        /// Number of cycles executed.
        cycles: u64,
    },
}

impl SimError {
    /// Returns the instruction address associated with this fault, if any.
    pub const fn address(&self) -> Option<u32> {
        match self {
            Self::Decode { address, .. } | Self::Execution { address, .. } => Some(*address),
            _ => None,
        }
    }
}
