//! System-on-Chip (SoC) Components.
//!
//! This module organizes the memories of the simulated machine: a bounded,
//! sparse data memory and the program's instruction memory.

/// Data and instruction memory implementations.
pub mod memory;

pub use memory::{DataMemory, InstructionMemory};
