//! Execution units and functional components.
//!
//! This module contains the processor's execution units: the integer ALU, the
//! branch resolution unit, and the load/store unit.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Branch Resolution Unit: branch conditions and control-flow targets.
pub mod bru;

/// Load/Store Unit for memory access operations.
pub mod lsu;
