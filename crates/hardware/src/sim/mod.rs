//! Simulation driver and program loading.
//!
//! Provides the `Simulator` that owns a machine for the duration of a run, and
//! the loader that turns program files into images for it.

/// Flat binary and ELF program loading.
pub mod loader;

/// Top-level simulator (state + pipeline, run loop, fault latching).
pub mod simulator;

pub use loader::Program;
pub use simulator::Simulator;
