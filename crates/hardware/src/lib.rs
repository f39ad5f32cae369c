//! RISC-V RV32I pipeline simulator library.
//!
//! This crate implements an instructional, cycle-level RV32I simulator built around a
//! generic pipeline framework:
//! 1. **Core:** Pipeline orchestrator, Fetch/Decode/Execute/Memory/Write-Back stages,
//!    typed pipeline registers, hazard detection, forwarding and flush precedence.
//! 2. **ISA:** Decoding and disassembly of the RV32I base set and the Zicsr instructions.
//! 3. **Memory:** Sparse program and data memories with a bounds-checked data window.
//! 4. **Simulation:** Program loader, simulator driver, configuration and statistics.
//!
//! # Usage
//!
//! ```
//! use archsim_core::{Config, Simulator};
//!
//! // addi x1, x0, 5 ; add x2, x1, x1
//! let program = [0x0050_0093, 0x0010_8133];
//! let mut sim = Simulator::new(&Config::default(), &program).unwrap();
//! sim.run().unwrap();
//! assert_eq!(sim.register(2), 10);
//! ```

/// Common types and constants (encoding fields, memory window, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Processor core (architectural state, pipeline, execution units).
pub mod core;
/// Instruction set (decode, instruction model, disassembly, ABI, RV32I encodings).
pub mod isa;
/// Program loader and simulator driver.
pub mod sim;
/// Program and data memories.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Fault type returned by every fallible operation.
pub use crate::common::SimError;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Programmer-visible machine state.
pub use crate::core::ArchitecturalState;
/// Pipeline orchestrator.
pub use crate::core::Pipeline;
/// Top-level simulator; owns the state and the pipeline.
pub use crate::sim::Simulator;
