//! Instruction pipeline implementation.
//!
//! This module contains the generic pipeline framework and the five-stage RV32I pipeline
//! built on it. It includes the following components:
//! 1. **Engine:** The orchestrator that runs one cycle per step and applies flush precedence.
//! 2. **Hazards:** Detection of data hazards and operand forwarding.
//! 3. **Latches:** Typed pipeline registers passed between stages.
//! 4. **Signals:** Control signals generated during instruction decoding.
//! 5. **Stages:** Implementation of Fetch, Decode, Execute, Memory, and Writeback stages.
//! 6. **Traits:** The common interface every stage implements.

/// Pipeline orchestrator and stage dispatch.
pub mod engine;

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Inter-stage pipeline registers (IF/ID, ID/EX, EX/MEM, MEM/WB, WB) and flush signals.
pub mod latches;

/// Control signals generated during instruction decode.
pub mod signals;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

/// Traits for pipeline stage components.
pub mod traits;

pub use engine::{Pipeline, Stage};
pub use latches::{FlushKind, FlushSignal, PipelineRegister};
pub use traits::PipelineStage;
