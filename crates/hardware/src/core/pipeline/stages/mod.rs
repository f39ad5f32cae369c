//! Pipeline stage implementations.
//!
//! This module contains the individual implementations for the five stages of the
//! instruction pipeline, plus the chained single-cycle stage. It includes:
//! 1. **Fetch:** Retrieves instructions from program memory based on the PC.
//! 2. **Decode:** Reads operands, generates control signals and detects data hazards.
//! 3. **Execute:** Performs ALU operations and resolves branch targets.
//! 4. **Memory:** Handles data load, store and CSR operations.
//! 5. **Writeback:** Commits results to the register file.
//! 6. **Single-Cycle:** All of the above for one instruction per cycle.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Non-pipelined stage chaining all five behaviors.
pub mod single_cycle;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage (ID stage).
pub use decode::DecodeStage;
/// Execute stage (EX stage).
pub use execute::ExecuteStage;
/// Fetch stage (IF stage).
pub use fetch::FetchStage;
/// Memory stage (MEM stage).
pub use memory::MemoryStage;
/// Single-cycle stage.
pub use single_cycle::SingleCycleStage;
/// Writeback stage (WB stage).
pub use writeback::WriteBackStage;
