//! Common utilities and types used throughout the pipeline simulator.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Constants:** Instruction, register file, and memory window constants.
//! 2. **Error Handling:** The simulator fault taxonomy reported to the driver.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types reported by the simulator core.
pub mod error;

pub use constants::{INSTRUCTION_LENGTH, REGISTER_COUNT};
pub use error::{ExecutionError, SimError};
