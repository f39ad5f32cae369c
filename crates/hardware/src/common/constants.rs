//! Global Simulator Constants.
//!
//! This module defines constants used across the simulator. It includes:
//! 1. **Instruction Constants:** Instruction width and field masks for decoding.
//! 2. **Register Constants:** Register file and CSR file dimensions.
//! 3. **Memory Constants:** The default data memory window.

/// Size of a base RV32I instruction in bytes.
pub const INSTRUCTION_LENGTH: u32 = 4;

/// Bit mask for extracting the opcode field from a RISC-V instruction.
pub const OPCODE_MASK: u32 = 0x7F;

/// Bit mask for extracting a register index field.
pub const REG_MASK: u32 = 0x1F;

/// Bit position shift for the destination register (rd) field.
pub const RD_SHIFT: u32 = 7;

/// Bit position shift for the first source register (rs1) field.
pub const RS1_SHIFT: u32 = 15;

/// Bit position shift for the second source register (rs2) field.
pub const RS2_SHIFT: u32 = 20;

/// Bit position shift for the CSR address field.
pub const CSR_SHIFT: u32 = 20;

/// Bit mask for a 12-bit CSR address.
pub const CSR_MASK: u32 = 0xFFF;

/// Number of integer registers in the RV32I register file.
pub const REGISTER_COUNT: usize = 32;

/// Number of addressable control and status registers.
pub const CSR_COUNT: usize = 4096;

/// Lowest valid data memory address (16 KiB).
///
/// Addresses below this window are reserved for instructions.
pub const DATA_MEMORY_BASE: u32 = 0x4000;

/// Size of the data memory window, reaching up to the last 32-bit address.
pub const DATA_MEMORY_SIZE: u64 = (1 << 32) - DATA_MEMORY_BASE as u64;
