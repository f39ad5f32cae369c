//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains definitions for opcodes, function codes, the decoded instruction
//! model, and decoding logic for the RV32I base integer instruction set.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Instruction decoding logic for all RV32I instruction formats.
pub mod decode;

/// Instruction disassembler for traces and fault reports.
pub mod disasm;

/// Instruction encoding fields and the decoded instruction model.
pub mod instruction;

/// Base integer instruction set (32-bit RISC-V core instructions).
pub mod rv32i;

pub use decode::decode;
pub use instruction::Instruction;
