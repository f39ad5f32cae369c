//! Instruction Disassembler for RV32I.
//!
//! Renders decoded instructions as assembler text for fault reports, trace
//! logging, and test diagnostics.
//!
//! # Usage
//!
//! ```
//! use archsim_core::isa::disasm::disassemble;
//! let text = disassemble(0x00A00513); // ADDI x10, x0, 10
//! assert_eq!(text, "addi x10, x0, 10");
//! ```

use std::fmt;

use crate::isa::decode::decode;
use crate::isa::instruction::{CsrSource, Instruction};

/// Disassembles a raw instruction word.
///
/// # Returns
///
/// The assembler text, or `unknown (0x........)` for an undecodable word.
pub fn disassemble(inst: u32) -> String {
    decode(inst).map_or_else(|| format!("unknown ({inst:#010x})"), |i| i.to_string())
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mn = self.mnemonic();
        match *self {
            Self::Op { rd, rs1, rs2, .. } => write!(f, "{mn} x{rd}, x{rs1}, x{rs2}"),
            Self::OpImm { rd, rs1, imm, .. } => write!(f, "{mn} x{rd}, x{rs1}, {imm}"),
            Self::Load { rd, rs1, imm, .. } => write!(f, "{mn} x{rd}, {imm}(x{rs1})"),
            Self::Store { rs1, rs2, imm, .. } => write!(f, "{mn} x{rs2}, {imm}(x{rs1})"),
            Self::Branch { rs1, rs2, imm, .. } => write!(f, "{mn} x{rs1}, x{rs2}, {imm}"),
            Self::Lui { rd, imm } | Self::Auipc { rd, imm } => {
                write!(f, "{mn} x{rd}, {:#x}", (imm as u32) >> 12)
            }
            Self::Jal { rd, imm } => write!(f, "{mn} x{rd}, {imm}"),
            Self::Jalr { rd, rs1, imm } => write!(f, "{mn} x{rd}, {imm}(x{rs1})"),
            Self::Csr { rd, csr, src, .. } => match src {
                CsrSource::Reg(rs1) => write!(f, "{mn} x{rd}, {csr:#x}, x{rs1}"),
                CsrSource::Imm(zimm) => write!(f, "{mn} x{rd}, {csr:#x}, {zimm}"),
            },
            Self::Fence | Self::Ecall | Self::Ebreak => f.write_str(mn),
        }
    }
}
