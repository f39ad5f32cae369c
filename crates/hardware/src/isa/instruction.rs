//! Instruction encoding fields and the decoded instruction model.
//!
//! Provides bit extraction helpers for raw 32-bit encodings and the
//! `Instruction` tagged variant that the pipeline stages consume. It provides:
//! 1. **Field Extraction:** `InstructionBits` for opcode, register, and function fields.
//! 2. **Instruction Model:** One variant per RV32I operation class, immutable once built.
//! 3. **Access Pattern:** Source/destination registers and immediate for hazard checks.
//! 4. **Control Signals:** The datapath configuration each instruction requires.

use crate::common::constants::{
    CSR_MASK, CSR_SHIFT, INSTRUCTION_LENGTH, OPCODE_MASK, RD_SHIFT, REG_MASK, RS1_SHIFT, RS2_SHIFT,
};
use crate::core::pipeline::signals::{
    AluOp, BranchCond, ControlSignals, CsrOp, MemWidth, OpASrc, OpBSrc, WbSrc,
};

/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    ///
    /// Used to distinguish between different operations within the same opcode.
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    ///
    /// Distinguishes standard and alternate encodings (e.g., ADD vs SUB).
    fn funct7(&self) -> u32;

    /// Extracts the CSR address field (bits 20-31).
    fn csr(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline]
    fn rd(&self) -> usize {
        ((self >> RD_SHIFT) & REG_MASK) as usize
    }

    #[inline]
    fn rs1(&self) -> usize {
        ((self >> RS1_SHIFT) & REG_MASK) as usize
    }

    #[inline]
    fn rs2(&self) -> usize {
        ((self >> RS2_SHIFT) & REG_MASK) as usize
    }

    #[inline]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }

    #[inline]
    fn csr(&self) -> u32 {
        (self >> CSR_SHIFT) & CSR_MASK
    }
}

/// Operand of a CSR instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsrSource {
    /// Register form (`csrrw`, `csrrs`, `csrrc`).
    Reg(usize),
    /// Immediate form with a 5-bit zero-extended immediate (`csrrwi`, ...).
    Imm(u32),
}

/// A decoded RV32I instruction.
///
/// Immediates are already sign-extended. Branch and jump offsets are in bytes,
/// and `Lui`/`Auipc` carry the shifted upper immediate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Register-register arithmetic (R-type).
    Op {
        /// ALU operation.
        op: AluOp,
        /// Destination register.
        rd: usize,
        /// First source register.
        rs1: usize,
        /// Second source register.
        rs2: usize,
    },
    /// Register-immediate arithmetic, including shifts by `shamt` (I-type).
    OpImm {
        /// ALU operation.
        op: AluOp,
        /// Destination register.
        rd: usize,
        /// Source register.
        rs1: usize,
        /// Immediate (shift amount for shifts).
        imm: i32,
    },
    /// Load from data memory (I-type).
    Load {
        /// Access width.
        width: MemWidth,
        /// Sign-extend the loaded value.
        signed: bool,
        /// Destination register.
        rd: usize,
        /// Base address register.
        rs1: usize,
        /// Address offset.
        imm: i32,
    },
    /// Store to data memory (S-type).
    Store {
        /// Access width.
        width: MemWidth,
        /// Base address register.
        rs1: usize,
        /// Register holding the stored value.
        rs2: usize,
        /// Address offset.
        imm: i32,
    },
    /// Conditional branch (B-type).
    Branch {
        /// Comparison.
        cond: BranchCond,
        /// First compared register.
        rs1: usize,
        /// Second compared register.
        rs2: usize,
        /// Byte offset from the branch address.
        imm: i32,
    },
    /// Load upper immediate (U-type).
    Lui {
        /// Destination register.
        rd: usize,
        /// Upper immediate, already shifted into bits 31-12.
        imm: i32,
    },
    /// Add upper immediate to PC (U-type).
    Auipc {
        /// Destination register.
        rd: usize,
        /// Upper immediate, already shifted into bits 31-12.
        imm: i32,
    },
    /// Jump and link (J-type).
    Jal {
        /// Link register.
        rd: usize,
        /// Byte offset from the jump address.
        imm: i32,
    },
    /// Jump and link register (I-type).
    Jalr {
        /// Link register.
        rd: usize,
        /// Base register.
        rs1: usize,
        /// Offset added to `rs1`.
        imm: i32,
    },
    /// CSR read-modify-write.
    Csr {
        /// Modification applied to the CSR.
        op: CsrOp,
        /// Destination for the old CSR value.
        rd: usize,
        /// CSR address.
        csr: u16,
        /// Register or immediate operand.
        src: CsrSource,
    },
    /// Memory ordering fence (no effect in an in-order single-hart model).
    Fence,
    /// Environment call.
    Ecall,
    /// Environment break.
    Ebreak,
}

impl Instruction {
    /// Size of the instruction in bytes.
    pub const fn length(&self) -> u32 {
        INSTRUCTION_LENGTH
    }

    /// First source register read by this instruction, if any.
    pub const fn rs1(&self) -> Option<usize> {
        match *self {
            Self::Op { rs1, .. }
            | Self::OpImm { rs1, .. }
            | Self::Load { rs1, .. }
            | Self::Store { rs1, .. }
            | Self::Branch { rs1, .. }
            | Self::Jalr { rs1, .. }
            | Self::Csr {
                src: CsrSource::Reg(rs1),
                ..
            } => Some(rs1),
            _ => None,
        }
    }

    /// Second source register read by this instruction, if any.
    pub const fn rs2(&self) -> Option<usize> {
        match *self {
            Self::Op { rs2, .. } | Self::Store { rs2, .. } | Self::Branch { rs2, .. } => Some(rs2),
            _ => None,
        }
    }

    /// Destination register written by this instruction, if any.
    ///
    /// `Some(0)` is possible; writes to `x0` are discarded at write-back.
    pub const fn rd(&self) -> Option<usize> {
        match *self {
            Self::Op { rd, .. }
            | Self::OpImm { rd, .. }
            | Self::Load { rd, .. }
            | Self::Lui { rd, .. }
            | Self::Auipc { rd, .. }
            | Self::Jal { rd, .. }
            | Self::Jalr { rd, .. }
            | Self::Csr { rd, .. } => Some(rd),
            _ => None,
        }
    }

    /// Destination register that will actually change, excluding `x0`.
    pub const fn write_register(&self) -> Option<usize> {
        match self.rd() {
            Some(0) | None => None,
            rd => rd,
        }
    }

    /// Sign-extended immediate operand, if the encoding has one.
    pub const fn imm(&self) -> Option<i32> {
        match *self {
            Self::OpImm { imm, .. }
            | Self::Load { imm, .. }
            | Self::Store { imm, .. }
            | Self::Branch { imm, .. }
            | Self::Lui { imm, .. }
            | Self::Auipc { imm, .. }
            | Self::Jal { imm, .. }
            | Self::Jalr { imm, .. } => Some(imm),
            Self::Csr {
                src: CsrSource::Imm(zimm),
                ..
            } => Some(zimm as i32),
            _ => None,
        }
    }

    /// Returns `true` if this instruction reads register `reg` (ignoring `x0`).
    pub fn reads(&self, reg: usize) -> bool {
        reg != 0 && (self.rs1() == Some(reg) || self.rs2() == Some(reg))
    }

    /// Assembler mnemonic.
    pub const fn mnemonic(&self) -> &'static str {
        match *self {
            Self::Op { op, .. } => match op {
                AluOp::Add => "add",
                AluOp::Sub => "sub",
                AluOp::Sll => "sll",
                AluOp::Slt => "slt",
                AluOp::Sltu => "sltu",
                AluOp::Xor => "xor",
                AluOp::Srl => "srl",
                AluOp::Sra => "sra",
                AluOp::Or => "or",
                AluOp::And => "and",
            },
            Self::OpImm { op, .. } => match op {
                AluOp::Add | AluOp::Sub => "addi",
                AluOp::Sll => "slli",
                AluOp::Slt => "slti",
                AluOp::Sltu => "sltiu",
                AluOp::Xor => "xori",
                AluOp::Srl => "srli",
                AluOp::Sra => "srai",
                AluOp::Or => "ori",
                AluOp::And => "andi",
            },
            Self::Load { width, signed, .. } => match (width, signed) {
                (MemWidth::Byte, true) => "lb",
                (MemWidth::Byte, false) => "lbu",
                (MemWidth::Half, true) => "lh",
                (MemWidth::Half, false) => "lhu",
                _ => "lw",
            },
            Self::Store { width, .. } => match width {
                MemWidth::Byte => "sb",
                MemWidth::Half => "sh",
                _ => "sw",
            },
            Self::Branch { cond, .. } => match cond {
                BranchCond::Eq => "beq",
                BranchCond::Ne => "bne",
                BranchCond::Lt => "blt",
                BranchCond::Ge => "bge",
                BranchCond::Ltu => "bltu",
                BranchCond::Geu => "bgeu",
            },
            Self::Lui { .. } => "lui",
            Self::Auipc { .. } => "auipc",
            Self::Jal { .. } => "jal",
            Self::Jalr { .. } => "jalr",
            Self::Csr { op, src, .. } => match (op, src) {
                (CsrOp::Rw | CsrOp::None, CsrSource::Reg(_)) => "csrrw",
                (CsrOp::Rs, CsrSource::Reg(_)) => "csrrs",
                (CsrOp::Rc, CsrSource::Reg(_)) => "csrrc",
                (CsrOp::Rw | CsrOp::None, CsrSource::Imm(_)) => "csrrwi",
                (CsrOp::Rs, CsrSource::Imm(_)) => "csrrsi",
                (CsrOp::Rc, CsrSource::Imm(_)) => "csrrci",
            },
            Self::Fence => "fence",
            Self::Ecall => "ecall",
            Self::Ebreak => "ebreak",
        }
    }

    /// Generates the control signals that steer this instruction through the datapath.
    ///
    /// # Returns
    ///
    /// The `ControlSignals` produced by the control unit in Decode.
    pub fn control_signals(&self) -> ControlSignals {
        let base = ControlSignals::default();
        match *self {
            Self::Op { op, .. } => ControlSignals {
                reg_write: true,
                alu: op,
                b_src: OpBSrc::Reg2,
                ..base
            },
            Self::OpImm { op, .. } => ControlSignals {
                reg_write: true,
                alu: op,
                ..base
            },
            Self::Load { width, signed, .. } => ControlSignals {
                reg_write: true,
                mem_read: true,
                width,
                signed_load: signed,
                wb_src: WbSrc::Memory,
                ..base
            },
            Self::Store { width, .. } => ControlSignals {
                mem_write: true,
                width,
                ..base
            },
            Self::Branch { cond, .. } => ControlSignals {
                branch: true,
                cond,
                alu: AluOp::Sub,
                b_src: OpBSrc::Reg2,
                ..base
            },
            Self::Lui { .. } => ControlSignals {
                reg_write: true,
                a_src: OpASrc::Zero,
                wb_src: WbSrc::Imm,
                ..base
            },
            Self::Auipc { .. } => ControlSignals {
                reg_write: true,
                a_src: OpASrc::Pc,
                ..base
            },
            Self::Jal { .. } => ControlSignals {
                reg_write: true,
                jump: true,
                a_src: OpASrc::Pc,
                wb_src: WbSrc::PcPlusLength,
                ..base
            },
            Self::Jalr { .. } => ControlSignals {
                reg_write: true,
                jump: true,
                alu_to_pc: true,
                wb_src: WbSrc::PcPlusLength,
                ..base
            },
            Self::Csr { op, csr, src, .. } => {
                let (a_src, b_src, nonzero) = match src {
                    CsrSource::Reg(rs1) => (OpASrc::Reg1, OpBSrc::Zero, rs1 != 0),
                    CsrSource::Imm(zimm) => (OpASrc::Zero, OpBSrc::Imm, zimm != 0),
                };
                ControlSignals {
                    reg_write: true,
                    a_src,
                    b_src,
                    wb_src: WbSrc::Memory,
                    csr_op: op,
                    csr_addr: csr,
                    csr_write: matches!(op, CsrOp::Rw) || nonzero,
                    ..base
                }
            }
            Self::Fence | Self::Ecall | Self::Ebreak => ControlSignals {
                a_src: OpASrc::Zero,
                b_src: OpBSrc::Zero,
                ..base
            },
        }
    }
}
