//! RISC-V Instruction Decoder.
//!
//! This module handles the decoding of 32-bit RV32I encodings into the
//! `Instruction` model. It extracts opcodes, register indices, and function
//! codes, and sign-extends the immediate values for all instruction formats
//! (R, I, S, B, U, J). Encodings outside RV32I decode to `None`.

use crate::common::error::SimError;
use crate::core::pipeline::signals::{AluOp, BranchCond, CsrOp, MemWidth};
use crate::isa::instruction::{CsrSource, Instruction, InstructionBits};
use crate::isa::rv32i::{funct3, funct7, opcodes};

/// Total width of a RISC-V instruction in bits.
const INSTRUCTION_WIDTH: u32 = 32;

/// Bit shift for extracting I-Type immediate field (bits 20-31).
///
/// I-Type format: `imm[11:0] | rs1 | funct3 | rd | opcode`
/// The immediate occupies the upper 12 bits and is sign-extended.
const I_IMM_SHIFT: u32 = 20;

/// Bit shift for extracting S-Type immediate low field (bits 7-11).
///
/// S-Type format: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`
/// The immediate is split across two non-contiguous fields.
const S_IMM_LOW_SHIFT: u32 = 7;

/// Bit mask for S-Type immediate low field (5 bits: imm[4:0]).
const S_IMM_LOW_MASK: u32 = 0x1F;

/// Bit shift for extracting S-Type immediate high field (bits 25-31).
const S_IMM_HIGH_SHIFT: u32 = 25;

/// Bit mask for S-Type immediate high field (7 bits: imm[11:5]).
const S_IMM_HIGH_MASK: u32 = 0x7F;

/// Bit shift for combining S-Type immediate fields after extraction.
const S_IMM_COMBINED_SHIFT: u32 = 5;

/// Total number of bits in S-Type immediate (12 bits).
const S_IMM_BITS: u32 = 12;

/// Bit shift for extracting B-Type immediate bit 11 (bit 7 of instruction).
///
/// B-Type format: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`
/// The immediate represents a signed offset in multiples of 2 (even addresses only).
const B_IMM_11_SHIFT: u32 = 7;

/// Bit mask for B-Type immediate bit 11.
const B_IMM_11_MASK: u32 = 1;

/// Bit shift for extracting B-Type immediate bits 4-1 (bits 8-11 of instruction).
const B_IMM_4_1_SHIFT: u32 = 8;

/// Bit mask for B-Type immediate bits 4-1 (4 bits).
const B_IMM_4_1_MASK: u32 = 0xF;

/// Bit shift for extracting B-Type immediate bits 10-5 (bits 25-30 of instruction).
const B_IMM_10_5_SHIFT: u32 = 25;

/// Bit mask for B-Type immediate bits 10-5 (6 bits).
const B_IMM_10_5_MASK: u32 = 0x3F;

/// Bit shift for extracting B-Type immediate bit 12 (bit 31 of instruction).
const B_IMM_12_SHIFT: u32 = 31;

/// Bit mask for B-Type immediate bit 12 (sign bit).
const B_IMM_12_MASK: u32 = 1;

/// Total number of bits in B-Type immediate (13 bits, sign-extended).
const B_IMM_BITS: u32 = 13;

/// Bit position of bit 12 in the reconstructed B-Type immediate.
const B_IMM_12_POS: u32 = 12;

/// Bit position of bit 11 in the reconstructed B-Type immediate.
const B_IMM_11_POS: u32 = 11;

/// Bit position of bits 10-5 in the reconstructed B-Type immediate.
const B_IMM_10_5_POS: u32 = 5;

/// Bit position of bits 4-1 in the reconstructed B-Type immediate.
const B_IMM_4_1_POS: u32 = 1;

/// Bit mask for extracting U-Type immediate field (bits 12-31).
///
/// U-Type format: `imm[31:12] | rd | opcode`
/// The immediate is left-shifted by 12 bits in the final value (no sign extension).
const U_IMM_MASK: u32 = 0xFFFFF000;

/// Bit shift for extracting J-Type immediate bits 19-12 (bits 12-19 of instruction).
///
/// J-Type format: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`
/// The immediate represents a signed offset in multiples of 2 (even addresses only).
const J_IMM_19_12_SHIFT: u32 = 12;

/// Bit mask for J-Type immediate bits 19-12 (8 bits).
const J_IMM_19_12_MASK: u32 = 0xFF;

/// Bit shift for extracting J-Type immediate bit 11 (bit 20 of instruction).
const J_IMM_11_SHIFT: u32 = 20;

/// Bit mask for J-Type immediate bit 11.
const J_IMM_11_MASK: u32 = 1;

/// Bit shift for extracting J-Type immediate bits 10-1 (bits 21-30 of instruction).
const J_IMM_10_1_SHIFT: u32 = 21;

/// Bit mask for J-Type immediate bits 10-1 (10 bits).
const J_IMM_10_1_MASK: u32 = 0x3FF;

/// Bit shift for extracting J-Type immediate bit 20 (bit 31 of instruction).
const J_IMM_20_SHIFT: u32 = 31;

/// Bit mask for J-Type immediate bit 20 (sign bit).
const J_IMM_20_MASK: u32 = 1;

/// Total number of bits in J-Type immediate (21 bits, sign-extended).
const J_IMM_BITS: u32 = 21;

/// Bit position of bit 20 in the reconstructed J-Type immediate.
const J_IMM_20_POS: u32 = 20;

/// Bit position of bits 19-12 in the reconstructed J-Type immediate.
const J_IMM_19_12_POS: u32 = 12;

/// Bit position of bit 11 in the reconstructed J-Type immediate.
const J_IMM_11_POS: u32 = 11;

/// Bit position of bits 10-1 in the reconstructed J-Type immediate.
const J_IMM_10_1_POS: u32 = 1;

/// Bit mask for the 5-bit shift amount of RV32I immediate shifts.
const SHAMT_MASK: i32 = 0x1F;

/// Decodes a RISC-V instruction word into an `Instruction`.
///
/// # Arguments
///
/// * `inst` - The 32-bit instruction encoding to decode
///
/// # Returns
///
/// The decoded instruction, or `None` if the word is not a supported RV32I encoding.
pub fn decode(inst: u32) -> Option<Instruction> {
    let rd = inst.rd();
    let rs1 = inst.rs1();
    let rs2 = inst.rs2();
    let f3 = inst.funct3();
    let f7 = inst.funct7();

    let decoded = match inst.opcode() {
        opcodes::OP_REG => {
            let op = match (f3, f7) {
                (funct3::ADD_SUB, funct7::DEFAULT) => AluOp::Add,
                (funct3::ADD_SUB, funct7::ALT) => AluOp::Sub,
                (funct3::SLL, funct7::DEFAULT) => AluOp::Sll,
                (funct3::SLT, funct7::DEFAULT) => AluOp::Slt,
                (funct3::SLTU, funct7::DEFAULT) => AluOp::Sltu,
                (funct3::XOR, funct7::DEFAULT) => AluOp::Xor,
                (funct3::SRL_SRA, funct7::DEFAULT) => AluOp::Srl,
                (funct3::SRL_SRA, funct7::ALT) => AluOp::Sra,
                (funct3::OR, funct7::DEFAULT) => AluOp::Or,
                (funct3::AND, funct7::DEFAULT) => AluOp::And,
                _ => return None,
            };
            Instruction::Op { op, rd, rs1, rs2 }
        }
        opcodes::OP_IMM => {
            let imm = decode_i_type_imm(inst);
            let (op, imm) = match (f3, f7) {
                (funct3::ADD_SUB, _) => (AluOp::Add, imm),
                (funct3::SLT, _) => (AluOp::Slt, imm),
                (funct3::SLTU, _) => (AluOp::Sltu, imm),
                (funct3::XOR, _) => (AluOp::Xor, imm),
                (funct3::OR, _) => (AluOp::Or, imm),
                (funct3::AND, _) => (AluOp::And, imm),
                (funct3::SLL, funct7::DEFAULT) => (AluOp::Sll, imm & SHAMT_MASK),
                (funct3::SRL_SRA, funct7::DEFAULT) => (AluOp::Srl, imm & SHAMT_MASK),
                (funct3::SRL_SRA, funct7::ALT) => (AluOp::Sra, imm & SHAMT_MASK),
                _ => return None,
            };
            Instruction::OpImm { op, rd, rs1, imm }
        }
        opcodes::OP_LOAD => {
            let (width, signed) = match f3 {
                funct3::LB => (MemWidth::Byte, true),
                funct3::LH => (MemWidth::Half, true),
                funct3::LW => (MemWidth::Word, true),
                funct3::LBU => (MemWidth::Byte, false),
                funct3::LHU => (MemWidth::Half, false),
                _ => return None,
            };
            Instruction::Load {
                width,
                signed,
                rd,
                rs1,
                imm: decode_i_type_imm(inst),
            }
        }
        opcodes::OP_STORE => {
            let width = match f3 {
                funct3::SB => MemWidth::Byte,
                funct3::SH => MemWidth::Half,
                funct3::SW => MemWidth::Word,
                _ => return None,
            };
            Instruction::Store {
                width,
                rs1,
                rs2,
                imm: decode_s_type_imm(inst),
            }
        }
        opcodes::OP_BRANCH => {
            let cond = match f3 {
                funct3::BEQ => BranchCond::Eq,
                funct3::BNE => BranchCond::Ne,
                funct3::BLT => BranchCond::Lt,
                funct3::BGE => BranchCond::Ge,
                funct3::BLTU => BranchCond::Ltu,
                funct3::BGEU => BranchCond::Geu,
                _ => return None,
            };
            Instruction::Branch {
                cond,
                rs1,
                rs2,
                imm: decode_b_type_imm(inst),
            }
        }
        opcodes::OP_LUI => Instruction::Lui {
            rd,
            imm: decode_u_type_imm(inst),
        },
        opcodes::OP_AUIPC => Instruction::Auipc {
            rd,
            imm: decode_u_type_imm(inst),
        },
        opcodes::OP_JAL => Instruction::Jal {
            rd,
            imm: decode_j_type_imm(inst),
        },
        opcodes::OP_JALR if f3 == funct3::JALR => Instruction::Jalr {
            rd,
            rs1,
            imm: decode_i_type_imm(inst),
        },
        opcodes::OP_MISC_MEM if f3 == funct3::FENCE => Instruction::Fence,
        opcodes::OP_SYSTEM => match f3 {
            funct3::PRIV => match inst {
                opcodes::ECALL => Instruction::Ecall,
                opcodes::EBREAK => Instruction::Ebreak,
                _ => return None,
            },
            funct3::CSRRW | funct3::CSRRS | funct3::CSRRC => Instruction::Csr {
                op: csr_op(f3),
                rd,
                csr: inst.csr() as u16,
                src: CsrSource::Reg(rs1),
            },
            funct3::CSRRWI | funct3::CSRRSI | funct3::CSRRCI => Instruction::Csr {
                op: csr_op(f3),
                rd,
                csr: inst.csr() as u16,
                src: CsrSource::Imm(rs1 as u32),
            },
            _ => return None,
        },
        _ => return None,
    };
    Some(decoded)
}

/// Decodes the word fetched from `address`, reporting a decode fault on failure.
///
/// # Arguments
///
/// * `address` - Address the word was fetched from.
/// * `inst` - The 32-bit instruction encoding.
pub fn decode_at(address: u32, inst: u32) -> Result<Instruction, SimError> {
    decode(inst).ok_or(SimError::Decode {
        address,
        word: inst,
    })
}

/// Maps the low two funct3 bits of a CSR instruction to its operation.
const fn csr_op(f3: u32) -> CsrOp {
    match f3 & 0b11 {
        0b01 => CsrOp::Rw,
        0b10 => CsrOp::Rs,
        0b11 => CsrOp::Rc,
        _ => CsrOp::None,
    }
}

/// Decodes the immediate value for I-Type instructions.
///
/// I-Type format: `imm[11:0] | rs1 | funct3 | rd | opcode`
/// Used for Load, JALR, and Immediate Arithmetic instructions.
fn decode_i_type_imm(inst: u32) -> i32 {
    (inst as i32) >> I_IMM_SHIFT
}

/// Decodes the immediate value for S-Type instructions.
///
/// S-Type format: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`
/// Used for Store instructions.
fn decode_s_type_imm(inst: u32) -> i32 {
    let low = (inst >> S_IMM_LOW_SHIFT) & S_IMM_LOW_MASK;
    let high = (inst >> S_IMM_HIGH_SHIFT) & S_IMM_HIGH_MASK;
    let combined = (high << S_IMM_COMBINED_SHIFT) | low;
    sign_extend(combined, S_IMM_BITS)
}

/// Decodes the immediate value for B-Type instructions.
///
/// B-Type format: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`
/// Used for Conditional Branch instructions. The immediate represents an even offset.
fn decode_b_type_imm(inst: u32) -> i32 {
    let bit_11 = (inst >> B_IMM_11_SHIFT) & B_IMM_11_MASK;
    let bits_4_1 = (inst >> B_IMM_4_1_SHIFT) & B_IMM_4_1_MASK;
    let bits_10_5 = (inst >> B_IMM_10_5_SHIFT) & B_IMM_10_5_MASK;
    let bit_12 = (inst >> B_IMM_12_SHIFT) & B_IMM_12_MASK;

    let combined = (bit_12 << B_IMM_12_POS)
        | (bit_11 << B_IMM_11_POS)
        | (bits_10_5 << B_IMM_10_5_POS)
        | (bits_4_1 << B_IMM_4_1_POS);
    sign_extend(combined, B_IMM_BITS)
}

/// Decodes the immediate value for U-Type instructions.
///
/// U-Type format: `imm[31:12] | rd | opcode`
/// Used for LUI and AUIPC.
fn decode_u_type_imm(inst: u32) -> i32 {
    (inst & U_IMM_MASK) as i32
}

/// Decodes the immediate value for J-Type instructions.
///
/// J-Type format: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`
/// Used for JAL (Unconditional Jump).
fn decode_j_type_imm(inst: u32) -> i32 {
    let bits_19_12 = (inst >> J_IMM_19_12_SHIFT) & J_IMM_19_12_MASK;
    let bit_11 = (inst >> J_IMM_11_SHIFT) & J_IMM_11_MASK;
    let bits_10_1 = (inst >> J_IMM_10_1_SHIFT) & J_IMM_10_1_MASK;
    let bit_20 = (inst >> J_IMM_20_SHIFT) & J_IMM_20_MASK;

    let combined = (bit_20 << J_IMM_20_POS)
        | (bits_19_12 << J_IMM_19_12_POS)
        | (bit_11 << J_IMM_11_POS)
        | (bits_10_1 << J_IMM_10_1_POS);
    sign_extend(combined, J_IMM_BITS)
}

/// Sign extends a value of `bits` width to a 32-bit signed integer.
///
/// # Arguments
///
/// * `val` - The value to extend.
/// * `bits` - The number of valid bits in `val`.
fn sign_extend(val: u32, bits: u32) -> i32 {
    let shift = INSTRUCTION_WIDTH - bits;
    (val as i32) << shift >> shift
}
