//! Pipeline control signals and operation types.
//!
//! This module defines the signals that control instruction execution. It performs:
//! 1. **Operation Classification:** Categorizes ALU, branch comparison, and CSR operations.
//! 2. **Operand Selection:** Defines sources for ALU inputs (registers, PC, immediates, or zero).
//! 3. **Memory Control:** Specifies access widths and sign-extension requirements.
//! 4. **Write-Back Control:** Selects which computed value is committed to `rd`.

/// ALU operation types for RV32I integer instructions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Integer addition (also the pass-through operation).
    #[default]
    Add,

    /// Integer subtraction.
    Sub,

    /// Shift left logical.
    Sll,

    /// Set less than (signed).
    Slt,

    /// Set less than unsigned.
    Sltu,

    /// Bitwise XOR.
    Xor,

    /// Shift right logical.
    Srl,

    /// Shift right arithmetic.
    Sra,

    /// Bitwise OR.
    Or,

    /// Bitwise AND.
    And,
}

/// Comparison evaluated by a conditional branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BranchCond {
    /// Equal (`BEQ`).
    #[default]
    Eq,

    /// Not equal (`BNE`).
    Ne,

    /// Less than, signed (`BLT`).
    Lt,

    /// Greater or equal, signed (`BGE`).
    Ge,

    /// Less than, unsigned (`BLTU`).
    Ltu,

    /// Greater or equal, unsigned (`BGEU`).
    Geu,
}

/// Memory access width for load and store operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemWidth {
    /// No memory operation.
    #[default]
    Nop,

    /// 8-bit byte access.
    Byte,

    /// 16-bit half-word access.
    Half,

    /// 32-bit word access.
    Word,
}

impl MemWidth {
    /// Number of bytes moved by an access of this width.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Nop => 0,
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }
}

/// Source for ALU operand A.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpASrc {
    /// Use `rs1` register value.
    #[default]
    Reg1,

    /// Use program counter value.
    Pc,

    /// Use zero.
    Zero,
}

/// Source for ALU operand B.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpBSrc {
    /// Use sign-extended immediate value.
    #[default]
    Imm,

    /// Use `rs2` register value.
    Reg2,

    /// Use zero.
    Zero,
}

/// Value committed to the destination register during write-back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WbSrc {
    /// ALU result.
    #[default]
    Alu,

    /// Address of the following instruction (link address of `JAL`/`JALR`).
    PcPlusLength,

    /// Value read from data memory or from the CSR file.
    Memory,

    /// The immediate itself (`LUI`).
    Imm,
}

/// CSR (Control and Status Register) operation type.
///
/// Immediate forms share these operations; only the ALU operand source differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsrOp {
    /// No CSR operation.
    #[default]
    None,

    /// CSR read-write (`CSRRW`, `CSRRWI`).
    Rw,

    /// CSR read-set (`CSRRS`, `CSRRSI`).
    Rs,

    /// CSR read-clear (`CSRRC`, `CSRRCI`).
    Rc,
}

/// Control signals for pipeline stage execution.
///
/// Contains all signals generated during instruction decode that control execution,
/// memory access, and write-back throughout the pipeline stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    /// Enable write to the integer destination register.
    pub reg_write: bool,
    /// Enable memory read operation (load).
    pub mem_read: bool,
    /// Enable memory write operation (store).
    pub mem_write: bool,
    /// Instruction is a conditional branch.
    pub branch: bool,
    /// Instruction is an unconditional jump (`JAL`/`JALR`).
    pub jump: bool,
    /// Jump target is the ALU result rather than `pc + imm` (`JALR`).
    pub alu_to_pc: bool,
    /// Width of memory access.
    pub width: MemWidth,
    /// Load should be sign-extended.
    pub signed_load: bool,
    /// ALU operation to perform.
    pub alu: AluOp,
    /// Comparison for conditional branches.
    pub cond: BranchCond,
    /// Source selection for ALU operand A.
    pub a_src: OpASrc,
    /// Source selection for ALU operand B.
    pub b_src: OpBSrc,
    /// Source of the written-back value.
    pub wb_src: WbSrc,
    /// CSR operation type.
    pub csr_op: CsrOp,
    /// CSR address for CSR operations.
    pub csr_addr: u16,
    /// The CSR operation modifies the CSR (false for set/clear with a zero source).
    pub csr_write: bool,
}

impl ControlSignals {
    /// Returns `true` if the write-back value is only known after the Memory-Access stage.
    pub const fn reads_late(&self) -> bool {
        matches!(self.wb_src, WbSrc::Memory)
    }
}
