//! Pipeline Registers (Inter-stage Latches).
//!
//! This module defines the typed snapshots handed from one stage to the next. It provides:
//! 1. **Entries:** One struct per stage boundary (IF/ID, ID/EX, EX/MEM, MEM/WB, WB) carrying
//!    the instruction and the values the producing stage computed.
//! 2. **Pipeline Register:** A variant over those entries whose default is `Empty`, the
//!    "no work this cycle" case every stage must handle.
//! 3. **Flush Signals:** Requests to clear a contiguous range of slots and redirect the PC.
//!
//! A register is never mutated after its stage produced it; the orchestrator replaces
//! the whole array each cycle.

use crate::core::pipeline::signals::{ControlSignals, WbSrc};
use crate::isa::instruction::Instruction;

/// Why a stage asked for a flush; selects the counter bumped when it is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushKind {
    /// Data-hazard stall: the younger instructions are fetched again.
    Stall,
    /// Control-flow redirect: the younger instructions were on the wrong path.
    Redirect,
}

/// Request to discard in-flight instructions.
///
/// Raised by the stage at slot `i`, it clears slots `0..i`, or `0..=i` when
/// `inclusive` is set, and optionally redirects the program counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlushSignal {
    /// Stall or redirect.
    pub kind: FlushKind,
    /// Also clear the register that carries the signal.
    pub inclusive: bool,
    /// New program counter, if any.
    pub address: Option<u32>,
}

impl FlushSignal {
    /// Stall raised by the stage holding the instruction at `pc`: clears its own
    /// slot and everything younger, then re-fetches from `pc`.
    pub const fn stall(pc: u32) -> Self {
        Self {
            kind: FlushKind::Stall,
            inclusive: true,
            address: Some(pc),
        }
    }

    /// Redirect to `target`, discarding every younger instruction.
    pub const fn redirect(target: u32) -> Self {
        Self {
            kind: FlushKind::Redirect,
            inclusive: false,
            address: Some(target),
        }
    }

    /// Slot indices cleared when raised from slot `slot`.
    pub fn cleared_slots(&self, slot: usize) -> std::ops::Range<usize> {
        0..if self.inclusive { slot + 1 } else { slot }
    }
}

/// Entry in the IF/ID pipeline latch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfIdEntry {
    /// Program Counter of the instruction.
    pub pc: u32,
    /// Fetched instruction.
    pub inst: Instruction,
    /// Address of the sequentially next instruction.
    pub pc_plus_length: u32,
    /// Fetch predicted this instruction redirects control flow.
    pub pred_taken: bool,
}

/// Entry in the ID/EX pipeline latch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdExEntry {
    /// Program Counter of the instruction.
    pub pc: u32,
    /// Decoded instruction.
    pub inst: Instruction,
    /// Address of the sequentially next instruction.
    pub pc_plus_length: u32,
    /// First source register index (0 if unused).
    pub rs1: usize,
    /// Second source register index (0 if unused).
    pub rs2: usize,
    /// Destination register index, if any.
    pub rd: Option<usize>,
    /// Sign-extended immediate (0 if the encoding has none).
    pub imm: i32,
    /// Value read from `rs1`.
    pub rv1: u32,
    /// Value read from `rs2`.
    pub rv2: u32,
    /// Control signals.
    pub ctrl: ControlSignals,
    /// Fetch's control-flow prediction.
    pub pred_taken: bool,
    /// Stall request raised by hazard detection.
    pub flush: Option<FlushSignal>,
}

/// Entry in the EX/MEM pipeline latch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExMemEntry {
    /// Program Counter of the instruction.
    pub pc: u32,
    /// Decoded instruction.
    pub inst: Instruction,
    /// Address of the sequentially next instruction.
    pub pc_plus_length: u32,
    /// Destination register index, if any.
    pub rd: Option<usize>,
    /// Sign-extended immediate.
    pub imm: i32,
    /// ALU result (effective address for loads/stores, CSR operand for CSR ops).
    pub alu: u32,
    /// Value to store (`rs2`, after forwarding).
    pub store_data: u32,
    /// Branch condition evaluated true (or the instruction is a jump).
    pub taken: bool,
    /// Resolved control-flow target.
    pub target: u32,
    /// Control signals.
    pub ctrl: ControlSignals,
    /// Misprediction recovery request.
    pub flush: Option<FlushSignal>,
}

impl ExMemEntry {
    /// Value this instruction will write back, if it is already known after Execute.
    ///
    /// Loads and CSR reads only know their value after the Memory-Access stage.
    pub const fn forwardable_value(&self) -> Option<u32> {
        match self.ctrl.wb_src {
            WbSrc::Alu => Some(self.alu),
            WbSrc::PcPlusLength => Some(self.pc_plus_length),
            WbSrc::Imm => Some(self.imm as u32),
            WbSrc::Memory => None,
        }
    }
}

/// Entry in the MEM/WB pipeline latch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemWbEntry {
    /// Program Counter of the instruction.
    pub pc: u32,
    /// Decoded instruction.
    pub inst: Instruction,
    /// Address of the sequentially next instruction.
    pub pc_plus_length: u32,
    /// Destination register index, if any.
    pub rd: Option<usize>,
    /// Sign-extended immediate.
    pub imm: i32,
    /// ALU result.
    pub alu: u32,
    /// Value read from memory or the CSR file.
    pub mem_data: u32,
    /// Control signals.
    pub ctrl: ControlSignals,
}

impl MemWbEntry {
    /// Value selected for write-back by the write-back source signal.
    pub const fn write_value(&self) -> u32 {
        match self.ctrl.wb_src {
            WbSrc::Alu => self.alu,
            WbSrc::PcPlusLength => self.pc_plus_length,
            WbSrc::Memory => self.mem_data,
            WbSrc::Imm => self.imm as u32,
        }
    }
}

/// Output of the Write-Back stage: the retired instruction and what it committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WbEntry {
    /// Program Counter of the instruction.
    pub pc: u32,
    /// Retired instruction.
    pub inst: Instruction,
    /// Register written, if any (never `x0`).
    pub rd: Option<usize>,
    /// Value written to `rd`, if any.
    pub value: Option<u32>,
}

/// Pipeline register held in one slot of the pipeline.
///
/// Slot `i` holds the output of the stage at position `i`. `Empty` is the
/// default and means the slot carries no instruction this cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PipelineRegister {
    /// No instruction.
    #[default]
    Empty,
    /// Fetch output (IF/ID).
    Fetch(IfIdEntry),
    /// Decode output (ID/EX).
    Decode(IdExEntry),
    /// Execute output (EX/MEM).
    Execute(ExMemEntry),
    /// Memory-Access output (MEM/WB).
    Memory(MemWbEntry),
    /// Write-Back output.
    WriteBack(WbEntry),
}

impl PipelineRegister {
    /// Instruction carried by this register, or `None` for `Empty`.
    pub const fn instruction(&self) -> Option<&Instruction> {
        match self {
            Self::Empty => None,
            Self::Fetch(e) => Some(&e.inst),
            Self::Decode(e) => Some(&e.inst),
            Self::Execute(e) => Some(&e.inst),
            Self::Memory(e) => Some(&e.inst),
            Self::WriteBack(e) => Some(&e.inst),
        }
    }

    /// Address of the carried instruction.
    pub const fn address(&self) -> Option<u32> {
        match self {
            Self::Empty => None,
            Self::Fetch(e) => Some(e.pc),
            Self::Decode(e) => Some(e.pc),
            Self::Execute(e) => Some(e.pc),
            Self::Memory(e) => Some(e.pc),
            Self::WriteBack(e) => Some(e.pc),
        }
    }

    /// Flush signal raised by the stage that produced this register.
    pub const fn flush_signal(&self) -> Option<FlushSignal> {
        match self {
            Self::Decode(e) => e.flush,
            Self::Execute(e) => e.flush,
            _ => None,
        }
    }

    /// Destination register this in-flight instruction will write, excluding `x0`.
    pub fn write_register(&self) -> Option<usize> {
        self.instruction().and_then(Instruction::write_register)
    }

    /// Returns `true` if this register carries no instruction.
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Short stage label for traces and displays.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Empty => "--",
            Self::Fetch(_) => "IF",
            Self::Decode(_) => "ID",
            Self::Execute(_) => "EX",
            Self::Memory(_) => "MEM",
            Self::WriteBack(_) => "WB",
        }
    }
}
