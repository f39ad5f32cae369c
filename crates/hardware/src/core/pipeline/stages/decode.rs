//! Instruction Decode (ID) Stage.
//!
//! This module implements the second stage of the pipeline. It performs the following:
//! 1. **Operand Extraction:** Source and destination register indices and the sign-extended immediate.
//! 2. **Register Read:** Reads source operands (rs1, rs2) from the Register File.
//! 3. **Control Generation:** Produces the ALU, memory, branch and CSR control signals.
//! 4. **Hazard Detection:** Looks at every later in-flight register for a pending write
//!    to a source register and requests a stall when the value cannot reach Execute in time.
//!
//! A stall is an inclusive flush that redirects the PC to the stalled instruction:
//! its own output and Fetch's output are discarded and the instruction is fetched again.

use crate::common::error::SimError;
use crate::core::pipeline::hazards::stall_slot;
use crate::core::pipeline::latches::{FlushSignal, IdExEntry, PipelineRegister};
use crate::core::pipeline::traits::PipelineStage;
use crate::core::state::ArchitecturalState;

/// Uncommitted producers ahead of Decode when Write-Back runs earlier in the same cycle.
pub const WINDOW_WRITEBACK_FIRST: usize = 2;

/// Uncommitted producers ahead of Decode when Write-Back runs after it.
pub const WINDOW_WRITEBACK_LAST: usize = 3;

/// Instruction decode stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeStage {
    /// Stall on read-after-write conflicts.
    pub hazard_detection: bool,
    /// Execute bypasses results, so only late-produced values stall.
    pub forwarding: bool,
    /// Number of registers after the input whose results are not yet committed.
    pub window: usize,
}

impl DecodeStage {
    /// Creates a decode stage.
    ///
    /// # Arguments
    ///
    /// * `hazard_detection` - Stall on unresolved read-after-write conflicts.
    /// * `forwarding` - Whether the Execute stage forwards results.
    /// * `writeback_first` - Whether Write-Back runs before Decode within a cycle.
    pub const fn new(hazard_detection: bool, forwarding: bool, writeback_first: bool) -> Self {
        Self {
            hazard_detection,
            forwarding,
            window: if writeback_first {
                WINDOW_WRITEBACK_FIRST
            } else {
                WINDOW_WRITEBACK_LAST
            },
        }
    }
}

impl Default for DecodeStage {
    fn default() -> Self {
        Self::new(true, false, true)
    }
}

impl PipelineStage for DecodeStage {
    fn behavior(
        &self,
        registers: &[PipelineRegister],
        input: Option<usize>,
        state: &mut ArchitecturalState,
    ) -> Result<PipelineRegister, SimError> {
        let Some(slot) = input else {
            return Ok(PipelineRegister::Empty);
        };
        let Some(PipelineRegister::Fetch(entry)) = registers.get(slot) else {
            return Ok(PipelineRegister::Empty);
        };
        let inst = entry.inst;
        let rs1 = inst.rs1().unwrap_or(0);
        let rs2 = inst.rs2().unwrap_or(0);

        let flush = if self.hazard_detection {
            stall_slot(&inst, registers, slot, self.window, self.forwarding).map(|producer| {
                tracing::debug!(
                    pc = format_args!("{:#x}", entry.pc),
                    %inst,
                    producer,
                    "data hazard stall"
                );
                FlushSignal::stall(entry.pc)
            })
        } else {
            None
        };

        Ok(PipelineRegister::Decode(IdExEntry {
            pc: entry.pc,
            inst,
            pc_plus_length: entry.pc_plus_length,
            rs1,
            rs2,
            rd: inst.rd(),
            imm: inst.imm().unwrap_or(0),
            rv1: state.register(rs1),
            rv2: state.register(rs2),
            ctrl: inst.control_signals(),
            pred_taken: entry.pred_taken,
            flush,
        }))
    }

    fn hazard_window(&self) -> usize {
        if self.hazard_detection { self.window } else { 0 }
    }

    fn name(&self) -> &'static str {
        "decode"
    }
}
