//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the pipeline. It performs the following:
//! 1. **Instruction Fetch:** Reads the instruction stored at the program counter.
//! 2. **PC Generation:** Advances the program counter by the instruction length.
//! 3. **Prediction:** Statically predicts every instruction falls through.
//!
//! When no instruction is stored at the program counter, Fetch emits an empty
//! register and leaves the PC where it is, so the pipeline drains.
//!
//! An undecodable word is held the same way while older instructions are still in
//! flight, since one of them may redirect the PC away from it. The decode fault is
//! raised once nothing older remains, which keeps faults in program order.

use crate::common::error::SimError;
use crate::core::pipeline::latches::{IfIdEntry, PipelineRegister};
use crate::core::pipeline::traits::PipelineStage;
use crate::core::state::ArchitecturalState;
use crate::core::units::bru::STATIC_PREDICTION_TAKEN;

/// Instruction fetch stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchStage;

impl PipelineStage for FetchStage {
    fn behavior(
        &self,
        registers: &[PipelineRegister],
        _input: Option<usize>,
        state: &mut ArchitecturalState,
    ) -> Result<PipelineRegister, SimError> {
        let pc = state.program_counter;
        let inst = match state.fetch(pc) {
            None => return Ok(PipelineRegister::Empty),
            Some(Ok(inst)) => inst,
            Some(Err(_)) if older_in_flight(registers) => return Ok(PipelineRegister::Empty),
            Some(Err(e)) => return Err(e),
        };
        let pc_plus_length = pc.wrapping_add(inst.length());
        state.program_counter = pc_plus_length;
        tracing::trace!(pc = format_args!("{pc:#x}"), %inst, "fetch");

        Ok(PipelineRegister::Fetch(IfIdEntry {
            pc,
            inst,
            pc_plus_length,
            pred_taken: STATIC_PREDICTION_TAKEN,
        }))
    }

    fn name(&self) -> &'static str {
        "fetch"
    }
}

/// Returns `true` if an instruction that has not retired yet is held in `registers`.
fn older_in_flight(registers: &[PipelineRegister]) -> bool {
    registers
        .iter()
        .any(|r| !matches!(r, PipelineRegister::Empty | PipelineRegister::WriteBack(_)))
}
