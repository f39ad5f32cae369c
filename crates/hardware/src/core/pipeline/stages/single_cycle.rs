//! Single-Cycle Stage.
//!
//! Runs one instruction through all five stage behaviors within one cycle,
//! chained over a private register array. A pipeline made of this one stage is
//! the non-pipelined reference machine: there is never more than one instruction
//! in flight, so hazard detection is off and no flush is needed.

use crate::common::error::SimError;
use crate::core::pipeline::latches::PipelineRegister;
use crate::core::pipeline::stages::{
    DecodeStage, ExecuteStage, FetchStage, MemoryStage, WriteBackStage,
};
use crate::core::pipeline::traits::PipelineStage;
use crate::core::state::ArchitecturalState;

/// Number of chained behaviors.
const CHAIN_LENGTH: usize = 5;

/// Non-pipelined stage executing one whole instruction per cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SingleCycleStage {
    /// Write-back behavior (carries the retirement trace flag).
    pub writeback: WriteBackStage,
}

impl SingleCycleStage {
    /// Creates a single-cycle stage.
    pub const fn new(trace: bool) -> Self {
        Self {
            writeback: WriteBackStage::new(trace),
        }
    }
}

impl PipelineStage for SingleCycleStage {
    fn behavior(
        &self,
        _registers: &[PipelineRegister],
        _input: Option<usize>,
        state: &mut ArchitecturalState,
    ) -> Result<PipelineRegister, SimError> {
        let decode = DecodeStage::new(false, false, true);
        let execute = ExecuteStage::new(false);
        let chain: [&dyn PipelineStage; CHAIN_LENGTH] =
            [&FetchStage, &decode, &execute, &MemoryStage, &self.writeback];

        let mut slots: [PipelineRegister; CHAIN_LENGTH] = Default::default();
        for (idx, stage) in chain.into_iter().enumerate() {
            let output = stage.behavior(&slots, idx.checked_sub(1), state)?;
            if output.is_empty() {
                return Ok(PipelineRegister::Empty);
            }
            // Branches and jumps take effect before the next fetch.
            if let Some(address) = output.flush_signal().and_then(|f| f.address) {
                state.program_counter = address;
            }
            slots[idx] = output;
        }
        let [.., retired] = slots;
        Ok(retired)
    }

    fn name(&self) -> &'static str {
        "single-cycle"
    }
}
