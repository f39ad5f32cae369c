//! Pipeline Stage Interface.
//!
//! This module defines the common contract for pipeline stages. It provides:
//! 1. **Stage Behavior:** One cycle of work as a function of the previous cycle's registers.
//! 2. **Hazard Window:** How many registers past its input a stage inspects, checked
//!    against the pipeline depth when the pipeline is built.

use crate::common::error::SimError;
use crate::core::pipeline::latches::PipelineRegister;
use crate::core::state::ArchitecturalState;

/// Represents a stage in the instruction pipeline.
///
/// A stage is responsible for processing a specific part of the instruction
/// lifecycle (Fetch, Decode, Execute, Memory, or Writeback).
pub trait PipelineStage {
    /// Executes one cycle of the stage.
    ///
    /// Every stage must accept an `Empty` input register and answer with an
    /// `Empty` (or stage-specific default) output without failing.
    ///
    /// # Arguments
    ///
    /// * `registers` - The pipeline registers as they stood at the start of the cycle.
    /// * `input` - Slot of the register this stage consumes, `None` for the first stage.
    /// * `state` - Architectural state the stage may read and mutate.
    ///
    /// # Returns
    ///
    /// The register this stage hands to its successor, or a fault that halts the run.
    fn behavior(
        &self,
        registers: &[PipelineRegister],
        input: Option<usize>,
        state: &mut ArchitecturalState,
    ) -> Result<PipelineRegister, SimError>;

    /// Number of slots after `input` this stage reads for hazard detection or forwarding.
    fn hazard_window(&self) -> usize {
        0
    }

    /// Short name used in traces and configuration errors.
    fn name(&self) -> &'static str;
}
