//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the instruction pipeline. It selects
//! the result by the write-back source signal, commits it to the register file
//! (writes to `x0` and instructions without a destination commit nothing), and
//! counts the retired instruction.

use crate::common::error::SimError;
use crate::core::pipeline::latches::{PipelineRegister, WbEntry};
use crate::core::pipeline::traits::PipelineStage;
use crate::core::state::ArchitecturalState;

/// Register write-back stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteBackStage {
    /// Log every retired instruction at `info` level instead of `trace`.
    pub trace: bool,
}

impl WriteBackStage {
    /// Creates a write-back stage.
    pub const fn new(trace: bool) -> Self {
        Self { trace }
    }
}

impl PipelineStage for WriteBackStage {
    fn behavior(
        &self,
        registers: &[PipelineRegister],
        input: Option<usize>,
        state: &mut ArchitecturalState,
    ) -> Result<PipelineRegister, SimError> {
        let Some(slot) = input else {
            return Ok(PipelineRegister::Empty);
        };
        let Some(PipelineRegister::Memory(entry)) = registers.get(slot) else {
            return Ok(PipelineRegister::Empty);
        };

        let rd = entry.inst.write_register().filter(|_| entry.ctrl.reg_write);
        let value = rd.map(|rd| {
            let value = entry.write_value();
            state.registers.write(rd, value);
            value
        });
        state.stats.instructions_retired += 1;

        if self.trace {
            tracing::info!(
                pc = format_args!("{:#010x}", entry.pc),
                inst = %entry.inst,
                rd,
                value,
                "retire"
            );
        } else {
            tracing::trace!(pc = format_args!("{:#x}", entry.pc), inst = %entry.inst, "retire");
        }

        Ok(PipelineRegister::WriteBack(WbEntry {
            pc: entry.pc,
            inst: entry.inst,
            rd,
            value,
        }))
    }

    fn name(&self) -> &'static str {
        "writeback"
    }
}
