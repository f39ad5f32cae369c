//! Memory Access (MEM) Stage.
//!
//! This module implements the fourth stage of the pipeline. It performs the following:
//! 1. **Loads and Stores:** Sized data memory accesses through the LSU at the ALU-computed address.
//! 2. **CSR Access:** Read-modify-write of the CSR file for the Zicsr instructions.
//! 3. **Passthrough:** Every other instruction is forwarded to Write-Back unchanged.
//!
//! A faulting access commits nothing and halts the run.

use crate::common::error::{ExecutionError, SimError};
use crate::core::arch::csr;
use crate::core::pipeline::latches::{ExMemEntry, MemWbEntry, PipelineRegister};
use crate::core::pipeline::signals::CsrOp;
use crate::core::pipeline::traits::PipelineStage;
use crate::core::state::ArchitecturalState;
use crate::core::units::lsu::Lsu;

/// Memory access stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStage;

impl MemoryStage {
    /// Performs the CSR read-modify-write for `entry`, returning the old CSR value.
    fn csr_access(
        entry: &ExMemEntry,
        state: &mut ArchitecturalState,
    ) -> Result<u32, ExecutionError> {
        let ctrl = &entry.ctrl;
        // Counters are shadows of the statistics.
        state.csrs.set(csr::CYCLE, state.stats.cycles as u32);
        state.csrs.set(csr::INSTRET, state.stats.instructions_retired as u32);

        let old = state.csrs.read(ctrl.csr_addr);
        let src = entry.alu;
        let new = match ctrl.csr_op {
            CsrOp::Rw => src,
            CsrOp::Rs => old | src,
            CsrOp::Rc => old & !src,
            CsrOp::None => old,
        };
        if ctrl.csr_write {
            state.csrs.write(ctrl.csr_addr, new)?;
        }
        Ok(old)
    }
}

impl PipelineStage for MemoryStage {
    fn behavior(
        &self,
        registers: &[PipelineRegister],
        input: Option<usize>,
        state: &mut ArchitecturalState,
    ) -> Result<PipelineRegister, SimError> {
        let Some(slot) = input else {
            return Ok(PipelineRegister::Empty);
        };
        let Some(PipelineRegister::Execute(entry)) = registers.get(slot) else {
            return Ok(PipelineRegister::Empty);
        };
        let ctrl = &entry.ctrl;

        let access = if ctrl.mem_read {
            Lsu::load(&state.memory, entry.alu, ctrl.width, ctrl.signed_load)
        } else if ctrl.mem_write {
            Lsu::store(&mut state.memory, entry.alu, ctrl.width, entry.store_data).map(|()| 0)
        } else if ctrl.csr_op == CsrOp::None {
            Ok(0)
        } else {
            Self::csr_access(entry, state)
        };

        let mem_data = access.map_err(|source| {
            tracing::warn!(
                pc = format_args!("{:#x}", entry.pc),
                inst = %entry.inst,
                %source,
                "memory access fault"
            );
            SimError::Execution {
                address: entry.pc,
                instruction: entry.inst.to_string(),
                source,
            }
        })?;

        Ok(PipelineRegister::Memory(MemWbEntry {
            pc: entry.pc,
            inst: entry.inst,
            pc_plus_length: entry.pc_plus_length,
            rd: entry.rd,
            imm: entry.imm,
            alu: entry.alu,
            mem_data,
            ctrl: entry.ctrl,
        }))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
