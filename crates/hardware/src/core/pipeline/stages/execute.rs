//! Instruction Execute (EX) Stage.
//!
//! This module implements the third stage of the pipeline. It performs the following:
//! 1. **Operand Forwarding:** Optionally bypasses results held in the EX/MEM and MEM/WB registers.
//! 2. **ALU Execution:** Selects register, immediate or PC operands and runs the ALU.
//! 3. **Branch Resolution:** Evaluates the branch condition and the jump or branch target.
//! 4. **Misprediction Recovery:** When the resolved next PC differs from Fetch's prediction,
//!    emits a flush of every younger register and redirects the PC.

use crate::common::error::{ExecutionError, SimError};
use crate::core::pipeline::hazards::forward_operand;
use crate::core::pipeline::latches::{ExMemEntry, FlushSignal, PipelineRegister};
use crate::core::pipeline::signals::{OpASrc, OpBSrc};
use crate::core::pipeline::traits::PipelineStage;
use crate::core::state::ArchitecturalState;
use crate::core::units::alu::Alu;
use crate::core::units::bru::Bru;
use crate::isa::instruction::Instruction;

/// Instruction execute stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecuteStage {
    /// Bypass operands from later pipeline registers.
    pub forwarding: bool,
}

impl ExecuteStage {
    /// Creates an execute stage.
    pub const fn new(forwarding: bool) -> Self {
        Self { forwarding }
    }
}

impl PipelineStage for ExecuteStage {
    fn behavior(
        &self,
        registers: &[PipelineRegister],
        input: Option<usize>,
        state: &mut ArchitecturalState,
    ) -> Result<PipelineRegister, SimError> {
        let Some(slot) = input else {
            return Ok(PipelineRegister::Empty);
        };
        let Some(PipelineRegister::Decode(entry)) = registers.get(slot) else {
            return Ok(PipelineRegister::Empty);
        };
        let inst = entry.inst;
        if matches!(inst, Instruction::Ecall | Instruction::Ebreak) {
            return Err(SimError::Execution {
                address: entry.pc,
                instruction: inst.to_string(),
                source: ExecutionError::Unsupported(inst.mnemonic()),
            });
        }

        let ctrl = entry.ctrl;
        let (rv1, rv2) = if self.forwarding {
            (
                forward_operand(entry.rs1, entry.rv1, registers, slot),
                forward_operand(entry.rs2, entry.rv2, registers, slot),
            )
        } else {
            (entry.rv1, entry.rv2)
        };

        let a = match ctrl.a_src {
            OpASrc::Reg1 => rv1,
            OpASrc::Pc => entry.pc,
            OpASrc::Zero => 0,
        };
        let b = match ctrl.b_src {
            OpBSrc::Imm => entry.imm as u32,
            OpBSrc::Reg2 => rv2,
            OpBSrc::Zero => 0,
        };
        let alu = Alu::execute(ctrl.alu, a, b);

        let taken = ctrl.jump || (ctrl.branch && Bru::taken(ctrl.cond, rv1, rv2));
        let target = if ctrl.alu_to_pc {
            Bru::register_target(alu)
        } else {
            Bru::relative_target(entry.pc, entry.imm)
        };

        if ctrl.branch && taken {
            state.stats.branches_taken += 1;
        }
        if ctrl.jump {
            state.stats.procedure_calls += 1;
        }

        let next_pc = if taken { target } else { entry.pc_plus_length };
        let predicted_pc = if entry.pred_taken {
            target
        } else {
            entry.pc_plus_length
        };
        let flush = (next_pc != predicted_pc).then(|| {
            tracing::debug!(
                pc = format_args!("{:#x}", entry.pc),
                %inst,
                target = format_args!("{next_pc:#x}"),
                "control flush"
            );
            FlushSignal::redirect(next_pc)
        });

        Ok(PipelineRegister::Execute(ExMemEntry {
            pc: entry.pc,
            inst,
            pc_plus_length: entry.pc_plus_length,
            rd: entry.rd,
            imm: entry.imm,
            alu,
            store_data: rv2,
            taken,
            target,
            ctrl,
            flush,
        }))
    }

    fn hazard_window(&self) -> usize {
        if self.forwarding {
            crate::core::pipeline::hazards::FORWARDING_REACH
        } else {
            0
        }
    }

    fn name(&self) -> &'static str {
        "execute"
    }
}
