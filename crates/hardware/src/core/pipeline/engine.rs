//! Pipeline orchestration and stage dispatch.
//!
//! This module drives the stages cycle by cycle:
//! 1. **`Stage`:** enum dispatch over the fixed set of stage kinds.
//! 2. **`Pipeline`:** owns the stages, the execution ordering and the pipeline-register
//!    array, runs one cycle per `step` and resolves flush precedence.
//!
//! Every stage of a cycle sees the register array as it stood at the start of the
//! cycle. Outputs are collected by stage position, the flush signal carried by the
//! register nearest write-back is applied, and the array is replaced wholesale.

use std::fmt;

use crate::common::error::SimError;
use crate::config::{Config, PipelineConfig, PipelineMode};
use crate::core::pipeline::latches::{FlushKind, PipelineRegister};
use crate::core::pipeline::stages::{
    DecodeStage, ExecuteStage, FetchStage, MemoryStage, SingleCycleStage, WriteBackStage,
};
use crate::core::pipeline::traits::PipelineStage;
use crate::core::state::ArchitecturalState;

/// Slot of the Decode stage in the five-stage pipeline.
const DECODE_SLOT: usize = 1;

/// Slot of the Write-Back stage in the five-stage pipeline.
const WRITEBACK_SLOT: usize = 4;

/// Closed set of stage kinds, dispatched by `match`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Instruction fetch.
    Fetch(FetchStage),
    /// Instruction decode and hazard detection.
    Decode(DecodeStage),
    /// ALU and branch resolution.
    Execute(ExecuteStage),
    /// Data memory and CSR access.
    Memory(MemoryStage),
    /// Register write-back.
    WriteBack(WriteBackStage),
    /// All five behaviors in one cycle.
    SingleCycle(SingleCycleStage),
}

impl PipelineStage for Stage {
    fn behavior(
        &self,
        registers: &[PipelineRegister],
        input: Option<usize>,
        state: &mut ArchitecturalState,
    ) -> Result<PipelineRegister, SimError> {
        match self {
            Self::Fetch(s) => s.behavior(registers, input, state),
            Self::Decode(s) => s.behavior(registers, input, state),
            Self::Execute(s) => s.behavior(registers, input, state),
            Self::Memory(s) => s.behavior(registers, input, state),
            Self::WriteBack(s) => s.behavior(registers, input, state),
            Self::SingleCycle(s) => s.behavior(registers, input, state),
        }
    }

    fn hazard_window(&self) -> usize {
        match self {
            Self::Fetch(s) => s.hazard_window(),
            Self::Decode(s) => s.hazard_window(),
            Self::Execute(s) => s.hazard_window(),
            Self::Memory(s) => s.hazard_window(),
            Self::WriteBack(s) => s.hazard_window(),
            Self::SingleCycle(s) => s.hazard_window(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Fetch(s) => s.name(),
            Self::Decode(s) => s.name(),
            Self::Execute(s) => s.name(),
            Self::Memory(s) => s.name(),
            Self::WriteBack(s) => s.name(),
            Self::SingleCycle(s) => s.name(),
        }
    }
}

/// The pipeline orchestrator.
///
/// Slot `i` of the register array always holds the most recent output of the
/// stage at position `i`; the input of that stage is slot `i - 1`.
///
/// The first fault raised by a stage is kept. From then on `step` returns it
/// without calling any stage.
#[derive(Clone, Debug)]
pub struct Pipeline<S: PipelineStage = Stage> {
    stages: Vec<S>,
    execution_ordering: Vec<usize>,
    registers: Vec<PipelineRegister>,
    fault: Option<SimError>,
}

impl<S: PipelineStage> Pipeline<S> {
    /// Builds a pipeline from its stages and the order they are called in each cycle.
    ///
    /// # Arguments
    ///
    /// * `stages` - Stages in pipeline (program) order.
    /// * `execution_ordering` - Permutation of stage positions giving the call order.
    ///
    /// # Returns
    ///
    /// `SimError::Configuration` if there are no stages, the ordering is not a
    /// permutation of the stage positions, or a stage inspects more registers
    /// past its input than the pipeline holds.
    pub fn new(stages: Vec<S>, execution_ordering: Vec<usize>) -> Result<Self, SimError> {
        if stages.is_empty() {
            return Err(SimError::Configuration("pipeline has no stages".into()));
        }
        let mut seen = vec![false; stages.len()];
        for &idx in &execution_ordering {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(SimError::Configuration(format!(
                        "execution ordering {execution_ordering:?} is not a permutation of 0..{}",
                        stages.len()
                    )));
                }
            }
        }
        if execution_ordering.len() != stages.len() {
            return Err(SimError::Configuration(format!(
                "execution ordering {execution_ordering:?} is not a permutation of 0..{}",
                stages.len()
            )));
        }
        for (pos, stage) in stages.iter().enumerate() {
            let window = stage.hazard_window();
            let reach = pos.saturating_sub(1) + window;
            if window > 0 && reach >= stages.len() {
                return Err(SimError::Configuration(format!(
                    "{} stage at position {pos} inspects slot {reach}, but the pipeline has {} slots",
                    stage.name(),
                    stages.len()
                )));
            }
        }

        let registers = vec![PipelineRegister::Empty; stages.len()];
        Ok(Self {
            stages,
            execution_ordering,
            registers,
            fault: None,
        })
    }

    /// Runs one clock cycle.
    ///
    /// Each stage is called in execution order with the start-of-cycle registers.
    /// If any new register carries a flush signal, the one from the stage nearest
    /// write-back clears its slot range and redirects the PC; all others are dropped.
    ///
    /// # Returns
    ///
    /// The fault raised by a stage this cycle, or the one raised in an earlier cycle.
    /// Stages called before the faulting one keep their effects on `state`; the held
    /// registers are not replaced and no later cycle runs.
    pub fn step(&mut self, state: &mut ArchitecturalState) -> Result<(), SimError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        let mut next = vec![PipelineRegister::Empty; self.stages.len()];
        for &idx in &self.execution_ordering {
            match self.stages[idx].behavior(&self.registers, idx.checked_sub(1), state) {
                Ok(reg) => next[idx] = reg,
                Err(e) => {
                    self.fault = Some(e.clone());
                    return Err(e);
                }
            }
        }

        let winner = next
            .iter()
            .enumerate()
            .rev()
            .find_map(|(slot, reg)| reg.flush_signal().map(|flush| (slot, flush)));
        if let Some((slot, flush)) = winner {
            match flush.kind {
                FlushKind::Stall => state.stats.stalls_data += 1,
                FlushKind::Redirect => state.stats.flushes_control += 1,
            }
            for cleared in flush.cleared_slots(slot) {
                next[cleared] = PipelineRegister::Empty;
            }
            if let Some(address) = flush.address {
                state.program_counter = address;
            }
            tracing::debug!(
                slot,
                kind = ?flush.kind,
                inclusive = flush.inclusive,
                address = flush.address,
                "applied flush"
            );
        }

        self.registers = next;
        Ok(())
    }

    /// Returns `true` if no register holds an instruction.
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(PipelineRegister::is_empty)
    }

    /// Returns `true` if the pipeline is empty and no instruction is stored at the PC,
    /// so no further work can ever enter the pipeline.
    pub fn is_done(&self, state: &ArchitecturalState) -> bool {
        self.is_empty() && !state.instruction_at_pc()
    }

    /// The fault that stopped the pipeline, if any.
    pub const fn fault(&self) -> Option<&SimError> {
        self.fault.as_ref()
    }

    /// The pipeline registers held since the last cycle, in stage order.
    pub fn registers(&self) -> &[PipelineRegister] {
        &self.registers
    }

    /// The stages, in pipeline order.
    pub fn stages(&self) -> &[S] {
        &self.stages
    }

    /// The call order of the stages within a cycle.
    pub fn execution_ordering(&self) -> &[usize] {
        &self.execution_ordering
    }
}

impl Pipeline<Stage> {
    /// Builds the classic five-stage pipeline (IF, ID, EX, MEM, WB).
    ///
    /// # Arguments
    ///
    /// * `config` - Hazard detection, forwarding and execution ordering.
    /// * `trace` - Log every retired instruction.
    pub fn five_stage(config: &PipelineConfig, trace: bool) -> Result<Self, SimError> {
        let ordering = &config.execution_ordering;
        let position = |slot| ordering.iter().position(|&idx| idx == slot);
        let writeback_first = matches!(
            (position(WRITEBACK_SLOT), position(DECODE_SLOT)),
            (Some(wb), Some(id)) if wb < id
        );
        let stages = vec![
            Stage::Fetch(FetchStage),
            Stage::Decode(DecodeStage::new(
                config.hazard_detection.is_enabled(),
                config.forwarding,
                writeback_first,
            )),
            Stage::Execute(ExecuteStage::new(config.forwarding)),
            Stage::Memory(MemoryStage),
            Stage::WriteBack(WriteBackStage::new(trace)),
        ];
        Self::new(stages, ordering.clone())
    }

    /// Builds the non-pipelined machine: one stage, one instruction per cycle.
    pub fn single_cycle(trace: bool) -> Self {
        Self {
            stages: vec![Stage::SingleCycle(SingleCycleStage::new(trace))],
            execution_ordering: vec![0],
            registers: vec![PipelineRegister::Empty],
            fault: None,
        }
    }

    /// Builds the pipeline selected by `config.pipeline.mode`.
    pub fn from_config(config: &Config) -> Result<Self, SimError> {
        match config.pipeline.mode {
            PipelineMode::FiveStage => Self::five_stage(&config.pipeline, config.general.trace),
            PipelineMode::SingleCycle => Ok(Self::single_cycle(config.general.trace)),
        }
    }
}

impl<S: PipelineStage> fmt::Display for Pipeline<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (stage, reg) in self.stages.iter().zip(&self.registers) {
            match reg.instruction() {
                Some(inst) => writeln!(f, "{:>12} [{}]: {inst}", stage.name(), reg.label())?,
                None => writeln!(f, "{:>12}: --", stage.name())?,
            }
        }
        Ok(())
    }
}
