use crate::common::asm;
use crate::common::builder::register::{decoded, executed};
use archsim_core::common::error::ExecutionError;
use archsim_core::core::pipeline::PipelineStage;
use archsim_core::core::pipeline::hazards::FORWARDING_REACH;
use archsim_core::core::pipeline::latches::{ExMemEntry, FlushSignal, PipelineRegister};
use archsim_core::core::pipeline::stages::ExecuteStage;
use archsim_core::{ArchitecturalState, SimError};

fn execute(stage: ExecuteStage, regs: &[PipelineRegister], state: &mut ArchitecturalState) -> ExMemEntry {
    match stage.behavior(regs, Some(0), state) {
        Ok(PipelineRegister::Execute(entry)) => entry,
        other => panic!("expected EX/MEM, got {other:?}"),
    }
}

#[test]
fn test_alu_result() {
    let mut state = ArchitecturalState::new();
    state.registers.write(1, 40);
    let regs = [decoded(&mut state, 0, asm().addi(2, 1, 2).build())];
    let entry = execute(ExecuteStage::default(), &regs, &mut state);
    assert_eq!(entry.alu, 42);
    assert_eq!(entry.flush, None);
}

#[test]
fn test_taken_branch_redirects() {
    let mut state = ArchitecturalState::new();
    let regs = [decoded(&mut state, 0x20, asm().beq(0, 0, -8).build())];
    let entry = execute(ExecuteStage::default(), &regs, &mut state);

    assert!(entry.taken);
    assert_eq!(entry.target, 0x18);
    assert_eq!(entry.flush, Some(FlushSignal::redirect(0x18)));
    assert_eq!(state.stats.branches_taken, 1);
    assert_eq!(state.stats.procedure_calls, 0);
}

#[test]
fn test_not_taken_branch_falls_through() {
    let mut state = ArchitecturalState::new();
    state.registers.write(1, 1);
    let regs = [decoded(&mut state, 0x20, asm().blt(1, 0, 64).build())];
    let entry = execute(ExecuteStage::default(), &regs, &mut state);

    assert!(!entry.taken);
    assert_eq!(entry.flush, None);
    assert_eq!(state.stats.branches_taken, 0);
}

#[test]
fn test_jalr_clears_low_bit() {
    let mut state = ArchitecturalState::new();
    state.registers.write(5, 0x101);
    let regs = [decoded(&mut state, 0, asm().jalr(1, 5, 2).build())];
    let entry = execute(ExecuteStage::default(), &regs, &mut state);

    assert_eq!(entry.target, 0x102);
    assert_eq!(entry.forwardable_value(), Some(4));
    assert_eq!(entry.flush.and_then(|f| f.address), Some(0x102));
    assert_eq!(state.stats.procedure_calls, 1);
}

#[test]
fn test_forwarding_reads_later_registers() {
    let mut state = ArchitecturalState::new();
    let regs = [
        decoded(&mut state, 4, asm().add(2, 1, 1).build()),
        executed(&mut state, 0, asm().addi(1, 0, 5).build()),
    ];
    assert_eq!(execute(ExecuteStage::new(true), &regs, &mut state).alu, 10);
    assert_eq!(execute(ExecuteStage::new(false), &regs, &mut state).alu, 0);
}

#[test]
fn test_environment_calls_are_unsupported() {
    let mut state = ArchitecturalState::new();
    let regs = [decoded(&mut state, 0x8, asm().ecall().build())];
    assert_eq!(
        ExecuteStage::default().behavior(&regs, Some(0), &mut state),
        Err(SimError::Execution {
            address: 0x8,
            instruction: "ecall".into(),
            source: ExecutionError::Unsupported("ecall")
        })
    );
}

#[test]
fn test_forwarding_widens_the_window() {
    assert_eq!(ExecuteStage::new(true).hazard_window(), FORWARDING_REACH);
    assert_eq!(ExecuteStage::new(false).hazard_window(), 0);
}
