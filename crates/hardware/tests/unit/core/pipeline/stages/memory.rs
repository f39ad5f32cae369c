use crate::common::asm;
use crate::common::builder::register::executed;
use archsim_core::common::error::ExecutionError;
use archsim_core::core::arch::csr;
use archsim_core::core::pipeline::PipelineStage;
use archsim_core::core::pipeline::latches::PipelineRegister;
use archsim_core::core::pipeline::stages::MemoryStage;
use archsim_core::{ArchitecturalState, SimError};

fn access(state: &mut ArchitecturalState, word: u32) -> Result<PipelineRegister, SimError> {
    let regs = [executed(state, 0x10, word)];
    MemoryStage.behavior(&regs, Some(0), state)
}

fn mem_data(out: Result<PipelineRegister, SimError>) -> u32 {
    match out {
        Ok(PipelineRegister::Memory(entry)) => entry.mem_data,
        other => panic!("expected MEM/WB, got {other:?}"),
    }
}

#[test]
fn test_load_and_store() {
    let mut state = ArchitecturalState::new();
    state.registers.write(1, 0x4000);
    state.registers.write(2, 0xCAFE_F00D);

    let _ = mem_data(access(&mut state, asm().sw(1, 2, 4).build()));
    assert_eq!(state.memory.load_word(0x4004).unwrap(), 0xCAFE_F00D);
    assert_eq!(mem_data(access(&mut state, asm().lh(3, 1, 4).build())), 0xFFFF_F00D);
}

#[test]
fn test_access_below_window_faults() {
    let mut state = ArchitecturalState::new();
    let err = access(&mut state, asm().lw(1, 0, 0).build()).unwrap_err();
    assert_eq!(
        err,
        SimError::Execution {
            address: 0x10,
            instruction: "lw x1, 0(x0)".into(),
            source: ExecutionError::MemoryAccess {
                address: 0,
                min: 0x4000,
                max: 0xFFFF_FFFF
            }
        }
    );
}

#[test]
fn test_alu_instructions_pass_through() {
    let mut state = ArchitecturalState::new();
    let out = access(&mut state, asm().addi(1, 0, 3).build()).unwrap();
    let PipelineRegister::Memory(entry) = out else {
        panic!("expected MEM/WB");
    };
    assert_eq!(entry.alu, 3);
    assert_eq!(entry.write_value(), 3);
}

#[test]
fn test_csr_read_modify_write() {
    let mut state = ArchitecturalState::new();
    state.csrs.write(csr::MSCRATCH, 0b1100).unwrap();
    state.registers.write(1, 0b0110);

    assert_eq!(mem_data(access(&mut state, asm().csrrs(2, 0x340, 1).build())), 0b1100);
    assert_eq!(state.csrs.read(csr::MSCRATCH), 0b1110);

    assert_eq!(mem_data(access(&mut state, asm().csrrci(2, 0x340, 0b0010).build())), 0b1110);
    assert_eq!(state.csrs.read(csr::MSCRATCH), 0b1100);

    assert_eq!(mem_data(access(&mut state, asm().csrrw(2, 0x340, 0).build())), 0b1100);
    assert_eq!(state.csrs.read(csr::MSCRATCH), 0);
}

#[test]
fn test_counters_mirror_statistics() {
    let mut state = ArchitecturalState::new();
    state.stats.cycles = 17;
    state.stats.instructions_retired = 9;
    assert_eq!(mem_data(access(&mut state, asm().csrrs(1, 0xC00, 0).build())), 17);
    assert_eq!(mem_data(access(&mut state, asm().csrrs(1, 0xC02, 0).build())), 9);
}

#[test]
fn test_writing_a_counter_faults() {
    let mut state = ArchitecturalState::new();
    state.registers.write(1, 5);
    let err = access(&mut state, asm().csrrw(0, 0xC00, 1).build()).unwrap_err();
    assert!(matches!(
        err,
        SimError::Execution {
            source: ExecutionError::ReadOnlyCsr(0xC00),
            ..
        }
    ));
}
