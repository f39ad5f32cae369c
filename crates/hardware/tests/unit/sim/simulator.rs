use crate::common::{TestContext, asm};
use archsim_core::common::error::ExecutionError;
use archsim_core::config::{Config, PipelineMode};
use archsim_core::sim::loader::Program;
use archsim_core::{SimError, Simulator};
use rstest::rstest;

fn memory_fault() -> SimError {
    SimError::Execution {
        address: 4,
        instruction: "lw x1, 0(x0)".into(),
        source: ExecutionError::MemoryAccess {
            address: 0,
            min: 0x4000,
            max: 0xFFFF_FFFF,
        },
    }
}

#[rstest]
#[case(PipelineMode::FiveStage)]
#[case(PipelineMode::SingleCycle)]
fn test_memory_fault_is_reported(#[case] mode: PipelineMode) {
    let mut config = Config::default();
    config.pipeline.mode = mode;
    let program = [asm().addi(1, 1, 1).build(), asm().lw(1, 0, 0).build()];
    let mut sim = Simulator::new(&config, &program).unwrap();

    assert_eq!(sim.run(), Err(memory_fault()));
    assert_eq!(sim.fault(), Some(&memory_fault()));
    assert_eq!(sim.register(1), 1);
}

#[test]
fn test_fault_halts_forward_progress() {
    let program = [asm().addi(1, 1, 1).build(), asm().lw(1, 0, 0).build()];
    let mut ctx = TestContext::new().load_program(&program);
    assert!(ctx.run_to_completion().is_err());

    let cycles = ctx.state().stats.cycles;
    let pipeline = ctx.pipeline().registers().to_vec();
    assert_eq!(ctx.step(), Err(memory_fault()));
    assert_eq!(ctx.step(), Err(memory_fault()));
    assert_eq!(ctx.state().stats.cycles, cycles);
    assert_eq!(ctx.pipeline().registers(), pipeline.as_slice());
    assert!(!ctx.sim.is_done());
}

#[test]
fn test_cycle_limit() {
    let mut config = Config::default();
    config.general.max_cycles = 50;
    let mut sim = Simulator::new(&config, &[asm().beq(0, 0, 0).build()]).unwrap();
    assert_eq!(sim.run(), Err(SimError::CycleLimit { cycles: 50 }));
    assert_eq!(sim.stats().cycles, 50);
    assert!(sim.fault().is_none());
}

#[test]
fn test_zero_limit_runs_to_completion() {
    let mut config = Config::default();
    config.general.max_cycles = 0;
    let mut sim = Simulator::new(&config, &[asm().addi(1, 0, 1).build()]).unwrap();
    sim.run().unwrap();
    assert_eq!(sim.register(1), 1);
}

#[test]
fn test_decode_fault_after_older_instructions_retire() {
    let program = [asm().addi(1, 0, 7).build(), 0xFFFF_FFFF];
    let mut ctx = TestContext::new().load_program(&program);
    assert_eq!(
        ctx.run_to_completion(),
        Err(SimError::Decode {
            address: 4,
            word: 0xFFFF_FFFF
        })
    );
    assert_eq!(ctx.get_reg(1), 7);
    assert_eq!(ctx.sim.fault().and_then(SimError::address), Some(4));
}

#[test]
fn test_wrong_path_garbage_never_faults() {
    let program = [
        asm().beq(0, 0, 8).build(),
        0xFFFF_FFFF,
        asm().addi(1, 0, 1).build(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    let _ = ctx.run_to_completion().unwrap();
    assert_eq!(ctx.get_reg(1), 1);
}

#[test]
fn test_unsupported_environment_call() {
    let mut ctx = TestContext::new().load_program(&[asm().ebreak().build()]);
    assert!(matches!(
        ctx.run_to_completion(),
        Err(SimError::Execution {
            address: 0,
            source: ExecutionError::Unsupported("ebreak"),
            ..
        })
    ));
}

#[test]
fn test_invalid_ordering_is_a_construction_error() {
    let mut config = Config::default();
    config.pipeline.execution_ordering = vec![0, 0, 1, 2, 3];
    assert!(matches!(
        Simulator::new(&config, &[]),
        Err(SimError::Configuration(_))
    ));
}

#[test]
fn test_program_entry_and_start_pc() {
    let mut config = Config::default();
    config.general.start_pc = 0x100;
    let mut sim = Simulator::new(&config, &[asm().addi(1, 0, 3).build()]).unwrap();
    assert_eq!(sim.pc(), 0x100);
    sim.run().unwrap();
    assert_eq!(sim.register(1), 3);
    assert_eq!(sim.pc(), 0x104);

    let program = Program::from_words(0x800, vec![asm().addi(2, 0, 4).build()]);
    let mut sim = Simulator::from_program(&Config::default(), &program).unwrap();
    assert_eq!(sim.pc(), 0x800);
    sim.run().unwrap();
    assert_eq!(sim.register(2), 4);
}

#[test]
fn test_counters_are_readable() {
    let program = [
        asm().addi(1, 0, 1).build(),
        asm().addi(2, 0, 2).build(),
        asm().csrrs(3, 0xC02, 0).build(),
        asm().csrrs(4, 0xC00, 0).build(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    let _ = ctx.run_to_completion().unwrap();

    // csrrs instret reads in MEM while the two addi have retired.
    assert_eq!(ctx.get_reg(3), 2);
    assert!(ctx.get_reg(4) >= 6);
}

#[test]
fn test_accessors() {
    let mut ctx = TestContext::new().load_program(&[asm().addi(5, 0, 9).build()]);
    assert!(ctx.sim.is_empty());
    ctx.step().unwrap();
    assert!(!ctx.sim.is_empty());
    let _ = ctx.run_to_completion().unwrap();
    assert_eq!(ctx.sim.registers().read(5), 9);
    assert_eq!(ctx.sim.memory_word(0), None);
    assert_eq!(ctx.sim.memory_word(0x4000), Some(0));
}
