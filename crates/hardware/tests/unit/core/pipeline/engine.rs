use crate::common::builder::register::{decoded, executed, fetched, with_flush};
use crate::common::mocks::stage::{MockStage, emitting, with_window};
use crate::common::{TestContext, asm};
use archsim_core::config::{Config, PipelineMode};
use archsim_core::core::pipeline::{FlushKind, FlushSignal, Pipeline, PipelineRegister, Stage};
use archsim_core::{ArchitecturalState, SimError};

fn build(stages: Vec<MockStage>, ordering: Vec<usize>) -> Result<Pipeline<MockStage>, SimError> {
    Pipeline::new(stages, ordering)
}

#[test]
fn test_rejects_empty_pipeline() {
    assert!(matches!(
        build(vec![], vec![]),
        Err(SimError::Configuration(_))
    ));
}

#[test]
fn test_rejects_bad_orderings() {
    let stages = || vec![with_window(0), with_window(0), with_window(0)];
    for ordering in [vec![0, 1], vec![0, 1, 1], vec![0, 1, 3], vec![0, 1, 2, 0]] {
        assert!(
            matches!(build(stages(), ordering.clone()), Err(SimError::Configuration(_))),
            "ordering {ordering:?} accepted"
        );
    }
    assert!(build(stages(), vec![2, 0, 1]).is_ok());
}

#[test]
fn test_rejects_window_past_the_last_slot() {
    let too_wide = build(vec![with_window(0), with_window(3), with_window(0)], vec![0, 1, 2]);
    assert!(matches!(too_wide, Err(SimError::Configuration(msg)) if msg.contains("slot 3")));

    let fits = build(vec![with_window(0), with_window(2), with_window(0)], vec![0, 1, 2]);
    assert!(fits.is_ok());
}

#[test]
fn test_five_stage_construction_checks_ordering() {
    let mut config = Config::default();
    config.pipeline.execution_ordering = vec![4, 0, 1, 2];
    assert!(matches!(
        Pipeline::from_config(&config),
        Err(SimError::Configuration(_))
    ));

    config.pipeline.execution_ordering = vec![0, 1, 2, 3, 4];
    let pipeline = Pipeline::from_config(&config).unwrap();
    assert_eq!(pipeline.stages().len(), 5);
    assert_eq!(pipeline.execution_ordering(), &[0, 1, 2, 3, 4]);
    assert!(matches!(pipeline.stages()[1], Stage::Decode(d) if d.window == 3));
}

#[test]
fn test_single_cycle_shape() {
    let mut config = Config::default();
    config.pipeline.mode = PipelineMode::SingleCycle;
    let pipeline = Pipeline::from_config(&config).unwrap();
    assert_eq!(pipeline.stages().len(), 1);
    assert_eq!(pipeline.registers().len(), 1);
}

#[test]
fn test_stages_see_start_of_cycle_registers() {
    let mut first = MockStage::new();
    let _ = first
        .expect_behavior()
        .returning(|_, _, _| Ok(fetched(0, asm().nop().build())));
    let _ = first.expect_hazard_window().return_const(0usize);

    let mut second = MockStage::new();
    // Called after `first` in the same cycle, yet its input is still empty.
    let _ = second
        .expect_behavior()
        .times(1)
        .withf(|regs, input, _| *input == Some(0) && regs[0].is_empty())
        .returning(|_, _, _| Ok(PipelineRegister::Empty));
    let _ = second.expect_hazard_window().return_const(0usize);

    let mut pipeline = build(vec![first, second], vec![0, 1]).unwrap();
    let mut state = ArchitecturalState::new();
    pipeline.step(&mut state).unwrap();
    assert_eq!(pipeline.registers()[0].label(), "IF");
    assert!(pipeline.registers()[1].is_empty());
}

#[test]
fn test_first_stage_has_no_input() {
    let mut stage = MockStage::new();
    let _ = stage
        .expect_behavior()
        .withf(|_, input, _| input.is_none())
        .returning(|_, _, _| Ok(PipelineRegister::Empty));
    let _ = stage.expect_hazard_window().return_const(0usize);

    let mut pipeline = build(vec![stage], vec![0]).unwrap();
    pipeline.step(&mut ArchitecturalState::new()).unwrap();
    assert!(pipeline.is_empty());
}

/// Three stages: IF output, an ID/EX stall request and an EX/MEM redirect.
fn flushing_pipeline(execute_flushes: bool) -> Pipeline<MockStage> {
    let mut state = ArchitecturalState::new();
    let word = asm().addi(1, 0, 1).build();
    let stall = with_flush(
        decoded(&mut state, 0x10, word),
        FlushSignal::stall(0x10),
    );
    let ex = executed(&mut state, 0x08, word);
    let ex = if execute_flushes {
        with_flush(ex, FlushSignal::redirect(0x80))
    } else {
        ex
    };
    build(
        vec![
            emitting(fetched(0x14, word)),
            emitting(stall),
            emitting(ex),
        ],
        vec![0, 1, 2],
    )
    .unwrap()
}

#[test]
fn test_stall_flush_clears_through_its_own_slot() {
    let mut pipeline = flushing_pipeline(false);
    let mut state = ArchitecturalState::new();
    state.program_counter = 0x18;

    pipeline.step(&mut state).unwrap();

    let regs = pipeline.registers();
    assert!(regs[0].is_empty());
    assert!(regs[1].is_empty());
    assert_eq!(regs[2].label(), "EX");
    assert_eq!(state.program_counter, 0x10);
    assert_eq!(state.stats.stalls_data, 1);
    assert_eq!(state.stats.flushes_control, 0);
}

#[test]
fn test_flush_nearest_writeback_wins() {
    let mut pipeline = flushing_pipeline(true);
    let mut state = ArchitecturalState::new();

    pipeline.step(&mut state).unwrap();

    let regs = pipeline.registers();
    assert!(regs[0].is_empty());
    assert!(regs[1].is_empty());
    assert_eq!(regs[2].address(), Some(0x08));
    assert_eq!(state.program_counter, 0x80);
    assert_eq!(state.stats.stalls_data, 0);
    assert_eq!(state.stats.flushes_control, 1);
}

#[test]
fn test_flush_without_address_keeps_pc() {
    let mut state = ArchitecturalState::new();
    let reg = with_flush(
        decoded(&mut state, 0, asm().nop().build()),
        FlushSignal {
            kind: FlushKind::Redirect,
            inclusive: false,
            address: None,
        },
    );
    let mut pipeline = build(vec![emitting(fetched(4, asm().nop().build())), emitting(reg)], vec![1, 0])
        .unwrap();
    state.program_counter = 0x44;

    pipeline.step(&mut state).unwrap();

    assert_eq!(state.program_counter, 0x44);
    assert!(pipeline.registers()[0].is_empty());
    assert_eq!(pipeline.registers()[1].label(), "ID");
}

#[test]
fn test_stage_fault_leaves_registers_unchanged() {
    let mut failing = MockStage::new();
    let _ = failing
        .expect_behavior()
        .times(1)
        .returning(|_, _, _| Err(SimError::Configuration("boom".into())));
    let _ = failing.expect_hazard_window().return_const(0usize);

    let mut pipeline = build(
        vec![emitting(fetched(0, asm().nop().build())), failing],
        vec![0, 1],
    )
    .unwrap();
    let mut state = ArchitecturalState::new();

    assert_eq!(
        pipeline.step(&mut state),
        Err(SimError::Configuration("boom".into()))
    );
    assert!(pipeline.is_empty());

    // The failing stage is not called again.
    assert_eq!(
        pipeline.step(&mut state),
        Err(SimError::Configuration("boom".into()))
    );
    assert_eq!(pipeline.fault(), Some(&SimError::Configuration("boom".into())));
}

#[test]
fn test_bare_pipeline_stops_after_a_memory_fault() {
    let config = Config::default();
    let program = [asm().addi(1, 0, 1).build(), asm().lw(2, 0, 0).build()];
    let mut state = ArchitecturalState::with_program(&config, &program);
    let mut pipeline = Pipeline::from_config(&config).unwrap();

    let fault = loop {
        if let Err(e) = pipeline.step(&mut state) {
            break e;
        }
        assert!(!pipeline.is_done(&state), "ran to completion without a fault");
    };
    assert!(matches!(fault, SimError::Execution { address: 4, .. }));
    let retired = state.stats.instructions_retired;
    let pc = state.program_counter;
    assert_eq!(retired, 1);
    assert_eq!(state.register(1), 1);

    for _ in 0..3 {
        assert_eq!(pipeline.step(&mut state), Err(fault.clone()));
    }
    assert_eq!(state.stats.instructions_retired, retired);
    assert_eq!(state.program_counter, pc);
    assert_eq!(pipeline.fault(), Some(&fault));
}

#[test]
fn test_flush_kind_selects_the_counter() {
    let mut state = ArchitecturalState::new();
    let reg = with_flush(
        decoded(&mut state, 0, asm().nop().build()),
        FlushSignal::redirect(0x40),
    );
    let mut pipeline = build(
        vec![emitting(fetched(4, asm().nop().build())), emitting(reg)],
        vec![0, 1],
    )
    .unwrap();

    pipeline.step(&mut state).unwrap();

    assert_eq!(state.program_counter, 0x40);
    assert_eq!(state.stats.flushes_control, 1);
    assert_eq!(state.stats.stalls_data, 0);
}

#[test]
fn test_is_done_waits_for_the_last_retirement() {
    let mut ctx = TestContext::new().load_program(&[asm().addi(1, 0, 1).build()]);
    assert!(ctx.pipeline().is_empty());
    assert!(!ctx.sim.is_done());

    // IF, ID, EX, MEM, WB, then one cycle for the WB register to drain.
    for _ in 0..5 {
        ctx.step().unwrap();
        assert!(!ctx.sim.is_done());
    }
    assert_eq!(ctx.slot(4).label(), "WB");
    ctx.step().unwrap();
    assert!(ctx.sim.is_done());
    assert!(ctx.sim.is_done());
    assert_eq!(ctx.get_reg(1), 1);
}

#[test]
fn test_empty_program_is_done_immediately() {
    let mut ctx = TestContext::new();
    assert!(ctx.sim.is_done());
    assert_eq!(ctx.run_to_completion().unwrap(), 0);
}

#[test]
fn test_display_lists_every_stage() {
    let mut ctx = TestContext::new().load_program(&[asm().addi(1, 0, 1).build()]);
    ctx.step().unwrap();
    let text = ctx.pipeline().to_string();
    assert!(text.contains("fetch [IF]: addi x1, x0, 1"));
    assert!(text.contains("writeback: --"));
    assert_eq!(text.lines().count(), 5);
}
