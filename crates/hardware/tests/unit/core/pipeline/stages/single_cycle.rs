use crate::common::{TestContext, asm};

#[test]
fn test_one_instruction_per_cycle() {
    let program = [asm().addi(1, 0, 5).build(), asm().add(2, 1, 1).build()];
    let mut ctx = TestContext::new().single_cycle().load_program(&program);
    let cycles = ctx.run_to_completion().unwrap();

    assert_eq!(ctx.get_reg(2), 10);
    assert_eq!(cycles, 3);
    assert_eq!(ctx.state().stats.instructions_retired, 2);
    assert_eq!(ctx.state().stats.stalls_data, 0);
}

#[test]
fn test_holds_the_last_retired_instruction() {
    let mut ctx = TestContext::new()
        .single_cycle()
        .load_program(&[asm().addi(1, 0, 5).build()]);
    ctx.step().unwrap();
    assert_eq!(ctx.slot(0).label(), "WB");
    assert_eq!(ctx.slot(0).address(), Some(0));
    assert!(!ctx.sim.is_done());
    ctx.step().unwrap();
    assert!(ctx.sim.is_done());
}

#[test]
fn test_branches_redirect_before_the_next_fetch() {
    let program = [
        asm().beq(0, 0, 8).build(),
        asm().addi(1, 0, 1).build(),
        asm().addi(2, 0, 2).build(),
    ];
    let mut ctx = TestContext::new().single_cycle().load_program(&program);
    let cycles = ctx.run_to_completion().unwrap();

    assert_eq!((ctx.get_reg(1), ctx.get_reg(2)), (0, 2));
    assert_eq!(cycles, 3);
    assert_eq!(ctx.state().stats.branches_taken, 1);
    assert_eq!(ctx.state().stats.flushes_control, 0);
}

#[test]
fn test_memory_round_trip() {
    let program = [
        asm().lui(1, 4).build(),
        asm().addi(2, 0, -1).build(),
        asm().sb(1, 2, 3).build(),
        asm().lbu(3, 1, 3).build(),
        asm().lb(4, 1, 3).build(),
    ];
    let mut ctx = TestContext::new().single_cycle().load_program(&program);
    let _ = ctx.run_to_completion().unwrap();

    assert_eq!(ctx.get_reg(3), 0xFF);
    assert_eq!(ctx.get_reg(4), 0xFFFF_FFFF);
    assert_eq!(ctx.mem_word(0x4000), 0xFF00_0000);
}
