use crate::common::{TestContext, asm};

#[test]
fn test_taken_branch_squashes_two_instructions() {
    let program = [
        asm().beq(0, 0, 12).build(),
        asm().addi(1, 0, 1).build(),
        asm().addi(2, 0, 2).build(),
        asm().addi(3, 0, 3).build(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    let _ = ctx.run_to_completion().unwrap();

    assert_eq!(ctx.get_reg(1), 0);
    assert_eq!(ctx.get_reg(2), 0);
    assert_eq!(ctx.get_reg(3), 3);
    let stats = &ctx.state().stats;
    assert_eq!(stats.branches_taken, 1);
    assert_eq!(stats.flushes_control, 1);
    assert_eq!(stats.instructions_retired, 2);
}

#[test]
fn test_not_taken_branch_costs_nothing() {
    let program = [
        asm().bne(0, 0, 12).build(),
        asm().addi(1, 0, 1).build(),
        asm().addi(2, 0, 2).build(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    let cycles = ctx.run_to_completion().unwrap();

    assert_eq!((ctx.get_reg(1), ctx.get_reg(2)), (1, 2));
    assert_eq!(ctx.state().stats.branches_taken, 0);
    assert_eq!(ctx.state().stats.flushes_control, 0);
    assert_eq!(cycles, 8);
}

#[test]
fn test_redirect_happens_in_execute() {
    let program = [
        asm().beq(0, 0, 12).build(),
        asm().addi(1, 0, 1).build(),
        asm().addi(2, 0, 2).build(),
        asm().addi(3, 0, 3).build(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    ctx.run(3);

    assert!(ctx.slot(0).is_empty());
    assert!(ctx.slot(1).is_empty());
    assert_eq!(ctx.slot(2).label(), "EX");
    assert_eq!(ctx.state().pc(), 12);
}

#[test]
fn test_control_flush_overrides_a_simultaneous_stall() {
    let program = [
        asm().addi(1, 0, 1).build(),
        asm().beq(0, 0, 8).build(),
        asm().add(2, 1, 1).build(),
        asm().addi(3, 0, 3).build(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    let _ = ctx.run_to_completion().unwrap();

    assert_eq!(ctx.get_reg(1), 1);
    assert_eq!(ctx.get_reg(2), 0);
    assert_eq!(ctx.get_reg(3), 3);
    assert_eq!(ctx.state().stats.stalls_data, 0);
    assert_eq!(ctx.state().stats.flushes_control, 1);
}

#[test]
fn test_jal_and_jalr_link_and_return() {
    // 0: jal x1, 12 ; 4: addi x5, x0, 5 ; 8: jal x0, 12 ; 12: addi x6, x0, 6 ; 16: jalr x0, 0(x1)
    let program = [
        asm().jal(1, 12).build(),
        asm().addi(5, 0, 5).build(),
        asm().jal(0, 12).build(),
        asm().addi(6, 0, 6).build(),
        asm().jalr(0, 1, 0).build(),
    ];
    let mut ctx = TestContext::new().forwarding(true).load_program(&program);
    let _ = ctx.run_to_completion().unwrap();

    assert_eq!(ctx.get_reg(1), 4);
    assert_eq!(ctx.get_reg(5), 5);
    assert_eq!(ctx.get_reg(6), 6);
    assert_eq!(ctx.state().stats.procedure_calls, 3);
    assert_eq!(ctx.state().stats.flushes_control, 3);
    assert_eq!(ctx.state().stats.branches_taken, 0);
    assert_eq!(ctx.state().pc(), 20);
}

#[test]
fn test_squashed_stores_never_reach_memory() {
    let program = [
        asm().lui(10, 4).build(),
        asm().addi(5, 0, 9).build(),
        asm().nop().build(),
        asm().nop().build(),
        asm().beq(0, 0, 12).build(),
        // Wrong path: both stores target valid addresses.
        asm().sw(10, 5, 0).build(),
        asm().sb(10, 5, 8).build(),
        asm().addi(3, 0, 3).build(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    let _ = ctx.run_to_completion().unwrap();

    assert_eq!(ctx.state().memory.written_bytes().count(), 0);
    assert_eq!(ctx.get_reg(3), 3);
    assert_eq!(ctx.get_reg(5), 9);
    assert_eq!(ctx.state().stats.flushes_control, 1);
    assert_eq!(ctx.state().stats.instructions_retired, 6);
}
