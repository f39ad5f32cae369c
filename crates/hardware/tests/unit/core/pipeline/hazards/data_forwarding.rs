use crate::common::builder::register::{accessed, executed};
use crate::common::{TestContext, asm};
use archsim_core::ArchitecturalState;
use archsim_core::core::pipeline::PipelineRegister;
use archsim_core::core::pipeline::hazards::forward_operand;

#[test]
fn test_forwarding_removes_alu_stalls() {
    let program = [asm().addi(1, 0, 5).build(), asm().add(2, 1, 1).build()];
    let mut ctx = TestContext::new().forwarding(true).load_program(&program);
    let cycles = ctx.run_to_completion().unwrap();

    assert_eq!(ctx.get_reg(2), 10);
    assert_eq!(ctx.state().stats.stalls_data, 0);
    assert_eq!(cycles, 7);
}

#[test]
fn test_back_to_back_chain() {
    let program = [
        asm().addi(1, 0, 1).build(),
        asm().addi(1, 1, 1).build(),
        asm().addi(1, 1, 1).build(),
        asm().addi(1, 1, 1).build(),
        asm().slli(2, 1, 4).build(),
    ];
    let mut ctx = TestContext::new().forwarding(true).load_program(&program);
    let _ = ctx.run_to_completion().unwrap();

    assert_eq!(ctx.get_reg(1), 4);
    assert_eq!(ctx.get_reg(2), 64);
    assert_eq!(ctx.state().stats.stalls_data, 0);
}

#[test]
fn test_newest_value_wins() {
    let program = [
        asm().addi(1, 0, 1).build(),
        asm().addi(1, 0, 2).build(),
        asm().add(2, 1, 1).build(),
    ];
    let mut ctx = TestContext::new().forwarding(true).load_program(&program);
    let _ = ctx.run_to_completion().unwrap();
    assert_eq!(ctx.get_reg(2), 4);
}

#[test]
fn test_forwarded_store_data() {
    let program = [
        asm().lui(2, 4).build(),
        asm().addi(1, 0, 0x55).build(),
        asm().sw(2, 1, 8).build(),
    ];
    let mut ctx = TestContext::new().forwarding(true).load_program(&program);
    let _ = ctx.run_to_completion().unwrap();
    assert_eq!(ctx.mem_word(0x4008), 0x55);
    assert_eq!(ctx.state().stats.stalls_data, 0);
}

#[test]
fn test_forward_operand_prefers_ex_mem() {
    let mut state = ArchitecturalState::new();
    let regs = [
        PipelineRegister::Empty,
        executed(&mut state, 8, asm().addi(1, 0, 7).build()),
        accessed(&mut state, 4, asm().addi(1, 0, 3).build()),
    ];
    assert_eq!(forward_operand(1, 99, &regs, 0), 7);
    assert_eq!(forward_operand(2, 99, &regs, 0), 99);
}

#[test]
fn test_forward_operand_from_mem_wb() {
    let mut state = ArchitecturalState::new();
    let regs = [
        PipelineRegister::Empty,
        PipelineRegister::Empty,
        accessed(&mut state, 4, asm().addi(1, 0, 3).build()),
    ];
    assert_eq!(forward_operand(1, 0, &regs, 0), 3);
    // Slots beyond the bypass reach are ignored.
    assert_eq!(forward_operand(1, 0, &regs[..2], 0), 0);
}
