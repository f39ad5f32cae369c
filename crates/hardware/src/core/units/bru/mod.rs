//! Branch Resolution Unit (BRU).
//!
//! Evaluates conditional branch comparisons and computes control-flow targets.
//! Fetch statically predicts every branch and jump as not taken; the BRU supplies
//! the actual outcome that Execute compares against that prediction.

use crate::core::pipeline::signals::BranchCond;

/// Prediction made by Fetch for every instruction: fall through.
pub const STATIC_PREDICTION_TAKEN: bool = false;

/// Branch Resolution Unit.
#[derive(Debug)]
pub struct Bru;

impl Bru {
    /// Evaluates a branch condition.
    ///
    /// # Arguments
    ///
    /// * `cond` - The comparison to perform.
    /// * `a`    - Value of `rs1`.
    /// * `b`    - Value of `rs2`.
    ///
    /// # Returns
    ///
    /// `true` if the branch is taken.
    pub const fn taken(cond: BranchCond, a: u32, b: u32) -> bool {
        match cond {
            BranchCond::Eq => a == b,
            BranchCond::Ne => a != b,
            BranchCond::Lt => (a as i32) < (b as i32),
            BranchCond::Ge => (a as i32) >= (b as i32),
            BranchCond::Ltu => a < b,
            BranchCond::Geu => a >= b,
        }
    }

    /// PC-relative target of a branch or `JAL`.
    pub const fn relative_target(pc: u32, imm: i32) -> u32 {
        pc.wrapping_add(imm as u32)
    }

    /// Target of a `JALR`: the ALU sum with bit 0 cleared.
    pub const fn register_target(alu_result: u32) -> u32 {
        alu_result & !1
    }
}
