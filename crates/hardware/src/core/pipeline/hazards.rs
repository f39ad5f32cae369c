//! Data Hazard Detection and Forwarding.
//!
//! This module implements the logic for maintaining pipeline consistency when data
//! dependencies exist between instructions. It provides:
//! 1. **Hazard Detection:** Finds in-flight producers of a source register that Decode
//!    cannot see yet and that the datapath cannot bypass, which require a stall.
//! 2. **Operand Forwarding:** Resolves Read-After-Write (RAW) hazards in Execute by
//!    bypassing the register file with results held in later pipeline registers.
//!
//! Slots are counted from the consuming stage's input register: offset 1 is the
//! register its own previous output landed in, offset 2 the one after that.

use crate::core::pipeline::latches::PipelineRegister;
use crate::isa::instruction::Instruction;

/// Furthest producer offset the Execute stage bypass can reach.
pub const FORWARDING_REACH: usize = 2;

/// Checks whether the producer at `offset` slots past Decode's input can be forwarded
/// to the consumer by the time the consumer reaches Execute.
///
/// The immediately preceding instruction is forwardable unless its value only
/// appears after the Memory-Access stage (loads and CSR reads). The one before it
/// always is, since its final value sits in the MEM/WB register a cycle later.
fn forwardable(producer: &PipelineRegister, offset: usize) -> bool {
    match offset {
        1 => matches!(producer, PipelineRegister::Decode(e) if !e.ctrl.reads_late()),
        FORWARDING_REACH => true,
        _ => false,
    }
}

/// Checks if a pipeline stall is needed for the instruction being decoded.
///
/// Inspects the `window` registers after `input` for an in-flight write to a
/// register `inst` reads. A newer producer shadows older producers of the same
/// register, matching the value that would actually be read or forwarded.
///
/// # Arguments
///
/// * `inst` - The instruction in Decode.
/// * `registers` - The start-of-cycle pipeline registers.
/// * `input` - Slot of Decode's input register.
/// * `window` - Number of later slots whose results are not yet in the register file.
/// * `forwarding` - Whether Execute bypasses results from later registers.
///
/// # Returns
///
/// The slot of the conflicting producer, or `None` if the operands are safe.
pub fn stall_slot(
    inst: &Instruction,
    registers: &[PipelineRegister],
    input: usize,
    window: usize,
    forwarding: bool,
) -> Option<usize> {
    let mut seen = [false; crate::common::constants::REGISTER_COUNT];
    for offset in 1..=window {
        let slot = input + offset;
        let Some(producer) = registers.get(slot) else {
            break;
        };
        let Some(rd) = producer.write_register() else {
            continue;
        };
        if seen[rd] || !inst.reads(rd) {
            continue;
        }
        seen[rd] = true;
        if forwarding && forwardable(producer, offset) {
            continue;
        }
        return Some(slot);
    }
    None
}

/// Forwards a register value from later pipeline registers to Execute.
///
/// Checks the EX/MEM result first (most recent), then MEM/WB. The newest producer
/// of `reg` decides the value; if its result is not available yet the register
/// file value is kept.
///
/// # Arguments
///
/// * `reg` - Source register index.
/// * `value` - Value Decode read from the register file.
/// * `registers` - The start-of-cycle pipeline registers.
/// * `input` - Slot of Execute's input register.
///
/// # Returns
///
/// The most recent value of `reg` visible to Execute.
pub fn forward_operand(
    reg: usize,
    value: u32,
    registers: &[PipelineRegister],
    input: usize,
) -> u32 {
    for slot in input + 1..=input + FORWARDING_REACH {
        let Some(producer) = registers.get(slot) else {
            break;
        };
        if producer.write_register() != Some(reg) {
            continue;
        }
        let forwarded = match producer {
            PipelineRegister::Execute(e) => e.forwardable_value(),
            PipelineRegister::Memory(e) => Some(e.write_value()),
            _ => None,
        };
        if let Some(v) = forwarded {
            tracing::trace!(reg, slot, value = v, "forwarded operand");
        }
        return forwarded.unwrap_or(value);
    }
    value
}
