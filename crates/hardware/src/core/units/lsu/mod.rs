//! Load/Store Unit (LSU).
//!
//! This module provides the Load/Store Unit used by the Memory-Access stage.
//! It sizes each access by its `MemWidth` and applies sign or zero extension
//! to loaded values.

use crate::common::error::ExecutionError;
use crate::core::pipeline::signals::MemWidth;
use crate::soc::memory::DataMemory;

/// Load/Store Unit (LSU) for memory operations.
#[derive(Debug)]
pub struct Lsu;

impl Lsu {
    /// Performs a load.
    ///
    /// # Arguments
    ///
    /// * `mem`    - Data memory to read.
    /// * `addr`   - Effective address.
    /// * `width`  - Access width.
    /// * `signed` - Sign-extend the loaded value to 32 bits.
    ///
    /// # Returns
    ///
    /// The extended value, or the memory fault. A `Nop` width reads nothing and yields 0.
    pub fn load(
        mem: &DataMemory,
        addr: u32,
        width: MemWidth,
        signed: bool,
    ) -> Result<u32, ExecutionError> {
        let raw = match width {
            MemWidth::Nop => return Ok(0),
            MemWidth::Byte | MemWidth::Half | MemWidth::Word => mem.read(addr, width.bytes())?,
        };
        Ok(match (width, signed) {
            (MemWidth::Byte, true) => raw as u8 as i8 as i32 as u32,
            (MemWidth::Half, true) => raw as u16 as i16 as i32 as u32,
            _ => raw,
        })
    }

    /// Performs a store of the low `width` bytes of `val`.
    ///
    /// # Returns
    ///
    /// The memory fault if any byte is out of range; nothing is written in that case.
    pub fn store(
        mem: &mut DataMemory,
        addr: u32,
        width: MemWidth,
        val: u32,
    ) -> Result<(), ExecutionError> {
        match width {
            MemWidth::Nop => Ok(()),
            MemWidth::Byte | MemWidth::Half | MemWidth::Word => {
                mem.write(addr, width.bytes(), val)
            }
        }
    }
}
