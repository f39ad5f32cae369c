use archsim_core::common::error::ExecutionError;
use archsim_core::core::pipeline::signals::MemWidth;
use archsim_core::core::units::lsu::Lsu;
use archsim_core::soc::memory::DataMemory;

const BASE: u32 = 0x4000;

fn memory() -> DataMemory {
    let mut mem = DataMemory::new(BASE, 0x100);
    mem.store_word(BASE, 0x8081_F0FF).unwrap();
    mem
}

#[test]
fn test_signed_and_unsigned_loads() {
    let mem = memory();
    assert_eq!(Lsu::load(&mem, BASE, MemWidth::Byte, true).unwrap(), 0xFFFF_FFFF);
    assert_eq!(Lsu::load(&mem, BASE, MemWidth::Byte, false).unwrap(), 0xFF);
    assert_eq!(Lsu::load(&mem, BASE + 2, MemWidth::Half, true).unwrap(), 0xFFFF_8081);
    assert_eq!(Lsu::load(&mem, BASE + 2, MemWidth::Half, false).unwrap(), 0x8081);
    assert_eq!(Lsu::load(&mem, BASE, MemWidth::Word, true).unwrap(), 0x8081_F0FF);
}

#[test]
fn test_stores_truncate_to_width() {
    let mut mem = memory();
    Lsu::store(&mut mem, BASE, MemWidth::Byte, 0x1234_5678).unwrap();
    assert_eq!(mem.load_word(BASE).unwrap(), 0x8081_F078);
    Lsu::store(&mut mem, BASE + 2, MemWidth::Half, 0xAAAA_BBBB).unwrap();
    assert_eq!(mem.load_word(BASE).unwrap(), 0xBBBB_F078);
}

#[test]
fn test_nop_width_touches_nothing() {
    let mut mem = memory();
    assert_eq!(Lsu::load(&mem, 0, MemWidth::Nop, false), Ok(0));
    assert_eq!(Lsu::store(&mut mem, 0, MemWidth::Nop, 1), Ok(()));
}

#[test]
fn test_out_of_window_access() {
    let mem = memory();
    assert_eq!(
        Lsu::load(&mem, BASE - 1, MemWidth::Byte, false),
        Err(ExecutionError::MemoryAccess {
            address: BASE - 1,
            min: BASE,
            max: BASE + 0xFF
        })
    );
    // A word straddling the top of the window reports the first missing byte.
    assert_eq!(
        Lsu::load(&mem, BASE + 0xFE, MemWidth::Word, false),
        Err(ExecutionError::MemoryAccess {
            address: BASE + 0x100,
            min: BASE,
            max: BASE + 0xFF
        })
    );
}
