//! VRAM bank routing driven by VRAMCNT_x (spec §8 scenario 2).

mod common;

use console_core::bus::Processor;

const VRAMCNT_A_ADDR: u32 = 0x0400_0240;
const VRAM_A_BASE: u32 = 0x0600_0000;

#[test]
fn vramcnt_a_enable_then_disable() {
    let mut bus = common::new_bus();

    // Enable, MST=1, OFS=0 -> vram_base[A] = 0x06000000.
    bus.write::<u8>(Processor::Main, VRAMCNT_A_ADDR, 0x81);
    bus.write::<u8>(Processor::Main, VRAM_A_BASE, 0x55);
    assert_eq!(bus.read::<u8>(Processor::Main, VRAM_A_BASE), 0x55);

    // Disabling the bank makes the same address unmapped again; the stored
    // byte in bank A is untouched but no longer reachable.
    bus.write::<u8>(Processor::Main, VRAMCNT_A_ADDR, 0x00);
    assert_eq!(bus.read::<u8>(Processor::Main, VRAM_A_BASE), 0);
}

#[test]
fn vramcnt_write_mask_never_lets_a_plain_write_through() {
    let mut bus = common::new_bus();
    bus.write::<u8>(Processor::Main, VRAMCNT_A_ADDR, 0x81);
    // VRAMCNT's write-mask is 0; the effect handler force-writes the raw
    // byte itself, so the register still reads back the value just written.
    assert_eq!(bus.read::<u8>(Processor::Main, VRAMCNT_A_ADDR), 0x81);
}
