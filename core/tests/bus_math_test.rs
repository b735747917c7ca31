//! Hardware DIV unit (spec §8 scenario 3).

mod common;

use console_core::bus::Processor;

const DIVCNT: u32 = 0x0400_0280;
const DIVNUMER: u32 = 0x0400_0290;
const DIVDENOM: u32 = 0x0400_0298;
const DIVRESULT: u32 = 0x0400_02A0;
const DIVREMRESULT: u32 = 0x0400_02A8;

const DIV_ERROR_BIT: u16 = 1 << 14;

#[test]
fn div_mode0_32_over_32() {
    let mut bus = common::new_bus();
    bus.write::<u16>(Processor::Main, DIVCNT, 0);
    bus.write::<u32>(Processor::Main, DIVDENOM, 2);
    // Writing the numerator is the trigger offset in this mode.
    bus.write::<u32>(Processor::Main, DIVNUMER, 7);

    assert_eq!(bus.read::<u64>(Processor::Main, DIVRESULT), 3);
    assert_eq!(bus.read::<u64>(Processor::Main, DIVREMRESULT), 1);
    assert_eq!(bus.read::<u16>(Processor::Main, DIVCNT) & DIV_ERROR_BIT, 0);
}

#[test]
fn div_by_zero_sets_error_bit_and_leaves_result_untouched() {
    let mut bus = common::new_bus();
    bus.write::<u16>(Processor::Main, DIVCNT, 0);
    bus.write::<u32>(Processor::Main, DIVNUMER, 7);
    bus.write::<u32>(Processor::Main, DIVDENOM, 0);

    assert_ne!(bus.read::<u16>(Processor::Main, DIVCNT) & DIV_ERROR_BIT, 0);
    assert_eq!(bus.read::<u64>(Processor::Main, DIVRESULT), 0);
    assert_eq!(bus.read::<u64>(Processor::Main, DIVREMRESULT), 0);
}
