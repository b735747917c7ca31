//! Byte-addressable typed I/O overlay invariants (spec §9).

mod common;

use console_core::bus::Processor;

const BG0CNT: u32 = 0x0400_0008;
const IRF: u32 = 0x0400_0214;
const IE: u32 = 0x0400_0210;
const UNMAPPED: u32 = 0x0A00_0000;

#[test]
fn masked_write_invariant_holds_for_a_fully_writable_register() {
    let mut bus = common::new_bus();
    bus.write::<u16>(Processor::Main, BG0CNT, 0x1234);
    let previous: u16 = bus.read(Processor::Main, BG0CNT);

    let value = 0xFFFFu16;
    bus.write::<u16>(Processor::Main, BG0CNT, value);
    let after: u16 = bus.read(Processor::Main, BG0CNT);

    // BG0CNT's write-mask is 0xFFFF, so the whole value passes straight through.
    let write_mask = 0xFFFFu16;
    let exists_mask = 0xFFFFu16;
    let expected = ((previous & !write_mask) | (value & write_mask)) & exists_mask;
    assert_eq!(after, expected);
}

#[test]
fn irf_write_only_acknowledges_set_bits() {
    let mut bus = common::new_bus();

    // Force two IRF bits pending via the IE/IRF raise path: writing IE has no
    // direct effect on IRF, so seed IRF through a real trigger instead — the
    // DIV-by-zero path raises no IRQ, so use two independent FIFO-send raises.
    bus.write::<u32>(Processor::Main, IE, 0xFFFF_FFFF);
    bus.write::<u8>(Processor::Aux, 0x0400_0184, 0x04); // IPCFIFOCNT_LO bit2 0->1, FIFO empty
    bus.write::<u8>(Processor::Aux, 0x0400_0185, 0x04); // IPCFIFOCNT_HI bit2 0->1, peer FIFO empty

    let pending: u32 = bus.read(Processor::Aux, IRF);
    assert_ne!(pending & (1 << 17), 0);
    assert_ne!(pending & (1 << 18), 0);

    // Acknowledge only bit 17; a plain write can never set bits, only clear them.
    bus.write::<u32>(Processor::Aux, IRF, 1 << 17);
    let after: u32 = bus.read(Processor::Aux, IRF);
    assert_eq!(after & (1 << 17), 0);
    assert_ne!(after & (1 << 18), 0);
}

#[test]
fn unknown_io_offset_reads_as_zero_and_ignores_writes() {
    let mut bus = common::new_bus();
    // 0x04000FFF is inside the I/O window but not seeded by any register.
    let unknown = 0x0400_0FFFu32;
    bus.write::<u8>(Processor::Main, unknown, 0xAA);
    assert_eq!(bus.read::<u8>(Processor::Main, unknown), 0);
}

#[test]
fn address_outside_every_window_reads_zero_and_drops_writes() {
    let mut bus = common::new_bus();
    bus.write::<u32>(Processor::Main, UNMAPPED, 0xDEAD_BEEF);
    assert_eq!(bus.read::<u32>(Processor::Main, UNMAPPED), 0);
}
