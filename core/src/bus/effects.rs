//! Per-byte-offset I/O write side effects (spec §4.1 "I/O write side effects",
//! spec §5 "Multi-byte side effect iteration").
//!
//! [`apply`] walks the bytes touched by one `write<T>` call in ascending
//! offset order and fires whichever side effect (if any) is registered for
//! that offset. An offset that issues a FIFO send halts processing of the
//! remaining bytes of that write — `apply` returns as soon as a handler asks
//! for it.

use super::external::{Cartridge, Rtc, Spi};
use super::math;
use super::regs;
use super::wram::Processor;
use super::Bus;

/// Apply side effects for every byte in `range`, in ascending order.
/// `raw` holds the *attempted* write, byte-for-byte aligned with `range`
/// (before masking) — needed by registers whose write-mask blocks the
/// generic merge and whose effect is "whatever was just written" (VRAMCNT).
/// `old` holds the byte values that were in `data` immediately before this
/// write, used by sticky bits (POSTFLG) that must not be clearable by a
/// plain masked write.
pub(super) fn apply(bus: &mut Bus, p: Processor, range: std::ops::Range<usize>, raw: &[u8], old: &[u8]) {
    for offset in range.clone() {
        let i = offset - range.start;
        if dispatch(bus, p, offset, raw[i], old[i]) {
            break;
        }
    }
}

/// Returns `true` if the remaining bytes of this write must not be processed
/// (only IPCFIFOSEND does this).
fn dispatch(bus: &mut Bus, p: Processor, offset: usize, raw_byte: u8, old_byte: u8) -> bool {
    if let Some(ch) = index_of(&regs::DMACNT_HI, offset) {
        dma_cnt_hi(bus, p, ch, old_byte);
        return false;
    }
    if matches_timer_lo(offset) {
        timer_count_lo(bus, p, offset, raw_byte);
        return false;
    }
    if let Some(ch) = index_of(&regs::TMCNT_H_HI, offset) {
        timer_cnt_hi(bus, p, ch, old_byte);
        return false;
    }
    if offset == regs::IPCSYNC_HI {
        ipcsync_hi(bus, p, raw_byte);
        return false;
    }
    if offset == regs::IPCFIFOCNT_LO {
        ipcfifocnt_lo(bus, p, raw_byte, old_byte);
        return false;
    }
    if offset == regs::IPCFIFOCNT_HI {
        ipcfifocnt_hi(bus, p, raw_byte, old_byte);
        return false;
    }
    if (regs::IPCFIFOSEND..regs::IPCFIFOSEND + 4).contains(&offset) {
        ipcfifosend(bus, p);
        return true;
    }
    if offset == regs::AUXSPIDATA {
        bus.spi.aux_write(raw_byte);
        return false;
    }
    if offset == regs::ROMCTRL_BYTE3 {
        romctrl_byte3(bus, p, raw_byte, old_byte);
        return false;
    }
    if (regs::IRF..regs::IRF + 4).contains(&offset) {
        irf_ack(bus, p, offset, raw_byte);
        return false;
    }
    if let Some(bank) = index_of(&regs::VRAMCNT, offset) {
        vramcnt(bus, p, bank, raw_byte);
        return false;
    }
    if offset == regs::WRAMCNT {
        wramcnt(bus, p);
        return false;
    }
    if in_range(offset, regs::DIVCNT, 2) || in_range(offset, regs::DIVNUMER, 8) || in_range(offset, regs::DIVDENOM, 8)
    {
        math::run_div(&mut bus.io[p.index()]);
        return false;
    }
    if in_range(offset, regs::SQRTCNT, 2) || in_range(offset, regs::SQRTPARAM, 8) {
        math::run_sqrt(&mut bus.io[p.index()]);
        return false;
    }
    if offset == regs::POSTFLG {
        postflg(bus, p, old_byte);
        return false;
    }
    if offset == regs::HALTCNT {
        haltcnt(bus, p, raw_byte);
        return false;
    }
    if offset == regs::RTC {
        bus.rtc.write(raw_byte);
        return false;
    }
    if offset == regs::SPIDATA {
        bus.spi.write(raw_byte);
        return false;
    }
    false
}

fn index_of(table: &[usize], offset: usize) -> Option<usize> {
    table.iter().position(|&o| o == offset)
}

fn in_range(offset: usize, base: usize, len: usize) -> bool {
    offset >= base && offset < base + len
}

fn matches_timer_lo(offset: usize) -> bool {
    regs::TMCNT_L.iter().any(|&base| offset == base || offset == base + 1)
}

/// On 0→1 transition of bit 7, latch `dma_src[ch]`/`dma_dst[ch]` from the
/// live DMASAD/DMADAD registers before the new control byte (already
/// committed by the generic masked write, since DMACNT's write-mask is
/// 0xFF) takes effect.
fn dma_cnt_hi(bus: &mut Bus, p: Processor, ch: usize, old_byte: u8) {
    let idx = p.index();
    let new_byte: u8 = bus.io[idx].read(regs::DMACNT_HI[ch]);
    if old_byte & 0x80 == 0 && new_byte & 0x80 != 0 {
        bus.dma_src[idx][ch] = bus.io[idx].read(regs::DMASAD[ch]);
        bus.dma_dst[idx][ch] = bus.io[idx].read(regs::DMADAD[ch]);
    }
}

/// TMnCNT_L's write-mask is 0, so the generic masked write never touches the
/// live counter; this redirects the raw byte into the reload latch instead.
fn timer_count_lo(bus: &mut Bus, p: Processor, offset: usize, raw_byte: u8) {
    let idx = p.index();
    for (ch, &base) in regs::TMCNT_L.iter().enumerate() {
        if offset == base {
            bus.timer_reload[idx][ch] = (bus.timer_reload[idx][ch] & 0xFF00) | raw_byte as u16;
        } else if offset == base + 1 {
            bus.timer_reload[idx][ch] = (bus.timer_reload[idx][ch] & 0x00FF) | ((raw_byte as u16) << 8);
        }
    }
}

/// On 0→1 transition of bit 7, reload the live counter from the latch.
fn timer_cnt_hi(bus: &mut Bus, p: Processor, ch: usize, old_byte: u8) {
    let idx = p.index();
    let new_byte: u8 = bus.io[idx].read(regs::TMCNT_H_HI[ch]);
    if old_byte & 0x80 == 0 && new_byte & 0x80 != 0 {
        let reload = bus.timer_reload[idx][ch];
        bus.io[idx].force_write::<u16>(regs::TMCNT_L[ch], reload);
    }
}

/// Copies the low nibble into the peer's SYNC-receive nibble and, if bit 5
/// was set and the peer's IRQ-enable guard bit is set, raises IRQ bit 16 on
/// the peer. The guard is read from the peer's IPCSYNC *high byte*
/// (offset 0x181), not the full 16-bit register: aux's write is gated by
/// that byte's bit 6, which is bit 14 of the full register (the "peer's
/// stored bit 14 in SYNC" guard); main's write is nominally gated by that
/// byte's bit 8, which doesn't exist in an 8-bit byte, so it never fires.
fn ipcsync_hi(bus: &mut Bus, p: Processor, raw_byte: u8) {
    let peer = p.peer();
    let peer_idx = peer.index();

    let low_nibble = raw_byte & 0x0F;
    let peer_lo: u8 = bus.io[peer_idx].read(regs::IPCSYNC);
    bus.io[peer_idx].force_write::<u8>(regs::IPCSYNC, (peer_lo & 0xF0) | low_nibble);

    if raw_byte & 0x20 != 0 {
        let peer_sync_hi: u8 = bus.io[peer_idx].read(regs::IPCSYNC_HI);
        let guard_set = match p {
            Processor::Main => false,
            Processor::Aux => peer_sync_hi & (1 << 6) != 0,
        };
        if guard_set {
            bus.raise_irq(peer, 16);
        }
    }
}

/// On 0→1 of bit 2 while the send FIFO is empty, raise self IRQ bit 17; a
/// written bit 3 clears the send FIFO regardless.
fn ipcfifocnt_lo(bus: &mut Bus, p: Processor, raw_byte: u8, old_byte: u8) {
    let idx = p.index();
    let new_byte: u8 = bus.io[idx].read(regs::IPCFIFOCNT_LO);
    if old_byte & 0x04 == 0 && new_byte & 0x04 != 0 && bus.ipc.is_empty(p) {
        bus.raise_irq(p, 17);
    }
    if raw_byte & 0x08 != 0 {
        bus.ipc.clear(p);
    }
}

/// On 0→1 of bit 2 while the receive FIFO is empty, raise self IRQ bit 18;
/// a written bit 6 acknowledges the error flag.
fn ipcfifocnt_hi(bus: &mut Bus, p: Processor, raw_byte: u8, old_byte: u8) {
    let idx = p.index();
    let new_byte: u8 = bus.io[idx].read(regs::IPCFIFOCNT_HI);
    if old_byte & 0x04 == 0 && new_byte & 0x04 != 0 && bus.ipc.is_empty(p.peer()) {
        bus.raise_irq(p, 18);
    }
    if raw_byte & 0x40 != 0 {
        let cleared = new_byte & !0x40;
        bus.io[idx].force_write::<u8>(regs::IPCFIFOCNT_HI, cleared);
    }
}

fn ipcfifosend(bus: &mut Bus, p: Processor) {
    let value: u32 = bus.io[p.index()].read(regs::IPCFIFOSEND);
    bus.ipc.send(p, value);
}

/// Sets the reset-release bit (bit 5 of byte 3, i.e. bit 29 overall) sticky,
/// and on its 0→1 transition kicks off a cartridge transfer through the
/// collaborator trait. Actual ROM data movement is the cartridge backend's
/// responsibility (spec §1 non-goal: cartridge file I/O).
fn romctrl_byte3(bus: &mut Bus, p: Processor, raw_byte: u8, old_byte: u8) {
    const RESET_RELEASE: u8 = 1 << 5;
    let idx = p.index();
    let new_byte: u8 = bus.io[idx].read(regs::ROMCTRL_BYTE3);
    let sticky = new_byte | (old_byte & RESET_RELEASE);
    bus.io[idx].force_write::<u8>(regs::ROMCTRL_BYTE3, sticky);

    if old_byte & 0x80 == 0 && new_byte & 0x80 != 0 {
        log::debug!("ROMCTRL: cartridge transfer started on {p:?}");
        let _ = bus.cartridge.transfer();
    }
}

/// Write-1-to-clear: bits set in the written byte are cleared in IRF;
/// nothing else changes.
fn irf_ack(bus: &mut Bus, p: Processor, offset: usize, raw_byte: u8) {
    let idx = p.index();
    let cur: u8 = bus.io[idx].read(offset);
    bus.io[idx].force_write::<u8>(offset, cur & !raw_byte);
}

/// VRAMCNT's write-mask is 0 so the generic masked write never stores
/// anything; the effect handler force-writes the raw byte itself before
/// recomputing `vram_base` from it.
fn vramcnt(bus: &mut Bus, p: Processor, bank: usize, raw_byte: u8) {
    let idx = p.index();
    bus.io[idx].force_write::<u8>(regs::VRAMCNT[bank], raw_byte);
    let vram_bank = super::banks::VramBank::from_index(bank).expect("VRAMCNT table has 9 entries");
    bus.vram_routing.apply(vram_bank, raw_byte);
}

fn wramcnt(bus: &mut Bus, p: Processor) {
    let cnt: u8 = bus.io[p.index()].read(regs::WRAMCNT);
    bus.wram_routing.apply(cnt);
}

/// Bit 0 is sticky: a plain masked write can set it but never clear it.
fn postflg(bus: &mut Bus, p: Processor, old_byte: u8) {
    let idx = p.index();
    let cur: u8 = bus.io[idx].read(regs::POSTFLG);
    bus.io[idx].force_write::<u8>(regs::POSTFLG, cur | (old_byte & 0x01));
}

/// `bits 7..6 == 2` (0b10xxxxxx) puts the aux processor to sleep.
fn haltcnt(bus: &mut Bus, p: Processor, raw_byte: u8) {
    let _ = p;
    if raw_byte & 0xC0 == 0x80 {
        bus.halt[Processor::Aux.index()] = true;
    }
}
