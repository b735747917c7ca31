//! I/O register offsets and the exists-mask/write-mask seed tables (spec §6).
//!
//! Offsets are relative to the I/O window base (`0x04000000`); the I/O file
//! itself is only 8 KiB, so callers mask the full address down to an offset
//! before touching `IoFile`.

use super::io::IoFile;

pub const DISPCNT: usize = 0x000;
pub const DISPSTAT: usize = 0x004;
pub const VCOUNT: usize = 0x006;

pub const BGCNT: [usize; 4] = [0x008, 0x00A, 0x00C, 0x00E];
pub const BGHOFS: [usize; 4] = [0x010, 0x014, 0x018, 0x01C];
pub const BGVOFS: [usize; 4] = [0x012, 0x016, 0x01A, 0x01E];

pub const DMASAD: [usize; 4] = [0x0B0, 0x0BC, 0x0C8, 0x0D4];
pub const DMADAD: [usize; 4] = [0x0B4, 0x0C0, 0x0CC, 0x0D8];
pub const DMACNT: [usize; 4] = [0x0B8, 0x0C4, 0x0D0, 0x0DC];
/// High (control) byte of DMAnCNT: 0xBB, 0xC7, 0xD3, 0xDF.
pub const DMACNT_HI: [usize; 4] = [0x0BB, 0x0C7, 0x0D3, 0x0DF];

pub const TMCNT_L: [usize; 4] = [0x100, 0x104, 0x108, 0x10C];
pub const TMCNT_H: [usize; 4] = [0x102, 0x106, 0x10A, 0x10E];
/// High (control) byte of TMnCNT_H: 0x103, 0x107, 0x10B, 0x10F.
pub const TMCNT_H_HI: [usize; 4] = [0x103, 0x107, 0x10B, 0x10F];

pub const KEYINPUT: usize = 0x130;
pub const RTC: usize = 0x138;

pub const IPCSYNC: usize = 0x180;
pub const IPCSYNC_HI: usize = 0x181;
pub const IPCFIFOCNT: usize = 0x184;
pub const IPCFIFOCNT_LO: usize = 0x184;
pub const IPCFIFOCNT_HI: usize = 0x185;
pub const IPCFIFOSEND: usize = 0x188;

pub const AUXSPICNT: usize = 0x1A0;
pub const AUXSPIDATA: usize = 0x1A2;
pub const ROMCTRL: usize = 0x1A4;
pub const ROMCTRL_BYTE3: usize = 0x1A7;

pub const SPICNT: usize = 0x1C0;
pub const SPIDATA: usize = 0x1C2;

pub const IE: usize = 0x210;
pub const IRF: usize = 0x214;

/// A=0x240 .. G=0x246, WRAMCNT=0x247, H=0x248, I=0x249 (WRAMCNT sits between
/// VRAMCNT_G and VRAMCNT_H, not after VRAMCNT_I).
pub const VRAMCNT: [usize; 9] = [0x240, 0x241, 0x242, 0x243, 0x244, 0x245, 0x246, 0x248, 0x249];
pub const WRAMCNT: usize = 0x247;

pub const DIVCNT: usize = 0x280;
pub const DIVNUMER: usize = 0x290;
pub const DIVDENOM: usize = 0x298;
pub const DIVRESULT: usize = 0x2A0;
pub const DIVREMRESULT: usize = 0x2A8;

pub const SQRTCNT: usize = 0x2B0;
pub const SQRTRESULT: usize = 0x2B4;
pub const SQRTPARAM: usize = 0x2B8;

pub const POSTFLG: usize = 0x300;
pub const HALTCNT: usize = 0x301;

/// Seed `exists_mask`/`write_mask` for every register named in spec §6.
/// Shared by both processors; HALTCNT/RTC/AUXSPI* exist on both files even
/// though only the aux processor's writes give them sensible meaning, matching
/// the distilled spec's description of a single shared table.
pub fn seed(io: &mut IoFile) {
    io.set_mask_range(DISPCNT, &[0xFF; 4], &[0xFF; 4]);
    io.set_mask_range(DISPSTAT, &[0xFF; 2], &[0xFF; 2]);
    io.set_mask_range(VCOUNT, &[0xFF; 2], &[0x00; 2]);

    for i in 0..4 {
        io.set_mask_range(BGCNT[i], &[0xFF; 2], &[0xFF; 2]);
        io.set_mask_range(BGHOFS[i], &[0xFF, 0x01], &[0xFF, 0x01]);
        io.set_mask_range(BGVOFS[i], &[0xFF, 0x01], &[0xFF, 0x01]);
    }

    for i in 0..4 {
        io.set_mask_range(DMASAD[i], &[0xFF; 4], &[0xFF; 4]);
        io.set_mask_range(DMADAD[i], &[0xFF; 4], &[0xFF; 4]);
        io.set_mask_range(DMACNT[i], &[0xFF; 4], &[0xFF; 4]);
    }

    for i in 0..4 {
        // TMnCNT_L read-only (live counter); writes are redirected to the reload latch.
        io.set_mask_range(TMCNT_L[i], &[0xFF; 2], &[0x00; 2]);
        io.set_mask_range(TMCNT_H[i], &[0xFF; 2], &[0xFF; 2]);
    }

    io.set_mask_range(KEYINPUT, &[0xFF; 2], &[0x00; 2]);
    io.set_mask(RTC, 0xFF, 0xFF);

    io.set_mask_range(IPCSYNC, &[0xFF; 2], &[0xFF; 2]);
    io.set_mask_range(IPCFIFOCNT, &[0xFF; 2], &[0xFF; 2]);
    io.set_mask_range(IPCFIFOSEND, &[0xFF; 4], &[0xFF; 4]);

    io.set_mask_range(AUXSPICNT, &[0xFF; 2], &[0xFF; 2]);
    io.set_mask_range(AUXSPIDATA, &[0xFF; 2], &[0xFF; 2]);
    io.set_mask_range(ROMCTRL, &[0xFF; 4], &[0xFF; 4]);

    io.set_mask_range(SPICNT, &[0xFF; 2], &[0xFF; 2]);
    io.set_mask_range(SPIDATA, &[0xFF; 2], &[0xFF; 2]);

    io.set_mask_range(IE, &[0xFF; 4], &[0xFF; 4]);
    // IRF: readable, but acknowledge-only — no bit survives a plain masked write.
    io.set_mask_range(IRF, &[0xFF; 4], &[0x00; 4]);

    for &off in VRAMCNT.iter() {
        // Effect is computed on the mask-cleared stored value, so exists
        // (for reads) but nothing passes through a plain masked write.
        io.set_mask(off, 0xFF, 0x00);
    }
    io.set_mask(WRAMCNT, 0xFF, 0xFF);

    io.set_mask_range(DIVCNT, &[0xFF; 2], &[0xFF; 2]);
    io.set_mask_range(DIVNUMER, &[0xFF; 8], &[0xFF; 8]);
    io.set_mask_range(DIVDENOM, &[0xFF; 8], &[0xFF; 8]);
    io.set_mask_range(DIVRESULT, &[0xFF; 8], &[0x00; 8]);
    io.set_mask_range(DIVREMRESULT, &[0xFF; 8], &[0x00; 8]);

    io.set_mask_range(SQRTCNT, &[0xFF; 2], &[0xFF; 2]);
    io.set_mask_range(SQRTRESULT, &[0xFF; 4], &[0x00; 4]);
    io.set_mask_range(SQRTPARAM, &[0xFF; 8], &[0xFF; 8]);

    // POSTFLG bit 0 sticky: once set it cannot be cleared by a plain write,
    // so the write mask only ever admits the set direction; effects.rs enforces that.
    io.set_mask(POSTFLG, 0x01, 0x01);
    io.set_mask(HALTCNT, 0xFF, 0xFF);
}
