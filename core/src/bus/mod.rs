//! The switched address-space and I/O register machine (spec §4.1).
//!
//! `Bus` owns every RAM bank, the VRAM/WRAM routing tables, and both
//! processors' I/O register files. [`Bus::read`]/[`Bus::write`] are the sole
//! entry points CPU interpreters (out of scope per spec §1) are expected to
//! call; [`Bus::map`] is the read-only-pointer variant for instruction fetch.

mod banks;
mod effects;
mod external;
mod io;
mod ipc;
mod math;
mod regs;
mod vram;
mod wram;

pub use banks::VramBank;
pub use external::{Cartridge, NullCartridge, NullRtc, NullSpi, Rtc, Spi};
pub use io::IoValue;
pub use vram::{ExtPaletteRouting, VramRouting};
pub use wram::{Processor, WramRouting};

use banks::{
    AUX_WRAM_LEN, DTCM_LEN, FIRMWARE_AUX_LEN, FIRMWARE_MAIN_LEN, ITCM_LEN, MAIN_RAM_LEN, OAM_LEN,
    PALETTE_LEN, SHARED_WRAM_LEN, VramBanks,
};
use io::IoFile;
use ipc::IpcState;

/// Address window bases (spec §6 "Address space per processor").
pub const MAIN_RAM_BASE: u32 = 0x0200_0000;
pub const MAIN_RAM_WINDOW: u32 = 0x0100_0000; // 16 MiB, four 4 MiB mirrors
pub const SHARED_WRAM_BASE: u32 = 0x0300_0000;
pub const SHARED_WRAM_WINDOW: u32 = 0x0100_0000;
pub const IO_BASE: u32 = 0x0400_0000;
pub const IO_WINDOW: u32 = 0x0100_0000;
pub const PALETTE_BASE: u32 = 0x0500_0000;
pub const PALETTE_WINDOW: u32 = 0x0100_0000;
pub const VRAM_BASE: u32 = 0x0600_0000;
pub const VRAM_WINDOW: u32 = 0x0100_0000;
pub const OAM_BASE: u32 = 0x0700_0000;
pub const OAM_WINDOW: u32 = 0x0100_0000;
pub const CART_BASE: u32 = 0x0800_0000;
pub const CART_WINDOW: u32 = 0x0100_0000;
pub const FIRMWARE_MAIN_BASE: u32 = 0xFFFF_0000;
pub const FIRMWARE_AUX_BASE: u32 = 0x0000_0000;

const FIFO_RECEIVE_ADDR: u32 = 0x0410_0000;
const CARTRIDGE_TRANSFER_ADDR: u32 = 0x0410_0010;

/// Wrong-sized firmware ROM image passed to [`Bus::new`]. The two images are
/// loaded once, at construction, and treated read-only thereafter — unlike
/// unmapped reads/writes this is rejected up front rather than silently
/// truncated or padded, since a wrong-sized image can never be a faithful
/// dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmwareError {
    WrongMainSize { expected: usize, got: usize },
    WrongAuxSize { expected: usize, got: usize },
}

impl std::fmt::Display for FirmwareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FirmwareError::WrongMainSize { expected, got } => {
                write!(f, "main firmware ROM must be {expected} bytes, got {got}")
            }
            FirmwareError::WrongAuxSize { expected, got } => {
                write!(f, "aux firmware ROM must be {expected} bytes, got {got}")
            }
        }
    }
}

impl std::error::Error for FirmwareError {}

/// Where a resolved address lives. Mirrors spec §3's bank list; `OAM` is
/// mirrored across its 16 MiB window the same way palette is, since the
/// spec states the window size without saying otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    MainRam(usize),
    SharedWram(usize),
    ITcm(usize),
    DTcm(usize),
    FirmwareMain(usize),
    FirmwareAux(usize),
    AuxWram(usize),
    Palette(usize),
    Vram(VramBank, usize),
    Oam(usize),
}

/// TCM window configuration. Real ARM9 hardware drives this from CP15
/// coprocessor registers, which sit outside the two files spec.md distills
/// from; `Bus` exposes a narrow setter ([`Bus::configure_tcm`]) for whatever
/// out-of-scope CPU model owns that coprocessor state instead of modeling
/// CP15 itself.
#[derive(Debug, Clone, Copy, Default)]
struct TcmConfig {
    itcm_enabled: bool,
    itcm_base: u32,
    dtcm_enabled: bool,
    dtcm_base: u32,
}

pub struct Bus {
    main_ram: Vec<u8>,
    shared_wram: Vec<u8>,
    itcm: Vec<u8>,
    dtcm: Vec<u8>,
    firmware_main: Vec<u8>,
    firmware_aux: Vec<u8>,
    aux_wram: Vec<u8>,
    palette: Vec<u8>,
    oam: Vec<u8>,
    vram: VramBanks,

    wram_routing: WramRouting,
    vram_routing: VramRouting,
    tcm: TcmConfig,

    io: [IoFile; 2],
    ipc: IpcState,

    dma_src: [[u32; 4]; 2],
    dma_dst: [[u32; 4]; 2],
    timer_reload: [[u16; 4]; 2],

    pub halt: [bool; 2],

    rtc: Box<dyn Rtc>,
    spi: Box<dyn Spi>,
    cartridge: Box<dyn Cartridge>,
}

impl Bus {
    /// Construct a fresh `Bus`, zeroing every bank and seeding the I/O
    /// exists/write-mask tables from spec §6. Firmware images are loaded
    /// once here and are read-only for the lifetime of the `Bus`.
    pub fn new(firmware_main: Vec<u8>, firmware_aux: Vec<u8>) -> Result<Self, FirmwareError> {
        if firmware_main.len() != FIRMWARE_MAIN_LEN {
            return Err(FirmwareError::WrongMainSize {
                expected: FIRMWARE_MAIN_LEN,
                got: firmware_main.len(),
            });
        }
        if firmware_aux.len() != FIRMWARE_AUX_LEN {
            return Err(FirmwareError::WrongAuxSize {
                expected: FIRMWARE_AUX_LEN,
                got: firmware_aux.len(),
            });
        }

        let mut io = [IoFile::new(), IoFile::new()];
        for file in io.iter_mut() {
            regs::seed(file);
        }

        Ok(Self {
            main_ram: vec![0; MAIN_RAM_LEN],
            shared_wram: vec![0; SHARED_WRAM_LEN],
            itcm: vec![0; ITCM_LEN],
            dtcm: vec![0; DTCM_LEN],
            firmware_main,
            firmware_aux,
            aux_wram: vec![0; AUX_WRAM_LEN],
            palette: vec![0; PALETTE_LEN],
            oam: vec![0; OAM_LEN],
            vram: VramBanks::new(),
            wram_routing: WramRouting::new(),
            vram_routing: VramRouting::new(),
            tcm: TcmConfig::default(),
            io,
            ipc: IpcState::new(),
            dma_src: [[0; 4]; 2],
            dma_dst: [[0; 4]; 2],
            timer_reload: [[0; 4]; 2],
            halt: [false; 2],
            rtc: Box::new(NullRtc),
            spi: Box::new(NullSpi),
            cartridge: Box::new(NullCartridge),
        })
    }

    /// Replace the RTC/SPI/cartridge collaborators (spec §9 "Pointer
    /// dictionaries"). Defaults to the no-op `Null*` stand-ins.
    pub fn set_rtc(&mut self, rtc: Box<dyn Rtc>) {
        self.rtc = rtc;
    }

    pub fn set_spi(&mut self, spi: Box<dyn Spi>) {
        self.spi = spi;
    }

    pub fn set_cartridge(&mut self, cartridge: Box<dyn Cartridge>) {
        self.cartridge = cartridge;
    }

    /// Configure the ARM9-analogue TCM windows. `None` disables the TCM;
    /// `Some(base)` enables it at `base` with the bank's fixed size.
    pub fn configure_tcm(&mut self, itcm: Option<u32>, dtcm: Option<u32>) {
        self.tcm.itcm_enabled = itcm.is_some();
        self.tcm.itcm_base = itcm.unwrap_or(0);
        self.tcm.dtcm_enabled = dtcm.is_some();
        self.tcm.dtcm_base = dtcm.unwrap_or(0);
    }

    pub fn vram_routing(&self) -> &VramRouting {
        &self.vram_routing
    }

    pub fn vram_bank(&self, bank: VramBank) -> &[u8] {
        self.vram.bank(bank)
    }

    pub fn palette(&self) -> &[u8] {
        &self.palette
    }

    pub fn oam(&self) -> &[u8] {
        &self.oam
    }

    /// Read a value of width `T` (i8/u8/i16/u16/u32) at `address` as seen by
    /// `processor`. Unmapped regions log and return zero; the cartridge
    /// window is modeled as permanently empty (all-ones).
    pub fn read<T: IoValue>(&mut self, processor: Processor, address: u32) -> T {
        if in_window(address, CART_BASE, CART_WINDOW) {
            return T::from_le_bytes(&[0xFF; 8]);
        }
        if in_window(address, IO_BASE, IO_WINDOW) {
            return self.io_read(processor, address);
        }
        match self.resolve(processor, address) {
            Some(region) => self.read_region(region),
            None => {
                log::debug!("unmapped read<{}> by {processor:?} at {address:#010x}", std::any::type_name::<T>());
                T::from_le_bytes(&[0; 8])
            }
        }
    }

    /// Write a value of width `T` (u8/u16/u32) at `address` as seen by
    /// `processor`. Unmapped regions and the (always-empty) cartridge window
    /// silently drop the write, after logging.
    pub fn write<T: IoValue>(&mut self, processor: Processor, address: u32, value: T) {
        if in_window(address, CART_BASE, CART_WINDOW) {
            return;
        }
        if in_window(address, IO_BASE, IO_WINDOW) {
            self.io_write(processor, address, value);
            return;
        }
        match self.resolve(processor, address) {
            Some(region) => self.write_region(region, value),
            None => {
                log::debug!("unmapped write<{}> by {processor:?} at {address:#010x}", std::any::type_name::<T>());
            }
        }
    }

    /// Resolve `address` to a read-only byte slice for CPU instruction
    /// fetch, or `None` if nothing is mapped there. `for_read` is accepted
    /// for symmetry with spec §4.1's signature; every region this resolves
    /// to is readable.
    pub fn map(&self, processor: Processor, address: u32, for_read: bool) -> Option<&[u8]> {
        let _ = for_read;
        if in_window(address, CART_BASE, CART_WINDOW) || in_window(address, IO_BASE, IO_WINDOW) {
            return None;
        }
        self.resolve(processor, address).map(|region| {
            let (bank, _len, off) = self.region_bank(region);
            &bank[off..]
        })
    }

    /// `(bank, bank_len, offset)` for a resolved region, `offset < bank_len`
    /// always (spec's banks are fixed-size; `resolve` already wraps the
    /// window address down to a bank-relative offset).
    fn region_bank(&self, region: Region) -> (&[u8], usize, usize) {
        match region {
            Region::MainRam(off) => (&self.main_ram, MAIN_RAM_LEN, off),
            Region::SharedWram(off) => (&self.shared_wram, SHARED_WRAM_LEN, off),
            Region::ITcm(off) => (&self.itcm, ITCM_LEN, off),
            Region::DTcm(off) => (&self.dtcm, DTCM_LEN, off),
            Region::FirmwareMain(off) => (&self.firmware_main, FIRMWARE_MAIN_LEN, off),
            Region::FirmwareAux(off) => (&self.firmware_aux, FIRMWARE_AUX_LEN, off),
            Region::AuxWram(off) => (&self.aux_wram, AUX_WRAM_LEN, off),
            Region::Palette(off) => (&self.palette, PALETTE_LEN, off),
            Region::Vram(bank, off) => (self.vram.bank(bank), bank.len(), off),
            Region::Oam(off) => (&self.oam, OAM_LEN, off),
        }
    }

    /// Reads `T::BYTES` bytes starting at the region's offset, wrapping
    /// within the bank if the read would otherwise run past its end (the
    /// same mirroring behavior the outer address-window wrap already gives
    /// addresses that land exactly on a bank boundary).
    fn read_region<T: IoValue>(&self, region: Region) -> T {
        let (bank, len, off) = self.region_bank(region);
        let mut buf = [0u8; 8];
        for (i, slot) in buf.iter_mut().enumerate().take(T::BYTES) {
            *slot = bank[(off + i) % len];
        }
        T::from_le_bytes(&buf)
    }

    fn write_region<T: IoValue>(&mut self, region: Region, value: T) {
        if matches!(region, Region::FirmwareMain(_) | Region::FirmwareAux(_)) {
            return; // read-only
        }
        let mut buf = [0u8; 8];
        value.write_le_bytes(&mut buf);
        let (len, off, bank): (usize, usize, &mut [u8]) = match region {
            Region::MainRam(off) => (MAIN_RAM_LEN, off, &mut self.main_ram),
            Region::SharedWram(off) => (SHARED_WRAM_LEN, off, &mut self.shared_wram),
            Region::ITcm(off) => (ITCM_LEN, off, &mut self.itcm),
            Region::DTcm(off) => (DTCM_LEN, off, &mut self.dtcm),
            Region::AuxWram(off) => (AUX_WRAM_LEN, off, &mut self.aux_wram),
            Region::Palette(off) => (PALETTE_LEN, off, &mut self.palette),
            Region::Vram(bank, off) => {
                let len = bank.len();
                (len, off, self.vram.bank_mut(bank))
            }
            Region::Oam(off) => (OAM_LEN, off, &mut self.oam),
            Region::FirmwareMain(_) | Region::FirmwareAux(_) => unreachable!(),
        };
        for i in 0..T::BYTES {
            bank[(off + i) % len] = buf[i];
        }
    }

    /// The strict per-processor priority chain from spec §4.1.
    fn resolve(&self, processor: Processor, address: u32) -> Option<Region> {
        match processor {
            Processor::Main => self.resolve_main(address),
            Processor::Aux => self.resolve_aux(address),
        }
    }

    fn resolve_main(&self, address: u32) -> Option<Region> {
        if self.tcm.itcm_enabled && in_window(address, self.tcm.itcm_base, ITCM_LEN as u32) {
            return Some(Region::ITcm((address - self.tcm.itcm_base) as usize));
        }
        if self.tcm.dtcm_enabled && in_window(address, self.tcm.dtcm_base, DTCM_LEN as u32) {
            return Some(Region::DTcm((address - self.tcm.dtcm_base) as usize));
        }
        if in_window(address, MAIN_RAM_BASE, MAIN_RAM_WINDOW) {
            let off = (address - MAIN_RAM_BASE) as usize % MAIN_RAM_LEN;
            return Some(Region::MainRam(off));
        }
        if in_window(address, SHARED_WRAM_BASE, SHARED_WRAM_WINDOW) {
            let size = self.wram_routing.size[Processor::Main.index()];
            if size != 0 {
                let rel = (address - SHARED_WRAM_BASE) as usize % size;
                let off = (self.wram_routing.offset[Processor::Main.index()] + rel) % SHARED_WRAM_LEN;
                return Some(Region::SharedWram(off));
            }
            return None;
        }
        if in_window(address, PALETTE_BASE, PALETTE_WINDOW) {
            let off = (address - PALETTE_BASE) as usize % PALETTE_LEN;
            return Some(Region::Palette(off));
        }
        if let Some((bank, off)) = self.vram_routing.vram_map(address) {
            return Some(Region::Vram(bank, off));
        }
        if in_window(address, OAM_BASE, OAM_WINDOW) {
            let off = (address - OAM_BASE) as usize % OAM_LEN;
            return Some(Region::Oam(off));
        }
        if in_window(address, FIRMWARE_MAIN_BASE, FIRMWARE_MAIN_LEN as u32) {
            return Some(Region::FirmwareMain((address - FIRMWARE_MAIN_BASE) as usize));
        }
        None
    }

    /// Aux WRAM fallthrough per SPEC_FULL §C.1: the shared-WRAM check only
    /// covers the lower half of the window, `[0x03000000,0x03800000)`, and
    /// only when `wram_size[aux] != 0`; every other address in
    /// `[0x03000000,0x04000000)` — the upper half unconditionally, or the
    /// lower half when the aux processor has no shared-WRAM slice — falls
    /// through to the wide auxiliary-work-RAM bank instead.
    fn resolve_aux(&self, address: u32) -> Option<Region> {
        if in_window(address, FIRMWARE_AUX_BASE, FIRMWARE_AUX_LEN as u32) {
            return Some(Region::FirmwareAux((address - FIRMWARE_AUX_BASE) as usize));
        }
        if in_window(address, MAIN_RAM_BASE, MAIN_RAM_WINDOW) {
            let off = (address - MAIN_RAM_BASE) as usize % MAIN_RAM_LEN;
            return Some(Region::MainRam(off));
        }
        const SHARED_WRAM_AUX_HALF: u32 = SHARED_WRAM_WINDOW / 2;
        if in_window(address, SHARED_WRAM_BASE, SHARED_WRAM_AUX_HALF) {
            let size = self.wram_routing.size[Processor::Aux.index()];
            if size != 0 {
                let rel = (address - SHARED_WRAM_BASE) as usize % size;
                let off = (self.wram_routing.offset[Processor::Aux.index()] + rel) % SHARED_WRAM_LEN;
                return Some(Region::SharedWram(off));
            }
        }
        if in_window(address, SHARED_WRAM_BASE, SHARED_WRAM_WINDOW) {
            let off = (address - SHARED_WRAM_BASE) as usize % AUX_WRAM_LEN;
            return Some(Region::AuxWram(off));
        }
        None
    }

    fn io_read<T: IoValue>(&mut self, processor: Processor, address: u32) -> T {
        if address == FIFO_RECEIVE_ADDR {
            return width_cast(self.ipc.receive(processor));
        }
        if address == CARTRIDGE_TRANSFER_ADDR {
            return width_cast(self.cartridge.transfer());
        }
        let offset = (address - IO_BASE) as usize;
        let file = &self.io[processor.index()];
        if offset + T::BYTES > io::IO_LEN || !file.exists::<T>(offset) {
            log::debug!("unknown I/O read by {processor:?} at {address:#010x}");
            return T::from_le_bytes(&[0; 8]);
        }
        file.read(offset)
    }

    fn io_write<T: IoValue>(&mut self, processor: Processor, address: u32, value: T) {
        let offset = (address - IO_BASE) as usize;
        let idx = processor.index();
        if offset + T::BYTES > io::IO_LEN || !self.io[idx].exists::<T>(offset) {
            log::debug!("unknown I/O write by {processor:?} at {address:#010x}");
            return;
        }

        let mut raw = [0u8; 8];
        value.write_le_bytes(&mut raw);
        let old = self.io[idx].data[offset..offset + T::BYTES].to_vec();

        let range = self.io[idx].masked_write(offset, value);
        effects::apply(self, processor, range, &raw[..T::BYTES], &old);
    }

    /// Set an IRF bit for `processor` directly (bypassing the write-mask,
    /// since IRF is a hardware-raised flag, not something software writes
    /// except to acknowledge it).
    fn raise_irq(&mut self, processor: Processor, bit: u32) {
        let idx = processor.index();
        let cur: u32 = self.io[idx].read(regs::IRF);
        self.io[idx].force_write::<u32>(regs::IRF, cur | (1 << bit));
    }
}

fn in_window(address: u32, base: u32, len: u32) -> bool {
    address >= base && address - base < len
}

fn width_cast<T: IoValue>(value: u32) -> T {
    T::from_le_bytes(&value.to_le_bytes())
}

/// Fixed texture/palette slot bindings the 3D engine addresses through
/// (SPEC_FULL "Recovered detail 3"): texture space is banks A-D concatenated
/// as four 128 KiB slots; palette space is bank E split into four 16 KiB
/// quarters followed by bank F as a fifth slot. This sidesteps the
/// VRAMCNT-driven MST=3 "texture slot" routing the real hardware also
/// supports, keeping the binding between bank and texture/palette slot
/// static rather than another piece of switched state.
impl crate::gpu3d::TextureSource for Bus {
    fn texture_byte(&self, addr: u32) -> u8 {
        const SLOT_LEN: u32 = 128 * 1024;
        let slot = addr / SLOT_LEN;
        let bank = match slot {
            0 => VramBank::A,
            1 => VramBank::B,
            2 => VramBank::C,
            3 => VramBank::D,
            _ => {
                log::debug!("texture byte read past slot D at {addr:#x}");
                return 0;
            }
        };
        let off = (addr % SLOT_LEN) as usize;
        self.vram.bank(bank)[off % bank.len()]
    }

    fn palette_byte(&self, addr: u32) -> u8 {
        const SLOT_LEN: u32 = 16 * 1024;
        let slot = addr / SLOT_LEN;
        let off = (addr % SLOT_LEN) as usize;
        match slot {
            0..=3 => self.vram.bank(VramBank::E)[slot as usize * SLOT_LEN as usize + off],
            4 => self.vram.bank(VramBank::F)[off],
            _ => {
                log::debug!("palette byte read past slot F at {addr:#x}");
                0
            }
        }
    }
}
