//! Narrow collaborator interfaces (spec §9 "Pointer dictionaries").
//!
//! The reference implementation hands out raw pointers into the I/O byte
//! arrays so RTC, SPI, cartridge and FIFO peers can "observe" register state
//! directly. Here those collaborators are trait objects the bus holds instead;
//! a bare `Bus` gets harmless no-op defaults so it is constructible without
//! wiring real peripherals.

/// Real-time clock passthrough (IO offset 0x138).
pub trait Rtc {
    fn write(&mut self, byte: u8);
}

/// SPI bus passthrough shared by the general SPI port (SPIDATA, offset 0x1C2)
/// and the auxiliary firmware/touchscreen/powerman port (AUXSPIDATA, offset
/// 0x1A2). Both registers are byte-wide despite sitting in a 16-bit-aligned
/// slot, so both hooks pass a single byte per spec §4.1.
pub trait Spi {
    fn write(&mut self, byte: u8);
    fn aux_write(&mut self, byte: u8);
}

/// Cartridge slot. The bus itself always treats `[0x08000000,0x09000000)` as
/// "no cartridge" per spec §4.1; this trait is for the ROMCTRL-triggered
/// transfer register read/write path, which a real cartridge backend can hook.
pub trait Cartridge {
    fn transfer(&mut self) -> u32;
}

pub struct NullRtc;
impl Rtc for NullRtc {
    fn write(&mut self, _byte: u8) {}
}

pub struct NullSpi;
impl Spi for NullSpi {
    fn write(&mut self, _byte: u8) {}
    fn aux_write(&mut self, _byte: u8) {}
}

pub struct NullCartridge;
impl Cartridge for NullCartridge {
    fn transfer(&mut self) -> u32 {
        0xFFFF_FFFF
    }
}
