//! Shared fixtures for the bus and rasterizer integration tests.

use console_core::bus::Bus;
use console_core::gpu3d::TextureSource;

pub const FIRMWARE_MAIN_LEN: usize = 32 * 1024;
pub const FIRMWARE_AUX_LEN: usize = 16 * 1024;

/// A fresh `Bus` with zeroed firmware images of the required sizes.
pub fn new_bus() -> Bus {
    Bus::new(vec![0u8; FIRMWARE_MAIN_LEN], vec![0u8; FIRMWARE_AUX_LEN]).expect("firmware sizes are exact")
}

/// Flat texture/palette memory for rasterizer tests, addressed the same way
/// `Bus`'s `TextureSource` impl addresses real VRAM banks: four 128 KiB
/// texture slots, four 16 KiB palette quarters plus a fifth 16 KiB slot.
pub struct FlatTextureSource {
    pub texture: Vec<u8>,
    pub palette: Vec<u8>,
}

impl FlatTextureSource {
    pub fn new() -> Self {
        Self {
            texture: vec![0u8; 4 * 128 * 1024],
            palette: vec![0u8; 5 * 16 * 1024],
        }
    }

    pub fn set_palette_color(&mut self, addr: u32, rgb5: u16) {
        let off = addr as usize;
        self.palette[off] = (rgb5 & 0xFF) as u8;
        self.palette[off + 1] = (rgb5 >> 8) as u8;
    }
}

impl Default for FlatTextureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureSource for FlatTextureSource {
    fn texture_byte(&self, addr: u32) -> u8 {
        self.texture[addr as usize]
    }

    fn palette_byte(&self, addr: u32) -> u8 {
        self.palette[addr as usize]
    }
}
