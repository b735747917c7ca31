//! Texel decode for the six texture formats (spec §4.2 "Format dispatch").

use super::color::{self, decode_abgr1555, decode_abgr1555_opaque, Pixel};
use super::polygon::{TextureDescriptor, TextureFormat};

/// Texture/palette memory the rasterizer reads texels from — the VRAM banks
/// currently routed to texture use (spec §4.2, SPEC_FULL "Recovered detail
/// 3": texture space is banks A-D concatenated as four 128 KiB slots,
/// palette space is bank E split into four 16 KiB quarters followed by
/// bank F as a fifth slot).
pub trait TextureSource {
    fn texture_byte(&self, addr: u32) -> u8;
    fn palette_byte(&self, addr: u32) -> u8;
}

fn texture_u16(src: &impl TextureSource, addr: u32) -> u16 {
    src.texture_byte(addr) as u16 | (src.texture_byte(addr + 1) as u16) << 8
}

fn palette_u16(src: &impl TextureSource, addr: u32) -> u16 {
    src.palette_byte(addr) as u16 | (src.palette_byte(addr + 1) as u16) << 8
}

fn palette_color(src: &impl TextureSource, addr: u32) -> Pixel {
    decode_abgr1555_opaque(palette_u16(src, addr))
}

/// Resolve one axis' texel coordinate against its repeat/clamp/flip policy
/// (spec §4.2 "S/T-overflow policies"). `wraps` (how many whole periods `v`
/// sits past the first) decides whether a flipped axis mirrors this pass.
fn wrap_axis(v: i32, size: i32, repeat: bool, flip: bool) -> i32 {
    if repeat {
        let wraps = v.div_euclid(size);
        let wrapped = v.rem_euclid(size);
        if flip && wraps % 2 != 0 {
            size - 1 - wrapped
        } else {
            wrapped
        }
    } else {
        v.clamp(0, size - 1)
    }
}

/// Decode the texel at texture-space coordinate `(s, t)` per the descriptor's
/// format, after resolving S/T overflow. Returns a transparent [`Pixel`]
/// (opaque flag clear) wherever the format defines a transparent result.
pub fn read_texel(src: &impl TextureSource, tex: &TextureDescriptor, s: i32, t: i32) -> Pixel {
    let s = wrap_axis(s, tex.size_s, tex.repeat_s, tex.flip_s);
    let t = wrap_axis(t, tex.size_t, tex.repeat_t, tex.flip_t);

    match tex.format {
        TextureFormat::A3I5 => {
            let raw = src.texture_byte(tex.base + (t * tex.size_s + s) as u32);
            let alpha = raw >> 5;
            let index = raw & 0x1F;
            if alpha == 0 {
                Pixel::default()
            } else {
                palette_color(src, tex.palette_base + index as u32 * 2)
            }
        }
        TextureFormat::Color4 => {
            let byte = src.texture_byte(tex.base + (t * tex.size_s + s) as u32 / 4);
            let index = (byte >> ((s % 4) * 2)) & 0x03;
            indexed(src, tex, index)
        }
        TextureFormat::Color16 => {
            let byte = src.texture_byte(tex.base + (t * tex.size_s + s) as u32 / 2);
            let index = (byte >> ((s % 2) * 4)) & 0x0F;
            indexed(src, tex, index)
        }
        TextureFormat::Color256 => {
            let index = src.texture_byte(tex.base + (t * tex.size_s + s) as u32);
            indexed(src, tex, index)
        }
        TextureFormat::Compressed4x4 => compressed4x4(src, tex, s, t),
        TextureFormat::A5I3 => {
            let raw = src.texture_byte(tex.base + (t * tex.size_s + s) as u32);
            let alpha = raw >> 3;
            let index = raw & 0x07;
            if alpha == 0 {
                Pixel::default()
            } else {
                palette_color(src, tex.palette_base + index as u32 * 2)
            }
        }
        TextureFormat::Direct => {
            decode_abgr1555(texture_u16(src, tex.base + 2 * (t * tex.size_s + s) as u32))
        }
    }
}

fn indexed(src: &impl TextureSource, tex: &TextureDescriptor, index: u8) -> Pixel {
    if tex.transparent_index0 && index == 0 {
        Pixel::default()
    } else {
        palette_color(src, tex.palette_base + index as u32 * 2)
    }
}

/// Block-compressed 4x4 format: one palette-index byte pair per 4x4 tile
/// block plus a secondary descriptor mirror (at a fixed offset one bank
/// past the block data) naming the palette base and interpolation mode for
/// that block.
fn compressed4x4(src: &impl TextureSource, tex: &TextureDescriptor, s: i32, t: i32) -> Pixel {
    let tiles_per_row = tex.size_s / 4;
    let tile = (t / 4) * tiles_per_row + (s / 4);
    let index_byte = src.texture_byte(tex.base + (tile * 4 + t % 4) as u32);
    let index = (index_byte >> ((s % 4) * 2)) & 0x03;

    let mirror_base = 0x20000 + (tex.base % 0x20000) / 2 + if tex.base / 0x20000 == 2 { 0x10000 } else { 0 };
    let descriptor = texture_u16(src, mirror_base + tile as u32 * 2);
    let pal_base = tex.palette_base + (descriptor as u32 & 0x3FFF) * 4;
    let mode = (descriptor >> 14) & 0x3;

    let c = |i: u32| palette_color(src, pal_base + i * 2);

    match mode {
        0 => match index {
            3 => Pixel::default(),
            i => c(i as u32),
        },
        2 => c(index as u32),
        1 => match index {
            2 => color::interpolate_palette(c(0), c(1), 0, 1, 2),
            3 => Pixel::default(),
            i => c(i as u32),
        },
        _ => match index {
            2 => color::interpolate_palette(c(0), c(1), 0, 3, 8),
            3 => color::interpolate_palette(c(0), c(1), 0, 5, 8),
            i => c(i as u32),
        },
    }
}
