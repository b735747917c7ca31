//! Texel decode across formats (spec §4.2 "Format dispatch").

mod common;

use common::FlatTextureSource;
use console_core::gpu3d::texture::read_texel;
use console_core::gpu3d::{TextureDescriptor, TextureFormat};

#[test]
fn repeated_flipped_axis_is_idempotent_two_periods_out() {
    let mut src = FlatTextureSource::new();
    // Four distinct Color256 texels along s, t fixed at 0.
    for s in 0..4u32 {
        src.texture[s as usize] = s as u8 + 1;
    }
    src.set_palette_color(0, 0);
    for i in 1..4u16 {
        src.set_palette_color(i as u32 * 2, i * 5);
    }

    let tex = TextureDescriptor {
        format: TextureFormat::Color256,
        base: 0,
        palette_base: 0,
        size_s: 4,
        size_t: 4,
        repeat_s: true,
        flip_s: true,
        repeat_t: false,
        flip_t: false,
        transparent_index0: false,
    };

    for s in 0..4 {
        let direct = read_texel(&src, &tex, s, 0);
        let two_periods_out = read_texel(&src, &tex, s + 2 * tex.size_s, 0);
        assert_eq!(direct, two_periods_out);
    }
}

#[test]
fn a3i5_zero_alpha_is_transparent_nonzero_alpha_looks_up_palette() {
    let mut src = FlatTextureSource::new();
    // raw = alpha<<5 | index. alpha=0 -> transparent regardless of index.
    src.texture[0] = 0x05; // alpha 0, index 5
    src.texture[1] = (1 << 5) | 7; // alpha 1, index 7
    src.set_palette_color(7 * 2, 0x1F); // opaque red (r5=31)

    let tex = TextureDescriptor {
        format: TextureFormat::A3I5,
        base: 0,
        palette_base: 0,
        size_s: 2,
        size_t: 1,
        ..Default::default()
    };

    assert!(!read_texel(&src, &tex, 0, 0).is_opaque());
    let texel = read_texel(&src, &tex, 1, 0);
    assert!(texel.is_opaque());
    assert_eq!(texel.r(), 63);
}

#[test]
fn compressed_4x4_mode3_interpolates_between_the_first_two_palette_entries() {
    let mut src = FlatTextureSource::new();

    // One 4x4 tile at base 0: packed 2-bit indices 0,1,2,3 for s=0..3, t=0.
    src.texture[0] = 0b11_10_01_00;

    // Mirror descriptor for tile 0 lives at 0x20000 (bank B), mode=3 (bits
    // 14..15), palette offset 0.
    let mirror_addr = 0x20000usize;
    let descriptor: u16 = 0xC000;
    src.texture[mirror_addr] = (descriptor & 0xFF) as u8;
    src.texture[mirror_addr + 1] = (descriptor >> 8) as u8;

    src.set_palette_color(0, 0); // c0: black
    src.set_palette_color(2, 0x1F); // c1: full red (r5=31 -> r6=63)

    let tex = TextureDescriptor {
        format: TextureFormat::Compressed4x4,
        base: 0,
        palette_base: 0,
        size_s: 4,
        size_t: 4,
        ..Default::default()
    };

    let t0 = read_texel(&src, &tex, 0, 0);
    assert_eq!((t0.r(), t0.g(), t0.b()), (0, 0, 0));

    let t1 = read_texel(&src, &tex, 1, 0);
    assert_eq!((t1.r(), t1.g(), t1.b()), (63, 0, 0));

    let t2 = read_texel(&src, &tex, 2, 0);
    assert_eq!(t2.r(), 63 * 3 / 8);

    let t3 = read_texel(&src, &tex, 3, 0);
    assert_eq!(t3.r(), 63 * 5 / 8);
}
