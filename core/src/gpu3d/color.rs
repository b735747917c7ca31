//! RGB5→RGB6 colour expansion and the 19-bit internal pixel format
//! (spec §3 "Colour encoding invariant", spec §4.2 "Blend mode").

use super::interp;

/// Opaque flag: bit 18 of the packed pixel.
pub const OPAQUE: u32 = 1 << 18;

/// A packed internal pixel: bit 18 = opaque, bits 17..12 = B6, 11..6 = G6,
/// 5..0 = R6. Kept as a transparent wrapper over the raw bits rather than an
/// `{r, g, b, a}` struct, since every rasterizer formula here (interpolation,
/// modulation) operates on the packed channels directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pixel(pub u32);

impl Pixel {
    pub fn new(r: u8, g: u8, b: u8, opaque: bool) -> Self {
        let mut px = (r as u32 & 0x3F) | ((g as u32 & 0x3F) << 6) | ((b as u32 & 0x3F) << 12);
        if opaque {
            px |= OPAQUE;
        }
        Pixel(px)
    }

    pub fn r(self) -> i64 {
        (self.0 & 0x3F) as i64
    }

    pub fn g(self) -> i64 {
        ((self.0 >> 6) & 0x3F) as i64
    }

    pub fn b(self) -> i64 {
        ((self.0 >> 12) & 0x3F) as i64
    }

    pub fn is_opaque(self) -> bool {
        self.0 & OPAQUE != 0
    }
}

/// `c6 = c5*2 + (c5+31)/32`; maps 0 to 0 and 31 to 63.
pub fn rgb5_to_rgb6(c5: u8) -> u8 {
    let c5 = c5 as u32;
    (c5 * 2 + (c5 + 31) / 32) as u8
}

/// Decode a raw 16-bit ABGR1555 value (bit 15 = a, 14..10 = b5, 9..5 = g5,
/// 4..0 = r5), carrying the raw alpha bit through as the opaque flag. Used
/// for the direct-colour texture format, where that bit is a real per-texel
/// alpha rather than palette filler.
pub fn decode_abgr1555(raw: u16) -> Pixel {
    let r5 = (raw & 0x1F) as u8;
    let g5 = ((raw >> 5) & 0x1F) as u8;
    let b5 = ((raw >> 10) & 0x1F) as u8;
    let a = raw & 0x8000 != 0;
    Pixel::new(rgb5_to_rgb6(r5), rgb5_to_rgb6(g5), rgb5_to_rgb6(b5), a)
}

/// Same decode, forced opaque — used for palette lookups, where the stored
/// bit 15 is unused filler and transparency is controlled by the index
/// instead.
pub fn decode_abgr1555_opaque(raw: u16) -> Pixel {
    let mut px = decode_abgr1555(raw);
    px.0 |= OPAQUE;
    px
}

/// Modulation blend (spec §4.2 blend mode 0): `out = ((texel+1)*(v+1)-1)/64`
/// per channel. The opaque flag comes from the texel, not the vertex colour.
pub fn modulate(texel: Pixel, vcolor: Pixel) -> Pixel {
    let chan = |t: i64, v: i64| ((((t + 1) * (v + 1)) - 1) / 64) as u8;
    Pixel::new(
        chan(texel.r(), vcolor.r()),
        chan(texel.g(), vcolor.g()),
        chan(texel.b(), vcolor.b()),
        texel.is_opaque(),
    )
}

/// Perspective-correct interpolation between two packed colours, channel by
/// channel. Always opaque: vertex colour carries no alpha of its own.
#[allow(clippy::too_many_arguments)]
pub fn interpolate_color(c1: Pixel, c2: Pixel, x1: i64, x: i64, x2: i64, w1: i64, w: i64, w2: i64) -> Pixel {
    let r = interp::interpolate_persp(c1.r(), c2.r(), x1, x, x2, w1, w, w2);
    let g = interp::interpolate_persp(c1.g(), c2.g(), x1, x, x2, w1, w, w2);
    let b = interp::interpolate_persp(c1.b(), c2.b(), x1, x, x2, w1, w, w2);
    Pixel::new(r as u8, g as u8, b as u8, true)
}

/// Non-perspective interpolation between two palette colours, used by the
/// compressed 4x4 texture format's built-in two- and four-level gradients.
pub fn interpolate_palette(c1: Pixel, c2: Pixel, x1: i64, x: i64, x2: i64) -> Pixel {
    let r = interp::interpolate(c1.r(), c2.r(), x1, x, x2);
    let g = interp::interpolate(c1.g(), c2.g(), x1, x, x2);
    let b = interp::interpolate(c1.b(), c2.b(), x1, x, x2);
    Pixel::new(r as u8, g as u8, b as u8, true)
}
