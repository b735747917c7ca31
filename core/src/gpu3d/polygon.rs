//! Polygon and vertex records (spec §3 "Polygon").

use arrayvec::ArrayVec;

use super::color::Pixel;

/// Largest vertex count a polygon can carry.
pub const MAX_VERTICES: usize = 8;

/// One polygon vertex, already projected into screen space by the (out of
/// scope) geometry engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
    /// 24-bit depth value.
    pub z: i32,
    pub w: i32,
    pub s: i32,
    pub t: i32,
    pub color: Pixel,
}

/// One of the six texel formats a texture descriptor can name (spec §4.2
/// "Format dispatch"). `Direct` covers both the literal format value 0 and
/// any value outside 1..=6, matching the reference's switch-default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureFormat {
    #[default]
    Direct,
    A3I5,
    Color4,
    Color16,
    Color256,
    Compressed4x4,
    A5I3,
}

impl TextureFormat {
    pub fn from_field(value: u8) -> Self {
        match value {
            1 => TextureFormat::A3I5,
            2 => TextureFormat::Color4,
            3 => TextureFormat::Color16,
            4 => TextureFormat::Color256,
            5 => TextureFormat::Compressed4x4,
            6 => TextureFormat::A5I3,
            _ => TextureFormat::Direct,
        }
    }
}

/// A polygon's texture binding (spec §3 "texture descriptor", spec §4.2
/// "S/T-overflow policies").
#[derive(Clone, Copy, Debug, Default)]
pub struct TextureDescriptor {
    pub format: TextureFormat,
    pub base: u32,
    pub palette_base: u32,
    pub size_s: i32,
    pub size_t: i32,
    pub repeat_s: bool,
    pub flip_s: bool,
    pub repeat_t: bool,
    pub flip_t: bool,
    /// Indexed formats treat palette index 0 as transparent.
    pub transparent_index0: bool,
}

impl TextureDescriptor {
    /// `false` disables texture sampling entirely for the polygon, leaving
    /// the rasterized colour as pure interpolated vertex colour — matching
    /// the reference, which never calls its texel decoder when the format
    /// field is 0.
    pub fn is_textured(&self) -> bool {
        self.format != TextureFormat::Direct
    }
}

/// Polygon blend mode. Only modulation (0) has defined semantics (spec
/// §4.2); anything else logs and falls back to the raw texel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlendMode(pub u8);

impl BlendMode {
    pub const MODULATION: BlendMode = BlendMode(0);

    pub fn is_modulation(self) -> bool {
        self == Self::MODULATION
    }
}

/// A single polygon from the upstream geometry stage's per-frame list (spec
/// §3). `vertices` is an inline fixed-capacity array: polygons are published
/// once per frame and read once per scanline they intersect, so the hot path
/// never allocates.
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    pub vertices: ArrayVec<Vertex, MAX_VERTICES>,
    pub texture: TextureDescriptor,
    pub mode: BlendMode,
    /// When set, depth comparisons and the depth buffer itself operate on
    /// `w` instead of the interpolated `z`.
    pub w_buffer: bool,
}
