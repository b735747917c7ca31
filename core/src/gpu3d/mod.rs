//! The scanline 3D rasterizer (spec §2 "Rasterizer", spec §4.2).
//!
//! [`Rasterizer::draw_scanline`] produces one 256-pixel line at a time into
//! a small ring of recently-drawn lines, the way the reference renders one
//! scanline per HBlank rather than the whole frame up front.

pub mod color;
pub mod interp;
pub mod polygon;
pub mod texture;

pub use color::Pixel;
pub use polygon::{BlendMode, Polygon, TextureDescriptor, TextureFormat, Vertex, MAX_VERTICES};
pub use texture::TextureSource;

use crate::core::component::Component;

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 192;
pub const LINE_CACHE_DEPTH: usize = 48;

/// Ring of 48 scanlines, 256 packed pixels each (spec §3 "Line cache").
/// Slot `line % 48` holds the most recently produced contents of that
/// display line; a reader that falls behind by 48 lines or more loses data
/// to the next `draw_scanline` call, same as the reference's fixed-depth
/// line buffer.
pub struct LineCache {
    lines: Vec<[Pixel; SCREEN_WIDTH]>,
}

impl LineCache {
    pub fn new() -> Self {
        Self {
            lines: vec![[Pixel::default(); SCREEN_WIDTH]; LINE_CACHE_DEPTH],
        }
    }

    pub fn slot(&self, line: usize) -> &[Pixel; SCREEN_WIDTH] {
        &self.lines[line % LINE_CACHE_DEPTH]
    }

    fn slot_mut(&mut self, line: usize) -> &mut [Pixel; SCREEN_WIDTH] {
        &mut self.lines[line % LINE_CACHE_DEPTH]
    }
}

impl Default for LineCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth buffer reset value: deepest possible depth, so the first polygon
/// drawn on a line always passes the depth test.
const DEPTH_RESET: i64 = 0x00FF_FFFF;

/// Owns the per-frame polygon list and the scratch state (depth buffer,
/// line cache) used to rasterize it one scanline at a time.
pub struct Rasterizer<S: TextureSource> {
    pub line_cache: LineCache,
    depth_buffer: [i64; SCREEN_WIDTH],
    polygons: Vec<Polygon>,
    next_line: usize,
    texture_source: S,
}

impl<S: TextureSource> Rasterizer<S> {
    pub fn new(texture_source: S) -> Self {
        Self {
            line_cache: LineCache::new(),
            depth_buffer: [DEPTH_RESET; SCREEN_WIDTH],
            polygons: Vec::new(),
            next_line: 0,
            texture_source,
        }
    }

    /// Replace the per-frame polygon list published by the (out of scope)
    /// geometry engine.
    pub fn set_polygons(&mut self, polygons: Vec<Polygon>) {
        self.polygons = polygons;
    }

    pub fn texture_source(&self) -> &S {
        &self.texture_source
    }

    pub fn texture_source_mut(&mut self) -> &mut S {
        &mut self.texture_source
    }

    /// Produce scanline `line`: clear its line-cache slot and the depth
    /// buffer, then draw every polygon that intersects it.
    pub fn draw_scanline(&mut self, line: i32) {
        *self.line_cache.slot_mut(line as usize) = [Pixel::default(); SCREEN_WIDTH];
        self.depth_buffer = [DEPTH_RESET; SCREEN_WIDTH];

        for polygon_index in 0..self.polygons.len() {
            self.draw_polygon(polygon_index, line);
        }
    }

    /// Find the two polygon edges that straddle `line` and hand them to
    /// [`Self::rasterize`]. Vertices are walked in y-sorted order; a cross
    /// product against the top/bottom chord classifies each middle vertex
    /// as belonging to the left or right edge.
    fn draw_polygon(&mut self, polygon_index: usize, line: i32) {
        let verts = self.polygons[polygon_index].vertices.clone();
        let n = verts.len();
        if n < 3 {
            return;
        }

        let mut order: Vec<usize> = (0..n).collect();
        for i in 0..n - 1 {
            for j in i + 1..n {
                if verts[order[j]].y < verts[order[i]].y {
                    order.swap(i, j);
                }
            }
        }

        let top = verts[order[0]].y;
        let bottom = verts[order[n - 1]].y;
        if line < top || line >= bottom {
            return;
        }

        let v0 = verts[order[0]];
        let vn = verts[order[n - 1]];
        let mut crosses = [0i64; MAX_VERTICES - 2];
        for j in 0..n - 2 {
            let v = verts[order[j + 1]];
            crosses[j] = (v.x as i64 - v0.x as i64) * (vn.y as i64 - v0.y as i64)
                - (v.y as i64 - v0.y as i64) * (vn.x as i64 - v0.x as i64);
        }

        for j in 1..n {
            if line < verts[order[j]].y {
                let mut v2 = j;
                while v2 < n - 1 && crosses[v2 - 1] > 0 {
                    v2 += 1;
                }
                let mut v1 = v2 - 1;
                while v1 > 0 && crosses[v1 - 1] > 0 {
                    v1 -= 1;
                }

                let mut v4 = j;
                while v4 < n - 1 && crosses[v4 - 1] <= 0 {
                    v4 += 1;
                }
                let mut v3 = v4 - 1;
                while v3 > 0 && crosses[v3 - 1] <= 0 {
                    v3 -= 1;
                }

                self.rasterize(line, polygon_index, order[v1], order[v2], order[v3], order[v4]);
                break;
            }
        }
    }

    /// Fill the span between the left edge (`i1`-`i2`) and the right edge
    /// (`i3`-`i4`) on `line`, depth-testing and shading one pixel at a time.
    fn rasterize(&mut self, line: i32, polygon_index: usize, i1: usize, i2: usize, i3: usize, i4: usize) {
        let (v1, v2, v3, v4, texture, mode, w_buffer) = {
            let polygon = &self.polygons[polygon_index];
            (
                polygon.vertices[i1],
                polygon.vertices[i2],
                polygon.vertices[i3],
                polygon.vertices[i4],
                polygon.texture,
                polygon.mode,
                polygon.w_buffer,
            )
        };

        // Reduce all four w's in lock-step by 4-bit right shifts until each
        // fits a signed 16-bit value.
        let mut vw = [v1.w as i64, v2.w as i64, v3.w as i64, v4.w as i64];
        let mut w_shift = 0u32;
        while vw.iter().any(|&w| w != w as i16 as i64) {
            for w in vw.iter_mut() {
                *w >>= 4;
            }
            w_shift += 4;
        }

        let line = line as i64;
        let (y1, y2, y3, y4) = (v1.y as i64, v2.y as i64, v3.y as i64, v4.y as i64);

        let x1 = interp::interpolate(v1.x as i64, v2.x as i64, y1, line, y2);
        let x2 = interp::interpolate(v3.x as i64, v4.x as i64, y3, line, y4);

        let (z1, z2) = if w_buffer {
            (0, 0)
        } else {
            (
                interp::interpolate(v1.z as i64, v2.z as i64, y1, line, y2),
                interp::interpolate(v3.z as i64, v4.z as i64, y3, line, y4),
            )
        };

        let w1 = interp::interpolate_w(vw[0], vw[1], y1, line, y2);
        let w2 = interp::interpolate_w(vw[2], vw[3], y3, line, y4);

        let mut x = x1;
        while x < x2 {
            let depth = if w_buffer {
                interp::interpolate_w(w1, w2, x1, x, x2) << w_shift
            } else {
                interp::interpolate(z1, z2, x1, x, x2)
            };

            if self.depth_buffer[x as usize] >= depth {
                let w = if w_buffer {
                    depth >> w_shift
                } else {
                    interp::interpolate_w(w1, w2, x1, x, x2)
                };

                let c1 = color::interpolate_color(v1.color, v2.color, y1, line, y2, vw[0], w1, vw[1]);
                let c2 = color::interpolate_color(v3.color, v4.color, y3, line, y4, vw[2], w2, vw[3]);
                let mut shaded = color::interpolate_color(c1, c2, x1, x, x2, w1, w, w2);

                if texture.is_textured() {
                    let s1 = interp::interpolate_persp(v1.s as i64, v2.s as i64, y1, line, y2, vw[0], w1, vw[1]);
                    let s2 = interp::interpolate_persp(v3.s as i64, v4.s as i64, y3, line, y4, vw[2], w2, vw[3]);
                    let s = interp::interpolate_persp(s1, s2, x1, x, x2, w1, w, w2);

                    let t1 = interp::interpolate_persp(v1.t as i64, v2.t as i64, y1, line, y2, vw[0], w1, vw[1]);
                    let t2 = interp::interpolate_persp(v3.t as i64, v4.t as i64, y3, line, y4, vw[2], w2, vw[3]);
                    let t = interp::interpolate_persp(t1, t2, x1, x, x2, w1, w, w2);

                    let texel = texture::read_texel(&self.texture_source, &texture, (s >> 4) as i32, (t >> 4) as i32);

                    shaded = if mode.is_modulation() {
                        color::modulate(texel, shaded)
                    } else {
                        log::warn!("unimplemented 3D blend mode {}; using raw texel", mode.0);
                        texel
                    };
                }

                if shaded.is_opaque() {
                    self.line_cache.slot_mut(line as usize)[x as usize] = shaded;
                    self.depth_buffer[x as usize] = depth;
                }
            }

            x += 1;
        }
    }
}

/// Steps one scanline per tick; reports a frame boundary (`true`) once every
/// 192 lines, the way the reference's video chip signals end-of-frame.
impl<S: TextureSource> Component for Rasterizer<S> {
    fn tick(&mut self) -> bool {
        let line = self.next_line;
        self.draw_scanline(line as i32);
        self.next_line = (self.next_line + 1) % SCREEN_HEIGHT;
        self.next_line == 0
    }
}
