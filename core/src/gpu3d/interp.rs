//! Fixed-point interpolation primitives (spec §4.2 "Arithmetic primitives").
//!
//! Every rasterizer value (colour channel, depth, texture coordinate) is
//! interpolated through one of these three functions. Everything is done in
//! `i64` rather than the reference's native `int` width purely to keep
//! intermediate products (a 24-bit `z` times a 256-wide `x` span, for
//! example) from overflowing `i32` — the arithmetic and its truncating
//! division are otherwise bit-for-bit the reference's.

/// `v1 + (v2-v1)*(x-x1)/(x2-x1)`, truncating toward zero.
pub fn interpolate(v1: i64, v2: i64, x1: i64, x: i64, x2: i64) -> i64 {
    v1 + (v2 - v1) * (x - x1) / (x2 - x1)
}

/// Perspective-correct interpolation of `w` itself: `r = w2 + (w1-w2)*(x-x1)/(x2-x1)`,
/// result `w1*w2/r` (0 if `r` is 0).
pub fn interpolate_w(w1: i64, w2: i64, x1: i64, x: i64, x2: i64) -> i64 {
    let r = w2 + (w1 - w2) * (x - x1) / (x2 - x1);
    if r == 0 { 0 } else { w1 * w2 / r }
}

/// Perspective-correct interpolation of an arbitrary vertex attribute,
/// reweighted by `w`: `min = v1*w/w1` (0 if `w1` is 0), `max = v2*w/w2`
/// (0 if `w2` is 0), then linear interpolation of `min..max`.
#[allow(clippy::too_many_arguments)]
pub fn interpolate_persp(v1: i64, v2: i64, x1: i64, x: i64, x2: i64, w1: i64, w: i64, w2: i64) -> i64 {
    let min = if w1 != 0 { v1 * w / w1 } else { 0 };
    let max = if w2 != 0 { v2 * w / w2 } else { 0 };
    interpolate(min, max, x1, x, x2)
}
