//! Colour encoding and blend invariants (spec §3/§4.2).

use console_core::gpu3d::color::{interpolate_color, interpolate_palette, modulate, rgb5_to_rgb6, Pixel};

#[test]
fn rgb5_to_rgb6_maps_the_endpoints_exactly() {
    assert_eq!(rgb5_to_rgb6(0), 0);
    assert_eq!(rgb5_to_rgb6(31), 63);
}

#[test]
fn rgb5_to_rgb6_is_monotonic_across_the_whole_range() {
    let mut prev = 0u8;
    for c5 in 0..=31u8 {
        let c6 = rgb5_to_rgb6(c5);
        assert!(c6 >= prev);
        prev = c6;
    }
}

#[test]
fn modulate_formula_matches_the_documented_per_channel_expression() {
    let texel = Pixel::new(40, 20, 4, true);
    let vcolor = Pixel::new(63, 32, 0, true);
    let out = modulate(texel, vcolor);

    let chan = |t: i64, v: i64| ((((t + 1) * (v + 1)) - 1) / 64) as u8;
    assert_eq!(out.r() as u8, chan(40, 63));
    assert_eq!(out.g() as u8, chan(20, 32));
    assert_eq!(out.b() as u8, chan(4, 0));
    // Opacity follows the texel, not the vertex colour.
    assert!(out.is_opaque());
}

#[test]
fn modulate_is_transparent_when_the_texel_is_transparent() {
    let texel = Pixel::default(); // opaque flag clear
    let vcolor = Pixel::new(63, 63, 63, true);
    assert!(!modulate(texel, vcolor).is_opaque());
}

#[test]
fn interpolate_color_at_the_midpoint_with_equal_w_is_the_channel_average() {
    let c1 = Pixel::new(0, 0, 0, true);
    let c2 = Pixel::new(60, 40, 20, true);
    // Equal w on both ends collapses the perspective correction to linear.
    let mid = interpolate_color(c1, c2, 0, 50, 100, 4096, 4096, 4096);
    assert_eq!(mid.r(), 30);
    assert_eq!(mid.g(), 20);
    assert_eq!(mid.b(), 10);
    assert!(mid.is_opaque());
}

#[test]
fn interpolate_palette_is_plain_linear_interpolation() {
    let c1 = Pixel::new(0, 0, 0, true);
    let c2 = Pixel::new(63, 0, 0, true);
    assert_eq!(interpolate_palette(c1, c2, 0, 3, 8).r(), 63 * 3 / 8);
    assert_eq!(interpolate_palette(c1, c2, 0, 5, 8).r(), 63 * 5 / 8);
}
