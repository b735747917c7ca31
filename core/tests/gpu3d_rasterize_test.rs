//! Scanline rasterization of a flat-shaded, untextured triangle (spec §8 scenario 4).

mod common;

use common::FlatTextureSource;
use console_core::gpu3d::color::Pixel;
use console_core::gpu3d::{Polygon, Rasterizer, Vertex};

fn flat_vertex(x: i32, y: i32) -> Vertex {
    Vertex {
        x,
        y,
        z: 0,
        w: 4096,
        s: 0,
        t: 0,
        color: Pixel::new(63, 0, 0, true),
    }
}

#[test]
fn flat_shaded_triangle_paints_solid_red_across_its_span() {
    let mut rasterizer = Rasterizer::new(FlatTextureSource::new());

    let mut polygon = Polygon::default();
    polygon.vertices.push(flat_vertex(0, 0));
    polygon.vertices.push(flat_vertex(255, 0));
    polygon.vertices.push(flat_vertex(128, 191));
    rasterizer.set_polygons(vec![polygon]);

    rasterizer.draw_scanline(96);
    let line = rasterizer.line_cache.slot(96);

    // Left edge (0,0)->(128,191) and right edge (255,0)->(128,191) bracket
    // x in [64, 191] at y=96; everything inside is solid opaque red, outside
    // is the cleared (transparent) background.
    for x in 0..64 {
        assert!(!line[x].is_opaque(), "x={x} should be outside the triangle");
    }
    for x in 64..192 {
        assert_eq!(line[x], Pixel::new(63, 0, 0, true), "x={x} should be solid red");
    }
    for x in 192..256 {
        assert!(!line[x].is_opaque(), "x={x} should be outside the triangle");
    }
}

#[test]
fn draw_scanline_clears_its_slot_before_redrawing() {
    let mut rasterizer = Rasterizer::new(FlatTextureSource::new());

    let mut polygon = Polygon::default();
    polygon.vertices.push(flat_vertex(0, 0));
    polygon.vertices.push(flat_vertex(255, 0));
    polygon.vertices.push(flat_vertex(128, 191));
    rasterizer.set_polygons(vec![polygon]);
    rasterizer.draw_scanline(96);
    assert!(rasterizer.line_cache.slot(96)[100].is_opaque());

    // Redrawing with no polygons at all must clear the old contents rather
    // than leave the previous frame's pixels behind.
    rasterizer.set_polygons(vec![]);
    rasterizer.draw_scanline(96);
    assert!(!rasterizer.line_cache.slot(96)[100].is_opaque());
}
