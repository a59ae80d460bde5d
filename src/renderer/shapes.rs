//! Shape generation for 2D primitives
//!
//! Everything is an axis-aligned rectangle in screen pixels (y down).

use glam::Vec2;

use super::vertex::Vertex;

/// Push two triangles covering `(x, y, w, h)`
pub fn push_rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    if w <= 0.0 || h <= 0.0 || color[3] <= 0.0 {
        return;
    }
    let (x0, y0, x1, y1) = (x, y, x + w, y + h);

    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x0, y1, color));

    out.push(Vertex::new(x0, y1, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));
}

/// Rectangle translated by `offset`
#[inline]
pub fn push_rect_offset(
    out: &mut Vec<Vertex>,
    offset: Vec2,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    color: [f32; 4],
) {
    push_rect(out, x + offset.x, y + offset.y, w, h, color);
}

/// Map a pixel position to normalized device coordinates
#[inline]
pub fn pixel_to_ndc(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    (x / width * 2.0 - 1.0, 1.0 - y / height * 2.0)
}
