//! Collision detection for flat screen-space geometry
//!
//! Meteorites are circles; the drill is an axis-aligned box. The test is a
//! circle against the box grown by the radius with rounded corners.

use glam::Vec2;

/// Axis-aligned rectangle, `y` grows downward (screen space)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.w / 2.0, self.h / 2.0)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Check whether a circle overlaps a rectangle
///
/// Edge regions compare straight distances against the grown extents;
/// the corner regions use `dx² + dy² <= r²` against the box corner.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let dist = (center - rect.center()).abs();
    let half = rect.half_extents();

    if dist.x > half.x + radius || dist.y > half.y + radius {
        return false;
    }
    // Within the box's column or row: the straight test above is exact
    if dist.x <= half.x || dist.y <= half.y {
        return true;
    }

    let corner = dist - half;
    corner.length_squared() <= radius * radius
}

/// Check whether a circle has reached the ground line
#[inline]
pub fn touches_ground(center: Vec2, radius: f32, ground_y: f32) -> bool {
    center.y + radius >= ground_y
}

/// Check whether a point left the horizontal span `[0, width]` by more than `margin`
#[inline]
pub fn outside_horizontal(x: f32, width: f32, margin: f32) -> bool {
    x < -margin || x > width + margin
}
