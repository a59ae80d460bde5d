//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::Hue;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    /// `0xRRGGBB` to RGBA
    pub const fn hex(rgb: u32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }

    pub const SKY: [f32; 4] = hex(0x2c3e50);
    pub const SKY_NIGHTMARE: [f32; 4] = hex(0x1a0505);
    pub const GROUND: [f32; 4] = hex(0x8e44ad);
    pub const GROUND_NIGHTMARE: [f32; 4] = hex(0xc0392b);
    pub const GRASS: [f32; 4] = hex(0x27ae60);
    pub const GRASS_NIGHTMARE: [f32; 4] = hex(0xe67e22);

    pub const DRILL: [f32; 4] = hex(0xbdc3c7);
    pub const DRILL_BASE: [f32; 4] = hex(0x7f8c8d);
    pub const RIDER_HEAD: [f32; 4] = hex(0xe67e22);
    pub const RIDER_BODY: [f32; 4] = hex(0x3498db);
    pub const RIDER_LEGS: [f32; 4] = hex(0x2c3e50);
    pub const RIDER_ARM: [f32; 4] = hex(0xc0392b);
    pub const FLAME: [f32; 4] = hex(0xf1c40f);

    pub const VILLAGER_HEAD: [f32; 4] = hex(0xf1c40f);
    pub const MULTI_CORE: [f32; 4] = hex(0xf1c40f);
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub const UFO_DOME: [f32; 4] = hex(0x2ecc71);
    pub const UFO_SAUCER: [f32; 4] = hex(0x95a5a6);
    pub const UFO_BASE: [f32; 4] = hex(0x7f8c8d);

    pub const HUD_BAR: [f32; 4] = [0.0, 0.0, 0.0, 0.7];
    pub const HEALTH: [f32; 4] = hex(0xe74c3c);
    pub const NIGHTMARE_BANNER: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
}

/// Palette lookup for simulation hues
pub fn hue_color(hue: Hue) -> [f32; 4] {
    match hue {
        Hue::Red => colors::hex(0xe74c3c),
        Hue::Blue => colors::hex(0x3498db),
        Hue::Green => colors::hex(0x2ecc71),
        Hue::Purple => colors::hex(0x9b59b6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(colors::hex(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(colors::hex(0x0000ff), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }
}
