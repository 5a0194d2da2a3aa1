//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

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
    pub const GRASS: [f32; 4] = [0.29, 0.55, 0.25, 1.0];
    pub const GRASS_DARK: [f32; 4] = [0.25, 0.50, 0.22, 1.0];
    pub const DIRT: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const DIRT_EDGE: [f32; 4] = [0.36, 0.25, 0.20, 1.0];
    pub const DOG_EAR: [f32; 4] = [0.25, 0.18, 0.12, 1.0];
    pub const DOG_NOSE: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
    pub const HURT: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const MOLE: [f32; 4] = [0.35, 0.27, 0.22, 1.0];
    pub const MOLE_SNOUT: [f32; 4] = [0.95, 0.6, 0.65, 1.0];
    pub const WILD_POWERUP: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
    pub const BARK_RING: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const BUBBLE: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.25];
    pub const MINIMAP_BORDER: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const MINIMAP_PLAYER: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const MINIMAP_POWERUP: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const DEBUG_HITBOX: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const DEBUG_DIG_POINT: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const MENU_BACKGROUND: [f32; 4] = [0.1, 0.1, 0.15, 1.0];
    pub const GAME_OVER_DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
}
