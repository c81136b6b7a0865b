//! GPU vertex format

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::draw::Color;

/// Clip-space position plus RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    /// Map a play-field point (origin top-left, +y down) into clip space
    pub fn from_surface(p: Vec2, viewport: Vec2, color: Color) -> Self {
        Self {
            position: [p.x / viewport.x * 2.0 - 1.0, 1.0 - p.y / viewport.y * 2.0],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
