// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};
use casement_render::{Colour, NativeVertex, Vertex};

/// Vertex record uploaded to the GPU.
///
/// Positions stay in display pixels; the shader maps them to clip space
/// using the screen-size uniform.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WgpuVertex {
    /// `x`, `y` in pixels, `z` depth.
    pub position: [f32; 3],
    /// Straight-alpha RGBA.
    pub colour: [f32; 4],
    /// Texture coordinates.
    pub tex_coords: [f32; 2],
}

impl WgpuVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4, 2 => Float32x2];

    /// The buffer layout matching `shader.wgsl`.
    #[must_use]
    pub const fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl NativeVertex for WgpuVertex {
    const NAME: &'static str = "wgpu";

    fn from_vertex(vertex: &Vertex) -> Self {
        let Colour { r, g, b, a } = vertex.colour;
        Self {
            position: vertex.position,
            colour: [r, g, b, a],
            tex_coords: vertex.tex_coords,
        }
    }

    fn to_vertex(&self) -> Vertex {
        let [r, g, b, a] = self.colour;
        Vertex::new(self.position, Colour::new(r, g, b, a), self.tex_coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_struct() {
        let layout = WgpuVertex::layout();
        assert_eq!(layout.array_stride, 36);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, [0, 12, 28]);
    }

    #[test]
    fn conversion_is_lossless() {
        let v = Vertex::new(
            [4.0, 8.0, 0.5],
            Colour::new(0.1, 0.2, 0.3, 0.4),
            [0.25, 0.75],
        );
        assert_eq!(WgpuVertex::from_vertex(&v).to_vertex(), v);
    }

    #[test]
    fn casts_to_bytes() {
        let verts = [WgpuVertex::default(); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 108);
    }
}
