// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native vertex layouts.
//!
//! The closed set of layouts that backends consume. They all carry the same
//! information in a different order and colour encoding:
//!
//! | layout | order | colour |
//! |---|---|---|
//! | [`GlVertex`] | tex, colour, position | four `f32` |
//! | [`D3d9Vertex`] | position, colour, tex | `u32` ARGB |
//! | [`D3d10Vertex`] | position, colour, tex | four `u8`, RGBA |
//! | [`IrrlichtVertex`] | position, normal, colour, tex | `u32` ARGB |
//!
//! All layouts are `#[repr(C)]` so that a backend may upload a slice of them
//! as is.

use crate::colour::Colour;
use crate::vertex::{NativeVertex, Vertex};

/// Interleaved layout for GL-family backends.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct GlVertex {
    /// Texture coordinates.
    pub tex: [f32; 2],
    /// RGBA colour.
    pub colour: [f32; 4],
    /// Position.
    pub position: [f32; 3],
}

impl NativeVertex for GlVertex {
    const NAME: &'static str = "gl";

    fn from_vertex(vertex: &Vertex) -> Self {
        let c = vertex.colour;
        Self {
            tex: vertex.tex_coords,
            colour: [c.r, c.g, c.b, c.a],
            position: vertex.position,
        }
    }

    fn to_vertex(&self) -> Vertex {
        let [r, g, b, a] = self.colour;
        Vertex::new(self.position, Colour::new(r, g, b, a), self.tex)
    }
}

/// Fixed-function layout for Direct3D 9 (`XYZ | DIFFUSE | TEX1`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct D3d9Vertex {
    /// Position.
    pub position: [f32; 3],
    /// Diffuse colour, `0xAARRGGBB`.
    pub diffuse: u32,
    /// Texture coordinates.
    pub tex: [f32; 2],
}

impl NativeVertex for D3d9Vertex {
    const NAME: &'static str = "d3d9";

    fn from_vertex(vertex: &Vertex) -> Self {
        Self {
            position: vertex.position,
            diffuse: vertex.colour.to_argb(),
            tex: vertex.tex_coords,
        }
    }

    fn to_vertex(&self) -> Vertex {
        Vertex::new(self.position, Colour::from_argb(self.diffuse), self.tex)
    }
}

/// Input-assembler layout for Direct3D 10 (`R8G8B8A8_UNORM` colour).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct D3d10Vertex {
    /// Position.
    pub position: [f32; 3],
    /// RGBA colour bytes.
    pub colour: [u8; 4],
    /// Texture coordinates.
    pub tex: [f32; 2],
}

impl NativeVertex for D3d10Vertex {
    const NAME: &'static str = "d3d10";

    fn from_vertex(vertex: &Vertex) -> Self {
        Self {
            position: vertex.position,
            colour: vertex.colour.to_rgba8(),
            tex: vertex.tex_coords,
        }
    }

    fn to_vertex(&self) -> Vertex {
        let [r, g, b, a] = self.colour;
        let argb = u32::from_be_bytes([a, r, g, b]);
        Vertex::new(self.position, Colour::from_argb(argb), self.tex)
    }
}

/// Irrlicht's `S3DVertex` layout.
///
/// The normal is fixed to face the viewer since GUI geometry is never lit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct IrrlichtVertex {
    /// Position.
    pub pos: [f32; 3],
    /// Normal.
    pub normal: [f32; 3],
    /// Colour, `0xAARRGGBB`.
    pub color: u32,
    /// Texture coordinates.
    pub tcoords: [f32; 2],
}

impl IrrlichtVertex {
    /// The normal every GUI vertex carries.
    pub const NORMAL: [f32; 3] = [0.0, 0.0, -1.0];
}

impl Default for IrrlichtVertex {
    fn default() -> Self {
        Self {
            pos: [0.0; 3],
            normal: Self::NORMAL,
            color: 0,
            tcoords: [0.0; 2],
        }
    }
}

impl NativeVertex for IrrlichtVertex {
    const NAME: &'static str = "irrlicht";

    fn from_vertex(vertex: &Vertex) -> Self {
        Self {
            pos: vertex.position,
            normal: Self::NORMAL,
            color: vertex.colour.to_argb(),
            tcoords: vertex.tex_coords,
        }
    }

    fn to_vertex(&self) -> Vertex {
        Vertex::new(self.pos, Colour::from_argb(self.color), self.tcoords)
    }
}
