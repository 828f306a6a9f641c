// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The backend-neutral vertex and the conversion contract for native layouts.

use crate::colour::Colour;

/// A backend-neutral vertex: pixel-space position, colour and texture
/// coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    /// `x`, `y` in display pixels, `z` in `0.0..=1.0`.
    pub position: [f32; 3],
    /// Vertex colour.
    pub colour: Colour,
    /// Texture coordinates in `0.0..=1.0`.
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a vertex.
    #[must_use]
    pub const fn new(position: [f32; 3], colour: Colour, tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            colour,
            tex_coords,
        }
    }

    /// Returns the vertex moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        let [x, y, z] = self.position;
        Self {
            position: [x + dx, y + dy, z],
            ..self
        }
    }
}

/// A vertex record in a backend's native layout.
///
/// Every layout stores the same information, so converting a [`Vertex`] in
/// and back out loses at most colour precision.
pub trait NativeVertex: Copy + core::fmt::Debug + 'static {
    /// A short layout name for diagnostics.
    const NAME: &'static str;

    /// Converts a neutral vertex into this layout.
    fn from_vertex(vertex: &Vertex) -> Self;

    /// Converts back into a neutral vertex.
    fn to_vertex(&self) -> Vertex;
}

impl NativeVertex for Vertex {
    const NAME: &'static str = "neutral";

    fn from_vertex(vertex: &Vertex) -> Self {
        *vertex
    }

    fn to_vertex(&self) -> Vertex {
        *self
    }
}
