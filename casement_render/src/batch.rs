// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry batches: texture-keyed runs of triangles.
//!
//! A [`GeometryBatch`] accumulates native vertices for one draw call. It
//! tracks its own capacity rather than relying on `Vec`'s, so the growth
//! policy is exact and observable:
//!
//! - `capacity >= vertex_count` always holds.
//! - When an append needs more room, capacity grows to
//!   `ceil(required × 1.5)`, clamped to the batch's vertex limit when
//!   `required` itself fits under it.
//! - If growth fails (the limit is exceeded or the allocator refuses), the
//!   batch drops its buffer, resets to `{count: 0, capacity: 0}` and returns
//!   [`RenderError::OutOfMemory`]. It never keeps a partially grown buffer.
//!
//! Cloning a batch deep-copies its vertices and keeps its capacity, so a
//! cached copy can be mutated without affecting the original.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::backend::Backend;
use crate::error::RenderError;
use crate::texture::{TextureId, TextureStore};
use crate::vertex::{NativeVertex, Vertex};

/// How a batch's pixels combine with the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Straight-alpha source-over.
    #[default]
    Normal,
    /// Source-over for content rendered to a texture with premultiplied
    /// alpha.
    RttPremultiplied,
}

/// A run of triangles sharing one texture, clip rectangle and blend mode.
#[derive(Debug)]
pub struct GeometryBatch<V> {
    texture: Option<TextureId>,
    clip: Rect,
    blend: BlendMode,
    vertices: Vec<V>,
    capacity: usize,
    limit: Option<usize>,
}

impl<V: NativeVertex> GeometryBatch<V> {
    /// Creates an empty batch. Nothing is allocated until the first append.
    #[must_use]
    pub fn new(texture: Option<TextureId>, clip: Rect, blend: BlendMode) -> Self {
        Self {
            texture,
            clip,
            blend,
            vertices: Vec::new(),
            capacity: 0,
            limit: None,
        }
    }

    /// Caps the batch at `limit` vertices.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Converts and appends `vertices`.
    ///
    /// On [`RenderError::OutOfMemory`] the batch has been reset to empty.
    pub fn append_geometry(&mut self, vertices: &[Vertex]) -> Result<(), RenderError> {
        if vertices.is_empty() {
            return Ok(());
        }
        let required = self.vertices.len().saturating_add(vertices.len());
        self.perform_buffer_management(required)?;
        self.vertices.extend(vertices.iter().map(V::from_vertex));
        Ok(())
    }

    /// Converts and appends one vertex.
    pub fn append_vertex(&mut self, vertex: &Vertex) -> Result<(), RenderError> {
        self.append_geometry(core::slice::from_ref(vertex))
    }

    /// Appends vertices already in native layout.
    pub(crate) fn append_native(&mut self, vertices: &[V]) -> Result<(), RenderError> {
        let required = self.vertices.len().saturating_add(vertices.len());
        self.perform_buffer_management(required)?;
        self.vertices.extend_from_slice(vertices);
        Ok(())
    }

    /// Ensures room for `required` vertices.
    ///
    /// Does nothing if the capacity already suffices. Otherwise grows to
    /// `ceil(required × 1.5)`, clamped to the limit; fails with
    /// [`RenderError::OutOfMemory`] after resetting the batch to empty if
    /// `required` exceeds the limit or the allocation fails.
    pub fn perform_buffer_management(&mut self, required: usize) -> Result<(), RenderError> {
        if required <= self.capacity {
            return Ok(());
        }
        let mut target = required.saturating_add(required.div_ceil(2));
        if let Some(limit) = self.limit {
            if required > limit {
                return Err(self.fail_growth(required));
            }
            target = target.min(limit);
        }
        let additional = target - self.vertices.len();
        if self.vertices.try_reserve_exact(additional).is_err() {
            return Err(self.fail_growth(required));
        }
        self.capacity = target;
        Ok(())
    }

    fn fail_growth(&mut self, required: usize) -> RenderError {
        let capacity = self.capacity;
        self.vertices = Vec::new();
        self.capacity = 0;
        RenderError::OutOfMemory { required, capacity }
    }

    /// Number of vertices held.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of vertices the buffer can hold without growing.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The vertex limit, if any.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// The native vertices.
    #[must_use]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// The texture drawn with, or `None` for untextured geometry.
    #[must_use]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// The clip rectangle in display pixels.
    #[must_use]
    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// The blend mode.
    #[must_use]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    /// Empties the batch, keeping its buffer.
    pub fn reset(&mut self) {
        self.vertices.clear();
    }

    /// Whether the batch has nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Issues the batch to `backend` as a single triangle-list draw.
    ///
    /// Fails with [`RenderError::PartialTriangle`] if the vertex count is not
    /// a multiple of three, and with [`RenderError::UnknownTexture`] if the
    /// texture is no longer in `textures`. Empty batches draw nothing.
    pub fn draw<B>(
        &self,
        backend: &mut B,
        textures: &TextureStore<B::Texture>,
    ) -> Result<(), RenderError>
    where
        B: Backend<Vertex = V> + ?Sized,
    {
        let count = self.vertices.len();
        if count % 3 != 0 {
            return Err(RenderError::PartialTriangle {
                vertex_count: count,
            });
        }
        if count == 0 {
            return Ok(());
        }
        let native = match self.texture {
            Some(id) => Some(textures.get(id).ok_or(RenderError::UnknownTexture(id))?),
            None => None,
        };
        backend.set_clip(self.clip)?;
        backend.set_blend_mode(self.blend)?;
        backend.bind_texture(native)?;
        backend.draw_triangles(&self.vertices)?;
        Ok(())
    }
}

impl<V: NativeVertex> Clone for GeometryBatch<V> {
    fn clone(&self) -> Self {
        let mut vertices = Vec::with_capacity(self.capacity);
        vertices.extend_from_slice(&self.vertices);
        Self {
            texture: self.texture,
            clip: self.clip,
            blend: self.blend,
            vertices,
            capacity: self.capacity,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::colour::Colour;
    use crate::layout::D3d9Vertex;
    use crate::recording::{Command, RecordingBackend};

    fn clip() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn v(x: f32) -> Vertex {
        Vertex::new([x, 0.0, 0.0], Colour::WHITE, [0.0, 0.0])
    }

    fn verts(n: usize) -> Vec<Vertex> {
        (0..n).map(|i| v(i as f32)).collect()
    }

    #[test]
    fn append_grows_by_half_again() {
        let mut batch = GeometryBatch::<Vertex>::new(None, clip(), BlendMode::Normal);
        assert_eq!((batch.vertex_count(), batch.capacity()), (0, 0));

        batch.append_geometry(&verts(10)).unwrap();
        assert_eq!(batch.vertex_count(), 10);
        assert_eq!(batch.capacity(), 15);

        batch.append_vertex(&v(10.0)).unwrap();
        assert_eq!(batch.vertex_count(), 11);
        assert_eq!(batch.capacity(), 15, "no growth while it fits");

        batch.append_geometry(&verts(5)).unwrap();
        assert_eq!(batch.vertex_count(), 16);
        assert_eq!(batch.capacity(), 24);

        batch.perform_buffer_management(7).unwrap();
        assert_eq!(batch.capacity(), 24, "never shrinks");
    }

    #[test]
    fn odd_requests_round_up() {
        let mut batch = GeometryBatch::<Vertex>::new(None, clip(), BlendMode::Normal);
        batch.perform_buffer_management(3).unwrap();
        assert_eq!(batch.capacity(), 5);
    }

    #[test]
    fn growth_is_clamped_to_the_limit() {
        let mut batch = GeometryBatch::<Vertex>::new(None, clip(), BlendMode::Normal).with_limit(12);
        batch.append_geometry(&verts(10)).unwrap();
        assert_eq!(batch.capacity(), 12);
        batch.append_geometry(&verts(2)).unwrap();
        assert_eq!(batch.vertex_count(), 12);
    }

    #[test]
    fn exceeding_the_limit_resets_the_batch() {
        let mut batch = GeometryBatch::<Vertex>::new(None, clip(), BlendMode::Normal).with_limit(12);
        batch.append_geometry(&verts(9)).unwrap();
        let err = batch.append_geometry(&verts(6)).unwrap_err();
        assert_eq!(
            err,
            RenderError::OutOfMemory {
                required: 15,
                capacity: 12
            }
        );
        assert_eq!((batch.vertex_count(), batch.capacity()), (0, 0));

        batch.append_geometry(&verts(3)).unwrap();
        assert_eq!(batch.vertex_count(), 3, "usable again after the reset");
    }

    #[test]
    fn allocator_refusal_resets_the_batch() {
        let mut batch = GeometryBatch::<Vertex>::new(None, clip(), BlendMode::Normal);
        batch.append_geometry(&verts(3)).unwrap();
        let err = batch.perform_buffer_management(usize::MAX / 4).unwrap_err();
        assert!(matches!(err, RenderError::OutOfMemory { capacity: 5, .. }));
        assert_eq!((batch.vertex_count(), batch.capacity()), (0, 0));
        assert!(batch.vertices().is_empty());
    }

    #[test]
    fn clones_are_independent_and_keep_capacity() {
        let mut original = GeometryBatch::<D3d9Vertex>::new(None, clip(), BlendMode::Normal);
        original.append_geometry(&verts(6)).unwrap();
        let mut copy = original.clone();
        assert_eq!(copy.capacity(), original.capacity());

        copy.append_geometry(&verts(3)).unwrap();
        copy.reset();
        assert_eq!(original.vertex_count(), 6);
        assert_eq!(original.vertices()[5].position[0], 5.0);
        assert!(copy.is_empty());
    }

    #[test]
    fn draw_rejects_partial_triangles() {
        let mut backend = RecordingBackend::<Vertex>::new();
        let textures = TextureStore::new();
        let mut batch = GeometryBatch::new(None, clip(), BlendMode::Normal);
        batch.append_geometry(&verts(4)).unwrap();
        assert_eq!(
            batch.draw(&mut backend, &textures),
            Err(RenderError::PartialTriangle { vertex_count: 4 })
        );
        assert!(backend.commands().is_empty(), "nothing reached the device");
    }

    #[test]
    fn draw_binds_state_then_issues_one_call() {
        let mut backend = RecordingBackend::<Vertex>::new();
        let mut textures = TextureStore::new();
        let native = backend.create_texture(1, 1, &[0; 4]).unwrap();
        let tex = textures.insert(native, 1, 1);
        backend.clear_commands();

        let mut batch = GeometryBatch::new(Some(tex), clip(), BlendMode::RttPremultiplied);
        batch.append_geometry(&verts(6)).unwrap();
        batch.draw(&mut backend, &textures).unwrap();

        assert_eq!(
            backend.commands(),
            [
                Command::SetClip(clip()),
                Command::SetBlendMode(BlendMode::RttPremultiplied),
                Command::BindTexture(Some(0)),
                Command::DrawTriangles(verts(6)),
            ]
        );
    }

    #[test]
    fn draw_reports_destroyed_textures() {
        let mut backend = RecordingBackend::<Vertex>::new();
        let mut textures = TextureStore::new();
        let native = backend.create_texture(1, 1, &[0; 4]).unwrap();
        let tex = textures.insert(native, 1, 1);
        textures.remove(tex);

        let mut batch = GeometryBatch::new(Some(tex), clip(), BlendMode::Normal);
        batch.append_geometry(&vec![v(0.0); 3]).unwrap();
        assert_eq!(
            batch.draw(&mut backend, &textures),
            Err(RenderError::UnknownTexture(tex))
        );
    }
}
