// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame render queue.
//!
//! Geometry is batched by contiguous texture: a submission joins the most
//! recently opened batch when texture, clip and blend mode all match, and
//! opens a new batch otherwise. Batches are never reordered, even when an
//! earlier batch uses the same texture, so draw order always equals
//! submission order.
//!
//! Clip rectangles form a stack. Pushing intersects with the current top, so
//! a child can never draw outside its parent's clip. Changing the clip only
//! affects geometry submitted afterwards.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::batch::{BlendMode, GeometryBatch};
use crate::colour::ColourRect;
use crate::error::RenderError;
use crate::texture::TextureId;
use crate::vertex::{NativeVertex, Vertex};

/// Which diagonal a quad is split along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QuadSplitMode {
    /// Split from the top-left corner to the bottom-right corner.
    #[default]
    TopLeftToBottomRight,
    /// Split from the bottom-left corner to the top-right corner.
    BottomLeftToTopRight,
}

/// Ordered batches for one frame plus the clip stack.
#[derive(Clone, Debug)]
pub struct RenderQueue<V> {
    batches: Vec<GeometryBatch<V>>,
    root_clip: Rect,
    clip_stack: Vec<Rect>,
    blend: BlendMode,
    batch_limit: Option<usize>,
    /// Forces the next submission into a new batch.
    sealed: bool,
}

impl<V: NativeVertex> RenderQueue<V> {
    /// Creates an empty queue whose outermost clip is `root_clip`.
    #[must_use]
    pub fn new(root_clip: Rect) -> Self {
        Self {
            batches: Vec::new(),
            root_clip,
            clip_stack: Vec::new(),
            blend: BlendMode::Normal,
            batch_limit: None,
            sealed: false,
        }
    }

    /// Caps every batch at `limit` vertices; submissions that would overflow
    /// the open batch start a new one.
    #[must_use]
    pub fn with_batch_limit(mut self, limit: Option<usize>) -> Self {
        self.batch_limit = limit;
        self
    }

    // -- Clipping --

    /// The outermost clip, usually the display rectangle.
    #[must_use]
    pub fn root_clip(&self) -> Rect {
        self.root_clip
    }

    /// Replaces the outermost clip.
    pub fn set_root_clip(&mut self, clip: Rect) {
        self.root_clip = clip;
    }

    /// The clip applied to new geometry.
    #[must_use]
    pub fn current_clip(&self) -> Rect {
        self.clip_stack.last().copied().unwrap_or(self.root_clip)
    }

    /// Pushes `clip` intersected with the current clip.
    pub fn push_clip(&mut self, clip: Rect) {
        let clipped = self.current_clip().intersect(clip);
        self.clip_stack.push(clipped);
    }

    /// Pops the innermost clip. The root clip is never popped.
    pub fn pop_clip(&mut self) -> Option<Rect> {
        self.clip_stack.pop()
    }

    /// Number of pushed clips.
    #[must_use]
    pub fn clip_depth(&self) -> usize {
        self.clip_stack.len()
    }

    // -- Submission --

    /// The blend mode applied to new geometry.
    #[must_use]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    /// Sets the blend mode for new geometry.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    /// Makes the next submission open a new batch even if it could join the
    /// current one.
    pub fn break_batch(&mut self) {
        self.sealed = true;
    }

    /// Submits a textured quad as two triangles.
    pub fn add_quad(
        &mut self,
        dest: Rect,
        z: f32,
        texture: Option<TextureId>,
        tex_rect: Rect,
        colours: &ColourRect,
        split: QuadSplitMode,
    ) -> Result<(), RenderError> {
        let vertices = quad_vertices(dest, z, tex_rect, colours, split);
        self.add_geometry(texture, &vertices)
    }

    /// Submits one triangle.
    pub fn add_triangle(
        &mut self,
        texture: Option<TextureId>,
        vertices: &[Vertex; 3],
    ) -> Result<(), RenderError> {
        self.add_geometry(texture, vertices)
    }

    /// Submits a triangle list.
    ///
    /// Returns [`RenderError::PartialTriangle`] without queueing anything if
    /// the vertex count is not a multiple of three. If the batch being
    /// appended to cannot grow it resets to empty, losing the geometry
    /// queued in it, and the error is returned.
    pub fn add_geometry(
        &mut self,
        texture: Option<TextureId>,
        vertices: &[Vertex],
    ) -> Result<(), RenderError> {
        if vertices.len() % 3 != 0 {
            return Err(RenderError::PartialTriangle {
                vertex_count: vertices.len(),
            });
        }
        if vertices.is_empty() {
            return Ok(());
        }
        let clip = self.current_clip();
        let blend = self.blend;
        let limit = self.batch_limit;
        let sealed = core::mem::take(&mut self.sealed);
        match self.batches.last_mut() {
            Some(last)
                if !sealed
                    && last.texture() == texture
                    && last.clip() == clip
                    && last.blend_mode() == blend
                    && limit.is_none_or(|l| last.vertex_count() + vertices.len() <= l) =>
            {
                last.append_geometry(vertices)
            }
            _ => {
                let mut batch = GeometryBatch::new(texture, clip, blend);
                if let Some(limit) = limit {
                    batch = batch.with_limit(limit);
                }
                batch.append_geometry(vertices)?;
                self.batches.push(batch);
                Ok(())
            }
        }
    }

    /// Queues a deep copy of a previously built batch, keeping its texture,
    /// clip and blend mode. Later submissions never join it.
    pub fn append_batch(&mut self, batch: &GeometryBatch<V>) {
        if !batch.is_empty() {
            self.batches.push(batch.clone());
        }
        self.sealed = true;
    }

    // -- Inspection --

    /// Queued batches in draw order.
    #[must_use]
    pub fn batches(&self) -> &[GeometryBatch<V>] {
        &self.batches
    }

    /// Number of queued batches.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Total queued vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(GeometryBatch::vertex_count).sum()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Discards every queued batch. The clip stack and blend mode are kept.
    pub fn clear(&mut self) {
        self.batches.clear();
        self.sealed = false;
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "vertex positions are f32 by contract"
)]
fn edges(rect: Rect) -> [f32; 4] {
    [rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32]
}

/// Builds the six vertices of a quad.
pub(crate) fn quad_vertices(
    dest: Rect,
    z: f32,
    tex_rect: Rect,
    colours: &ColourRect,
    split: QuadSplitMode,
) -> [Vertex; 6] {
    let [l, t, r, b] = edges(dest);
    let [u0, v0, u1, v1] = edges(tex_rect);
    let tl = Vertex::new([l, t, z], colours.top_left, [u0, v0]);
    let tr = Vertex::new([r, t, z], colours.top_right, [u1, v0]);
    let bl = Vertex::new([l, b, z], colours.bottom_left, [u0, v1]);
    let br = Vertex::new([r, b, z], colours.bottom_right, [u1, v1]);
    match split {
        QuadSplitMode::TopLeftToBottomRight => [tl, bl, br, br, tr, tl],
        QuadSplitMode::BottomLeftToTopRight => [tl, bl, tr, tr, bl, br],
    }
}
