// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer errors.

use core::fmt;

use crate::backend::BackendError;
use crate::texture::TextureId;

/// Errors from geometry batches and the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// A vertex buffer could not grow. The batch that failed has been reset
    /// to empty; the caller may retry with less geometry or drop the frame.
    OutOfMemory {
        /// Vertex count the batch needed.
        required: usize,
        /// Capacity the batch held before it reset.
        capacity: usize,
    },
    /// A batch holds a vertex count that is not a whole number of triangles.
    PartialTriangle {
        /// The offending vertex count.
        vertex_count: usize,
    },
    /// The texture was never created or has been destroyed.
    UnknownTexture(TextureId),
    /// The texture exists but was not created as a render target.
    NotATarget(TextureId),
    /// The native backend failed.
    Backend(BackendError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { required, capacity } => write!(
                f,
                "out of memory growing vertex buffer from {capacity} to {required} vertices"
            ),
            Self::PartialTriangle { vertex_count } => write!(
                f,
                "batch of {vertex_count} vertices is not a triangle list"
            ),
            Self::UnknownTexture(id) => write!(f, "unknown texture {id:?}"),
            Self::NotATarget(id) => write!(f, "texture {id:?} is not a render target"),
            Self::Backend(err) => write!(f, "backend error: {err}"),
        }
    }
}

impl core::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BackendError> for RenderError {
    fn from(err: BackendError) -> Self {
        Self::Backend(err)
    }
}
