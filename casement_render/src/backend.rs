// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The native backend contract.
//!
//! A backend turns the renderer's batches into native draw calls. Every
//! backend satisfies the same contract, whatever its vertex layout:
//!
//! - A frame is `begin_frame`, then any number of state changes and
//!   `draw_triangles` calls, then `end_frame`.
//! - `draw_triangles` receives a whole triangle list; the renderer never
//!   submits a partial triangle.
//! - `set_clip` and `set_blend_mode` apply to subsequent draws only.
//! - Texture handles are owned by the renderer's
//!   [`TextureStore`](crate::TextureStore); the backend gets them back
//!   through `destroy_texture`.
//! - A frame draws either to the display (`begin_frame`) or into a render
//!   target made by `create_render_target` (`begin_target_frame`). A target
//!   frame starts from a transparent target, and the target is not bound as
//!   a texture while it is being drawn into.
//!
//! # Device loss
//!
//! Once a call returns [`BackendError::DeviceLost`] the device's textures are
//! gone. The renderer recovers without invalidating any
//! [`TextureId`](crate::TextureId): [`Renderer::grab_textures`] reads every
//! texture back with `read_texture`, [`Renderer::replace_backend`] swaps in a
//! backend on a fresh device and [`Renderer::restore_textures`] recreates the
//! textures from the copies. Render targets come back transparent and are
//! redrawn by the next target frame.
//!
//! [`Renderer::grab_textures`]: crate::Renderer::grab_textures
//! [`Renderer::replace_backend`]: crate::Renderer::replace_backend
//! [`Renderer::restore_textures`]: crate::Renderer::restore_textures

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Size};

use crate::batch::BlendMode;
use crate::vertex::NativeVertex;

/// A native device failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendError {
    /// The device is gone and must be recreated. See the module docs for
    /// the recovery sequence.
    DeviceLost,
    /// A texture handle was rejected by the device.
    InvalidTexture,
    /// Texture data does not match the texture's dimensions.
    TextureDataSize {
        /// Bytes required.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// Any other device-specific failure.
    Device(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceLost => f.write_str("device lost"),
            Self::InvalidTexture => f.write_str("invalid texture handle"),
            Self::TextureDataSize { expected, actual } => {
                write!(f, "texture data is {actual} bytes, expected {expected}")
            }
            Self::Device(message) => f.write_str(message),
        }
    }
}

impl core::error::Error for BackendError {}

/// A native graphics backend.
pub trait Backend {
    /// Vertex layout consumed by [`draw_triangles`](Self::draw_triangles).
    type Vertex: NativeVertex;
    /// Native texture handle.
    type Texture;

    /// Starts a frame targeting a display of `display_size` pixels.
    fn begin_frame(&mut self, display_size: Size) -> Result<(), BackendError>;

    /// Creates a texture from tightly packed RGBA8 pixels.
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Self::Texture, BackendError>;

    /// Replaces a `width` × `height` region at `(x, y)` with RGBA8 pixels.
    fn update_texture(
        &mut self,
        texture: &mut Self::Texture,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), BackendError>;

    /// Releases a texture.
    fn destroy_texture(&mut self, texture: Self::Texture);

    /// Creates a transparent texture that target frames can draw into and
    /// that can later be sampled like any other texture.
    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Self::Texture, BackendError>;

    /// Starts a frame drawing into `target`. Positions and clips are in the
    /// target's pixels.
    fn begin_target_frame(&mut self, target: &Self::Texture) -> Result<(), BackendError>;

    /// Reads a texture back as tightly packed RGBA8 pixels.
    fn read_texture(&mut self, texture: &Self::Texture) -> Result<Vec<u8>, BackendError>;

    /// Restricts subsequent draws to `clip`, in display pixels.
    fn set_clip(&mut self, clip: Rect) -> Result<(), BackendError>;

    /// Selects the blend equation for subsequent draws.
    fn set_blend_mode(&mut self, mode: BlendMode) -> Result<(), BackendError>;

    /// Binds a texture for subsequent draws, or none for untextured geometry.
    fn bind_texture(&mut self, texture: Option<&Self::Texture>) -> Result<(), BackendError>;

    /// Draws a triangle list.
    fn draw_triangles(&mut self, vertices: &[Self::Vertex]) -> Result<(), BackendError>;

    /// Finishes the frame.
    fn end_frame(&mut self) -> Result<(), BackendError>;
}

/// Bytes of RGBA8 data a `width` × `height` region needs.
#[must_use]
pub(crate) fn rgba_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}
