// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A backend that records commands instead of drawing.
//!
//! [`RecordingBackend`] is generic over the vertex layout, so the same
//! scenario can be replayed through every native layout to check that they
//! all satisfy the backend contract identically. It also enforces the parts
//! of the contract a real device would reject, such as unbalanced frames,
//! binding a destroyed texture or a partial triangle list.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use kurbo::{Rect, Size};

use crate::backend::{Backend, BackendError, rgba_len};
use crate::batch::BlendMode;
use crate::vertex::{NativeVertex, Vertex};

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq)]
pub enum Command<V> {
    /// `begin_frame`.
    BeginFrame(Size),
    /// `create_texture`.
    CreateTexture {
        /// Recorded texture id.
        id: u32,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// `update_texture`.
    UpdateTexture {
        /// Recorded texture id.
        id: u32,
        /// Updated region.
        region: [u32; 4],
    },
    /// `destroy_texture`.
    DestroyTexture(u32),
    /// `create_render_target`.
    CreateRenderTarget {
        /// Recorded texture id.
        id: u32,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// `begin_target_frame`, with the target's recorded id.
    BeginTargetFrame(u32),
    /// `set_clip`.
    SetClip(Rect),
    /// `set_blend_mode`.
    SetBlendMode(BlendMode),
    /// `bind_texture`.
    BindTexture(Option<u32>),
    /// `draw_triangles`.
    DrawTriangles(Vec<V>),
    /// `end_frame`.
    EndFrame,
}

/// A texture held by a [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedTexture {
    /// Id used in [`Command`]s.
    pub id: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixels.
    pub pixels: Vec<u8>,
}

/// A [`Backend`] that records every call.
#[derive(Debug)]
pub struct RecordingBackend<V> {
    commands: Vec<Command<V>>,
    live_textures: Vec<u32>,
    next_texture: u32,
    in_frame: bool,
    frame_target: Option<u32>,
    fail_next_draw: Option<BackendError>,
    _layout: PhantomData<V>,
}

impl<V> Default for RecordingBackend<V> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            live_textures: Vec::new(),
            next_texture: 0,
            in_frame: false,
            frame_target: None,
            fail_next_draw: None,
            _layout: PhantomData,
        }
    }
}

impl<V: NativeVertex> RecordingBackend<V> {
    /// Creates a backend with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded calls, oldest first.
    #[must_use]
    pub fn commands(&self) -> &[Command<V>] {
        &self.commands
    }

    /// Empties the log.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Makes the next `draw_triangles` call fail with `error`.
    pub fn fail_next_draw(&mut self, error: BackendError) {
        self.fail_next_draw = Some(error);
    }

    /// Number of textures created and not yet destroyed.
    #[must_use]
    pub fn live_texture_count(&self) -> usize {
        self.live_textures.len()
    }

    /// Vertices of each draw call, converted back to neutral vertices.
    pub fn draws(&self) -> impl Iterator<Item = Vec<Vertex>> + '_ {
        self.commands.iter().filter_map(|c| match c {
            Command::DrawTriangles(vertices) => {
                Some(vertices.iter().map(NativeVertex::to_vertex).collect())
            }
            _ => None,
        })
    }

    /// Recorded calls with the vertex payloads converted back to neutral
    /// vertices, for comparing logs across layouts.
    #[must_use]
    pub fn neutral_commands(&self) -> Vec<Command<Vertex>> {
        self.commands
            .iter()
            .map(|c| match c {
                Command::BeginFrame(size) => Command::BeginFrame(*size),
                Command::CreateTexture { id, width, height } => Command::CreateTexture {
                    id: *id,
                    width: *width,
                    height: *height,
                },
                Command::UpdateTexture { id, region } => Command::UpdateTexture {
                    id: *id,
                    region: *region,
                },
                Command::DestroyTexture(id) => Command::DestroyTexture(*id),
                Command::CreateRenderTarget { id, width, height } => Command::CreateRenderTarget {
                    id: *id,
                    width: *width,
                    height: *height,
                },
                Command::BeginTargetFrame(id) => Command::BeginTargetFrame(*id),
                Command::SetClip(clip) => Command::SetClip(*clip),
                Command::SetBlendMode(mode) => Command::SetBlendMode(*mode),
                Command::BindTexture(id) => Command::BindTexture(*id),
                Command::DrawTriangles(vertices) => {
                    Command::DrawTriangles(vertices.iter().map(NativeVertex::to_vertex).collect())
                }
                Command::EndFrame => Command::EndFrame,
            })
            .collect()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_texture;
        self.next_texture += 1;
        self.live_textures.push(id);
        id
    }

    fn check_live(&self, texture: &RecordedTexture) -> Result<(), BackendError> {
        if self.live_textures.contains(&texture.id) {
            Ok(())
        } else {
            Err(BackendError::InvalidTexture)
        }
    }

    fn check_in_frame(&self, call: &str) -> Result<(), BackendError> {
        if self.in_frame {
            Ok(())
        } else {
            Err(BackendError::Device(String::from(call) + " called outside a frame"))
        }
    }
}

impl<V: NativeVertex> Backend for RecordingBackend<V> {
    type Vertex = V;
    type Texture = RecordedTexture;

    fn begin_frame(&mut self, display_size: Size) -> Result<(), BackendError> {
        if self.in_frame {
            return Err(BackendError::Device("frame already begun".into()));
        }
        self.in_frame = true;
        self.commands.push(Command::BeginFrame(display_size));
        Ok(())
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<RecordedTexture, BackendError> {
        let expected = rgba_len(width, height);
        if rgba.len() != expected {
            return Err(BackendError::TextureDataSize {
                expected,
                actual: rgba.len(),
            });
        }
        let id = self.next_id();
        self.commands.push(Command::CreateTexture { id, width, height });
        Ok(RecordedTexture {
            id,
            width,
            height,
            pixels: rgba.into(),
        })
    }

    fn update_texture(
        &mut self,
        texture: &mut RecordedTexture,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), BackendError> {
        self.check_live(texture)?;
        let expected = rgba_len(width, height);
        if rgba.len() != expected {
            return Err(BackendError::TextureDataSize {
                expected,
                actual: rgba.len(),
            });
        }
        let fits_x = x.checked_add(width).is_some_and(|r| r <= texture.width);
        let fits_y = y.checked_add(height).is_some_and(|b| b <= texture.height);
        if !fits_x || !fits_y {
            return Err(BackendError::Device("update region out of bounds".into()));
        }
        let stride = texture.width as usize * 4;
        for (row, src) in rgba.chunks_exact(width as usize * 4).enumerate() {
            let start = (y as usize + row) * stride + x as usize * 4;
            texture.pixels[start..start + src.len()].copy_from_slice(src);
        }
        self.commands.push(Command::UpdateTexture {
            id: texture.id,
            region: [x, y, width, height],
        });
        Ok(())
    }

    fn destroy_texture(&mut self, texture: RecordedTexture) {
        self.live_textures.retain(|&id| id != texture.id);
        self.commands.push(Command::DestroyTexture(texture.id));
    }

    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<RecordedTexture, BackendError> {
        let id = self.next_id();
        self.commands
            .push(Command::CreateRenderTarget { id, width, height });
        Ok(RecordedTexture {
            id,
            width,
            height,
            pixels: vec![0; rgba_len(width, height)],
        })
    }

    fn begin_target_frame(&mut self, target: &RecordedTexture) -> Result<(), BackendError> {
        self.check_live(target)?;
        if self.in_frame {
            return Err(BackendError::Device("frame already begun".into()));
        }
        self.in_frame = true;
        self.frame_target = Some(target.id);
        self.commands.push(Command::BeginTargetFrame(target.id));
        Ok(())
    }

    fn read_texture(&mut self, texture: &RecordedTexture) -> Result<Vec<u8>, BackendError> {
        self.check_live(texture)?;
        Ok(texture.pixels.clone())
    }

    fn set_clip(&mut self, clip: Rect) -> Result<(), BackendError> {
        self.commands.push(Command::SetClip(clip));
        Ok(())
    }

    fn set_blend_mode(&mut self, mode: BlendMode) -> Result<(), BackendError> {
        self.commands.push(Command::SetBlendMode(mode));
        Ok(())
    }

    fn bind_texture(&mut self, texture: Option<&RecordedTexture>) -> Result<(), BackendError> {
        let id = texture.map(|t| t.id);
        if let Some(id) = id {
            if !self.live_textures.contains(&id) {
                return Err(BackendError::InvalidTexture);
            }
            if self.frame_target == Some(id) {
                return Err(BackendError::Device("render target bound while drawn into".into()));
            }
        }
        self.commands.push(Command::BindTexture(id));
        Ok(())
    }

    fn draw_triangles(&mut self, vertices: &[V]) -> Result<(), BackendError> {
        if let Some(err) = self.fail_next_draw.take() {
            return Err(err);
        }
        if vertices.len() % 3 != 0 {
            return Err(BackendError::Device("partial triangle submitted".into()));
        }
        self.commands.push(Command::DrawTriangles(vertices.into()));
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        self.check_in_frame("end_frame")?;
        self.in_frame = false;
        self.frame_target = None;
        self.commands.push(Command::EndFrame);
        Ok(())
    }
}
