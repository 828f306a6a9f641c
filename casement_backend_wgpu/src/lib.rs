// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! wgpu backend for the casement renderer.
//!
//! [`WgpuBackend`] implements [`casement_render::Backend`] on top of a
//! caller-owned `wgpu::Device` and `wgpu::Queue`. The host supplies the
//! target view each frame with [`WgpuBackend::set_target`], typically the
//! current surface texture. Draw calls are collected between `begin_frame`
//! and `end_frame`, then encoded into a single render pass with one scissor
//! rect per batch. Render targets are `Rgba8Unorm` textures drawn with their
//! own pipelines, so they work whatever the surface format is.

mod backend;
mod vertex;

pub use backend::{WgpuBackend, WgpuConfig, WgpuTexture};
pub use vertex::WgpuVertex;
