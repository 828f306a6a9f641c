// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry batching and the renderer abstraction for casement.
//!
//! This crate sits between [`casement_core`]'s window tree and a native
//! graphics backend. It defines:
//!
//! - [`Vertex`], [`Colour`] and [`ColourRect`], the backend-neutral inputs
//! - [`NativeVertex`] and the closed set of native layouts in [`layout`]
//! - [`GeometryBatch`], a texture-keyed run of triangles with a fallible
//!   1.5× growth policy
//! - [`RenderQueue`], the ordered per-frame batch list with a clip stack
//! - [`Backend`], the contract every native backend implements
//! - [`Renderer`], which owns a backend, its textures and the queue, and
//!   renders to the display or into render targets
//! - [`draw_tree`], the window draw path, with [`GeometryCache`] replaying
//!   geometry of windows that did not change
//! - [`RecordingBackend`], a backend that records commands instead of drawing
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Emits frame begin/end, summaries and
//!   buffer growth failures to the renderer's trace sink.
//! - `trace-rich` (disabled by default, implies `trace`): Also emits one event
//!   per flushed batch and per buffer growth.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod backend;
mod batch;
mod cache;
mod colour;
mod draw;
mod error;
pub mod layout;
mod queue;
mod recording;
mod renderer;
mod texture;
mod vertex;

pub use backend::{Backend, BackendError};
pub use batch::{BlendMode, GeometryBatch};
pub use cache::GeometryCache;
pub use colour::{Colour, ColourRect};
pub use draw::{FillPainter, PaintContext, WindowPainter, draw_tree};
pub use error::RenderError;
pub use queue::{QuadSplitMode, RenderQueue};
pub use recording::{Command, RecordedTexture, RecordingBackend};
pub use renderer::{Renderer, RendererConfig};
pub use texture::{TextureId, TextureStore};
pub use vertex::{NativeVertex, Vertex};
