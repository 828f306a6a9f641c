// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts for the collaborators a host plugs into the core.
//!
//! The core does no file I/O, image decoding, XML parsing or dynamic loading
//! itself. Each of those is a separate component with a narrow interface:
//!
//! - **Resources**: [`ResourceProvider`] maps `(name, group)` to bytes.
//!   [`RawDataGuard`] returns the bytes to their provider on every path,
//!   including early returns and unwinding.
//! - **Images**: [`ImageCodec`] turns an encoded buffer into a
//!   [`DecodedImage`].
//! - **XML**: a parser drives an [`XmlHandler`] with start/end element and
//!   text callbacks; [`LayoutHandler`] is the handler that builds windows.
//! - **Modules**: [`ModuleLoader`] resolves named entry points that register
//!   factories with a tree.
//!
//! Each collaborator reports failures with its own error type, which the
//! caller sees directly.

mod image;
mod layout;
mod module;
mod resource;
mod xml;

pub use image::{DecodeError, DecodedImage, ImageCodec, PixelFormat};
pub use layout::LayoutHandler;
pub use module::{ModuleEntry, ModuleHandle, ModuleLoadError, ModuleLoader, StaticModuleLoader};
#[cfg(feature = "std")]
pub use resource::DirectoryResourceProvider;
pub use resource::{MemoryResourceProvider, RawData, RawDataGuard, ResourceError, ResourceProvider};
pub use xml::{ParseError, XmlAttributes, XmlHandler};
