// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window tree, event sets and property system for embeddable GUIs.
//!
//! `casement_core` is the host-independent half of casement. It is `no_std`
//! compatible (with `alloc`), keeps every window of a GUI instance in
//! struct-of-arrays storage behind generational handles, and never talks to
//! a graphics API: drawing lives in `casement_render`.
//!
//! # Architecture
//!
//! ```text
//!   host input / layout loading
//!       │
//!       ▼
//!   WindowTree mutations ──► EventSet notifications (per window + global)
//!       │
//!       ▼
//!   WindowTree::evaluate() ──► TreeChanges ──► renderer draw path
//! ```
//!
//! **[`window`]**: The [`WindowTree`](window::WindowTree): hierarchy,
//! z-order, geometry, capture, activation, alpha, factories and the name
//! registry.
//!
//! **[`event`]**: Named events with grouped subscribers and connection
//! handles that never keep an event alive.
//!
//! **[`property`]**: String-marshalled named properties with shared
//! descriptors.
//!
//! **[`dim`]**: Unified (relative + absolute) dimensions.
//!
//! **[`dirty`]**: Dirty channels via `understory_dirty`. AREA, ALPHA and
//! STATE propagate to descendants; REDRAW is local; TOPOLOGY triggers a draw
//! order rebuild.
//!
//! **[`collab`]**: Interfaces for resource providers, image codecs, XML
//! handlers (including the layout loader) and module loaders.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! diagnostics, with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! **[`error`]**: The [`GuiError`](error::GuiError) taxonomy.
//!
//! Everything is single-threaded. Event subscriber lists are shared through
//! `Rc`, so a tree is neither `Send` nor `Sync`.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies and
//!   the directory-backed resource provider.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-batch and
//!   per-buffer-growth events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod collab;
pub mod dim;
pub mod dirty;
pub mod error;
pub mod event;
pub mod property;
pub mod trace;
pub mod window;
