// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The window tree.
//!
//! A [`WindowTree`] owns every window of one GUI instance in struct-of-arrays
//! storage and hands out generational [`WindowId`] handles. Besides the
//! hierarchy itself it holds the state a GUI instance shares between its
//! windows: the name registry, the window factories, the input capture slot
//! and the global event set.
//!
//! # Hierarchy and z-order
//!
//! Children are ordered back to front; the last child is drawn last and is
//! the topmost. Always-on-top children form a band in front of the others.
//!
//! # Geometry
//!
//! Positions and sizes are unified ([`UVector2`](crate::dim::UVector2)):
//! a scale relative to the parent's inner rect plus a pixel offset. The
//! clipped and unclipped pixel rects are computed on demand, see
//! [`WindowTree::pixel_rect`].
//!
//! # Notifications
//!
//! Each window has its own [`EventSet`](crate::event::EventSet) populated with
//! the [`WindowEvent`] names. Mutations fire the matching event after the
//! state has changed. Subscribers are plain closures; they cannot reach back
//! into the tree, so there is no re-entrant mutation.
//!
//! # Input routing
//!
//! [`WindowTree::target_window`] and [`WindowTree::keyboard_target`] decide
//! which window input goes to, from hit-testing, the capture slot and the
//! modal target.
//!
//! # Change tracking
//!
//! Mutations mark [`dirty`](crate::dirty) channels.
//! [`WindowTree::evaluate`] drains them into [`TreeChanges`], which the
//! render side uses to decide which windows to redraw.

mod capture;
mod config;
mod evaluate;
mod factory;
mod geometry;
mod hierarchy;
mod hit;
mod id;
mod names;
mod notify;
mod properties;
mod state;
mod store;
mod traverse;

pub use config::TreeConfig;
pub use evaluate::TreeChanges;
pub use factory::{DefaultWindowFactory, TemplateFactory, WindowFactory};
pub use id::{INVALID, WindowId};
pub use names::WindowEvent;
pub use state::WindowState;
pub use store::{WindowFlags, WindowTree};
pub use traverse::Children;
