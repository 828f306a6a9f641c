// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The window tree uses multi-channel dirty tracking (via [`understory_dirty`])
//! to work out which windows need their geometry regenerated. Each channel
//! represents an independent category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`AREA`], [`ALPHA`] and [`STATE`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency
//!   edges from child to parent. Moving or resizing a window moves its
//!   children, alpha is inherited, and hiding or disabling a window affects
//!   its whole subtree.
//!
//! - **Local-only**: [`REDRAW`] is marked with the default policy. Text and
//!   explicit invalidation only concern the window itself.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on create/destroy, parenting and
//!   z-order changes.
//!
//! # Consumption
//!
//! [`WindowTree::evaluate`](crate::window::WindowTree::evaluate) drains all
//! channels into [`TreeChanges`](crate::window::TreeChanges), which the render
//! side uses to drop cached geometry.

use understory_dirty::Channel;

/// Position, size, chrome or clipping changed.
pub const AREA: Channel = Channel::new(0);

/// Alpha or alpha inheritance changed.
pub const ALPHA: Channel = Channel::new(1);

/// Visibility, enabled or activation state changed.
pub const STATE: Channel = Channel::new(2);

/// Window content must be regenerated; no propagation.
pub const REDRAW: Channel = Channel::new(3);

/// Tree topology or z-order changed.
pub const TOPOLOGY: Channel = Channel::new(4);
