// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arguments passed to event subscribers.

use crate::window::WindowId;

/// Mutable argument object handed to every subscriber of a firing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventArgs {
    /// The window the event concerns, if any.
    pub window: Option<WindowId>,
    /// A second window involved in the event (for example the window that
    /// lost activation when another one gained it).
    pub other: Option<WindowId>,
    /// Whether any subscriber handled the event.
    pub handled: bool,
    /// Number of subscribers that reported handling the event.
    pub handled_count: u32,
}

impl EventArgs {
    /// Creates arguments with no window attached.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            window: None,
            other: None,
            handled: false,
            handled_count: 0,
        }
    }

    /// Creates arguments concerning `window`.
    #[must_use]
    pub const fn for_window(window: WindowId) -> Self {
        Self {
            window: Some(window),
            other: None,
            handled: false,
            handled_count: 0,
        }
    }

    /// Sets the secondary window.
    #[must_use]
    pub const fn with_other(mut self, other: Option<WindowId>) -> Self {
        self.other = other;
        self
    }

    /// Records that one more subscriber handled the event.
    pub fn mark_handled(&mut self) {
        self.handled = true;
        self.handled_count = self.handled_count.saturating_add(1);
    }
}
