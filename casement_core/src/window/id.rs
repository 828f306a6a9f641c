// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window identity.

use core::fmt;

/// Sentinel value indicating "no window" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a window in a [`WindowTree`](super::WindowTree).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a window is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl WindowId {
    /// Returns the raw slot index.
    ///
    /// Raw indices are what [`TreeChanges`](super::TreeChanges) and the trace
    /// events report.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowId({}@gen{})", self.idx, self.generation)
    }
}
