// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window tree configuration.

use kurbo::Size;

/// Configuration for a [`WindowTree`](super::WindowTree).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeConfig {
    /// Size of the display area root windows are laid out against.
    pub display_size: Size,
    /// Prefix for names generated when a window is created with an empty name.
    pub auto_name_prefix: &'static str,
}

impl TreeConfig {
    /// Prefix used by the default configurations.
    pub const AUTO_NAME_PREFIX: &'static str = "__auto_window__";

    /// A 640×480 display, convenient for tests and tools.
    #[must_use]
    pub const fn small() -> Self {
        Self {
            display_size: Size::new(640.0, 480.0),
            auto_name_prefix: Self::AUTO_NAME_PREFIX,
        }
    }

    /// A 1280×720 display.
    #[must_use]
    pub const fn hd() -> Self {
        Self {
            display_size: Size::new(1280.0, 720.0),
            auto_name_prefix: Self::AUTO_NAME_PREFIX,
        }
    }

    /// Same configuration with a different display size.
    #[must_use]
    pub const fn with_display_size(mut self, display_size: Size) -> Self {
        self.display_size = display_size;
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::hd()
    }
}
