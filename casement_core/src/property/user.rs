// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! String-backed user-defined properties.

use alloc::string::String;

use super::Property;
use crate::error::GuiError;
use crate::window::{WindowId, WindowTree};

/// A property whose value is kept as a user string on the window.
///
/// The value is stored under the property's own name, so it can also be read
/// with [`WindowTree::user_string`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProperty {
    name: String,
    default: String,
    help: String,
}

impl UserProperty {
    /// Creates a user property.
    #[must_use]
    pub fn new(name: &str, default: &str) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            help: String::new(),
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.into();
        self
    }
}

impl Property for UserProperty {
    fn name(&self) -> &str {
        &self.name
    }

    fn help(&self) -> &str {
        &self.help
    }

    fn default_value(&self) -> &str {
        &self.default
    }

    fn get(&self, tree: &WindowTree, window: WindowId) -> String {
        tree.user_string(window, &self.name)
            .unwrap_or(&self.default)
            .into()
    }

    fn set(&self, tree: &mut WindowTree, window: WindowId, value: &str) -> Result<(), GuiError> {
        tree.set_user_string(window, &self.name, value);
        Ok(())
    }
}
