// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named, string-marshalled window properties.
//!
//! A [`Property`] is a shared descriptor: it knows its name, its default
//! value and how to read or write the value stored in a particular window.
//! Descriptors are registered per window (see
//! [`WindowTree::add_property`](crate::window::WindowTree::add_property)) but
//! the built-in ones are created once per tree and shared by every window.
//!
//! Values cross the property interface as text (see [`helper`]), which is
//! what layout and scheme files need.

mod builtin;
pub mod helper;
mod user;

use alloc::string::String;

use crate::error::GuiError;
use crate::window::{WindowId, WindowTree};

pub(crate) use builtin::builtin_properties;
pub use builtin::BuiltinProperty;
pub use user::UserProperty;

/// A named property descriptor.
pub trait Property {
    /// The property name.
    fn name(&self) -> &str;

    /// A short description.
    fn help(&self) -> &str {
        ""
    }

    /// The textual default value.
    fn default_value(&self) -> &str;

    /// Whether [`set`](Self::set) is supported.
    fn is_writable(&self) -> bool {
        true
    }

    /// Reads the current value of `window` as text.
    fn get(&self, tree: &WindowTree, window: WindowId) -> String;

    /// Parses `value` and stores it in `window`.
    ///
    /// Returns [`GuiError::InvalidValue`] if `value` does not parse and
    /// [`GuiError::InvalidOperation`] if the property is read-only.
    fn set(&self, tree: &mut WindowTree, window: WindowId, value: &str) -> Result<(), GuiError>;
}
