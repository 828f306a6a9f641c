// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy for window, event and property operations.
//!
//! Lookup misses and structurally illegal requests are ordinary, recoverable
//! errors surfaced to the direct caller. Layout and scheme loading rely on
//! them being loud, so nothing in this crate swallows a [`GuiError`].
//!
//! Programming errors (for example using a [`WindowId`](crate::window::WindowId)
//! after its window was destroyed) are not represented here; they panic, the
//! same way stale handles panic everywhere else in the tree.

use alloc::string::String;
use core::fmt;

/// Errors returned by the window tree, event sets and property system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuiError {
    /// A named object (event, window, factory, property) is already registered.
    AlreadyExists {
        /// What kind of object collided.
        kind: ObjectKind,
        /// The duplicate name.
        name: String,
    },
    /// No window or factory with this name exists.
    UnknownObject {
        /// What kind of object was looked up.
        kind: ObjectKind,
        /// The name that was not found.
        name: String,
    },
    /// No event with this name is registered on the event set.
    UnknownEvent(String),
    /// No property with this name is registered on the window.
    UnknownProperty(String),
    /// A property value string could not be interpreted.
    InvalidValue {
        /// Property being written.
        property: String,
        /// The rejected text.
        value: String,
    },
    /// The request is structurally illegal (for example a parenting cycle).
    InvalidOperation(&'static str),
}

/// The kind of named object involved in a [`GuiError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// An event in an event set.
    Event,
    /// A window in the tree's name registry.
    Window,
    /// A window factory.
    Factory,
    /// A property on a window.
    Property,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Event => "event",
            Self::Window => "window",
            Self::Factory => "window factory",
            Self::Property => "property",
        })
    }
}

impl fmt::Display for GuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists { kind, name } => write!(f, "{kind} '{name}' already exists"),
            Self::UnknownObject { kind, name } => write!(f, "no {kind} named '{name}'"),
            Self::UnknownEvent(name) => write!(f, "no event named '{name}'"),
            Self::UnknownProperty(name) => write!(f, "no property named '{name}'"),
            Self::InvalidValue { property, value } => {
                write!(f, "invalid value '{value}' for property '{property}'")
            }
            Self::InvalidOperation(what) => write!(f, "invalid operation: {what}"),
        }
    }
}

impl core::error::Error for GuiError {}

impl GuiError {
    pub(crate) fn already_exists(kind: ObjectKind, name: &str) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn unknown(kind: ObjectKind, name: &str) -> Self {
        Self::UnknownObject {
            kind,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_names_the_object() {
        let err = GuiError::already_exists(ObjectKind::Event, "Clicked");
        assert_eq!(err.to_string(), "event 'Clicked' already exists");

        let err = GuiError::unknown(ObjectKind::Factory, "Button");
        assert_eq!(err.to_string(), "no window factory named 'Button'");
    }
}
