// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Streaming XML handler contract.
//!
//! A parser walks the document and calls back into an [`XmlHandler`]. The
//! handler reports problems with a bare message; the parser fills in the file
//! and line with [`ParseError::at`] before passing the error on.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::error::GuiError;

/// A parse or validation failure with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// File being parsed; empty until the parser attaches a location.
    pub file: String,
    /// One-based line number; 0 until the parser attaches a location.
    pub line: u32,
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    /// An error with no location yet.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            file: String::new(),
            line: 0,
            message: message.into(),
        }
    }

    /// Attaches a location, keeping one that is already set.
    #[must_use]
    pub fn at(mut self, file: &str, line: u32) -> Self {
        if self.file.is_empty() {
            self.file = file.into();
            self.line = line;
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}:{}: {}", self.file, self.line, self.message)
        }
    }
}

impl core::error::Error for ParseError {}

impl From<GuiError> for ParseError {
    fn from(err: GuiError) -> Self {
        Self::new(err.to_string())
    }
}

/// Attribute name/value pairs of one element, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlAttributes {
    pairs: Vec<(String, String)>,
}

impl XmlAttributes {
    /// Creates an empty attribute list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an attribute.
    pub fn add(&mut self, name: &str, value: &str) {
        match self.pairs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.into(),
            None => self.pairs.push((name.into(), value.into())),
        }
    }

    /// Builder form of [`add`](Self::add).
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.add(name, value);
        self
    }

    /// Returns the value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value of a required attribute.
    pub fn required(&self, element: &str, name: &str) -> Result<&str, ParseError> {
        self.get(name).ok_or_else(|| {
            ParseError::new(alloc::format!(
                "element '{element}' is missing attribute '{name}'"
            ))
        })
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Receives parse callbacks.
pub trait XmlHandler {
    /// An element opened.
    fn element_start(&mut self, element: &str, attributes: &XmlAttributes)
    -> Result<(), ParseError>;

    /// An element closed.
    fn element_end(&mut self, element: &str) -> Result<(), ParseError>;

    /// Character data inside the current element.
    fn text(&mut self, text: &str) -> Result<(), ParseError> {
        _ = text;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_attached_once() {
        let err = ParseError::new("bad").at("a.layout", 3).at("b.layout", 9);
        assert_eq!(err.file, "a.layout");
        assert_eq!(err.line, 3);
        assert_eq!(err.to_string(), "a.layout:3: bad");
    }

    #[test]
    fn attributes_replace_and_require() {
        let attrs = XmlAttributes::new()
            .with("Name", "a")
            .with("Type", "T")
            .with("Name", "b");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("Name"), Some("b"));
        assert!(attrs.required("Window", "Value").is_err());
    }
}
