// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout loading.
//!
//! A layout document looks like this:
//!
//! ```xml
//! <GUILayout Parent="optional existing window">
//!   <Window Type="DefaultWindow" Name="Root">
//!     <Property Name="UnifiedSize" Value="{{1,0},{1,0}}" />
//!     <Window Type="DefaultWindow" Name="Root/Child">
//!       <Property Name="Text">long values may be element text</Property>
//!     </Window>
//!     <AutoWindow NameSuffix="__auto_titlebar__" />
//!   </Window>
//! </GUILayout>
//! ```
//!
//! Any failure destroys every window the handler created so far, so a failed
//! load leaves the tree as it was.

use alloc::string::String;
use alloc::vec::Vec;

use super::xml::{ParseError, XmlAttributes, XmlHandler};
use crate::window::{WindowId, WindowTree};

const GUI_LAYOUT: &str = "GUILayout";
const WINDOW: &str = "Window";
const AUTO_WINDOW: &str = "AutoWindow";
const PROPERTY: &str = "Property";

/// An [`XmlHandler`] that builds a window hierarchy.
#[derive(Debug)]
pub struct LayoutHandler<'a> {
    tree: &'a mut WindowTree,
    name_prefix: String,
    layout_parent: Option<WindowId>,
    /// Open windows; `false` marks auto windows, which the handler did not
    /// create.
    stack: Vec<(WindowId, bool)>,
    created: Vec<WindowId>,
    root: Option<WindowId>,
    pending_property: Option<(WindowId, String, String)>,
}

impl<'a> LayoutHandler<'a> {
    /// Creates a handler that adds windows to `tree`.
    pub fn new(tree: &'a mut WindowTree) -> Self {
        Self {
            tree,
            name_prefix: String::new(),
            layout_parent: None,
            stack: Vec::new(),
            created: Vec::new(),
            root: None,
            pending_property: None,
        }
    }

    /// Prepends `prefix` to every window name in the layout, so one layout
    /// can be loaded several times.
    #[must_use]
    pub fn with_name_prefix(mut self, prefix: &str) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Returns the layout's root window once loading is complete.
    ///
    /// Returns a [`ParseError`] if the document defined no window.
    pub fn finish(self) -> Result<WindowId, ParseError> {
        self.root
            .ok_or_else(|| ParseError::new("layout does not define a window"))
    }

    /// Destroys every window the handler created.
    pub fn cleanup(&mut self) {
        while let Some(id) = self.created.pop() {
            if self.tree.is_alive(id) {
                self.tree.destroy_window(id);
            }
        }
        self.stack.clear();
        self.root = None;
        self.pending_property = None;
    }

    fn top(&self, element: &str) -> Result<WindowId, ParseError> {
        self.stack.last().map(|&(id, _)| id).ok_or_else(|| {
            ParseError::new(alloc::format!(
                "element '{element}' must be inside a window"
            ))
        })
    }

    fn start(&mut self, element: &str, attributes: &XmlAttributes) -> Result<(), ParseError> {
        match element {
            GUI_LAYOUT => {
                if let Some(parent) = attributes.get("Parent").filter(|p| !p.is_empty()) {
                    self.layout_parent = Some(self.tree.get_window(parent)?);
                }
            }
            WINDOW => {
                let type_name = attributes.required(element, "Type")?;
                let name = attributes.get("Name").unwrap_or_default();
                let name = if name.is_empty() {
                    String::new()
                } else {
                    alloc::format!("{}{}", self.name_prefix, name)
                };
                let id = self.tree.create_window(type_name, &name)?;
                self.created.push(id);
                match self.stack.last() {
                    Some(&(parent, _)) => self.tree.add_child(parent, id)?,
                    None => self.root = Some(id),
                }
                self.stack.push((id, true));
            }
            AUTO_WINDOW => {
                let parent = self.top(element)?;
                let suffix = attributes.get("NameSuffix").unwrap_or_default();
                let name = alloc::format!("{}{}", self.tree.name(parent), suffix);
                let id = self.tree.get_window(&name)?;
                self.stack.push((id, false));
            }
            PROPERTY => {
                let window = self.top(element)?;
                let name = attributes.required(element, "Name")?;
                match attributes.get("Value").filter(|v| !v.is_empty()) {
                    Some(value) => self.tree.set_property(window, name, value)?,
                    None => self.pending_property = Some((window, name.into(), String::new())),
                }
            }
            _ => {
                return Err(ParseError::new(alloc::format!(
                    "unexpected element '{element}' in layout"
                )));
            }
        }
        Ok(())
    }

    fn end(&mut self, element: &str) -> Result<(), ParseError> {
        match element {
            GUI_LAYOUT => {
                if let (Some(parent), Some(root)) = (self.layout_parent, self.root) {
                    self.tree.add_child(parent, root)?;
                }
            }
            WINDOW | AUTO_WINDOW => {
                self.stack.pop();
            }
            PROPERTY => {
                if let Some((window, name, value)) = self.pending_property.take() {
                    self.tree.set_property(window, &name, &value)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl XmlHandler for LayoutHandler<'_> {
    fn element_start(
        &mut self,
        element: &str,
        attributes: &XmlAttributes,
    ) -> Result<(), ParseError> {
        let result = self.start(element, attributes);
        if result.is_err() {
            self.cleanup();
        }
        result
    }

    fn element_end(&mut self, element: &str) -> Result<(), ParseError> {
        let result = self.end(element);
        if result.is_err() {
            self.cleanup();
        }
        result
    }

    fn text(&mut self, text: &str) -> Result<(), ParseError> {
        if let Some((_, _, value)) = &mut self.pending_property {
            value.push_str(text);
        }
        Ok(())
    }
}
