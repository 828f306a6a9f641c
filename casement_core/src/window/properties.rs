// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property dispatch by name.

use alloc::rc::Rc;
use alloc::string::String;

use super::id::WindowId;
use super::names::WindowEvent;
use super::store::WindowTree;
use crate::dirty;
use crate::error::{GuiError, ObjectKind};
use crate::property::{Property, UserProperty};

impl WindowTree {
    /// Reads a property as text.
    ///
    /// Returns [`GuiError::UnknownProperty`] if the window has no such
    /// property.
    pub fn get_property(&self, id: WindowId, name: &str) -> Result<String, GuiError> {
        let property = self.property(id, name)?;
        Ok(property.get(self, id))
    }

    /// Writes a property from text, requests a redraw and fires
    /// `PropertyChanged`.
    ///
    /// Returns [`GuiError::UnknownProperty`] if the window has no such
    /// property, or the descriptor's error if the value is rejected.
    pub fn set_property(&mut self, id: WindowId, name: &str, value: &str) -> Result<(), GuiError> {
        let property = self.property(id, name)?;
        property.set(self, id, value)?;
        self.dirty.mark(id.idx, dirty::REDRAW);
        self.notify(id.idx, WindowEvent::PropertyChanged, None);
        Ok(())
    }

    /// Returns whether the window has a property called `name`.
    #[must_use]
    pub fn is_property_present(&self, id: WindowId, name: &str) -> bool {
        self.validate(id);
        self.properties[id.idx as usize].contains_key(name)
    }

    /// Returns the names of the window's properties, sorted.
    pub fn property_names(&self, id: WindowId) -> impl Iterator<Item = &str> {
        self.validate(id);
        self.properties[id.idx as usize].keys().map(String::as_str)
    }

    /// Returns the default value of a property as text.
    pub fn property_default(&self, id: WindowId, name: &str) -> Result<String, GuiError> {
        Ok(self.property(id, name)?.default_value().into())
    }

    /// Returns whether a property currently holds its default value.
    pub fn is_property_default(&self, id: WindowId, name: &str) -> Result<bool, GuiError> {
        let property = self.property(id, name)?;
        Ok(property.get(self, id) == property.default_value())
    }

    /// Registers an extra property on the window.
    ///
    /// Returns [`GuiError::AlreadyExists`] if the name is taken.
    pub fn add_property(
        &mut self,
        id: WindowId,
        property: impl Property + 'static,
    ) -> Result<(), GuiError> {
        self.validate(id);
        let table = &mut self.properties[id.idx as usize];
        if table.contains_key(property.name()) {
            return Err(GuiError::already_exists(
                ObjectKind::Property,
                property.name(),
            ));
        }
        table.insert(property.name().into(), Rc::new(property));
        Ok(())
    }

    /// Defines a string-backed property initialised to `default`.
    pub fn define_user_property(
        &mut self,
        id: WindowId,
        name: &str,
        default: &str,
    ) -> Result<(), GuiError> {
        self.add_property(id, UserProperty::new(name, default))
    }

    /// Unregisters a property from the window. Does nothing if absent.
    pub fn remove_property(&mut self, id: WindowId, name: &str) {
        self.validate(id);
        self.properties[id.idx as usize].remove(name);
    }

    fn property(&self, id: WindowId, name: &str) -> Result<Rc<dyn Property>, GuiError> {
        self.validate(id);
        self.properties[id.idx as usize]
            .get(name)
            .cloned()
            .ok_or_else(|| GuiError::UnknownProperty(name.into()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use super::*;
    use crate::dim::{UDim, UVector2};
    use crate::window::TreeConfig;

    fn tree() -> WindowTree {
        WindowTree::new(TreeConfig::small())
    }

    #[test]
    fn builtins_read_and_write_window_state() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();

        assert_eq!(tree.get_property(w, "Name").unwrap(), "w");
        assert_eq!(tree.get_property(w, "Alpha").unwrap(), "1");
        assert!(tree.is_property_default(w, "Alpha").unwrap());

        tree.set_property(w, "Alpha", "0.25").unwrap();
        assert_eq!(tree.alpha(w), 0.25);
        assert!(!tree.is_property_default(w, "Alpha").unwrap());

        tree.set_property(w, "Visible", "False").unwrap();
        assert!(!tree.flags(w).visible);
        tree.set_property(w, "Disabled", "true").unwrap();
        assert!(tree.is_disabled(w));
        tree.set_property(w, "MousePassThroughEnabled", "True").unwrap();
        assert!(tree.flags(w).mouse_pass_through);

        tree.set_property(w, "UnifiedPosition", "{{0.5,10},{0,-4}}")
            .unwrap();
        assert_eq!(
            tree.position(w),
            UVector2::new(UDim::new(0.5, 10.0), UDim::px(-4.0))
        );
    }

    #[test]
    fn errors_are_reported() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        assert_eq!(
            tree.get_property(w, "Colour"),
            Err(GuiError::UnknownProperty("Colour".into()))
        );
        assert_eq!(
            tree.set_property(w, "Alpha", "opaque"),
            Err(GuiError::InvalidValue {
                property: "Alpha".into(),
                value: "opaque".into(),
            })
        );
        assert_eq!(
            tree.set_property(w, "Visible", "yes"),
            Err(GuiError::InvalidValue {
                property: "Visible".into(),
                value: "yes".into(),
            })
        );
        assert!(matches!(
            tree.set_property(w, "Name", "other"),
            Err(GuiError::InvalidOperation(_))
        ));
        assert_eq!(tree.name(w), "w");
    }

    #[test]
    fn user_properties_are_per_window() {
        let mut tree = tree();
        let a = tree.create_window("DefaultWindow", "a").unwrap();
        let b = tree.create_window("DefaultWindow", "b").unwrap();
        tree.define_user_property(a, "Tooltip", "none").unwrap();

        assert_eq!(tree.get_property(a, "Tooltip").unwrap(), "none");
        assert!(!tree.is_property_present(b, "Tooltip"));
        assert_eq!(
            tree.define_user_property(a, "Tooltip", "x"),
            Err(GuiError::already_exists(ObjectKind::Property, "Tooltip"))
        );

        tree.set_property(a, "Tooltip", "hello").unwrap();
        assert_eq!(tree.get_property(a, "Tooltip").unwrap(), "hello");
        assert_eq!(tree.property_default(a, "Tooltip").unwrap(), "none");

        tree.remove_property(a, "Tooltip");
        assert!(!tree.is_property_present(a, "Tooltip"));
    }

    #[test]
    fn property_changed_fires_after_successful_writes() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _ = tree
            .subscribe_event(w, "PropertyChanged", move |_| {
                c.set(c.get() + 1);
                false
            })
            .unwrap();

        tree.set_property(w, "Text", "hi").unwrap();
        let _ = tree.set_property(w, "Alpha", "bad");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn builtin_names_are_shared_by_every_window() {
        let mut tree = tree();
        let a = tree.create_window("DefaultWindow", "a").unwrap();
        let b = tree.create_window("DefaultWindow", "b").unwrap();
        let names: Vec<&str> = tree.property_names(a).collect();
        assert!(names.contains(&"UnifiedAreaRect"));
        assert!(tree.property_names(b).eq(names.iter().copied()));
    }
}
