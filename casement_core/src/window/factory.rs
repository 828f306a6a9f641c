// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window factories.
//!
//! The tree allocates every window itself; a factory decides what a freshly
//! allocated window of its type looks like (extra events, properties, chrome,
//! initial settings).

use alloc::string::String;
use alloc::vec::Vec;

use super::id::WindowId;
use super::store::WindowTree;
use crate::error::GuiError;
use crate::property::UserProperty;

/// Configures new windows of one type.
pub trait WindowFactory {
    /// The type name windows are created under.
    fn type_name(&self) -> &str;

    /// Sets up `window`, which has just been allocated with default settings.
    ///
    /// An error aborts the creation; the window is destroyed again and the
    /// error is returned from
    /// [`WindowTree::create_window`](super::WindowTree::create_window).
    fn configure(&self, tree: &mut WindowTree, window: WindowId) -> Result<(), GuiError> {
        _ = (tree, window);
        Ok(())
    }
}

/// The plain window type every tree knows.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultWindowFactory;

impl DefaultWindowFactory {
    /// Type name of the plain window.
    pub const TYPE_NAME: &'static str = "DefaultWindow";
}

impl WindowFactory for DefaultWindowFactory {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }
}

/// A factory that applies a fixed list of property values and user
/// property definitions to each new window.
///
/// This covers the common case of a window "type" that is just a default
/// window with different settings.
#[derive(Clone, Debug, Default)]
pub struct TemplateFactory {
    type_name: String,
    user_properties: Vec<UserProperty>,
    values: Vec<(String, String)>,
}

impl TemplateFactory {
    /// Creates a template for `type_name` with no settings.
    #[must_use]
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Defines a user property on every new window.
    #[must_use]
    pub fn with_user_property(mut self, property: UserProperty) -> Self {
        self.user_properties.push(property);
        self
    }

    /// Sets `property` to `value` on every new window.
    ///
    /// Values are applied after user properties are defined, in the order
    /// they were added.
    #[must_use]
    pub fn with_value(mut self, property: &str, value: &str) -> Self {
        self.values.push((property.into(), value.into()));
        self
    }
}

impl WindowFactory for TemplateFactory {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn configure(&self, tree: &mut WindowTree, window: WindowId) -> Result<(), GuiError> {
        for property in &self.user_properties {
            tree.add_property(window, property.clone())?;
        }
        for (name, value) in &self.values {
            tree.set_property(window, name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::*;
    use crate::error::ObjectKind;
    use crate::window::TreeConfig;

    #[test]
    fn template_factory_applies_settings() {
        let mut tree = WindowTree::new(TreeConfig::small());
        tree.add_factory(Box::new(
            TemplateFactory::new("Panel")
                .with_user_property(UserProperty::new("Caption", "untitled"))
                .with_value("Alpha", "0.5")
                .with_value("AlwaysOnTop", "True"),
        ))
        .unwrap();

        let w = tree.create_window("Panel", "p").unwrap();
        assert_eq!(tree.type_name(w), "Panel");
        assert_eq!(tree.alpha(w), 0.5);
        assert!(tree.flags(w).always_on_top);
        assert_eq!(tree.get_property(w, "Caption").unwrap(), "untitled");
    }

    #[test]
    fn failing_template_rolls_back_the_window() {
        let mut tree = WindowTree::new(TreeConfig::small());
        tree.add_factory(Box::new(
            TemplateFactory::new("Broken").with_value("Alpha", "lots"),
        ))
        .unwrap();

        assert!(matches!(
            tree.create_window("Broken", "b"),
            Err(GuiError::InvalidValue { .. })
        ));
        assert!(!tree.is_window_present("b"));
        assert_eq!(tree.window_count(), 0);
    }

    #[test]
    fn duplicate_factories_are_rejected() {
        let mut tree = WindowTree::new(TreeConfig::small());
        assert!(tree.is_factory_present(DefaultWindowFactory::TYPE_NAME));
        assert_eq!(
            tree.add_factory(Box::new(DefaultWindowFactory)),
            Err(GuiError::already_exists(ObjectKind::Factory, "DefaultWindow"))
        );
        tree.remove_factory("DefaultWindow");
        assert!(!tree.is_factory_present("DefaultWindow"));
    }
}
