// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Properties every window is created with.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::Property;
use super::helper::{
    format_bool, format_f64, format_urect, format_uvector2, parse_bool, parse_f32, parse_u32,
    parse_urect, parse_uvector2,
};
use crate::error::GuiError;
use crate::window::{WindowId, WindowTree};

type Getter = fn(&WindowTree, WindowId) -> String;
type Setter = fn(&mut WindowTree, WindowId, &str) -> Option<()>;

/// A property backed by window tree accessors.
#[derive(Clone, Copy)]
pub struct BuiltinProperty {
    name: &'static str,
    help: &'static str,
    default: &'static str,
    get: Getter,
    set: Option<Setter>,
}

impl BuiltinProperty {
    /// Creates a property from accessor functions.
    ///
    /// A `None` setter makes the property read-only. The setter returns `None`
    /// when the text does not parse.
    #[must_use]
    pub const fn new(
        name: &'static str,
        help: &'static str,
        default: &'static str,
        get: Getter,
        set: Option<Setter>,
    ) -> Self {
        Self {
            name,
            help,
            default,
            get,
            set,
        }
    }
}

impl fmt::Debug for BuiltinProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinProperty")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("writable", &self.set.is_some())
            .finish_non_exhaustive()
    }
}

impl Property for BuiltinProperty {
    fn name(&self) -> &str {
        self.name
    }

    fn help(&self) -> &str {
        self.help
    }

    fn default_value(&self) -> &str {
        self.default
    }

    fn is_writable(&self) -> bool {
        self.set.is_some()
    }

    fn get(&self, tree: &WindowTree, window: WindowId) -> String {
        (self.get)(tree, window)
    }

    fn set(&self, tree: &mut WindowTree, window: WindowId, value: &str) -> Result<(), GuiError> {
        let setter = self
            .set
            .ok_or(GuiError::InvalidOperation("property is read-only"))?;
        setter(tree, window, value).ok_or_else(|| GuiError::InvalidValue {
            property: self.name.into(),
            value: value.into(),
        })
    }
}

const BUILTINS: &[BuiltinProperty] = &[
    BuiltinProperty::new(
        "Name",
        "Unique name of the window.",
        "",
        |t, w| t.name(w).into(),
        None,
    ),
    BuiltinProperty::new(
        "Type",
        "Factory type the window was created by.",
        "",
        |t, w| t.type_name(w).into(),
        None,
    ),
    BuiltinProperty::new(
        "ID",
        "Client-assigned numeric id.",
        "0",
        |t, w| alloc::format!("{}", t.numeric_id(w)),
        Some(|t, w, v| {
            t.set_numeric_id(w, parse_u32(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "Text",
        "Text string of the window.",
        "",
        |t, w| t.text(w).into(),
        Some(|t, w, v| {
            t.set_text(w, v);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "Alpha",
        "Alpha value, 0 to 1.",
        "1",
        |t, w| format_f64(f64::from(t.alpha(w))),
        Some(|t, w, v| {
            t.set_alpha(w, parse_f32(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "Visible",
        "Whether the window itself is shown.",
        "True",
        |t, w| format_bool(t.flags(w).visible),
        Some(|t, w, v| {
            t.set_visible(w, parse_bool(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "Disabled",
        "Whether the window itself is disabled.",
        "False",
        |t, w| format_bool(!t.flags(w).enabled),
        Some(|t, w, v| {
            t.set_enabled(w, !parse_bool(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "ClippedByParent",
        "Whether the window is clipped to its parent's inner rect.",
        "True",
        |t, w| format_bool(t.flags(w).clipped_by_parent),
        Some(|t, w, v| {
            t.set_clipped_by_parent(w, parse_bool(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "InheritsAlpha",
        "Whether the parent's effective alpha is applied.",
        "True",
        |t, w| format_bool(t.flags(w).inherits_alpha),
        Some(|t, w, v| {
            t.set_inherits_alpha(w, parse_bool(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "DestroyedByParent",
        "Whether destroying the parent destroys this window.",
        "True",
        |t, w| format_bool(t.flags(w).destroyed_by_parent),
        Some(|t, w, v| {
            t.set_destroyed_by_parent(w, parse_bool(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "AlwaysOnTop",
        "Whether the window stays in front of normal siblings.",
        "False",
        |t, w| format_bool(t.flags(w).always_on_top),
        Some(|t, w, v| {
            t.set_always_on_top(w, parse_bool(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "ZOrderChangeEnabled",
        "Whether z-order operations move the window.",
        "True",
        |t, w| format_bool(t.flags(w).z_order_change_enabled),
        Some(|t, w, v| {
            t.set_z_order_change_enabled(w, parse_bool(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "MousePassThroughEnabled",
        "Whether input hit-testing looks through the window.",
        "False",
        |t, w| format_bool(t.flags(w).mouse_pass_through),
        Some(|t, w, v| {
            t.set_mouse_pass_through_enabled(w, parse_bool(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "RestoreOldCapture",
        "Whether releasing capture restores the previous holder.",
        "False",
        |t, w| format_bool(t.flags(w).restore_old_capture),
        Some(|t, w, v| {
            t.set_restore_old_capture(w, parse_bool(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "UnifiedPosition",
        "Position relative to the parent.",
        "{{0,0},{0,0}}",
        |t, w| format_uvector2(t.position(w)),
        Some(|t, w, v| {
            t.set_position(w, parse_uvector2(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "UnifiedSize",
        "Size relative to the parent.",
        "{{0,0},{0,0}}",
        |t, w| format_uvector2(t.size(w)),
        Some(|t, w, v| {
            t.set_size(w, parse_uvector2(v)?);
            Some(())
        }),
    ),
    BuiltinProperty::new(
        "UnifiedAreaRect",
        "Area relative to the parent, as edges.",
        "{{0,0},{0,0},{0,0},{0,0}}",
        |t, w| format_urect(t.area(w)),
        Some(|t, w, v| {
            t.set_area(w, parse_urect(v)?);
            Some(())
        }),
    ),
];

/// Creates the shared built-in descriptors for a new tree.
pub(crate) fn builtin_properties() -> Vec<Rc<dyn Property>> {
    BUILTINS
        .iter()
        .map(|p| Rc::new(*p) as Rc<dyn Property>)
        .collect()
}
