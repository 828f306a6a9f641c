// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-testing and input routing.
//!
//! Hit-testing walks children front to back, so the topmost window under a
//! point wins, and a window's descendants win over the window itself. A
//! window is hit when it is enabled and the point lies inside its clipped
//! pixel rect.
//!
//! Routing puts the capture slot and the modal target on top of that: a
//! capture holder receives pointer input wherever the pointer is, and while
//! a modal target is set, input meant for a window outside its subtree goes
//! to the modal target instead.

use kurbo::Point;

use super::id::{INVALID, WindowId};
use super::store::WindowTree;

impl WindowTree {
    // -- Hit-testing --

    /// Returns whether `point`, in display pixels, hits the window.
    ///
    /// Disabled windows are never hit. Only the visible part of the window
    /// counts: the test uses [`pixel_rect`](Self::pixel_rect).
    #[must_use]
    pub fn is_hit(&self, id: WindowId, point: Point) -> bool {
        self.validate(id);
        self.is_hit_at(id.idx, point)
    }

    /// Returns the topmost visible descendant of `id` hit by `point`.
    #[must_use]
    pub fn child_at_position(&self, id: WindowId, point: Point) -> Option<WindowId> {
        self.validate(id);
        self.handle_opt(self.child_at_position_at(id.idx, point, false))
    }

    /// Like [`child_at_position`](Self::child_at_position), but windows with
    /// mouse pass-through enabled are looked through. Their descendants can
    /// still be hit.
    #[must_use]
    pub fn target_child_at_position(&self, id: WindowId, point: Point) -> Option<WindowId> {
        self.validate(id);
        self.handle_opt(self.child_at_position_at(id.idx, point, true))
    }

    /// Sets whether input hit-testing looks through the window.
    pub fn set_mouse_pass_through_enabled(&mut self, id: WindowId, enabled: bool) {
        self.validate(id);
        self.flags[id.idx as usize].mouse_pass_through = enabled;
    }

    // -- Modal state --

    /// Makes the window the modal target, or clears it.
    ///
    /// Going modal activates the window and replaces any previous modal
    /// target. Clearing only has an effect on the current modal target.
    /// Destroying the modal target clears it.
    pub fn set_modal_state(&mut self, id: WindowId, modal: bool) {
        self.validate(id);
        if modal == (self.modal_target == id.idx) {
            return;
        }
        if modal {
            self.activate(id);
            self.modal_target = id.idx;
        } else {
            self.modal_target = INVALID;
        }
    }

    /// Returns whether the window is the modal target.
    #[must_use]
    pub fn modal_state(&self, id: WindowId) -> bool {
        self.validate(id);
        self.modal_target == id.idx
    }

    /// Returns the modal target, if any.
    #[must_use]
    pub fn modal_target(&self) -> Option<WindowId> {
        self.handle_opt(self.modal_target)
    }

    // -- Routing --

    /// Returns the window that receives pointer input at `point` when
    /// `sheet` is the root being shown.
    ///
    /// The capture holder wins; otherwise the topmost non-pass-through window
    /// under the point, or `sheet` if there is none. A modal target then
    /// overrules any window outside its own subtree.
    #[must_use]
    pub fn target_window(&self, sheet: WindowId, point: Point) -> WindowId {
        self.validate(sheet);
        let mut target = if self.capture != INVALID {
            self.capture
        } else {
            match self.child_at_position_at(sheet.idx, point, true) {
                INVALID => sheet.idx,
                hit => hit,
            }
        };
        let modal = self.modal_target;
        if modal != INVALID && target != modal && !self.is_ancestor_at(modal, target) {
            target = modal;
        }
        self.handle(target)
    }

    /// Returns the window that receives keyboard input when `sheet` is the
    /// root being shown: the focused window of the modal target if one is
    /// set (or the modal target itself), otherwise the focused window of
    /// `sheet`.
    #[must_use]
    pub fn keyboard_target(&self, sheet: WindowId) -> Option<WindowId> {
        self.validate(sheet);
        match self.modal_target() {
            Some(modal) => Some(self.active_child(modal).unwrap_or(modal)),
            None => self.active_child(sheet),
        }
    }

    // -- Internal helpers --

    fn is_hit_at(&self, idx: u32, point: Point) -> bool {
        // Empty rects contain nothing, so zero-sized windows are never hit.
        !self.is_disabled_at(idx) && self.pixel_rect_at(idx).contains(point)
    }

    fn child_at_position_at(&self, idx: u32, point: Point, skip_pass_through: bool) -> u32 {
        let mut child = self.last_child_at(idx);
        while child != INVALID {
            if self.is_visible_at(child) {
                let hit = self.child_at_position_at(child, point, skip_pass_through);
                if hit != INVALID {
                    return hit;
                }
                let looked_through =
                    skip_pass_through && self.flags[child as usize].mouse_pass_through;
                if !looked_through && self.is_hit_at(child, point) {
                    return child;
                }
            }
            child = self.prev_sibling[child as usize];
        }
        INVALID
    }
}
