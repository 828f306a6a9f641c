// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility, enabled state, activation and alpha.

use understory_dirty::EagerPolicy;

use super::id::{INVALID, WindowId};
use super::names::WindowEvent;
use super::store::WindowTree;
use crate::dirty;
use crate::trace::{ActivationChangedEvent, CaptureChange, CaptureChangedEvent};

/// Effective visibility/activation state of a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowState {
    /// The window or one of its ancestors is hidden.
    Hidden,
    /// Visible but not active.
    VisibleInactive,
    /// Visible and active.
    VisibleActive,
}

impl WindowTree {
    // -- Queries --

    /// Returns the effective state of the window.
    #[must_use]
    pub fn window_state(&self, id: WindowId) -> WindowState {
        if !self.is_visible(id) {
            WindowState::Hidden
        } else if self.is_active(id) {
            WindowState::VisibleActive
        } else {
            WindowState::VisibleInactive
        }
    }

    /// Returns whether the window and all of its ancestors are shown.
    #[must_use]
    pub fn is_visible(&self, id: WindowId) -> bool {
        self.validate(id);
        self.is_visible_at(id.idx)
    }

    /// Returns whether the window or any of its ancestors is disabled.
    #[must_use]
    pub fn is_disabled(&self, id: WindowId) -> bool {
        self.validate(id);
        self.is_disabled_at(id.idx)
    }

    /// Returns whether the window is active.
    ///
    /// A window is active when it holds activation among its siblings, every
    /// ancestor is active too, and it is not disabled.
    #[must_use]
    pub fn is_active(&self, id: WindowId) -> bool {
        self.validate(id);
        if self.is_disabled_at(id.idx) {
            return false;
        }
        let mut cur = id.idx;
        while cur != INVALID {
            if !self.flags[cur as usize].active {
                return false;
            }
            cur = self.parent[cur as usize];
        }
        true
    }

    /// Returns the window holding input focus within the subtree of `id`.
    ///
    /// Follows the active child downwards and returns the deepest active
    /// window, which is `id` itself when none of its children is active.
    /// `None` if `id` is not active.
    #[must_use]
    pub fn active_child(&self, id: WindowId) -> Option<WindowId> {
        if !self.is_active(id) {
            return None;
        }
        let mut cur = id.idx;
        loop {
            let next = self.active_child_at(cur);
            if next == INVALID {
                return Some(self.handle(cur));
            }
            cur = next;
        }
    }

    // -- Visibility --

    /// Shows the window.
    pub fn show(&mut self, id: WindowId) {
        self.set_visible(id, true);
    }

    /// Hides the window, deactivating it first.
    pub fn hide(&mut self, id: WindowId) {
        self.set_visible(id, false);
    }

    /// Shows or hides the window and fires `Shown` or `Hidden`.
    pub fn set_visible(&mut self, id: WindowId, visible: bool) {
        self.validate(id);
        let idx = id.idx;
        if self.flags[idx as usize].visible == visible {
            return;
        }
        if !visible && self.flags[idx as usize].active {
            self.deactivate_at(idx, INVALID);
        }
        self.flags[idx as usize].visible = visible;
        self.dirty.mark_with(idx, dirty::STATE, &EagerPolicy);
        let event = if visible {
            WindowEvent::Shown
        } else {
            WindowEvent::Hidden
        };
        self.notify(idx, event, None);
    }

    // -- Enabled state --

    /// Enables the window.
    pub fn enable(&mut self, id: WindowId) {
        self.set_enabled(id, true);
    }

    /// Disables the window.
    ///
    /// A disabled window is deactivated and gives up capture.
    pub fn disable(&mut self, id: WindowId) {
        self.set_enabled(id, false);
    }

    /// Enables or disables the window and fires `Enabled` or `Disabled`.
    pub fn set_enabled(&mut self, id: WindowId, enabled: bool) {
        self.validate(id);
        let idx = id.idx;
        if self.flags[idx as usize].enabled == enabled {
            return;
        }
        if !enabled {
            if self.flags[idx as usize].active {
                self.deactivate_at(idx, INVALID);
            }
            if self.capture == idx {
                self.release_input(id);
            }
        }
        self.flags[idx as usize].enabled = enabled;
        self.dirty.mark_with(idx, dirty::STATE, &EagerPolicy);
        let event = if enabled {
            WindowEvent::Enabled
        } else {
            WindowEvent::Disabled
        };
        self.notify(idx, event, None);
    }

    // -- Activation --

    /// Activates the window.
    ///
    /// Hidden and disabled windows cannot be activated. Any capture held by
    /// another window is revoked (that window and any windows waiting to get
    /// capture back receive `CaptureLost`), then the window is brought to
    /// the front, which deactivates the previously active sibling subtree.
    pub fn activate(&mut self, id: WindowId) {
        self.validate(id);
        let idx = id.idx;
        if !self.can_activate_at(idx) {
            return;
        }
        if self.capture != INVALID && self.capture != idx {
            let holder = self.capture;
            self.capture = INVALID;
            self.tracer().capture_changed(&CaptureChangedEvent {
                old: Some(holder),
                new: None,
                change: CaptureChange::Revoked,
            });
            self.revoke_capture_chain(holder);
        }
        self.move_to_front_at(idx);
    }

    /// Deactivates the window and its active descendants.
    pub fn deactivate(&mut self, id: WindowId) {
        self.validate(id);
        if self.flags[id.idx as usize].active {
            self.deactivate_at(id.idx, INVALID);
        }
    }

    // -- Alpha --

    /// Returns the window's own alpha.
    #[must_use]
    pub fn alpha(&self, id: WindowId) -> f32 {
        self.validate(id);
        self.alpha[id.idx as usize]
    }

    /// Sets the window's alpha, clamped to `0.0..=1.0`, and fires
    /// `AlphaChanged`.
    pub fn set_alpha(&mut self, id: WindowId, alpha: f32) {
        self.validate(id);
        let alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        if self.alpha[id.idx as usize] == alpha {
            return;
        }
        self.alpha[id.idx as usize] = alpha;
        self.dirty.mark_with(id.idx, dirty::ALPHA, &EagerPolicy);
        self.notify(id.idx, WindowEvent::AlphaChanged, None);
    }

    /// Sets whether the parent's effective alpha is applied and fires
    /// `InheritAlphaChanged`.
    pub fn set_inherits_alpha(&mut self, id: WindowId, inherits: bool) {
        self.validate(id);
        if self.flags[id.idx as usize].inherits_alpha == inherits {
            return;
        }
        self.flags[id.idx as usize].inherits_alpha = inherits;
        self.dirty.mark_with(id.idx, dirty::ALPHA, &EagerPolicy);
        self.notify(id.idx, WindowEvent::InheritAlphaChanged, None);
    }

    /// Returns the alpha the window is drawn with: its own alpha times the
    /// effective alpha of its parent, for as long as the inherits-alpha
    /// chain holds.
    #[must_use]
    pub fn effective_alpha(&self, id: WindowId) -> f32 {
        self.validate(id);
        self.effective_alpha_at(id.idx)
    }

    /// Same as [`effective_alpha`](Self::effective_alpha) for a raw slot.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[must_use]
    pub fn effective_alpha_at(&self, idx: u32) -> f32 {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        let mut alpha = self.alpha[idx as usize];
        let mut cur = idx;
        while self.flags[cur as usize].inherits_alpha && self.parent[cur as usize] != INVALID {
            cur = self.parent[cur as usize];
            alpha *= self.alpha[cur as usize];
        }
        alpha
    }

    // -- Internal helpers --

    pub(crate) fn is_visible_at(&self, idx: u32) -> bool {
        let mut cur = idx;
        while cur != INVALID {
            if !self.flags[cur as usize].visible {
                return false;
            }
            cur = self.parent[cur as usize];
        }
        true
    }

    pub(crate) fn is_disabled_at(&self, idx: u32) -> bool {
        let mut cur = idx;
        while cur != INVALID {
            if !self.flags[cur as usize].enabled {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    pub(crate) fn can_activate_at(&self, idx: u32) -> bool {
        self.is_visible_at(idx) && !self.is_disabled_at(idx)
    }

    /// The child of `p` holding activation, or [`INVALID`].
    pub(crate) fn active_child_at(&self, p: u32) -> u32 {
        self.child_indices(p)
            .into_iter()
            .find(|&c| self.flags[c as usize].active)
            .unwrap_or(INVALID)
    }

    /// Activates `idx`; `other` is the window that lost activation.
    pub(crate) fn set_active_at(&mut self, idx: u32, other: u32) {
        self.flags[idx as usize].active = true;
        self.dirty.mark(idx, dirty::REDRAW);
        self.tracer().activation_changed(&ActivationChangedEvent {
            window: idx,
            active: true,
        });
        self.notify(idx, WindowEvent::Activated, Some(other).filter(|&o| o != INVALID));
    }

    /// Deactivates active descendants first, then `idx`; `other` is the
    /// window that gained activation.
    pub(crate) fn deactivate_at(&mut self, idx: u32, other: u32) {
        for child in self.child_indices(idx) {
            if self.flags[child as usize].active {
                self.deactivate_at(child, other);
            }
        }
        self.flags[idx as usize].active = false;
        self.dirty.mark(idx, dirty::REDRAW);
        self.tracer().activation_changed(&ActivationChangedEvent {
            window: idx,
            active: false,
        });
        self.notify(idx, WindowEvent::Deactivated, Some(other).filter(|&o| o != INVALID));
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;
    use crate::window::TreeConfig;

    fn tree() -> WindowTree {
        WindowTree::new(TreeConfig::small())
    }

    #[test]
    fn state_machine_transitions() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        assert_eq!(tree.window_state(w), WindowState::VisibleInactive);

        tree.activate(w);
        assert_eq!(tree.window_state(w), WindowState::VisibleActive);

        tree.hide(w);
        assert_eq!(tree.window_state(w), WindowState::Hidden);
        tree.show(w);
        assert_eq!(
            tree.window_state(w),
            WindowState::VisibleInactive,
            "hiding deactivates"
        );

        tree.activate(w);
        tree.deactivate(w);
        assert_eq!(tree.window_state(w), WindowState::VisibleInactive);
    }

    #[test]
    fn hidden_and_disabled_windows_cannot_activate() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        tree.hide(w);
        tree.activate(w);
        assert!(!tree.is_active(w));

        tree.show(w);
        tree.disable(w);
        tree.activate(w);
        assert!(!tree.is_active(w));
        assert_eq!(tree.window_state(w), WindowState::VisibleInactive);
    }

    #[test]
    fn disabling_an_ancestor_deactivates_effectively() {
        let mut tree = tree();
        let p = tree.create_window("DefaultWindow", "p").unwrap();
        let c = tree.create_window("DefaultWindow", "c").unwrap();
        tree.add_child(p, c).unwrap();
        tree.activate(c);
        assert!(tree.is_active(p) && tree.is_active(c));

        tree.disable(p);
        assert!(tree.is_disabled(c));
        assert!(!tree.is_active(c));
        tree.enable(p);
        assert!(!tree.is_disabled(c));
    }

    #[test]
    fn activating_a_sibling_deactivates_the_previous_subtree() {
        let mut tree = tree();
        let p = tree.create_window("DefaultWindow", "p").unwrap();
        let a = tree.create_window("DefaultWindow", "a").unwrap();
        let a1 = tree.create_window("DefaultWindow", "a1").unwrap();
        let b = tree.create_window("DefaultWindow", "b").unwrap();
        tree.add_child(p, a).unwrap();
        tree.add_child(a, a1).unwrap();
        tree.add_child(p, b).unwrap();

        tree.activate(a1);
        assert!(tree.is_active(a) && tree.is_active(a1));

        let log: Rc<RefCell<Vec<(&'static str, Option<WindowId>)>>> = Rc::default();
        for (w, tag) in [(a, "a"), (a1, "a1")] {
            let l = Rc::clone(&log);
            let _ = tree
                .subscribe_event(w, "Deactivated", move |args| {
                    l.borrow_mut().push((tag, args.other));
                    false
                })
                .unwrap();
        }

        tree.activate(b);
        assert!(tree.is_active(b));
        assert!(!tree.is_active(a));
        assert!(!tree.is_active(a1));
        assert_eq!(*log.borrow(), [("a1", Some(b)), ("a", Some(b))]);
    }

    #[test]
    fn active_child_is_the_deepest_active_window() {
        let mut tree = tree();
        let p = tree.create_window("DefaultWindow", "p").unwrap();
        let a = tree.create_window("DefaultWindow", "a").unwrap();
        let a1 = tree.create_window("DefaultWindow", "a1").unwrap();
        let b = tree.create_window("DefaultWindow", "b").unwrap();
        tree.add_child(p, a).unwrap();
        tree.add_child(a, a1).unwrap();
        tree.add_child(p, b).unwrap();
        assert_eq!(tree.active_child(p), None);

        tree.activate(a1);
        assert_eq!(tree.active_child(p), Some(a1));
        assert_eq!(tree.active_child(a), Some(a1));
        assert_eq!(tree.active_child(b), None);

        tree.activate(b);
        assert_eq!(tree.active_child(p), Some(b));
        tree.activate(p);
        assert_eq!(tree.active_child(p), Some(b), "the parent keeps its active child");
    }

    #[test]
    fn effective_alpha_follows_inheritance_chain() {
        let mut tree = tree();
        let g = tree.create_window("DefaultWindow", "g").unwrap();
        let p = tree.create_window("DefaultWindow", "p").unwrap();
        let c = tree.create_window("DefaultWindow", "c").unwrap();
        tree.add_child(g, p).unwrap();
        tree.add_child(p, c).unwrap();
        tree.set_alpha(g, 0.5);
        tree.set_alpha(p, 0.5);
        tree.set_alpha(c, 0.5);
        assert_eq!(tree.effective_alpha(c), 0.125);

        tree.set_inherits_alpha(p, false);
        assert_eq!(tree.effective_alpha(c), 0.25);

        tree.set_inherits_alpha(c, false);
        assert_eq!(tree.effective_alpha(c), 0.5);
    }

    #[test]
    fn alpha_is_clamped() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        tree.set_alpha(w, 3.0);
        assert_eq!(tree.alpha(w), 1.0);
        tree.set_alpha(w, -1.0);
        assert_eq!(tree.alpha(w), 0.0);
    }
}
