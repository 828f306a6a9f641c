// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parenting and z-order.
//!
//! Children are kept in a doubly linked sibling list ordered back to front,
//! so the last child is the topmost. Always-on-top children form a band in
//! front of the normal ones: z-order operations never move a window out of
//! its band.

use alloc::format;
use alloc::vec::Vec;

use understory_dirty::{Channel, EagerPolicy};

use super::id::{INVALID, WindowId};
use super::names::WindowEvent;
use super::store::WindowTree;
use super::traverse::Children;
use crate::dirty;
use crate::error::{GuiError, ObjectKind};
use crate::trace::{ParentChangedEvent, ZOrderChangedEvent};

/// Channels a child inherits from its parent.
const INHERITED: [Channel; 3] = [dirty::AREA, dirty::ALPHA, dirty::STATE];

impl WindowTree {
    // -- Topology API --

    /// Attaches `child` to `parent`.
    ///
    /// The child goes in front of the siblings in its always-on-top band and
    /// `AddedChild` fires on the parent. Adding a window to the parent it
    /// already has does nothing.
    ///
    /// Returns [`GuiError::InvalidOperation`] if `child` is `parent`, if
    /// `child` is an ancestor of `parent`, or if `child` already has a
    /// different parent (remove it first).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn add_child(&mut self, parent: WindowId, child: WindowId) -> Result<(), GuiError> {
        self.validate(parent);
        self.validate(child);
        let (p, c) = (parent.idx, child.idx);
        if p == c {
            return Err(GuiError::InvalidOperation(
                "a window cannot be its own child",
            ));
        }
        let current = self.parent[c as usize];
        if current == p {
            return Ok(());
        }
        if current != INVALID {
            return Err(GuiError::InvalidOperation("window already has a parent"));
        }
        if self.is_ancestor_at(c, p) {
            return Err(GuiError::InvalidOperation(
                "window is an ancestor of the new parent",
            ));
        }

        self.link_child(p, c, false);
        for channel in INHERITED {
            // Only a cycle can fail here, and the ancestor check above rules
            // that out.
            let added = self.dirty.add_dependency(c, p, channel);
            debug_assert!(added.is_ok(), "parent link formed a dirty cycle");
        }
        self.mark_subtree_inherited_dirty(c);
        self.draw_order_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);

        self.tracer().parent_changed(&ParentChangedEvent {
            window: c,
            old_parent: None,
            new_parent: Some(p),
        });
        self.notify(p, WindowEvent::AddedChild, Some(c));
        Ok(())
    }

    /// Detaches `child` from `parent`; `child` becomes a root.
    ///
    /// Does nothing if `child` is not a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn remove_child(&mut self, parent: WindowId, child: WindowId) {
        self.validate(parent);
        self.validate(child);
        if self.parent[child.idx as usize] == parent.idx {
            self.remove_child_at(parent.idx, child.idx);
        }
    }

    /// Returns the parent of a window, if any.
    #[must_use]
    pub fn parent(&self, id: WindowId) -> Option<WindowId> {
        self.validate(id);
        self.handle_opt(self.parent[id.idx as usize])
    }

    /// Returns an iterator over the direct children of a window, back to
    /// front.
    #[must_use]
    pub fn children(&self, id: WindowId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn child_count(&self, id: WindowId) -> usize {
        self.children(id).count()
    }

    /// Returns whether `ancestor` is a (strict) ancestor of `id`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: WindowId, id: WindowId) -> bool {
        self.validate(ancestor);
        self.validate(id);
        self.is_ancestor_at(ancestor.idx, id.idx)
    }

    /// Returns the windows that have no parent, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<WindowId> {
        (0..self.len)
            .filter(|&idx| self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx))
            .map(|idx| self.handle(idx))
            .collect()
    }

    /// Returns the root of the tree `id` belongs to.
    #[must_use]
    pub fn root_of(&self, id: WindowId) -> WindowId {
        self.validate(id);
        let mut idx = id.idx;
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
        }
        self.handle(idx)
    }

    /// Returns the direct child with the given numeric id.
    ///
    /// Children are searched back to front. Returns
    /// [`GuiError::UnknownObject`] if no child carries the id.
    pub fn child_by_id(&self, parent: WindowId, numeric_id: u32) -> Result<WindowId, GuiError> {
        self.children(parent)
            .find(|c| self.numeric_id[c.idx as usize] == numeric_id)
            .ok_or_else(|| GuiError::unknown(ObjectKind::Window, &format!("ID {numeric_id:#X}")))
    }

    /// Returns the first descendant with the given numeric id, depth first.
    ///
    /// A child is checked before its own children.
    #[must_use]
    pub fn child_recursive(&self, parent: WindowId, numeric_id: u32) -> Option<WindowId> {
        self.validate(parent);
        self.handle_opt(self.child_recursive_at(parent.idx, numeric_id))
    }

    // -- Z-order API --

    /// Activates the window and brings it, and every ancestor, to the front
    /// of its siblings.
    ///
    /// Activation is skipped for hidden or disabled windows; the z-order
    /// move is skipped when z-order changes are disabled for the window.
    pub fn move_to_front(&mut self, id: WindowId) {
        self.validate(id);
        self.move_to_front_at(id.idx);
    }

    /// Deactivates the window and sends it, and every ancestor, to the back
    /// of its siblings.
    pub fn move_to_back(&mut self, id: WindowId) {
        self.validate(id);
        self.move_to_back_at(id.idx);
    }

    /// Places `id` directly in front of `sibling`.
    ///
    /// Does nothing if `id` is `sibling` or z-order changes are disabled for
    /// `id`.
    ///
    /// Returns [`GuiError::InvalidOperation`] if the windows do not share a
    /// parent or are in different always-on-top bands.
    pub fn move_in_front_of(&mut self, id: WindowId, sibling: WindowId) -> Result<(), GuiError> {
        let Some(p) = self.check_reorder(id, sibling)? else {
            return Ok(());
        };
        self.unlink_from_parent(id.idx);
        self.parent[id.idx as usize] = p;
        let next = self.next_sibling[sibling.idx as usize];
        self.insert_before_at(p, id.idx, next);
        self.z_changed(id.idx);
        Ok(())
    }

    /// Places `id` directly behind `sibling`.
    ///
    /// Same rules as [`move_in_front_of`](Self::move_in_front_of).
    pub fn move_behind(&mut self, id: WindowId, sibling: WindowId) -> Result<(), GuiError> {
        let Some(p) = self.check_reorder(id, sibling)? else {
            return Ok(());
        };
        self.unlink_from_parent(id.idx);
        self.parent[id.idx as usize] = p;
        self.insert_before_at(p, id.idx, sibling.idx);
        self.z_changed(id.idx);
        Ok(())
    }

    /// Places `id` directly after (in front of) `sibling` in z-order.
    pub fn move_in_z_order_after(
        &mut self,
        id: WindowId,
        sibling: WindowId,
    ) -> Result<(), GuiError> {
        self.move_in_front_of(id, sibling)
    }

    /// Returns whether the window is the topmost of its band among its
    /// siblings. Roots are always on top.
    #[must_use]
    pub fn is_top_of_z_order(&self, id: WindowId) -> bool {
        self.validate(id);
        self.is_top_at(id.idx)
    }

    /// Moves the window into or out of the always-on-top band and fires
    /// `AlwaysOnTopChanged`.
    pub fn set_always_on_top(&mut self, id: WindowId, on_top: bool) {
        self.validate(id);
        let idx = id.idx;
        if self.flags[idx as usize].always_on_top == on_top {
            return;
        }
        self.flags[idx as usize].always_on_top = on_top;
        let p = self.parent[idx as usize];
        if p != INVALID {
            self.unlink_from_parent(idx);
            self.link_child(p, idx, false);
            self.z_changed(idx);
        }
        self.notify(idx, WindowEvent::AlwaysOnTopChanged, None);
    }

    /// Enables or disables z-order changes for the window.
    pub fn set_z_order_change_enabled(&mut self, id: WindowId, enabled: bool) {
        self.validate(id);
        self.flags[id.idx as usize].z_order_change_enabled = enabled;
    }

    /// Sets whether destroying the parent destroys this window too.
    pub fn set_destroyed_by_parent(&mut self, id: WindowId, destroyed: bool) {
        self.validate(id);
        if self.flags[id.idx as usize].destroyed_by_parent == destroyed {
            return;
        }
        self.flags[id.idx as usize].destroyed_by_parent = destroyed;
        self.notify(id.idx, WindowEvent::DestroyedByParentChanged, None);
    }

    // -- Internal helpers --

    pub(crate) fn remove_child_at(&mut self, p: u32, c: u32) {
        self.unlink_from_parent(c);
        for channel in INHERITED {
            self.dirty.remove_dependency(c, p, channel);
        }
        self.mark_subtree_inherited_dirty(c);
        self.draw_order_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);

        self.tracer().parent_changed(&ParentChangedEvent {
            window: c,
            old_parent: Some(p),
            new_parent: None,
        });
        self.notify(p, WindowEvent::RemovedChild, Some(c));
    }

    pub(crate) fn is_ancestor_at(&self, ancestor: u32, idx: u32) -> bool {
        let mut cur = self.parent[idx as usize];
        while cur != INVALID {
            if cur == ancestor {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    pub(crate) fn move_to_front_at(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        if p == INVALID {
            // Roots are siblings of one another: at most one is active.
            if self.can_activate_at(idx) && !self.flags[idx as usize].active {
                let previous = self.active_root_at();
                self.set_active_at(idx, previous);
                if previous != INVALID {
                    self.deactivate_at(previous, idx);
                }
            }
            return;
        }

        self.move_to_front_at(p);

        if self.can_activate_at(idx) {
            let previous = self.active_child_at(p);
            if previous != idx {
                self.set_active_at(idx, previous);
                if previous != INVALID {
                    self.deactivate_at(previous, idx);
                }
            }
        }

        if self.flags[idx as usize].z_order_change_enabled && !self.is_top_at(idx) {
            self.unlink_from_parent(idx);
            self.link_child(p, idx, false);
            self.z_changed(idx);
        }
    }

    /// The active root, or [`INVALID`].
    fn active_root_at(&self) -> u32 {
        (0..self.len)
            .find(|&idx| {
                self.parent[idx as usize] == INVALID
                    && self.flags[idx as usize].active
                    && !self.free_list.contains(&idx)
            })
            .unwrap_or(INVALID)
    }

    fn move_to_back_at(&mut self, idx: u32) {
        if self.flags[idx as usize].active {
            self.deactivate_at(idx, INVALID);
        }

        let p = self.parent[idx as usize];
        if p == INVALID {
            return;
        }
        if self.flags[idx as usize].z_order_change_enabled {
            self.unlink_from_parent(idx);
            self.link_child(p, idx, true);
            self.z_changed(idx);
        }
        self.move_to_back_at(p);
    }

    /// Validates a sibling reorder; `Ok(None)` means "nothing to do".
    fn check_reorder(&self, id: WindowId, sibling: WindowId) -> Result<Option<u32>, GuiError> {
        self.validate(id);
        self.validate(sibling);
        if id == sibling {
            return Ok(None);
        }
        let p = self.parent[id.idx as usize];
        if p == INVALID || p != self.parent[sibling.idx as usize] {
            return Err(GuiError::InvalidOperation("windows are not siblings"));
        }
        if self.flags[id.idx as usize].always_on_top
            != self.flags[sibling.idx as usize].always_on_top
        {
            return Err(GuiError::InvalidOperation(
                "windows are in different always-on-top bands",
            ));
        }
        if !self.flags[id.idx as usize].z_order_change_enabled {
            return Ok(None);
        }
        Ok(Some(p))
    }

    fn is_top_at(&self, idx: u32) -> bool {
        let next = self.next_sibling[idx as usize];
        next == INVALID
            || (!self.flags[idx as usize].always_on_top && self.flags[next as usize].always_on_top)
    }

    fn child_recursive_at(&self, idx: u32, numeric_id: u32) -> u32 {
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            if self.numeric_id[child as usize] == numeric_id {
                return child;
            }
            let found = self.child_recursive_at(child, numeric_id);
            if found != INVALID {
                return found;
            }
            child = self.next_sibling[child as usize];
        }
        INVALID
    }

    pub(crate) fn last_child_at(&self, p: u32) -> u32 {
        let mut last = self.first_child[p as usize];
        if last == INVALID {
            return INVALID;
        }
        while self.next_sibling[last as usize] != INVALID {
            last = self.next_sibling[last as usize];
        }
        last
    }

    /// Position among siblings, back (0) to front.
    fn sibling_position_at(&self, idx: u32) -> u32 {
        let mut position = 0;
        let mut prev = self.prev_sibling[idx as usize];
        while prev != INVALID {
            position += 1;
            prev = self.prev_sibling[prev as usize];
        }
        position
    }

    /// Links the unattached `c` under `p` at the front (or back) of its band.
    fn link_child(&mut self, p: u32, c: u32, at_back: bool) {
        self.parent[c as usize] = p;
        let on_top = self.flags[c as usize].always_on_top;
        let next = if at_back {
            let mut next = self.first_child[p as usize];
            if on_top {
                while next != INVALID && !self.flags[next as usize].always_on_top {
                    next = self.next_sibling[next as usize];
                }
            }
            next
        } else {
            let mut prev = self.last_child_at(p);
            if !on_top {
                while prev != INVALID && self.flags[prev as usize].always_on_top {
                    prev = self.prev_sibling[prev as usize];
                }
            }
            if prev == INVALID {
                self.first_child[p as usize]
            } else {
                self.next_sibling[prev as usize]
            }
        };
        self.insert_before_at(p, c, next);
    }

    /// Inserts `c` before `next` in `p`'s child list; [`INVALID`] appends.
    fn insert_before_at(&mut self, p: u32, c: u32, next: u32) {
        let prev = if next == INVALID {
            self.last_child_at(p)
        } else {
            self.prev_sibling[next as usize]
        };
        self.prev_sibling[c as usize] = prev;
        self.next_sibling[c as usize] = next;
        if prev == INVALID {
            self.first_child[p as usize] = c;
        } else {
            self.next_sibling[prev as usize] = c;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = c;
        }
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Records a z-order move of `idx` and tells every sibling about it.
    fn z_changed(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        self.draw_order_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        let position = self.sibling_position_at(idx);
        self.tracer().z_order_changed(&ZOrderChangedEvent {
            window: idx,
            position,
        });
        for sibling in self.child_indices(p) {
            self.notify(sibling, WindowEvent::ZChanged, None);
        }
    }

    /// Marks the subtree rooted at `idx` dirty for inherited channels.
    pub(crate) fn mark_subtree_inherited_dirty(&mut self, idx: u32) {
        for channel in INHERITED {
            self.dirty.mark_with(idx, channel, &EagerPolicy);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::window::TreeConfig;

    fn tree_with(names: &[&str]) -> (WindowTree, Vec<WindowId>) {
        let mut tree = WindowTree::new(TreeConfig::small());
        let ids = names
            .iter()
            .map(|n| tree.create_window("DefaultWindow", n).unwrap())
            .collect();
        (tree, ids)
    }

    #[test]
    fn add_child_and_query() {
        let (mut tree, ids) = tree_with(&["p", "a", "b"]);
        let [p, a, b] = ids[..] else { unreachable!() };

        tree.add_child(p, a).unwrap();
        tree.add_child(p, b).unwrap();

        assert_eq!(tree.parent(a), Some(p));
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(tree.child_count(p), 2);
        assert!(tree.is_ancestor(p, b));
        assert_eq!(tree.root_of(b), p);
        assert_eq!(tree.roots(), vec![p]);
    }

    #[test]
    fn add_child_rejects_illegal_structures() {
        let (mut tree, ids) = tree_with(&["p", "c", "g", "other"]);
        let [p, c, g, other] = ids[..] else { unreachable!() };
        tree.add_child(p, c).unwrap();
        tree.add_child(c, g).unwrap();

        assert!(matches!(
            tree.add_child(p, p),
            Err(GuiError::InvalidOperation(_))
        ));
        assert!(
            matches!(tree.add_child(g, p), Err(GuiError::InvalidOperation(_))),
            "cycle must be rejected"
        );
        assert!(matches!(
            tree.add_child(other, c),
            Err(GuiError::InvalidOperation(_))
        ));
        // Same parent again is a no-op.
        tree.add_child(p, c).unwrap();
        assert_eq!(tree.child_count(p), 1);
    }

    #[test]
    fn reparented_child_follows_its_new_parent() {
        let (mut tree, ids) = tree_with(&["old", "new", "c"]);
        let [old, new, c] = ids[..] else { unreachable!() };
        tree.add_child(old, c).unwrap();
        tree.remove_child(old, c);
        tree.add_child(new, c).unwrap();
        tree.add_child(old, new).unwrap();
        let _ = tree.evaluate();

        tree.set_alpha(new, 0.5);
        let changes = tree.evaluate();
        assert!(changes.invalidated.contains(&c.index()));
        assert_eq!(tree.effective_alpha(c), 0.5);

        tree.set_alpha(old, 0.5);
        assert!(tree.evaluate().invalidated.contains(&c.index()));
    }

    #[test]
    fn children_are_found_by_numeric_id() {
        let (mut tree, ids) = tree_with(&["p", "a", "b", "b1"]);
        let [p, a, b, b1] = ids[..] else { unreachable!() };
        tree.add_child(p, a).unwrap();
        tree.add_child(p, b).unwrap();
        tree.add_child(b, b1).unwrap();
        tree.set_numeric_id(a, 7);
        tree.set_numeric_id(b, 9);
        tree.set_numeric_id(b1, 42);

        assert_eq!(tree.child_by_id(p, 9), Ok(b));
        assert_eq!(
            tree.child_by_id(p, 42),
            Err(GuiError::unknown(ObjectKind::Window, "ID 0x2A")),
            "grandchildren are not direct children"
        );
        assert_eq!(tree.child_recursive(p, 42), Some(b1));
        assert_eq!(tree.child_recursive(p, 7), Some(a));
        assert_eq!(tree.child_recursive(p, 1), None);
        assert_eq!(tree.child_recursive(b1, 42), None, "the window itself is excluded");
    }

    #[test]
    fn remove_child_is_silent_for_strangers() {
        let (mut tree, ids) = tree_with(&["p", "c", "x"]);
        let [p, c, x] = ids[..] else { unreachable!() };
        tree.add_child(p, c).unwrap();
        tree.remove_child(p, x);
        assert_eq!(tree.child_count(p), 1);
        tree.remove_child(p, c);
        assert_eq!(tree.parent(c), None);
        assert!(tree.children(p).next().is_none());
    }

    #[test]
    fn always_on_top_band_is_respected() {
        let (mut tree, ids) = tree_with(&["p", "top", "a", "b"]);
        let [p, top, a, b] = ids[..] else { unreachable!() };
        tree.set_always_on_top(top, true);
        tree.add_child(p, top).unwrap();
        tree.add_child(p, a).unwrap();
        tree.add_child(p, b).unwrap();
        // Normal children go behind the always-on-top one.
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![a, b, top]);
        assert!(tree.is_top_of_z_order(b));

        tree.move_to_back(top);
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![a, b, top]);

        tree.set_always_on_top(top, false);
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![a, b, top]);
        tree.set_always_on_top(a, true);
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![b, top, a]);
    }

    #[test]
    fn move_to_front_and_back_reorder_siblings() {
        let (mut tree, ids) = tree_with(&["p", "a", "b", "c"]);
        let [p, a, b, c] = ids[..] else { unreachable!() };
        for w in [a, b, c] {
            tree.add_child(p, w).unwrap();
        }

        tree.move_to_front(a);
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![b, c, a]);
        assert!(tree.is_active(a));

        tree.move_to_back(c);
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![c, b, a]);
    }

    #[test]
    fn activating_a_root_deactivates_the_other_roots() {
        let (mut tree, ids) = tree_with(&["a", "a1", "b"]);
        let [a, a1, b] = ids[..] else { unreachable!() };
        tree.add_child(a, a1).unwrap();

        tree.activate(a1);
        assert!(tree.is_active(a) && tree.is_active(a1));

        tree.activate(b);
        assert!(tree.is_active(b));
        assert!(!tree.is_active(a));
        assert!(!tree.flags(a1).active, "the old root's subtree goes too");

        tree.move_to_front(a);
        assert!(tree.is_active(a));
        assert!(!tree.is_active(b));
    }

    #[test]
    fn relative_moves_keep_parentage() {
        let (mut tree, ids) = tree_with(&["p", "a", "b", "c", "q", "d"]);
        let [p, a, b, c, q, d] = ids[..] else { unreachable!() };
        for w in [a, b, c] {
            tree.add_child(p, w).unwrap();
        }
        tree.add_child(q, d).unwrap();

        tree.move_in_front_of(a, b).unwrap();
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![b, a, c]);
        tree.move_behind(c, b).unwrap();
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![c, b, a]);
        tree.move_in_z_order_after(c, a).unwrap();
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![b, a, c]);

        assert!(tree.move_in_front_of(a, d).is_err());
        assert_eq!(tree.parent(a), Some(p));
    }

    #[test]
    fn z_order_locked_window_does_not_move() {
        let (mut tree, ids) = tree_with(&["p", "a", "b"]);
        let [p, a, b] = ids[..] else { unreachable!() };
        tree.add_child(p, a).unwrap();
        tree.add_child(p, b).unwrap();
        tree.set_z_order_change_enabled(a, false);

        tree.move_to_front(a);
        tree.move_in_front_of(a, b).unwrap();
        assert_eq!(tree.children(p).collect::<Vec<_>>(), vec![a, b]);
        assert!(tree.is_active(a), "activation still happens");
    }
}
