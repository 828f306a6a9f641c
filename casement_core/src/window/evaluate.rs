// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection.
//!
//! Geometry, alpha and state are resolved on demand, so evaluation has
//! nothing to recompute: it drains every dirty channel and reports which
//! windows need their geometry rebuilt.
//!
//! 1. **AREA** / **ALPHA** / **STATE**: drained together with their
//!    dependents, since a change to a parent reaches every descendant.
//! 2. **REDRAW**: drained on its own; it never propagates.
//! 3. **TOPOLOGY**: drained and discarded; the draw order is rebuilt up
//!    front when the structure changed.
//!
//! Like the draw order, [`TreeChanges`] reports raw slot indices.

use alloc::vec::Vec;

use super::store::WindowTree;
use crate::dirty;

/// Changes accumulated since the previous [`WindowTree::evaluate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeChanges {
    /// Live windows whose drawn output may differ, sorted and deduplicated.
    pub invalidated: Vec<u32>,
    /// Windows created since the last evaluation.
    pub created: Vec<u32>,
    /// Windows destroyed since the last evaluation.
    pub destroyed: Vec<u32>,
    /// Whether the draw order was rebuilt.
    pub topology_changed: bool,
}

impl TreeChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.invalidated.clear();
        self.created.clear();
        self.destroyed.clear();
        self.topology_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invalidated.is_empty()
            && self.created.is_empty()
            && self.destroyed.is_empty()
            && !self.topology_changed
    }
}

impl WindowTree {
    /// Drains pending changes and brings the draw order up to date.
    pub fn evaluate(&mut self) -> TreeChanges {
        let mut changes = TreeChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut TreeChanges) {
        changes.clear();

        if self.draw_order_dirty {
            self.rebuild_draw_order();
            changes.topology_changed = true;
            self.draw_order_dirty = false;
        }

        for channel in [dirty::AREA, dirty::ALPHA, dirty::STATE] {
            let drained = self.dirty.drain(channel).affected().deterministic().run();
            changes.invalidated.extend(drained);
        }
        let redraw = self.dirty.drain(dirty::REDRAW).deterministic().run();
        changes.invalidated.extend(redraw);

        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        changes.invalidated.sort_unstable();
        changes.invalidated.dedup();
        changes
            .invalidated
            .retain(|&idx| idx < self.len && !self.free_list.contains(&idx));

        core::mem::swap(&mut self.pending_created, &mut changes.created);
        core::mem::swap(&mut self.pending_destroyed, &mut changes.destroyed);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Size;

    use super::*;
    use crate::window::TreeConfig;

    #[test]
    fn first_evaluation_reports_creation_and_order() {
        let mut tree = WindowTree::new(TreeConfig::small());
        let p = tree.create_window("DefaultWindow", "p").unwrap();
        let c = tree.create_window("DefaultWindow", "c").unwrap();
        tree.add_child(p, c).unwrap();

        let changes = tree.evaluate();
        assert!(changes.topology_changed);
        assert_eq!(changes.created, vec![p.index(), c.index()]);
        assert_eq!(tree.draw_order(), &[p.index(), c.index()]);

        let again = tree.evaluate();
        assert!(again.is_empty(), "second evaluation sees nothing: {again:?}");
    }

    #[test]
    fn parent_changes_invalidate_descendants() {
        let mut tree = WindowTree::new(TreeConfig::small());
        let p = tree.create_window("DefaultWindow", "p").unwrap();
        let c = tree.create_window("DefaultWindow", "c").unwrap();
        let other = tree.create_window("DefaultWindow", "other").unwrap();
        tree.add_child(p, c).unwrap();
        let _ = tree.evaluate();

        tree.set_pixel_size(p, Size::new(10.0, 10.0));
        let changes = tree.evaluate();
        assert!(changes.invalidated.contains(&p.index()));
        assert!(changes.invalidated.contains(&c.index()));
        assert!(!changes.invalidated.contains(&other.index()));

        tree.set_text(c, "local only");
        assert_eq!(tree.evaluate().invalidated, vec![c.index()]);
    }

    #[test]
    fn destroyed_windows_are_reported_once() {
        let mut tree = WindowTree::new(TreeConfig::small());
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        let _ = tree.evaluate();
        tree.invalidate(w);
        tree.destroy_window(w);

        let changes = tree.evaluate();
        assert_eq!(changes.destroyed, vec![w.index()]);
        assert!(changes.invalidated.is_empty());
        assert!(tree.draw_order().is_empty());
        assert!(tree.evaluate().destroyed.is_empty());
    }
}
