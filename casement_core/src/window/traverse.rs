// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{INVALID, WindowId};
use super::store::WindowTree;

/// An iterator over the direct children of a window, back to front.
///
/// Created by [`WindowTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a WindowTree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a WindowTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = WindowId;

    fn next(&mut self) -> Option<WindowId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        Some(self.tree.handle(idx))
    }
}

impl WindowTree {
    /// Returns the cached draw order: every live window, parents before
    /// children, siblings back to front. Roots come in slot order.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called since
    /// the last structural change.
    #[must_use]
    pub fn draw_order(&self) -> &[u32] {
        &self.draw_order
    }

    /// Rebuilds the depth-first pre-order traversal of all live windows.
    pub(crate) fn rebuild_draw_order(&mut self) {
        let mut order = core::mem::take(&mut self.draw_order);
        order.clear();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dfs_collect(idx, &mut order);
            }
        }
        self.draw_order = order;
    }

    fn dfs_collect(&self, idx: u32, order: &mut Vec<u32>) {
        order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child, order);
            child = self.next_sibling[child as usize];
        }
    }

    /// Raw child slots of `idx`, back to front.
    pub(crate) fn child_indices(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            out.push(child);
            child = self.next_sibling[child as usize];
        }
        out
    }
}
