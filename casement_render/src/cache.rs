// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-window geometry cache.
//!
//! The draw path stores the batches each window produced. On later frames a
//! window whose entry survives is replayed from deep copies instead of being
//! painted again. [`GeometryCache::apply`] drops the entries of every window
//! that [`WindowTree::evaluate`](casement_core::window::WindowTree::evaluate)
//! reported as invalidated, created or destroyed.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use casement_core::window::TreeChanges;

use crate::batch::GeometryBatch;
use crate::vertex::NativeVertex;

/// Cached batches keyed by window slot.
#[derive(Debug)]
pub struct GeometryCache<V> {
    entries: BTreeMap<u32, Vec<GeometryBatch<V>>>,
}

impl<V> Default for GeometryCache<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V: NativeVertex> GeometryCache<V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops entries made stale by `changes`.
    pub fn apply(&mut self, changes: &TreeChanges) {
        for idx in changes
            .invalidated
            .iter()
            .chain(&changes.created)
            .chain(&changes.destroyed)
        {
            self.entries.remove(idx);
        }
    }

    /// Cached batches for a window slot.
    #[must_use]
    pub fn get(&self, window: u32) -> Option<&[GeometryBatch<V>]> {
        self.entries.get(&window).map(Vec::as_slice)
    }

    /// Stores deep copies of `batches` for a window slot.
    pub fn store(&mut self, window: u32, batches: &[GeometryBatch<V>]) {
        self.entries.insert(window, batches.to_vec());
    }

    /// Forgets one window.
    pub fn remove(&mut self, window: u32) {
        self.entries.remove(&window);
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached windows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Rect;

    use super::*;
    use crate::batch::BlendMode;
    use crate::vertex::Vertex;

    fn batch() -> GeometryBatch<Vertex> {
        let mut b = GeometryBatch::new(None, Rect::new(0.0, 0.0, 1.0, 1.0), BlendMode::Normal);
        b.append_geometry(&[Vertex::default(); 3]).unwrap();
        b
    }

    #[test]
    fn changes_evict_entries() {
        let mut cache = GeometryCache::new();
        for idx in 0..4 {
            cache.store(idx, &[batch()]);
        }
        cache.apply(&TreeChanges {
            invalidated: vec![0],
            created: vec![1],
            destroyed: vec![2],
            topology_changed: true,
        });
        assert_eq!(cache.len(), 1);
        assert!(cache.get(3).is_some());
    }

    #[test]
    fn stored_batches_are_copies() {
        let mut cache = GeometryCache::new();
        let mut original = batch();
        cache.store(0, core::slice::from_ref(&original));
        original.reset();
        assert_eq!(cache.get(0).unwrap()[0].vertex_count(), 3);
    }
}
