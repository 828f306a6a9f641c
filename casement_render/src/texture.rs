// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer-owned textures.
//!
//! The renderer owns every native texture. Batches and windows refer to them
//! through [`TextureId`]s, which are non-owning and carry a generation so a
//! handle to a destroyed texture is detected instead of aliasing a new one.

use alloc::vec::Vec;
use core::fmt;

/// A non-owning reference to a texture in a [`TextureStore`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId {
    idx: u32,
    generation: u32,
}

impl TextureId {
    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }
}

impl fmt::Debug for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureId({}@gen{})", self.idx, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

#[derive(Debug)]
struct Entry<T> {
    native: T,
    width: u32,
    height: u32,
    target: bool,
}

/// Generational storage for native texture handles.
#[derive(Debug)]
pub struct TextureStore<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
}

impl<T> Default for TextureStore<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }
}

impl<T> TextureStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a native texture.
    pub fn insert(&mut self, native: T, width: u32, height: u32) -> TextureId {
        self.insert_entry(Entry {
            native,
            width,
            height,
            target: false,
        })
    }

    /// Takes ownership of a native render target.
    pub fn insert_target(&mut self, native: T, width: u32, height: u32) -> TextureId {
        self.insert_entry(Entry {
            native,
            width,
            height,
            target: true,
        })
    }

    fn insert_entry(&mut self, entry: Entry<T>) -> TextureId {
        let entry = Some(entry);
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.entry = entry;
            return TextureId {
                idx,
                generation: slot.generation,
            };
        }
        let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            entry,
        });
        TextureId { idx, generation: 0 }
    }

    /// Removes a texture and returns its native handle.
    pub fn remove(&mut self, id: TextureId) -> Option<T> {
        let slot = self.slot_mut(id)?;
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.idx);
        Some(entry.native)
    }

    /// Returns the native handle.
    #[must_use]
    pub fn get(&self, id: TextureId) -> Option<&T> {
        self.entry(id).map(|e| &e.native)
    }

    /// Returns the native handle mutably.
    pub fn get_mut(&mut self, id: TextureId) -> Option<&mut T> {
        self.slot_mut(id)?.entry.as_mut().map(|e| &mut e.native)
    }

    /// Returns the texture's size in pixels.
    #[must_use]
    pub fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.entry(id).map(|e| (e.width, e.height))
    }

    /// Whether `id` refers to a live render target.
    #[must_use]
    pub fn is_target(&self, id: TextureId) -> bool {
        self.entry(id).is_some_and(|e| e.target)
    }

    /// Swaps in a new native handle, returning the old one. The id stays
    /// valid.
    pub fn replace(&mut self, id: TextureId, native: T) -> Option<T> {
        let entry = self.slot_mut(id)?.entry.as_mut()?;
        Some(core::mem::replace(&mut entry.native, native))
    }

    /// Ids of the live textures, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.entry.as_ref().map(|_| TextureId {
                idx: u32::try_from(idx).unwrap_or(u32::MAX),
                generation: slot.generation,
            })
        })
    }

    /// Whether `id` refers to a live texture.
    #[must_use]
    pub fn contains(&self, id: TextureId) -> bool {
        self.entry(id).is_some()
    }

    /// Number of live textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every texture, returning the native handles.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.free_list.clear();
        self.slots.drain(..).filter_map(|slot| slot.entry.map(|e| e.native))
    }

    fn entry(&self, id: TextureId) -> Option<&Entry<T>> {
        self.slots
            .get(id.idx as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn slot_mut(&mut self, id: TextureId) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(id.idx as usize)
            .filter(|slot| slot.generation == id.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_ids_do_not_alias_reused_slots() {
        let mut store = TextureStore::new();
        let a = store.insert("a", 4, 4);
        assert_eq!(store.remove(a), Some("a"));
        let b = store.insert("b", 8, 2);
        assert_eq!(a.index(), b.index());
        assert!(!store.contains(a));
        assert_eq!(store.get(a), None);
        assert_eq!(store.remove(a), None);
        assert_eq!(store.get(b), Some(&"b"));
        assert_eq!(store.size(b), Some((8, 2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn drain_returns_live_handles() {
        let mut store = TextureStore::new();
        let a = store.insert(1, 1, 1);
        store.insert(2, 1, 1);
        store.remove(a);
        let mut drained: Vec<i32> = store.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, [2]);
        assert!(store.is_empty());
    }

    #[test]
    fn replacing_a_native_keeps_the_id() {
        let mut store = TextureStore::new();
        let a = store.insert("a", 1, 1);
        let t = store.insert_target("t", 4, 4);
        store.remove(a);
        let b = store.insert("b", 2, 2);

        assert!(store.is_target(t));
        assert!(!store.is_target(b));
        assert!(!store.is_target(a));
        assert_eq!(store.ids().collect::<Vec<_>>(), [b, t]);

        assert_eq!(store.replace(t, "t2"), Some("t"));
        assert_eq!(store.get(t), Some(&"t2"));
        assert!(store.is_target(t), "still a target");
        assert_eq!(store.replace(a, "stale"), None);
    }
}
