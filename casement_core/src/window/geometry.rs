// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window geometry.
//!
//! Position and size are stored in unified coordinates and resolved on demand
//! against the parent's unclipped inner rect (or the display for roots). The
//! rect queries never cache and never mutate.

use kurbo::{Insets, Point, Rect, Size};
use understory_dirty::EagerPolicy;

use super::id::{INVALID, WindowId};
use super::names::WindowEvent;
use super::store::WindowTree;
use crate::dim::{UDim, URect, UVector2};
use crate::dirty;

impl WindowTree {
    // -- Unified geometry --

    /// Returns the unified position relative to the parent.
    #[must_use]
    pub fn position(&self, id: WindowId) -> UVector2 {
        self.validate(id);
        self.position[id.idx as usize]
    }

    /// Returns the unified size.
    #[must_use]
    pub fn size(&self, id: WindowId) -> UVector2 {
        self.validate(id);
        self.size[id.idx as usize]
    }

    /// Returns position and size as a unified rect.
    #[must_use]
    pub fn area(&self, id: WindowId) -> URect {
        self.validate(id);
        let i = id.idx as usize;
        URect::from_origin_size(self.position[i], self.size[i])
    }

    /// Sets the unified position and fires `Moved`.
    pub fn set_position(&mut self, id: WindowId, position: UVector2) {
        self.validate(id);
        if self.position[id.idx as usize] == position {
            return;
        }
        self.position[id.idx as usize] = position;
        self.area_changed(id.idx);
        self.notify(id.idx, WindowEvent::Moved, None);
    }

    /// Sets the unified size and fires `Sized`.
    pub fn set_size(&mut self, id: WindowId, size: UVector2) {
        self.validate(id);
        if self.size[id.idx as usize] == size {
            return;
        }
        self.size[id.idx as usize] = size;
        self.area_changed(id.idx);
        self.notify(id.idx, WindowEvent::Sized, None);
    }

    /// Sets position and size from a unified rect.
    pub fn set_area(&mut self, id: WindowId, area: URect) {
        self.set_position(id, area.position());
        self.set_size(id, area.size());
    }

    /// Sets an absolute pixel position, dropping any relative component.
    pub fn set_pixel_position(&mut self, id: WindowId, position: Point) {
        self.set_position(
            id,
            UVector2::new(UDim::px(position.x), UDim::px(position.y)),
        );
    }

    /// Sets an absolute pixel size, dropping any relative component.
    pub fn set_pixel_size(&mut self, id: WindowId, size: Size) {
        self.set_size(id, UVector2::new(UDim::px(size.width), UDim::px(size.height)));
    }

    /// Returns the chrome insets separating the outer rect from the inner
    /// (client) rect.
    #[must_use]
    pub fn chrome(&self, id: WindowId) -> Insets {
        self.validate(id);
        self.chrome[id.idx as usize]
    }

    /// Sets the chrome insets. Children are laid out inside them.
    pub fn set_chrome(&mut self, id: WindowId, chrome: Insets) {
        self.validate(id);
        if self.chrome[id.idx as usize] == chrome {
            return;
        }
        self.chrome[id.idx as usize] = chrome;
        self.area_changed(id.idx);
    }

    /// Sets whether the window is clipped by its parent and fires
    /// `ClippingChanged`.
    pub fn set_clipped_by_parent(&mut self, id: WindowId, clipped: bool) {
        self.validate(id);
        if self.flags[id.idx as usize].clipped_by_parent == clipped {
            return;
        }
        self.flags[id.idx as usize].clipped_by_parent = clipped;
        self.area_changed(id.idx);
        self.notify(id.idx, WindowEvent::ClippingChanged, None);
    }

    // -- Display --

    /// Returns the display size roots are laid out against.
    #[must_use]
    pub fn display_size(&self) -> Size {
        self.config.display_size
    }

    /// Changes the display size; every root is re-laid out.
    pub fn set_display_size(&mut self, size: Size) {
        if self.config.display_size == size {
            return;
        }
        self.config.display_size = size;
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.area_changed(idx);
            }
        }
    }

    // -- Pixel rects --

    /// Returns the outer rect in display pixels, ignoring clipping.
    #[must_use]
    pub fn unclipped_outer_rect(&self, id: WindowId) -> Rect {
        self.validate(id);
        self.unclipped_outer_rect_at(id.idx)
    }

    /// Returns the inner (client) rect in display pixels, ignoring clipping.
    #[must_use]
    pub fn unclipped_inner_rect(&self, id: WindowId) -> Rect {
        self.validate(id);
        self.unclipped_inner_rect_at(id.idx)
    }

    /// Returns the visible part of the outer rect.
    ///
    /// While the window is clipped by its parent, this is the unclipped outer
    /// rect intersected with the parent's clipped inner rect; otherwise it is
    /// intersected with the display.
    #[must_use]
    pub fn pixel_rect(&self, id: WindowId) -> Rect {
        self.validate(id);
        self.pixel_rect_at(id.idx)
    }

    /// Returns the visible part of the inner rect, clipped the same way as
    /// [`pixel_rect`](Self::pixel_rect).
    #[must_use]
    pub fn inner_rect(&self, id: WindowId) -> Rect {
        self.validate(id);
        self.inner_rect_at(id.idx)
    }

    pub(crate) fn unclipped_outer_rect_at(&self, idx: u32) -> Rect {
        let p = self.parent[idx as usize];
        let base = if p == INVALID {
            self.display_rect()
        } else {
            self.unclipped_inner_rect_at(p)
        };
        let reference = base.size();
        let offset = self.position[idx as usize].resolve_point(reference);
        let size = self.size[idx as usize].resolve_size(reference);
        Rect::from_origin_size(
            base.origin() + offset.to_vec2(),
            Size::new(size.width.max(0.0), size.height.max(0.0)),
        )
    }

    pub(crate) fn unclipped_inner_rect_at(&self, idx: u32) -> Rect {
        let inner = self.unclipped_outer_rect_at(idx) - self.chrome[idx as usize];
        // Chrome larger than the window collapses the client area.
        Rect::new(
            inner.x0,
            inner.y0,
            inner.x1.max(inner.x0),
            inner.y1.max(inner.y0),
        )
    }

    pub(crate) fn pixel_rect_at(&self, idx: u32) -> Rect {
        self.unclipped_outer_rect_at(idx)
            .intersect(self.clip_base_at(idx))
    }

    pub(crate) fn inner_rect_at(&self, idx: u32) -> Rect {
        self.unclipped_inner_rect_at(idx)
            .intersect(self.clip_base_at(idx))
    }

    fn clip_base_at(&self, idx: u32) -> Rect {
        let p = self.parent[idx as usize];
        if p != INVALID && self.flags[idx as usize].clipped_by_parent {
            self.inner_rect_at(p)
        } else {
            self.display_rect()
        }
    }

    fn display_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.config.display_size)
    }

    fn area_changed(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::AREA, &EagerPolicy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::TreeConfig;

    fn tree() -> WindowTree {
        WindowTree::new(TreeConfig::small())
    }

    #[test]
    fn child_overhanging_parent_is_clipped() {
        let mut tree = tree();
        let p = tree.create_window("DefaultWindow", "p").unwrap();
        let c = tree.create_window("DefaultWindow", "c").unwrap();
        tree.set_pixel_size(p, Size::new(100.0, 100.0));
        tree.add_child(p, c).unwrap();
        tree.set_pixel_position(c, Point::new(-10.0, -10.0));
        tree.set_pixel_size(c, Size::new(50.0, 50.0));

        assert_eq!(
            tree.unclipped_outer_rect(c),
            Rect::new(-10.0, -10.0, 40.0, 40.0)
        );
        assert_eq!(tree.pixel_rect(c), Rect::new(0.0, 0.0, 40.0, 40.0));

        tree.set_clipped_by_parent(c, false);
        assert_eq!(
            tree.pixel_rect(c),
            Rect::new(0.0, 0.0, 40.0, 40.0),
            "unclipped windows are still clipped to the display"
        );
    }

    #[test]
    fn relative_geometry_resolves_against_parent_inner_rect() {
        let mut tree = tree();
        let p = tree.create_window("DefaultWindow", "p").unwrap();
        let c = tree.create_window("DefaultWindow", "c").unwrap();
        tree.set_pixel_position(p, Point::new(100.0, 50.0));
        tree.set_pixel_size(p, Size::new(220.0, 120.0));
        tree.set_chrome(p, Insets::uniform(10.0));
        tree.add_child(p, c).unwrap();
        tree.set_area(
            c,
            URect::from_origin_size(
                UVector2::new(UDim::rel(0.5), UDim::px(0.0)),
                UVector2::new(UDim::rel(0.5), UDim::rel(1.0)),
            ),
        );

        assert_eq!(
            tree.unclipped_inner_rect(p),
            Rect::new(110.0, 60.0, 310.0, 160.0)
        );
        assert_eq!(
            tree.unclipped_outer_rect(c),
            Rect::new(210.0, 60.0, 310.0, 160.0)
        );
    }

    #[test]
    fn clipped_rects_nest_inside_ancestors() {
        let mut tree = tree();
        let p = tree.create_window("DefaultWindow", "p").unwrap();
        let c = tree.create_window("DefaultWindow", "c").unwrap();
        let g = tree.create_window("DefaultWindow", "g").unwrap();
        tree.set_pixel_position(p, Point::new(600.0, 10.0));
        tree.set_pixel_size(p, Size::new(100.0, 100.0));
        tree.add_child(p, c).unwrap();
        tree.add_child(c, g).unwrap();
        tree.set_size(c, UVector2::new(UDim::rel(2.0), UDim::rel(1.0)));
        tree.set_size(g, UVector2::new(UDim::rel(1.0), UDim::rel(1.0)));

        let parent = tree.pixel_rect(p);
        assert_eq!(parent, Rect::new(600.0, 10.0, 640.0, 110.0));
        for w in [c, g] {
            let r = tree.pixel_rect(w);
            assert_eq!(r.intersect(parent), r, "{w:?} escapes its parent");
        }
    }

    #[test]
    fn display_size_change_moves_relative_roots() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        tree.set_size(w, UVector2::new(UDim::rel(1.0), UDim::rel(1.0)));
        assert_eq!(tree.pixel_rect(w), Rect::new(0.0, 0.0, 640.0, 480.0));
        tree.set_display_size(Size::new(800.0, 600.0));
        assert_eq!(tree.pixel_rect(w), Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn oversized_chrome_collapses_inner_rect() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        tree.set_pixel_size(w, Size::new(10.0, 10.0));
        tree.set_chrome(w, Insets::uniform(8.0));
        let inner = tree.unclipped_inner_rect(w);
        assert_eq!(inner.area(), 0.0);
    }
}
