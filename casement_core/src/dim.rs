// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unified dimensions.
//!
//! A window's position and size are expressed in two coordinate systems at
//! once: a *scale* relative to the parent's inner size, and an absolute pixel
//! *offset*. [`UDim`] holds one such pair for a single axis.

use kurbo::{Point, Rect, Size};

/// A single-axis unified dimension: `scale * reference + offset`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UDim {
    /// Fraction of the reference length.
    pub scale: f64,
    /// Absolute pixel offset.
    pub offset: f64,
}

impl UDim {
    /// The zero dimension.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a dimension from scale and offset.
    #[must_use]
    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    /// A pure pixel dimension.
    #[must_use]
    pub const fn px(offset: f64) -> Self {
        Self::new(0.0, offset)
    }

    /// A pure relative dimension.
    #[must_use]
    pub const fn rel(scale: f64) -> Self {
        Self::new(scale, 0.0)
    }

    /// Resolves to pixels against `reference`.
    #[must_use]
    pub fn resolve(self, reference: f64) -> f64 {
        self.scale * reference + self.offset
    }
}

/// A unified 2D vector (position or size).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UVector2 {
    /// Horizontal component.
    pub x: UDim,
    /// Vertical component.
    pub y: UDim,
}

impl UVector2 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(UDim::ZERO, UDim::ZERO);

    /// Creates a vector from two dimensions.
    #[must_use]
    pub const fn new(x: UDim, y: UDim) -> Self {
        Self { x, y }
    }

    /// A pure pixel vector.
    #[must_use]
    pub const fn px(x: f64, y: f64) -> Self {
        Self::new(UDim::px(x), UDim::px(y))
    }

    /// A pure relative vector.
    #[must_use]
    pub const fn rel(x: f64, y: f64) -> Self {
        Self::new(UDim::rel(x), UDim::rel(y))
    }

    /// Resolves to a pixel offset against `reference`.
    #[must_use]
    pub fn resolve_point(self, reference: Size) -> Point {
        Point::new(self.x.resolve(reference.width), self.y.resolve(reference.height))
    }

    /// Resolves to a pixel size against `reference`.
    #[must_use]
    pub fn resolve_size(self, reference: Size) -> Size {
        Size::new(self.x.resolve(reference.width), self.y.resolve(reference.height))
    }
}

/// A unified rectangle, stored as edges.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct URect {
    /// Top-left corner.
    pub min: UVector2,
    /// Bottom-right corner.
    pub max: UVector2,
}

impl URect {
    /// Creates a rectangle from its corners.
    #[must_use]
    pub const fn new(min: UVector2, max: UVector2) -> Self {
        Self { min, max }
    }

    /// Creates a rectangle from a position and a size.
    #[must_use]
    pub fn from_origin_size(position: UVector2, size: UVector2) -> Self {
        Self {
            min: position,
            max: UVector2::new(
                UDim::new(position.x.scale + size.x.scale, position.x.offset + size.x.offset),
                UDim::new(position.y.scale + size.y.scale, position.y.offset + size.y.offset),
            ),
        }
    }

    /// Returns the position (top-left corner).
    #[must_use]
    pub const fn position(&self) -> UVector2 {
        self.min
    }

    /// Returns the size.
    #[must_use]
    pub fn size(&self) -> UVector2 {
        UVector2::new(
            UDim::new(self.max.x.scale - self.min.x.scale, self.max.x.offset - self.min.x.offset),
            UDim::new(self.max.y.scale - self.min.y.scale, self.max.y.offset - self.min.y.offset),
        )
    }

    /// Resolves to a pixel rectangle relative to an origin of `(0, 0)`.
    #[must_use]
    pub fn resolve(&self, reference: Size) -> Rect {
        Rect::from_points(
            self.min.resolve_point(reference),
            self.max.resolve_point(reference),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn udim_resolves_scale_and_offset() {
        assert_eq!(UDim::new(0.5, 10.0).resolve(200.0), 110.0);
        assert_eq!(UDim::px(-10.0).resolve(200.0), -10.0);
    }

    #[test]
    fn urect_round_trips_position_and_size() {
        let pos = UVector2::new(UDim::new(0.25, 5.0), UDim::px(-3.0));
        let size = UVector2::new(UDim::rel(0.5), UDim::new(0.1, 20.0));
        let r = URect::from_origin_size(pos, size);
        assert_eq!(r.position(), pos);
        assert_eq!(r.size(), size);
        assert_eq!(
            r.resolve(Size::new(100.0, 100.0)),
            Rect::new(30.0, -3.0, 80.0, 27.0)
        );
    }
}
