// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colours and per-corner colour sets.

use core::fmt;

/// A straight-alpha RGBA colour with `f32` channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Colour {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Default for Colour {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Colour {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a colour from its channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Unpacks a `0xAARRGGBB` value.
    #[must_use]
    pub fn from_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self::new(unit(r), unit(g), unit(b), unit(a))
    }

    /// Packs into `0xAARRGGBB`, clamping each channel.
    #[must_use]
    pub fn to_argb(self) -> u32 {
        let [r, g, b, a] = self.to_rgba8();
        u32::from_be_bytes([a, r, g, b])
    }

    /// Packs into `0xAABBGGRR`, which is RGBA byte order on little-endian
    /// targets.
    #[must_use]
    pub fn to_abgr(self) -> u32 {
        let [r, g, b, a] = self.to_rgba8();
        u32::from_be_bytes([a, b, g, r])
    }

    /// Quantizes to 8-bit channels, clamping each one.
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        [byte(self.r), byte(self.g), byte(self.b), byte(self.a)]
    }

    /// Parses eight hex digits in `AARRGGBB` order, as layouts write colours.
    #[must_use]
    pub fn parse_argb(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.len() != 8 {
            return None;
        }
        u32::from_str_radix(text, 16).ok().map(Self::from_argb)
    }

    /// Returns the colour with its alpha multiplied by `alpha`.
    #[must_use]
    pub fn modulate_alpha(self, alpha: f32) -> Self {
        Self {
            a: self.a * alpha,
            ..self
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.to_argb())
    }
}

fn unit(channel: u8) -> f32 {
    f32::from(channel) / 255.0
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is clamped to 0..=255 before the cast"
)]
fn byte(channel: f32) -> u8 {
    let scaled = if channel.is_nan() {
        0.0
    } else {
        channel.clamp(0.0, 1.0) * 255.0
    };
    (scaled + 0.5) as u8
}

/// Colours for the four corners of a quad.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColourRect {
    /// Top-left corner.
    pub top_left: Colour,
    /// Top-right corner.
    pub top_right: Colour,
    /// Bottom-left corner.
    pub bottom_left: Colour,
    /// Bottom-right corner.
    pub bottom_right: Colour,
}

impl ColourRect {
    /// One colour on every corner.
    #[must_use]
    pub const fn uniform(colour: Colour) -> Self {
        Self {
            top_left: colour,
            top_right: colour,
            bottom_left: colour,
            bottom_right: colour,
        }
    }

    /// A top-to-bottom gradient.
    #[must_use]
    pub const fn vertical(top: Colour, bottom: Colour) -> Self {
        Self {
            top_left: top,
            top_right: top,
            bottom_left: bottom,
            bottom_right: bottom,
        }
    }

    /// Multiplies every corner's alpha by `alpha`.
    #[must_use]
    pub fn modulate_alpha(self, alpha: f32) -> Self {
        Self {
            top_left: self.top_left.modulate_alpha(alpha),
            top_right: self.top_right.modulate_alpha(alpha),
            bottom_left: self.bottom_left.modulate_alpha(alpha),
            bottom_right: self.bottom_right.modulate_alpha(alpha),
        }
    }

    /// Whether every corner has the same colour.
    #[must_use]
    pub fn is_uniform(&self) -> bool {
        self.top_left == self.top_right
            && self.top_left == self.bottom_left
            && self.top_left == self.bottom_right
    }
}

impl From<Colour> for ColourRect {
    fn from(colour: Colour) -> Self {
        Self::uniform(colour)
    }
}
