// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image decoding contract.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Pixel layouts a codec may produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit red, green, blue.
    Rgb8,
    /// 8-bit red, green, blue, alpha.
    Rgba8,
    /// 8-bit blue, green, red, alpha.
    Bgra8,
    /// 8-bit luminance and alpha.
    La8,
}

impl PixelFormat {
    /// Bytes per pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
            Self::La8 => 2,
        }
    }
}

/// Errors from an [`ImageCodec`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended early.
    Truncated {
        /// Bytes needed.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },
    /// The input is valid but uses a feature the codec does not support.
    Unsupported(String),
    /// The input is malformed.
    Malformed(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { expected, actual } => {
                write!(f, "image data truncated: need {expected} bytes, got {actual}")
            }
            Self::Unsupported(what) => write!(f, "unsupported image: {what}"),
            Self::Malformed(what) => write!(f, "malformed image: {what}"),
        }
    }
}

impl core::error::Error for DecodeError {}

/// A decoded image, rows top to bottom without padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Pixel data.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout of `pixels`.
    pub format: PixelFormat,
}

impl DecodedImage {
    /// Wraps pixel data, checking its length against the dimensions.
    pub fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if pixels.len() < expected {
            return Err(DecodeError::Truncated {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            format,
        })
    }

    /// Converts to tightly packed RGBA8.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        let count = self.width as usize * self.height as usize;
        let bpp = self.format.bytes_per_pixel();
        let mut out = Vec::with_capacity(count * 4);
        for px in self.pixels.chunks_exact(bpp).take(count) {
            let rgba = match (self.format, px) {
                (PixelFormat::Rgb8, &[r, g, b]) => [r, g, b, 0xff],
                (PixelFormat::Rgba8, &[r, g, b, a]) => [r, g, b, a],
                (PixelFormat::Bgra8, &[b, g, r, a]) => [r, g, b, a],
                (PixelFormat::La8, &[l, a]) => [l, l, l, a],
                _ => [0; 4],
            };
            out.extend_from_slice(&rgba);
        }
        out
    }
}

/// Decodes encoded image files.
pub trait ImageCodec {
    /// A short identifier, e.g. `"TGA"`.
    fn name(&self) -> &str;

    /// Decodes `bytes`.
    ///
    /// Returns [`DecodeError`] if the data is malformed or unsupported.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;
}
