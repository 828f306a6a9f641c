// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text forms of property values.
//!
//! | type | form |
//! |---|---|
//! | `bool` | `True` / `False` (`true` / `false` also parse) |
//! | `f64`, `f32` | shortest round-trip decimal |
//! | `u32` | decimal |
//! | [`UDim`] | `{scale,offset}` |
//! | [`UVector2`] | `{{s,o},{s,o}}` |
//! | [`URect`] | `{{s,o},{s,o},{s,o},{s,o}}` (left, top, right, bottom) |
//!
//! Parsers return `None` on malformed input; callers attach the property name.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::dim::{UDim, URect, UVector2};

/// Formats a boolean.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "True" } else { "False" }.into()
}

/// Parses a boolean.
#[must_use]
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        _ => None,
    }
}

/// Formats a float in its shortest round-trip form.
#[must_use]
pub fn format_f64(value: f64) -> String {
    format!("{value}")
}

/// Parses a float.
#[must_use]
pub fn parse_f64(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

/// Parses a single-precision float.
#[must_use]
pub fn parse_f32(text: &str) -> Option<f32> {
    text.trim().parse().ok()
}

/// Parses an unsigned integer.
#[must_use]
pub fn parse_u32(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}

/// Formats a [`UDim`].
#[must_use]
pub fn format_udim(value: UDim) -> String {
    format!("{{{},{}}}", value.scale, value.offset)
}

/// Parses a [`UDim`].
#[must_use]
pub fn parse_udim(text: &str) -> Option<UDim> {
    match split_group(text)?.as_slice() {
        [scale, offset] => Some(UDim::new(parse_f64(scale)?, parse_f64(offset)?)),
        _ => None,
    }
}

/// Formats a [`UVector2`].
#[must_use]
pub fn format_uvector2(value: UVector2) -> String {
    format!("{{{},{}}}", format_udim(value.x), format_udim(value.y))
}

/// Parses a [`UVector2`].
#[must_use]
pub fn parse_uvector2(text: &str) -> Option<UVector2> {
    match split_group(text)?.as_slice() {
        [x, y] => Some(UVector2::new(parse_udim(x)?, parse_udim(y)?)),
        _ => None,
    }
}

/// Formats a [`URect`].
#[must_use]
pub fn format_urect(value: URect) -> String {
    format!(
        "{{{},{},{},{}}}",
        format_udim(value.min.x),
        format_udim(value.min.y),
        format_udim(value.max.x),
        format_udim(value.max.y)
    )
}

/// Parses a [`URect`].
#[must_use]
pub fn parse_urect(text: &str) -> Option<URect> {
    match split_group(text)?.as_slice() {
        [left, top, right, bottom] => Some(URect::new(
            UVector2::new(parse_udim(left)?, parse_udim(top)?),
            UVector2::new(parse_udim(right)?, parse_udim(bottom)?),
        )),
        _ => None,
    }
}

/// Splits `{a,b,...}` into its top-level comma-separated parts.
fn split_group(text: &str) -> Option<Vec<&str>> {
    let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?;
    let mut parts = Vec::new();
    let mut depth = 0_u32;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(inner[start..].trim());
    Some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_forms() {
        assert_eq!(format_bool(true), "True");
        assert_eq!(parse_bool(" true "), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn floats_use_shortest_form() {
        assert_eq!(format_f64(1.0), "1");
        assert_eq!(format_f64(0.5), "0.5");
        assert_eq!(format_f64(-12.25), "-12.25");
    }

    #[test]
    fn nested_groups_parse() {
        let v = parse_uvector2("{{0.5, 10}, {0,-3}}").unwrap();
        assert_eq!(v, UVector2::new(UDim::new(0.5, 10.0), UDim::px(-3.0)));
        assert_eq!(format_uvector2(v), "{{0.5,10},{0,-3}}");

        let r = parse_urect("{{0,0},{0,0},{1,0},{1,-20}}").unwrap();
        assert_eq!(r.max.y, UDim::new(1.0, -20.0));
    }

    #[test]
    fn malformed_groups_are_rejected() {
        assert_eq!(parse_udim("{1,2,3}"), None);
        assert_eq!(parse_udim("1,2"), None);
        assert_eq!(parse_uvector2("{{1,2},{3,4}"), None);
        assert_eq!(parse_uvector2("{{1,2}},{3,4}}"), None);
        assert_eq!(parse_urect("{{0,0},{0,0},{1,0}}"), None);
        assert_eq!(parse_udim("{a,b}"), None);
    }
}
