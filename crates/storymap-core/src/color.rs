//! Color handling for Storymap diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. DrawIO style strings carry colours as `#rrggbb`
//! hex, and node classification compares fill colours, so every colour is
//! normalised to lowercase hex before it is written or compared.

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    ///
    /// This parses CSS colour strings such as `"#ff0000"`, `"#F00"`,
    /// `"rgb(255, 0, 0)"` or `"red"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use storymap_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str.trim()) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the colour as lowercase `#rrggbb`, the form DrawIO writes.
    ///
    /// Alpha is dropped; DrawIO keeps opacity in separate style keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use storymap_core::color::Color;
    ///
    /// assert_eq!(Color::new("#DAE8FC").unwrap().to_hex(), "#dae8fc");
    /// assert_eq!(Color::new("red").unwrap().to_hex(), "#ff0000");
    /// ```
    pub fn to_hex(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    }

    /// Returns true if both colours normalise to the same hex value.
    pub fn same_as(self, other: Color) -> bool {
        self.to_hex() == other.to_hex()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default().to_hex(), "#000000");
    }

    #[test]
    fn test_color_short_hex_normalises() {
        let short = Color::new("#FFF").unwrap();
        let long = Color::new("#ffffff").unwrap();

        assert!(short.same_as(long));
        assert_eq!(short.to_string(), "#ffffff");
    }

    #[test]
    fn test_color_named_matches_hex() {
        let named = Color::new("white").unwrap();
        assert_eq!(named.to_hex(), "#ffffff");
    }

    #[test]
    fn test_color_whitespace_trimmed() {
        assert_eq!(Color::new("  #d5e8d4 ").unwrap().to_hex(), "#d5e8d4");
    }
}
