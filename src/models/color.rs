//! ARGB color handling with hex parsing and serialization.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color with an alpha channel, stored as hex (`#AARRGGBB`) in settings and layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArgbColor {
    /// Alpha channel (0 = transparent, 255 = opaque)
    pub a: u8,
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl ArgbColor {
    /// Opaque black.
    pub const BLACK: Self = Self::new(255, 0, 0, 0);

    /// Creates a color from individual channel values.
    #[must_use]
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(255, r, g, b)
    }

    /// Parses a color from a hex string.
    ///
    /// Supports `#AARRGGBB` and `#RRGGBB` (opaque), with or without the leading `#`.
    ///
    /// # Examples
    ///
    /// ```
    /// use deskfence::models::ArgbColor;
    ///
    /// let color = ArgbColor::from_hex("#C8F0F0F0").unwrap();
    /// assert_eq!(color, ArgbColor::new(200, 240, 240, 240));
    ///
    /// let color = ArgbColor::from_hex("00FF00").unwrap();
    /// assert_eq!(color, ArgbColor::opaque(0, 255, 0));
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            anyhow::bail!("Invalid hex color format '{hex}'. Expected AARRGGBB or RRGGBB");
        }

        let (alpha, rgb) = match hex.len() {
            8 => (&hex[0..2], &hex[2..8]),
            6 => ("FF", hex),
            _ => anyhow::bail!(
                "Invalid hex color format '{hex}'. Expected AARRGGBB or RRGGBB"
            ),
        };

        let channel = |digits: &str, name: &str| {
            u8::from_str_radix(digits, 16)
                .with_context(|| format!("Invalid {name} channel in hex color '{hex}'"))
        };

        Ok(Self::new(
            channel(alpha, "alpha")?,
            channel(&rgb[0..2], "red")?,
            channel(&rgb[2..4], "green")?,
            channel(&rgb[4..6], "blue")?,
        ))
    }

    /// Formats the color as `#AARRGGBB` (uppercase).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

impl fmt::Display for ArgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for ArgbColor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::from_hex(&value).map_err(|e| format!("{e:#}"))
    }
}

impl From<ArgbColor> for String {
    fn from(color: ArgbColor) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_valid() {
        assert_eq!(
            ArgbColor::from_hex("#80FF0000").unwrap(),
            ArgbColor::new(128, 255, 0, 0)
        );
        assert_eq!(
            ArgbColor::from_hex("ff0000").unwrap(),
            ArgbColor::opaque(255, 0, 0)
        );
        assert_eq!(
            ArgbColor::from_hex("  #000000  ").unwrap(),
            ArgbColor::BLACK
        );
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(ArgbColor::from_hex("").is_err());
        assert!(ArgbColor::from_hex("#FFF").is_err());
        assert!(ArgbColor::from_hex("#GG0000").is_err());
        assert!(ArgbColor::from_hex("#12345").is_err());
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(ArgbColor::new(200, 240, 240, 240).to_hex(), "#C8F0F0F0");
        assert_eq!(ArgbColor::opaque(0, 128, 255).to_string(), "#FF0080FF");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&ArgbColor::opaque(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#FF010203\"");

        let parsed: ArgbColor = serde_json::from_str("\"#10203040\"").unwrap();
        assert_eq!(parsed, ArgbColor::new(0x10, 0x20, 0x30, 0x40));

        assert!(serde_json::from_str::<ArgbColor>("\"nope\"").is_err());
    }
}
