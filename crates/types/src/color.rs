//! Foundational color type used throughout led-clock.
//!
//! Colors are stored as clamped 8-bit RGB triplets. Hosts that exchange
//! colors as a single integer use the packed form, where the low byte is
//! red, the next byte green and the third byte blue (`R | G<<8 | B<<16`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color with 8-bit channels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Error returned when a color string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid color '{}': expected #rrggbb, 0x<packed> or a decimal packed value",
            self.0
        )
    }
}

impl std::error::Error for ParseColorError {}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const LIME: Color = Color::new(0, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from unbounded channel values, clamping each to 0..=255
    pub fn from_rgb_clamped(r: i32, g: i32, b: i32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Decode a packed host color (low byte red). The top byte is ignored.
    pub fn from_packed(value: i32) -> Self {
        Self {
            r: (value & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: ((value >> 16) & 0xFF) as u8,
        }
    }

    /// Encode as a packed host color (low byte red)
    pub fn to_packed(&self) -> i32 {
        self.r as i32 | (self.g as i32) << 8 | (self.b as i32) << 16
    }

    /// Channels as floats in 0.0..=1.0 plus the given alpha
    pub fn to_cairo_rgba(&self, alpha: f64) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            alpha,
        )
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb`, a `0x` packed value or a decimal packed value
    pub fn parse(input: &str) -> Result<Self, ParseColorError> {
        let s = input.trim();
        let err = || ParseColorError(input.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(err());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            return Ok(Self::new(channel(0)?, channel(2)?, channel(4)?));
        }

        if let Some(packed) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let value = u32::from_str_radix(packed, 16).map_err(|_| err())?;
            return Ok(Self::from_packed(value as i32));
        }

        s.parse::<i32>().map(Self::from_packed).map_err(|_| err())
    }

    /// Convert to GTK RGBA
    #[cfg(feature = "gtk")]
    pub fn to_gdk_rgba(&self) -> gdk4::RGBA {
        let (r, g, b, a) = self.to_cairo_rgba(1.0);
        gdk4::RGBA::new(r as f32, g as f32, b as f32, a as f32)
    }

    /// Create from GTK RGBA, dropping alpha
    #[cfg(feature = "gtk")]
    pub fn from_gdk_rgba(rgba: &gdk4::RGBA) -> Self {
        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(to_byte(rgba.red()), to_byte(rgba.green()), to_byte(rgba.blue()))
    }

    /// Apply to Cairo context with the given alpha
    #[cfg(feature = "gtk")]
    pub fn apply_to_cairo(&self, cr: &cairo::Context, alpha: f64) {
        let (r, g, b, a) = self.to_cairo_rgba(alpha);
        cr.set_source_rgba(r, g, b, a);
    }
}

fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}
