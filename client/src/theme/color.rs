use crate::common::errors::{ClientError, ClientResult};
use std::fmt;

/// Parses `#rrggbb` (leading `#` optional) into its byte components.
pub fn parse_hex_rgb(hex: &str) -> ClientResult<(u8, u8, u8)> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(ClientError::InvalidColor(hex.to_string()));
    }

    let component = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ClientError::InvalidColor(hex.to_string()))
    };

    Ok((component(0..2)?, component(2..4)?, component(4..6)?))
}

/// Colour in the `hue saturation% lightness%` form used by the style slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Degrees, 0-360
    pub hue: f64,
    /// Fraction, 0-1
    pub saturation: f64,
    /// Fraction, 0-1
    pub lightness: f64,
}

impl Hsl {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r = f64::from(r) / 255.0;
        let g = f64::from(g) / 255.0;
        let b = f64::from(b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;

        if max == min {
            return Self {
                hue: 0.0,
                saturation: 0.0,
                lightness,
            };
        }

        let d = max - min;
        let saturation = if lightness > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        // Channels are checked red, green, blue so ties resolve the same way every time.
        let hue = if max == r {
            ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
        } else if max == g {
            ((b - r) / d + 2.0) / 6.0
        } else {
            ((r - g) / d + 4.0) / 6.0
        };

        Self {
            hue: hue * 360.0,
            saturation,
            lightness,
        }
    }
}

impl fmt::Display for Hsl {
    // Every component is non-negative, so `round` (half away from zero) is half-up here.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}% {}%",
            self.hue.round() as i64,
            (self.saturation * 100.0).round() as i64,
            (self.lightness * 100.0).round() as i64
        )
    }
}

/// Converts a HEX colour to the `"h s% l%"` string written into style slots.
///
/// # Errors
///
/// Returns [`ClientError::InvalidColor`] unless the input is exactly six hex
/// digits with an optional leading `#`.
///
/// # Examples
///
/// ```
/// use client::theme::color::hex_to_hsl;
///
/// assert_eq!(hex_to_hsl("#ff0000").unwrap(), "0 100% 50%");
/// ```
pub fn hex_to_hsl(hex: &str) -> ClientResult<String> {
    let (r, g, b) = parse_hex_rgb(hex)?;
    Ok(Hsl::from_rgb(r, g, b).to_string())
}
