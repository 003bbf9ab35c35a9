//! The `Color` value type and its perceptual representation
//!
//! The perceptual form is CIE L\*a\*b\* under D65, the white point sRGB is
//! defined with, with no chromatic adaptation. Tools that adapt to a D50 Lab
//! first can rank close saturated colors slightly differently.

use std::fmt;
use std::str::FromStr;

use palette::white_point::D65;
use palette::{FromColor, Lab, LinSrgb, Srgb};
use serde::{Deserialize, Serialize};

use crate::{ChromalineError, Result};

/// An opaque 8-bit sRGB color.
///
/// Two colors are equal iff their hex representations match. The perceptual
/// form is derived on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse a hex color triplet: `#rrggbb` or the short `#rgb` form.
    ///
    /// Case-insensitive. Anything else, including named colors and hex with an
    /// alpha channel, fails with `InvalidColorFormat`.
    pub fn parse(value: &str) -> Result<Self> {
        let well_formed = value
            .strip_prefix('#')
            .map(|digits| {
                matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
            })
            .unwrap_or(false);

        if !well_formed {
            return Err(ChromalineError::InvalidColorFormat(format!(
                "'{}' is not a #rrggbb or #rgb hex color",
                value
            )));
        }

        Self::parse_css(value)
    }

    /// Parse any CSS color: named colors ("coral"), hex, `rgb()`, `hsl()`, ...
    ///
    /// Alpha is dropped.
    pub fn parse_css(value: &str) -> Result<Self> {
        let parsed = csscolorparser::parse(value).map_err(|e| {
            ChromalineError::InvalidColorFormat(format!("'{}': {}", value, e))
        })?;

        Ok(Self::from_rgb(
            to_channel(parsed.r as f64),
            to_channel(parsed.g as f64),
            to_channel(parsed.b as f64),
        ))
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    /// CIE L\*a\*b\* coordinates under the D65 white point, unadapted.
    pub fn to_perceptual(&self) -> Lab<D65, f64> {
        Lab::from_color(self.to_linear())
    }

    pub(crate) fn to_linear(self) -> LinSrgb<f64> {
        Srgb::new(
            self.red as f64 / 255.0,
            self.green as f64 / 255.0,
            self.blue as f64 / 255.0,
        )
        .into_linear()
    }

    /// Quantize a linear-light color back to 8-bit sRGB, clamping out-of-gamut
    /// channels.
    pub(crate) fn from_linear(linear: LinSrgb<f64>) -> Self {
        let encoded: Srgb<f64> = Srgb::from_linear(linear);
        Self::from_rgb(
            to_channel(encoded.red),
            to_channel(encoded.green),
            to_channel(encoded.blue),
        )
    }
}

fn to_channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Perceptual difference between two colors: ΔE\*ab (CIE 1976), the Euclidean
/// distance between their L\*a\*b\* coordinates.
pub fn distance(a: Color, b: Color) -> f64 {
    delta_e(&a.to_perceptual(), &b.to_perceptual())
}

/// ΔE\*ab between two points already converted to L\*a\*b\*.
pub(crate) fn delta_e(x: &Lab<D65, f64>, y: &Lab<D65, f64>) -> f64 {
    ((x.l - y.l).powi(2) + (x.a - y.a).powi(2) + (x.b - y.b).powi(2)).sqrt()
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ChromalineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = ChromalineError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}
