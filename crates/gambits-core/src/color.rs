//! Colours and the field palette.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque RGB colour, written as `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Error returned when a colour string is not `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour {0:?}, expected #rrggbb")]
pub struct ParseColorError(String);

impl Rgb {
    /// Linear blend from `self` toward `other` by `t` (0.0 = self, 1.0 = other).
    pub fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(
            lerp(self.0, other.0),
            lerp(self.1, other.1),
            lerp(self.2, other.2),
        )
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Colours and opacities used to draw the background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Page background; translucent shapes are blended against it.
    pub background: Rgb,
    /// Particle disc colour.
    pub particle: Rgb,
    /// Connection line colour.
    pub line: Rgb,
    /// Accent used for ripples and the grid glow.
    pub accent: Rgb,
    /// Grid line colour for the grid-warp style.
    pub grid: Rgb,
    /// Opacity of particle discs.
    pub particle_alpha: f32,
    /// Opacity of a connection line between two coincident particles.
    pub line_alpha: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb(10, 10, 10),
            particle: Rgb(229, 229, 229),
            line: Rgb(220, 38, 38),
            accent: Rgb(220, 38, 38),
            grid: Rgb(30, 30, 30),
            particle_alpha: 0.7,
            line_alpha: 0.5,
        }
    }
}
