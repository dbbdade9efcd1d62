//! Colour conversion for terminal output.

use gambits_core::Rgb;
use ratatui::style::Color;

/// Convert a palette colour to a terminal colour.
pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Composite `fg` at opacity `alpha` over an opaque `bg`.
///
/// Terminals have no alpha channel, so translucency is baked in here.
pub fn blend(bg: Rgb, fg: Rgb, alpha: f32) -> Color {
    to_color(bg.mix(fg, alpha))
}
