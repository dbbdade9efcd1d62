//! Viewport geometry in virtual pixels.

use glam::Vec2;

/// Width of one terminal cell in virtual pixels.
pub const CELL_WIDTH_PX: f32 = 10.0;

/// Height of one terminal cell in virtual pixels.
///
/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_HEIGHT_PX: f32 = 20.0;

/// The drawable area, measured in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Create a viewport from pixel dimensions.
    ///
    /// Returns `None` for an empty or non-finite area, which callers treat as
    /// "no rendering context".
    pub fn new(width: f32, height: f32) -> Option<Self> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Some(Self { width, height })
        } else {
            None
        }
    }

    /// Create a viewport covering `cols × rows` terminal cells.
    pub fn from_cells(cols: u16, rows: u16) -> Option<Self> {
        Self::new(cols as f32 * CELL_WIDTH_PX, rows as f32 * CELL_HEIGHT_PX)
    }

    /// Pixel area of the viewport.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Map a terminal cell to the pixel at its centre.
    pub fn cell_center(col: u16, row: u16) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * CELL_WIDTH_PX,
            (row as f32 + 0.5) * CELL_HEIGHT_PX,
        )
    }
}
