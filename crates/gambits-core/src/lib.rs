//! Core types shared by the gambits crates.
//!
//! Everything here is plain data: field tuning, background style selection,
//! colours and the viewport geometry that maps terminal cells onto the
//! virtual pixel space the animations run in.

mod color;
mod config;
mod viewport;

pub use color::{Palette, ParseColorError, Rgb};
pub use config::{BackgroundConfig, BackgroundStyle, BoundaryPolicy, FieldConfig, GridConfig};
pub use viewport::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Viewport};
