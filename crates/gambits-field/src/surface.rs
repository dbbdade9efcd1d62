//! Drawing surfaces.
//!
//! Animations draw through the [`Surface`] trait in virtual pixel
//! coordinates. [`ShapeBuffer`] records the calls so the last frame can be
//! painted onto a ratatui buffer as often as the terminal redraws, using a
//! braille canvas for lines and dots and cell backgrounds for fills.

use std::ops::Range;

use gambits_core::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Rgb, Viewport};
use glam::Vec2;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
    },
};

use crate::color::{blend, to_color};

/// Sink for the draw calls of one frame.
pub trait Surface {
    /// Start a new frame on a solid background.
    fn clear(&mut self, background: Rgb);
    /// Filled disc.
    fn disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);
    /// Straight line segment.
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32);
    /// Circle outline.
    fn ring(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);
    /// Axis-aligned filled rectangle from `min` (inclusive) to `max`.
    fn fill(&mut self, min: Vec2, max: Vec2, color: Rgb, alpha: f32);
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Disc {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgb,
        alpha: f32,
    },
    Ring {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    Fill {
        min: Vec2,
        max: Vec2,
        color: Rgb,
        alpha: f32,
    },
}

/// Records one frame of shapes and renders them as a ratatui widget.
#[derive(Debug, Default, Clone)]
pub struct ShapeBuffer {
    /// `None` until the first clear; a blank buffer renders nothing.
    background: Option<Rgb>,
    shapes: Vec<Shape>,
}

impl ShapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes recorded since the last clear.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Forget the recorded frame entirely.
    pub fn reset(&mut self) {
        self.background = None;
        self.shapes.clear();
    }
}

impl Surface for ShapeBuffer {
    fn clear(&mut self, background: Rgb) {
        self.background = Some(background);
        self.shapes.clear();
    }

    fn disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.shapes.push(Shape::Disc {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32) {
        self.shapes.push(Shape::Line {
            from,
            to,
            color,
            alpha,
        });
    }

    fn ring(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.shapes.push(Shape::Ring {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn fill(&mut self, min: Vec2, max: Vec2, color: Rgb, alpha: f32) {
        self.shapes.push(Shape::Fill {
            min,
            max,
            color,
            alpha,
        });
    }
}

impl Widget for &ShapeBuffer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(background) = self.background else {
            return;
        };
        let Some(viewport) = Viewport::from_cells(area.width, area.height) else {
            return;
        };

        let cell_backgrounds = self.composite_fills(area, background);

        // Canvas y grows upward; the field's y grows downward.
        let height = viewport.height as f64;
        let flip = |p: Vec2| (p.x as f64, height - p.y as f64);

        Canvas::default()
            .marker(Marker::Braille)
            .background_color(to_color(background))
            .x_bounds([0.0, viewport.width as f64])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for shape in &self.shapes {
                    match *shape {
                        Shape::Disc {
                            center,
                            color,
                            alpha,
                            ..
                        } => {
                            // Discs are smaller than a braille dot.
                            let coords = [flip(center)];
                            ctx.draw(&Points {
                                coords: &coords,
                                color: blend(background, color, alpha),
                            });
                        }
                        Shape::Line {
                            from,
                            to,
                            color,
                            alpha,
                        } => {
                            let (x1, y1) = flip(from);
                            let (x2, y2) = flip(to);
                            ctx.draw(&CanvasLine::new(
                                x1,
                                y1,
                                x2,
                                y2,
                                blend(background, color, alpha),
                            ));
                        }
                        Shape::Ring {
                            center,
                            radius,
                            color,
                            alpha,
                        } => {
                            let (x, y) = flip(center);
                            ctx.draw(&Circle {
                                x,
                                y,
                                radius: radius as f64,
                                color: blend(background, color, alpha),
                            });
                        }
                        Shape::Fill { .. } => {}
                    }
                }
            })
            .render(area, buf);

        for row in 0..area.height {
            for col in 0..area.width {
                let rgb = cell_backgrounds[row as usize * area.width as usize + col as usize];
                if rgb == background {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_bg(to_color(rgb));
                }
            }
        }
    }
}

impl ShapeBuffer {
    /// Blend every fill, in draw order, into a per-cell background colour.
    /// A fill covers the cells whose centres fall inside it.
    fn composite_fills(&self, area: Rect, background: Rgb) -> Vec<Rgb> {
        let mut cells = vec![background; area.width as usize * area.height as usize];

        for shape in &self.shapes {
            let Shape::Fill {
                min,
                max,
                color,
                alpha,
            } = *shape
            else {
                continue;
            };

            for row in cell_span(min.y, max.y, CELL_HEIGHT_PX, area.height) {
                for col in cell_span(min.x, max.x, CELL_WIDTH_PX, area.width) {
                    let idx = row * area.width as usize + col;
                    cells[idx] = cells[idx].mix(color, alpha);
                }
            }
        }

        cells
    }
}

/// Indices of cells of size `cell` whose centres lie in `[min, max)`.
fn cell_span(min: f32, max: f32, cell: f32, count: u16) -> Range<usize> {
    let first = (min / cell - 0.5).ceil().max(0.0);
    let end = (max / cell - 0.5).ceil().clamp(0.0, count as f32);
    if first >= end {
        0..0
    } else {
        first as usize..end as usize
    }
}

/// Surface that only counts calls, for lifecycle tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct CountingSurface {
    pub clears: usize,
    pub discs: usize,
    pub lines: usize,
    pub rings: usize,
    pub fills: usize,
}

#[cfg(test)]
impl CountingSurface {
    pub fn total(&self) -> usize {
        self.clears + self.discs + self.lines + self.rings + self.fills
    }
}

#[cfg(test)]
impl Surface for CountingSurface {
    fn clear(&mut self, _background: Rgb) {
        self.clears += 1;
    }

    fn disc(&mut self, _center: Vec2, _radius: f32, _color: Rgb, _alpha: f32) {
        self.discs += 1;
    }

    fn line(&mut self, _from: Vec2, _to: Vec2, _color: Rgb, _alpha: f32) {
        self.lines += 1;
    }

    fn ring(&mut self, _center: Vec2, _radius: f32, _color: Rgb, _alpha: f32) {
        self.rings += 1;
    }

    fn fill(&mut self, _min: Vec2, _max: Vec2, _color: Rgb, _alpha: f32) {
        self.fills += 1;
    }
}
