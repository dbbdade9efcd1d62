//! Grid warp: a checkerboard lattice that bends toward the pointer like a
//! gravity well and springs back once released.

use gambits_core::{GridConfig, Palette, Viewport};
use glam::Vec2;

use crate::pointer::Pointer;
use crate::surface::Surface;

/// One lattice vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPoint {
    /// Rest position.
    pub base: Vec2,
    /// Current, possibly displaced, position.
    pub position: Vec2,
}

impl GridPoint {
    fn at(base: Vec2) -> Self {
        Self {
            base,
            position: base,
        }
    }
}

/// Lattice state for one viewport.
#[derive(Debug)]
pub struct GridField {
    config: GridConfig,
    palette: Palette,
    viewport: Viewport,
    cols: usize,
    rows: usize,
    /// Column-major: point `(i, j)` lives at `i * rows + j`.
    points: Vec<GridPoint>,
    pointer: Pointer,
}

impl GridField {
    pub fn new(config: GridConfig, palette: Palette, viewport: Viewport) -> Self {
        let mut grid = Self {
            config: config.sanitized(),
            palette,
            viewport,
            cols: 0,
            rows: 0,
            points: Vec::new(),
            pointer: Pointer::default(),
        };
        grid.build();
        grid
    }

    /// Rebuild the lattice for a new viewport.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.build();
    }

    /// Lay out a lattice one spacing larger than the viewport on each axis,
    /// centred so the overhang is split evenly.
    fn build(&mut self) {
        let spacing = self.config.spacing;
        self.cols = (self.viewport.width / spacing).floor() as usize + 2;
        self.rows = (self.viewport.height / spacing).floor() as usize + 2;

        let offset = Vec2::new(
            (self.viewport.width - (self.cols - 1) as f32 * spacing) / 2.0,
            (self.viewport.height - (self.rows - 1) as f32 * spacing) / 2.0,
        );

        self.points = (0..self.cols)
            .flat_map(|i| {
                (0..self.rows)
                    .map(move |j| GridPoint::at(offset + Vec2::new(i as f32, j as f32) * spacing))
            })
            .collect();
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer.move_to(position);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.leave();
    }

    /// Advance one frame: pull points near the pointer, relax the rest.
    pub fn update(&mut self) {
        let config = &self.config;
        for point in &mut self.points {
            match pull_offset(point.base, &self.pointer, config) {
                Some(offset) => point.position = point.base + offset,
                None => point.position += (point.base - point.position) * config.spring,
            }
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let palette = &self.palette;
        surface.clear(palette.background);

        let dark = palette.background.mix(palette.grid, 0.25);
        let light = palette.background.mix(palette.grid, 0.5);

        for i in 0..self.cols.saturating_sub(1) {
            for j in 0..self.rows.saturating_sub(1) {
                let corners = [
                    self.point(i, j).position,
                    self.point(i + 1, j).position,
                    self.point(i + 1, j + 1).position,
                    self.point(i, j + 1).position,
                ];
                let min = corners.iter().fold(Vec2::MAX, |acc, c| acc.min(*c));
                let max = corners.iter().fold(Vec2::MIN, |acc, c| acc.max(*c));

                let shade = if (i + j) % 2 == 0 { dark } else { light };
                surface.fill(min, max, shade, 1.0);

                let center = corners.iter().copied().sum::<Vec2>() / 4.0;
                if let Some(alpha) = glow_alpha(center, &self.pointer, &self.config) {
                    surface.fill(min, max, palette.accent, alpha);
                }
            }
        }

        for i in 0..self.cols {
            for j in 0..self.rows {
                let here = self.point(i, j).position;
                if i + 1 < self.cols {
                    surface.line(here, self.point(i + 1, j).position, palette.grid, 1.0);
                }
                if j + 1 < self.rows {
                    surface.line(here, self.point(i, j + 1).position, palette.grid, 1.0);
                }
            }
        }
    }

    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.update();
        self.render(surface);
    }

    fn point(&self, i: usize, j: usize) -> &GridPoint {
        &self.points[i * self.rows + j]
    }

    /// Lattice dimensions as `(cols, rows)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Displacement toward the pointer for a point resting at `base`, or `None`
/// when the point is out of reach and should relax instead.
fn pull_offset(base: Vec2, pointer: &Pointer, config: &GridConfig) -> Option<Vec2> {
    if !pointer.is_active() || config.pull_radius <= 0.0 {
        return None;
    }
    let to_pointer = pointer.position() - base;
    let distance = to_pointer.length();
    if distance >= config.pull_radius {
        return None;
    }
    let force = ((config.pull_radius - distance) / config.pull_radius).powi(2);
    Some(to_pointer.normalize_or_zero() * force * config.pull_strength)
}

/// Accent overlay opacity for a cell centred at `center`.
fn glow_alpha(center: Vec2, pointer: &Pointer, config: &GridConfig) -> Option<f32> {
    if !pointer.is_active() || config.glow_radius <= 0.0 {
        return None;
    }
    let distance = center.distance(pointer.position());
    if distance >= config.glow_radius {
        return None;
    }
    Some(((config.glow_radius - distance) / config.glow_radius).powi(2) * config.glow_alpha)
}
