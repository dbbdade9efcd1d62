//! Tuning for the background animations.

use serde::{Deserialize, Serialize};

use crate::{Palette, Viewport};

/// Background style shown behind the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundStyle {
    /// Drifting particles joined by proximity lines.
    #[default]
    Particles,
    /// A checkerboard lattice that warps toward the pointer.
    GridWarp,
    /// No background at all.
    None,
}

impl BackgroundStyle {
    /// Cycle to the next background style.
    pub fn next(self) -> Self {
        match self {
            BackgroundStyle::Particles => BackgroundStyle::GridWarp,
            BackgroundStyle::GridWarp => BackgroundStyle::None,
            BackgroundStyle::None => BackgroundStyle::Particles,
        }
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            BackgroundStyle::Particles => "particles",
            BackgroundStyle::GridWarp => "grid warp",
            BackgroundStyle::None => "none",
        }
    }
}

/// Which background to mount and how fast to run it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub style: BackgroundStyle,
    /// Animation frames per second.
    pub target_fps: u32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            style: BackgroundStyle::Particles,
            target_fps: 60,
        }
    }
}

/// What happens to a particle that leaves the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// Reappear at the opposite edge once past the wrap margin.
    #[default]
    Wrap,
    /// Reflect the velocity component and stay inside the field.
    Bounce,
}

/// Particle field tuning. All distances are virtual pixels, all speeds are
/// pixels per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Viewport area per particle.
    pub density_divisor: f32,
    /// Upper bound on the particle count.
    pub max_particles: usize,
    /// Pointer repulsion reaches this far.
    pub interaction_radius: f32,
    /// Velocity added per frame by the pointer at zero distance.
    pub repulsion_strength: f32,
    /// Pairs closer than this are joined by a line.
    pub connection_distance: f32,
    /// Per-frame velocity multiplier.
    pub damping: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Fraction of the base speed a particle may lose before it is nudged
    /// back up.
    pub speed_tolerance: f32,
    /// Share of the missing speed restored per frame.
    pub speed_recovery: f32,
    pub boundary: BoundaryPolicy,
    /// Distance past the edge before a wrapping particle reappears.
    pub wrap_margin: f32,
    pub ripples_enabled: bool,
    /// Ripple radius growth per frame.
    pub ripple_growth: f32,
    /// Ripple alpha loss per frame.
    pub ripple_fade: f32,
    /// Half-width of the band around a ripple ring that pushes particles.
    pub ripple_thickness: f32,
    /// Outward velocity added by a fresh ripple; scales with its alpha.
    pub ripple_impulse: f32,
    pub palette: Palette,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density_divisor: 15_000.0,
            max_particles: 100,
            interaction_radius: 200.0,
            repulsion_strength: 0.6,
            connection_distance: 150.0,
            damping: 0.98,
            speed_min: 0.3,
            speed_max: 0.9,
            radius_min: 1.0,
            radius_max: 3.0,
            speed_tolerance: 0.5,
            speed_recovery: 0.05,
            boundary: BoundaryPolicy::Wrap,
            wrap_margin: 10.0,
            ripples_enabled: true,
            ripple_growth: 4.0,
            ripple_fade: 0.015,
            ripple_thickness: 24.0,
            ripple_impulse: 1.5,
            palette: Palette::default(),
        }
    }
}

impl FieldConfig {
    /// Number of particles for a viewport: one per `density_divisor` pixels
    /// of area, never fewer than one and never more than `max_particles`.
    pub fn particle_count(&self, viewport: Viewport) -> usize {
        let max = self.max_particles.max(1);
        if self.density_divisor <= 0.0 || !self.density_divisor.is_finite() {
            return max;
        }
        let raw = (viewport.area() / self.density_divisor).floor();
        // Float-to-int casts saturate, so a huge area cannot overflow.
        (raw as usize).clamp(1, max)
    }

    /// Repair values that would break the simulation, such as inverted
    /// ranges or a damping factor that amplifies speed.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (value, default) in [
            (&mut self.density_divisor, defaults.density_divisor),
            (&mut self.interaction_radius, defaults.interaction_radius),
            (&mut self.repulsion_strength, defaults.repulsion_strength),
            (&mut self.connection_distance, defaults.connection_distance),
            (&mut self.damping, defaults.damping),
            (&mut self.speed_min, defaults.speed_min),
            (&mut self.speed_max, defaults.speed_max),
            (&mut self.radius_min, defaults.radius_min),
            (&mut self.radius_max, defaults.radius_max),
            (&mut self.speed_tolerance, defaults.speed_tolerance),
            (&mut self.speed_recovery, defaults.speed_recovery),
            (&mut self.wrap_margin, defaults.wrap_margin),
            (&mut self.ripple_growth, defaults.ripple_growth),
            (&mut self.ripple_fade, defaults.ripple_fade),
            (&mut self.ripple_thickness, defaults.ripple_thickness),
            (&mut self.ripple_impulse, defaults.ripple_impulse),
        ] {
            finite_or(value, default);
        }

        if self.speed_min > self.speed_max {
            std::mem::swap(&mut self.speed_min, &mut self.speed_max);
        }
        if self.radius_min > self.radius_max {
            std::mem::swap(&mut self.radius_min, &mut self.radius_max);
        }
        self.speed_min = self.speed_min.max(0.0);
        self.radius_min = self.radius_min.max(0.1);
        self.radius_max = self.radius_max.max(self.radius_min);
        self.damping = self.damping.clamp(0.0, 1.0);
        self.speed_tolerance = self.speed_tolerance.clamp(0.0, 1.0);
        self.speed_recovery = self.speed_recovery.clamp(0.0, 1.0);
        self.max_particles = self.max_particles.max(1);
        self.ripple_fade = self.ripple_fade.max(f32::EPSILON);
        self.interaction_radius = self.interaction_radius.max(0.0);
        self.connection_distance = self.connection_distance.max(0.0);
        self
    }
}

/// Grid-warp tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Lattice spacing.
    pub spacing: f32,
    /// Points whose base lies within this distance of the pointer are pulled.
    pub pull_radius: f32,
    /// Maximum displacement toward the pointer.
    pub pull_strength: f32,
    /// Fraction of the offset recovered per frame when released.
    pub spring: f32,
    /// Cells within this distance of the pointer glow.
    pub glow_radius: f32,
    /// Glow opacity at the pointer.
    pub glow_alpha: f32,
}

impl GridConfig {
    /// Smallest lattice spacing; anything finer means millions of points.
    pub const MIN_SPACING: f32 = 10.0;

    /// Repair values that would stall or destabilise the lattice.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (value, default) in [
            (&mut self.spacing, defaults.spacing),
            (&mut self.pull_radius, defaults.pull_radius),
            (&mut self.pull_strength, defaults.pull_strength),
            (&mut self.spring, defaults.spring),
            (&mut self.glow_radius, defaults.glow_radius),
            (&mut self.glow_alpha, defaults.glow_alpha),
        ] {
            finite_or(value, default);
        }
        self.spacing = self.spacing.max(Self::MIN_SPACING);
        self.spring = self.spring.clamp(0.0, 1.0);
        self.pull_radius = self.pull_radius.max(0.0);
        self.glow_radius = self.glow_radius.max(0.0);
        self.glow_alpha = self.glow_alpha.clamp(0.0, 1.0);
        self
    }
}

/// Replace NaN or infinite values, which TOML happily accepts.
fn finite_or(value: &mut f32, default: f32) {
    if !value.is_finite() {
        *value = default;
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: 50.0,
            pull_radius: 300.0,
            pull_strength: 40.0,
            spring: 0.05,
            glow_radius: 250.0,
            glow_alpha: 0.15,
        }
    }
}
