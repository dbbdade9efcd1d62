//! The particle field: drifting points joined by proximity lines, pushed
//! around by the pointer and by click ripples.

use gambits_core::{FieldConfig, Viewport};
use glam::Vec2;
use rand::rngs::StdRng;

use crate::particle::Particle;
use crate::pointer::{Pointer, repulsion};
use crate::ripple::{self, Ripple};
use crate::surface::Surface;

/// Opacity of a connection line between particles `distance` apart.
///
/// Fades linearly from `max_alpha` for coincident particles to nothing at
/// `threshold`. Pairs at or beyond the threshold get no line.
pub fn connection_alpha(distance: f32, threshold: f32, max_alpha: f32) -> Option<f32> {
    if threshold <= 0.0 || distance >= threshold {
        return None;
    }
    Some(max_alpha * (1.0 - distance / threshold))
}

/// State of the particle field for one viewport.
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    viewport: Viewport,
    particles: Vec<Particle>,
    ripples: Vec<Ripple>,
    pointer: Pointer,
    rng: StdRng,
}

impl ParticleField {
    /// Build a field and populate it for `viewport`.
    pub fn new(config: FieldConfig, viewport: Viewport, rng: StdRng) -> Self {
        let mut field = Self {
            config: config.sanitized(),
            viewport,
            particles: Vec::new(),
            ripples: Vec::new(),
            pointer: Pointer::default(),
            rng,
        };
        field.populate();
        field
    }

    /// Replace the particle set to match a new viewport.
    ///
    /// Nothing survives a resize: particles are respawned from scratch and
    /// in-flight ripples are dropped.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.ripples.clear();
        self.populate();
    }

    fn populate(&mut self) {
        let count = self.config.particle_count(self.viewport);
        self.particles = (0..count)
            .map(|_| Particle::spawn(&mut self.rng, self.viewport, &self.config))
            .collect();
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer.move_to(position);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.leave();
    }

    /// Spawn a ripple at `position`. Returns `false` when ripples are off.
    pub fn pointer_pressed(&mut self, position: Vec2) -> bool {
        if !self.config.ripples_enabled {
            return false;
        }
        self.ripples.push(Ripple::new(position));
        true
    }

    pub fn set_ripples_enabled(&mut self, enabled: bool) {
        self.config.ripples_enabled = enabled;
        if !enabled {
            self.ripples.clear();
        }
    }

    /// Advance the simulation by one frame.
    pub fn update(&mut self) {
        let config = &self.config;

        ripple::advance_all(&mut self.ripples, config.ripple_growth, config.ripple_fade);

        for particle in &mut self.particles {
            particle.integrate();
            particle.apply_boundary(self.viewport, config.boundary, config.wrap_margin);

            particle.velocity += repulsion(
                particle.position,
                &self.pointer,
                config.interaction_radius,
                config.repulsion_strength,
            );

            for ripple in &self.ripples {
                particle.velocity += ripple.impulse(
                    particle.position,
                    config.ripple_thickness,
                    config.ripple_impulse,
                );
            }

            particle.regulate_speed(config, &mut self.rng);
        }
    }

    /// Draw the current state.
    ///
    /// Lines go down first so particle dots stay visible on top of them.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let palette = &self.config.palette;
        surface.clear(palette.background);

        let threshold = self.config.connection_distance;
        // Naive pairwise pass. Fine at the particle cap, quadratic beyond it.
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = a.position.distance(b.position);
                if let Some(alpha) = connection_alpha(distance, threshold, palette.line_alpha) {
                    surface.line(a.position, b.position, palette.line, alpha);
                }
            }
        }

        for ripple in &self.ripples {
            surface.ring(ripple.origin, ripple.radius, palette.accent, ripple.alpha);
        }

        for particle in &self.particles {
            surface.disc(
                particle.position,
                particle.radius,
                palette.particle,
                palette.particle_alpha,
            );
        }
    }

    /// Update then render: one animation frame.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.update();
        self.render(surface);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CountingSurface, Shape, ShapeBuffer};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;

    fn field(width: f32, height: f32, config: FieldConfig) -> ParticleField {
        ParticleField::new(
            config,
            Viewport::new(width, height).unwrap(),
            StdRng::seed_from_u64(42),
        )
    }

    fn still_particle(position: Vec2) -> Particle {
        Particle {
            position,
            velocity: Vec2::ZERO,
            radius: 2.0,
            base_speed: 0.0,
        }
    }

    #[test]
    fn test_reference_viewport_spawns_64() {
        let field = field(1200.0, 800.0, FieldConfig::default());
        assert_eq!(field.particles().len(), 64);
    }

    #[test]
    fn test_non_finite_ranges_do_not_panic() {
        let config = FieldConfig {
            speed_max: f32::INFINITY,
            radius_max: f32::INFINITY,
            ..Default::default()
        };
        let field = field(1200.0, 800.0, config);
        let defaults = FieldConfig::default();
        assert!(field.particles().iter().all(|p| {
            p.base_speed <= defaults.speed_max && p.radius <= defaults.radius_max
        }));
    }

    #[test]
    fn test_resize_recomputes_count() {
        let mut field = field(1200.0, 800.0, FieldConfig::default());
        field.pointer_pressed(Vec2::new(10.0, 10.0));

        let smaller = Viewport::new(600.0, 400.0).unwrap();
        field.resize(smaller);

        assert_eq!(field.viewport(), smaller);
        assert_eq!(field.particles().len(), 16);
        assert!(field.ripples().is_empty());
        assert!(field.particles().iter().all(|p| {
            (0.0..=smaller.width).contains(&p.position.x)
                && (0.0..=smaller.height).contains(&p.position.y)
        }));
    }

    #[test]
    fn test_connection_alpha() {
        assert_eq!(connection_alpha(150.0, 150.0, 0.5), None);
        assert_eq!(connection_alpha(200.0, 150.0, 0.5), None);
        assert_eq!(connection_alpha(0.0, 150.0, 0.5), Some(0.5));
        assert_eq!(connection_alpha(75.0, 150.0, 0.5), Some(0.25));
        assert_eq!(connection_alpha(1.0, 0.0, 0.5), None);
        let near = connection_alpha(1e-3, 150.0, 0.5).unwrap();
        assert!((near - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_lines_only_between_close_pairs() {
        let mut field = field(1000.0, 1000.0, FieldConfig::default());
        *field.particles_mut() = vec![
            still_particle(Vec2::new(100.0, 100.0)),
            still_particle(Vec2::new(200.0, 100.0)),
            still_particle(Vec2::new(700.0, 700.0)),
        ];

        let mut surface = ShapeBuffer::new();
        field.render(&mut surface);

        let lines: Vec<_> = surface
            .shapes()
            .iter()
            .filter_map(|shape| match shape {
                Shape::Line { from, to, alpha, .. } => Some((*from, *to, *alpha)),
                _ => None,
            })
            .collect();

        assert_eq!(lines.len(), 1);
        let (from, to, alpha) = lines[0];
        assert_eq!(from, Vec2::new(100.0, 100.0));
        assert_eq!(to, Vec2::new(200.0, 100.0));
        let expected = field.config().palette.line_alpha * (1.0 - 100.0 / 150.0);
        assert!((alpha - expected).abs() < 1e-5);
    }

    #[test]
    fn test_render_draws_every_particle() {
        let field = field(1200.0, 800.0, FieldConfig::default());
        let mut surface = CountingSurface::default();
        field.render(&mut surface);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.discs, 64);
    }

    #[test]
    fn test_parked_pointer_leaves_velocity_alone() {
        let config = FieldConfig {
            boundary: gambits_core::BoundaryPolicy::Bounce,
            ..Default::default()
        };
        let mut field = field(1000.0, 1000.0, config);
        let mut particle = still_particle(Vec2::new(10.0, 10.0));
        particle.velocity = Vec2::new(0.5, 0.0);
        particle.base_speed = 0.5;
        *field.particles_mut() = vec![particle];

        field.update();
        assert_eq!(field.particles()[0].velocity, Vec2::new(0.5, 0.0));
        assert_eq!(field.particles()[0].position, Vec2::new(10.5, 10.0));
    }

    #[test]
    fn test_pointer_pushes_particles_away() {
        let mut field = field(1000.0, 1000.0, FieldConfig::default());
        *field.particles_mut() = vec![still_particle(Vec2::new(500.0, 500.0))];
        field.pointer_moved(Vec2::new(450.0, 500.0));

        field.update();
        assert!(field.particles()[0].velocity.x > 0.0);
        assert_eq!(field.particles()[0].velocity.y, 0.0);
    }

    #[test]
    fn test_pointer_leave_stops_repulsion() {
        let mut field = field(1000.0, 1000.0, FieldConfig::default());
        *field.particles_mut() = vec![still_particle(Vec2::new(500.0, 500.0))];
        field.pointer_moved(Vec2::new(450.0, 500.0));
        field.pointer_left();

        field.update();
        assert_eq!(field.particles()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_particle_on_pointer_stays_finite() {
        let mut field = field(1000.0, 1000.0, FieldConfig::default());
        *field.particles_mut() = vec![still_particle(Vec2::new(500.0, 500.0))];
        field.pointer_moved(Vec2::new(500.0, 500.0));
        field.pointer_pressed(Vec2::new(500.0, 500.0));

        for _ in 0..5 {
            field.update();
        }
        let p = &field.particles()[0];
        assert!(p.position.is_finite());
        assert!(p.velocity.is_finite());
    }

    #[test]
    fn test_ripple_lifecycle() {
        let config = FieldConfig {
            ripple_fade: 0.25,
            ..Default::default()
        };
        let mut field = field(1000.0, 1000.0, config);
        assert!(field.pointer_pressed(Vec2::new(100.0, 100.0)));

        let mut alphas = Vec::new();
        for _ in 0..3 {
            field.update();
            alphas.push(field.ripples()[0].alpha);
        }
        assert_eq!(alphas, vec![0.75, 0.5, 0.25]);

        field.update();
        assert!(field.ripples().is_empty());

        let mut surface = CountingSurface::default();
        field.render(&mut surface);
        assert_eq!(surface.rings, 0);
    }

    #[test]
    fn test_ripple_pushes_particle_on_ring() {
        let mut field = field(1000.0, 1000.0, FieldConfig::default());
        // After one update the ring radius is ripple_growth (4px)
        *field.particles_mut() = vec![still_particle(Vec2::new(110.0, 100.0))];
        field.pointer_pressed(Vec2::new(100.0, 100.0));

        field.update();
        let p = &field.particles()[0];
        assert!(p.velocity.x > 0.0);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn test_ripples_disabled() {
        let config = FieldConfig {
            ripples_enabled: false,
            ..Default::default()
        };
        let mut field = field(1000.0, 1000.0, config);
        assert!(!field.pointer_pressed(Vec2::new(1.0, 1.0)));
        assert!(field.ripples().is_empty());

        field.set_ripples_enabled(true);
        assert!(field.pointer_pressed(Vec2::new(1.0, 1.0)));
        field.set_ripples_enabled(false);
        assert!(field.ripples().is_empty());
    }

    #[test]
    fn test_wrap_keeps_particles_near_field() {
        let mut field = field(300.0, 200.0, FieldConfig::default());
        for _ in 0..2_000 {
            field.update();
        }
        let margin = field.config().wrap_margin;
        for p in field.particles() {
            assert!(p.position.x >= -margin - 2.0 && p.position.x <= 300.0 + margin + 2.0);
            assert!(p.position.y >= -margin - 2.0 && p.position.y <= 200.0 + margin + 2.0);
        }
    }
}
