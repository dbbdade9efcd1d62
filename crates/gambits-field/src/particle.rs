//! Particles: spawning, integration, boundaries and speed regulation.

use std::f32::consts::TAU;

use gambits_core::{BoundaryPolicy, FieldConfig, Viewport};
use glam::Vec2;
use rand::Rng;

/// A single drifting point.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position in virtual pixels.
    pub position: Vec2,
    /// Velocity in pixels per frame.
    pub velocity: Vec2,
    /// Disc radius.
    pub radius: f32,
    /// Cruising speed the particle relaxes back to.
    pub base_speed: f32,
}

impl Particle {
    /// Spawn a particle at a random position with a random heading.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, config: &FieldConfig) -> Self {
        let position = Vec2::new(
            rng.random_range(0.0..=viewport.width),
            rng.random_range(0.0..=viewport.height),
        );
        let base_speed = random_between(rng, config.speed_min, config.speed_max);
        let heading = Vec2::from_angle(rng.random_range(0.0..TAU));

        Self {
            position,
            velocity: heading * base_speed,
            radius: random_between(rng, config.radius_min, config.radius_max),
            base_speed,
        }
    }

    /// Advance the position by one frame of velocity.
    pub fn integrate(&mut self) {
        self.position += self.velocity;
    }

    /// Keep the particle in the field according to `policy`.
    pub fn apply_boundary(&mut self, viewport: Viewport, policy: BoundaryPolicy, margin: f32) {
        match policy {
            BoundaryPolicy::Wrap => {
                self.position.x = wrap_axis(self.position.x, viewport.width, margin);
                self.position.y = wrap_axis(self.position.y, viewport.height, margin);
            }
            BoundaryPolicy::Bounce => {
                bounce_axis(&mut self.position.x, &mut self.velocity.x, viewport.width);
                bounce_axis(&mut self.position.y, &mut self.velocity.y, viewport.height);
            }
        }
    }

    /// Bleed off speed gained from impulses and lift particles that have
    /// slowed below the tolerance band back toward their base speed.
    pub fn regulate_speed<R: Rng + ?Sized>(&mut self, config: &FieldConfig, rng: &mut R) {
        let speed = self.velocity.length();

        if speed > self.base_speed {
            // Damping never takes a particle below its cruising speed.
            let damped = (speed * config.damping).max(self.base_speed);
            self.velocity *= damped / speed;
            return;
        }

        let floor = self.base_speed * (1.0 - config.speed_tolerance);
        if speed >= floor {
            return;
        }

        let target = speed + (self.base_speed - speed) * config.speed_recovery;
        if speed > f32::EPSILON {
            self.velocity *= target / speed;
        } else {
            self.velocity = Vec2::from_angle(rng.random_range(0.0..TAU)) * target;
        }
    }
}

fn random_between<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.random_range(low..=high)
    } else {
        low
    }
}

fn wrap_axis(value: f32, extent: f32, margin: f32) -> f32 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

fn bounce_axis(position: &mut f32, velocity: &mut f32, extent: f32) {
    if *position < 0.0 {
        *position = 0.0;
        *velocity = velocity.abs();
    } else if *position > extent {
        *position = extent;
        *velocity = -velocity.abs();
    }
}
