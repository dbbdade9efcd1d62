//! Click ripples: expanding rings that shove particles outward.

use glam::Vec2;

/// A transient ring spawned by a pointer press.
#[derive(Debug, Clone, PartialEq)]
pub struct Ripple {
    pub origin: Vec2,
    /// Ring radius; grows every frame.
    pub radius: f32,
    /// Opacity; shrinks every frame. The ripple dies at zero.
    pub alpha: f32,
}

impl Ripple {
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            radius: 0.0,
            alpha: 1.0,
        }
    }

    /// Grow the ring and fade it by one frame.
    pub fn advance(&mut self, growth: f32, fade: f32) {
        self.radius += growth;
        self.alpha -= fade;
    }

    pub fn is_expired(&self) -> bool {
        self.alpha <= 0.0
    }

    /// Outward velocity delta for a particle at `particle`.
    ///
    /// Only particles within `thickness` of the ring are pushed, and the
    /// push weakens as the ripple fades.
    pub fn impulse(&self, particle: Vec2, thickness: f32, strength: f32) -> Vec2 {
        if self.is_expired() {
            return Vec2::ZERO;
        }

        let offset = particle - self.origin;
        let distance = offset.length();
        if distance <= f32::EPSILON || (distance - self.radius).abs() >= thickness {
            return Vec2::ZERO;
        }

        offset / distance * strength * self.alpha
    }
}

/// Advance every ripple one frame and drop the ones that faded out.
pub fn advance_all(ripples: &mut Vec<Ripple>, growth: f32, fade: f32) {
    for ripple in ripples.iter_mut() {
        ripple.advance(growth, fade);
    }
    ripples.retain(|ripple| !ripple.is_expired());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_strictly_decreases() {
        let mut ripple = Ripple::new(Vec2::ZERO);
        let mut last_alpha = ripple.alpha;
        let mut last_radius = ripple.radius;
        for _ in 0..10 {
            ripple.advance(4.0, 0.05);
            assert!(ripple.alpha < last_alpha);
            assert!(ripple.radius > last_radius);
            last_alpha = ripple.alpha;
            last_radius = ripple.radius;
        }
    }

    #[test]
    fn test_expired_ripples_are_removed() {
        let mut ripples = vec![Ripple::new(Vec2::ZERO), Ripple::new(Vec2::ONE)];
        ripples[1].alpha = 0.3;

        advance_all(&mut ripples, 4.0, 0.5);
        assert_eq!(ripples.len(), 1);
        assert_eq!(ripples[0].origin, Vec2::ZERO);

        advance_all(&mut ripples, 4.0, 0.5);
        assert!(ripples.is_empty());
    }

    #[test]
    fn test_impulse_only_on_ring() {
        let mut ripple = Ripple::new(Vec2::new(100.0, 100.0));
        ripple.radius = 50.0;
        ripple.alpha = 0.5;

        let on_ring = ripple.impulse(Vec2::new(150.0, 100.0), 10.0, 2.0);
        assert!((on_ring - Vec2::new(1.0, 0.0)).length() < 1e-5);

        let inside = ripple.impulse(Vec2::new(110.0, 100.0), 10.0, 2.0);
        assert_eq!(inside, Vec2::ZERO);

        let outside = ripple.impulse(Vec2::new(170.0, 100.0), 10.0, 2.0);
        assert_eq!(outside, Vec2::ZERO);
    }

    #[test]
    fn test_impulse_at_origin_is_zero() {
        let ripple = Ripple::new(Vec2::new(3.0, 4.0));
        // A fresh ripple has radius 0, so its origin is on the ring
        assert_eq!(ripple.impulse(Vec2::new(3.0, 4.0), 10.0, 2.0), Vec2::ZERO);
    }
}
