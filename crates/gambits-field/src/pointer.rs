//! Pointer tracking and repulsion.

use glam::Vec2;

/// Where the pointer rests before the first move and after it leaves.
/// Far enough off-screen that nothing reacts to it.
pub const POINTER_SENTINEL: Vec2 = Vec2::new(-1000.0, -1000.0);

/// Last known pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    position: Vec2,
}

impl Default for Pointer {
    fn default() -> Self {
        Self {
            position: POINTER_SENTINEL,
        }
    }
}

impl Pointer {
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Whether the pointer is somewhere other than the sentinel.
    pub fn is_active(&self) -> bool {
        self.position != POINTER_SENTINEL
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Park the pointer at the sentinel.
    pub fn leave(&mut self) {
        self.position = POINTER_SENTINEL;
    }
}

/// Velocity delta pushing a particle at `particle` away from the pointer.
///
/// The push falls off linearly from `strength` at the pointer to zero at
/// `radius`. It is exactly zero for a parked pointer, for particles at or
/// beyond the radius, and for a particle sitting on the pointer, where no
/// direction exists.
pub fn repulsion(particle: Vec2, pointer: &Pointer, radius: f32, strength: f32) -> Vec2 {
    if !pointer.is_active() || radius <= 0.0 {
        return Vec2::ZERO;
    }

    let offset = particle - pointer.position;
    let distance = offset.length();
    if distance >= radius || distance <= f32::EPSILON {
        return Vec2::ZERO;
    }

    offset / distance * (1.0 - distance / radius) * strength
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_sentinel() {
        let pointer = Pointer::default();
        assert_eq!(pointer.position(), Vec2::new(-1000.0, -1000.0));
        assert!(!pointer.is_active());
    }

    #[test]
    fn test_sentinel_gives_no_repulsion() {
        let pointer = Pointer::default();
        let delta = repulsion(Vec2::new(10.0, 10.0), &pointer, 200.0, 1.0);
        assert_eq!(delta, Vec2::ZERO);
    }

    #[test]
    fn test_sentinel_gives_no_repulsion_even_with_huge_radius() {
        let pointer = Pointer::default();
        let delta = repulsion(Vec2::new(-990.0, -990.0), &pointer, 1.0e6, 1.0);
        assert_eq!(delta, Vec2::ZERO);
    }

    #[test]
    fn test_outside_radius_gives_no_repulsion() {
        let mut pointer = Pointer::default();
        pointer.move_to(Vec2::new(0.0, 0.0));
        assert_eq!(
            repulsion(Vec2::new(200.0, 0.0), &pointer, 200.0, 1.0),
            Vec2::ZERO
        );
        assert_eq!(
            repulsion(Vec2::new(300.0, 400.0), &pointer, 200.0, 1.0),
            Vec2::ZERO
        );
    }

    #[test]
    fn test_repulsion_points_away_and_scales() {
        let mut pointer = Pointer::default();
        pointer.move_to(Vec2::new(100.0, 100.0));

        let delta = repulsion(Vec2::new(150.0, 100.0), &pointer, 200.0, 2.0);
        // (1 - 50/200) * 2.0 = 1.5 along +x
        assert!((delta - Vec2::new(1.5, 0.0)).length() < 1e-5);

        let closer = repulsion(Vec2::new(100.0, 90.0), &pointer, 200.0, 2.0);
        assert!(closer.y < 0.0);
        assert!(closer.length() > delta.length());
    }

    #[test]
    fn test_zero_distance_is_finite() {
        let mut pointer = Pointer::default();
        pointer.move_to(Vec2::new(42.0, 42.0));
        let delta = repulsion(Vec2::new(42.0, 42.0), &pointer, 200.0, 1.0);
        assert_eq!(delta, Vec2::ZERO);
    }

    #[test]
    fn test_leave_parks_pointer() {
        let mut pointer = Pointer::default();
        pointer.move_to(Vec2::new(5.0, 5.0));
        assert!(pointer.is_active());
        pointer.leave();
        assert!(!pointer.is_active());
    }

    proptest! {
        #[test]
        fn repulsion_is_bounded_by_strength(
            px in -500.0f32..500.0,
            py in -500.0f32..500.0,
            radius in 1.0f32..400.0,
            strength in 0.0f32..5.0,
        ) {
            let mut pointer = Pointer::default();
            pointer.move_to(Vec2::ZERO);
            let particle = Vec2::new(px, py);
            let delta = repulsion(particle, &pointer, radius, strength);
            prop_assert!(delta.length() <= strength + 1e-4);
            if particle.length() >= radius {
                prop_assert_eq!(delta, Vec2::ZERO);
            } else {
                // Never pulls toward the pointer.
                prop_assert!(delta.dot(particle) >= 0.0);
            }
        }
    }
}
