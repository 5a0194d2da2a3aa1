//! Arcade physics for axis-aligned bodies
//!
//! Just enough of an arcade physics world for a top-down game: velocity
//! integration, linear drag, world-bounds clamping with bounce, AABB overlap
//! and one-sided separation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned physics body, positioned by its centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Full width/height of the hitbox
    pub size: Vec2,
    /// Linear deceleration per axis (px/s²), 0 = none
    pub drag: f32,
    /// Fraction of velocity kept when bouncing off the world edge
    pub bounce: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            drag: 0.0,
            bounce: 0.0,
        }
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn is_moving(&self) -> bool {
        self.vel != Vec2::ZERO
    }

    /// Advance position by velocity, apply drag, then keep inside `bounds`
    pub fn integrate(&mut self, dt: f32, bounds: (Vec2, Vec2)) {
        self.pos += self.vel * dt;

        if self.drag > 0.0 {
            let step = self.drag * dt;
            self.vel.x = approach_zero(self.vel.x, step);
            self.vel.y = approach_zero(self.vel.y, step);
        }

        self.clamp_to(bounds);
    }

    /// Keep the whole hitbox inside `bounds`, reflecting velocity by `bounce`
    pub fn clamp_to(&mut self, (min, max): (Vec2, Vec2)) {
        let half = self.half_size();
        let lo = min + half;
        let hi = max - half;

        if self.pos.x < lo.x {
            self.pos.x = lo.x;
            self.vel.x = -self.vel.x * self.bounce;
        } else if self.pos.x > hi.x {
            self.pos.x = hi.x;
            self.vel.x = -self.vel.x * self.bounce;
        }

        if self.pos.y < lo.y {
            self.pos.y = lo.y;
            self.vel.y = -self.vel.y * self.bounce;
        } else if self.pos.y > hi.y {
            self.pos.y = hi.y;
            self.vel.y = -self.vel.y * self.bounce;
        }
    }
}

fn approach_zero(v: f32, step: f32) -> f32 {
    if v > 0.0 {
        (v - step).max(0.0)
    } else {
        (v + step).min(0.0)
    }
}

/// AABB overlap test between two centred boxes
pub fn overlaps(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    let d = (a_pos - b_pos).abs();
    let reach = (a_size + b_size) * 0.5;
    d.x < reach.x && d.y < reach.y
}

/// Push `movable` out of `fixed` along the axis of least penetration.
///
/// Returns `true` if the bodies were overlapping.
pub fn separate(fixed: &Body, movable: &mut Body) -> bool {
    let delta = movable.pos - fixed.pos;
    let reach = (fixed.size + movable.size) * 0.5;
    let pen = reach - delta.abs();
    if pen.x <= 0.0 || pen.y <= 0.0 {
        return false;
    }

    if pen.x < pen.y {
        let dir = if delta.x >= 0.0 { 1.0 } else { -1.0 };
        movable.pos.x += pen.x * dir;
        if movable.vel.x * dir < 0.0 {
            movable.vel.x = 0.0;
        }
    } else {
        let dir = if delta.y >= 0.0 { 1.0 } else { -1.0 };
        movable.pos.y += pen.y * dir;
        if movable.vel.y * dir < 0.0 {
            movable.vel.y = 0.0;
        }
    }
    true
}

/// Velocity that moves `from` straight at `to` with the given speed
pub fn velocity_toward(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).normalize_or_zero() * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> (Vec2, Vec2) {
        (Vec2::ZERO, Vec2::new(100.0, 100.0))
    }

    #[test]
    fn test_integrate_moves_body() {
        let mut body = Body::new(Vec2::new(50.0, 50.0), Vec2::splat(10.0));
        body.vel = Vec2::new(10.0, -20.0);
        body.integrate(0.5, bounds());
        assert_eq!(body.pos, Vec2::new(55.0, 40.0));
    }

    #[test]
    fn test_drag_stops_at_zero() {
        let mut body = Body::new(Vec2::new(50.0, 50.0), Vec2::splat(10.0)).with_drag(50.0);
        body.vel = Vec2::new(10.0, -10.0);
        body.integrate(1.0, bounds());
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_world_bounds_bounce() {
        let mut body = Body::new(Vec2::new(97.0, 50.0), Vec2::splat(10.0)).with_bounce(0.5);
        body.vel = Vec2::new(40.0, 0.0);
        body.integrate(0.1, bounds());
        assert_eq!(body.pos.x, 95.0);
        assert!((body.vel.x + 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_world_bounds_without_bounce_stops() {
        let mut body = Body::new(Vec2::new(6.0, 6.0), Vec2::splat(10.0));
        body.vel = Vec2::new(-100.0, -100.0);
        body.integrate(0.1, bounds());
        assert_eq!(body.pos, Vec2::new(5.0, 5.0));
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_overlaps() {
        let s = Vec2::splat(10.0);
        assert!(overlaps(Vec2::ZERO, s, Vec2::new(9.0, 0.0), s));
        assert!(!overlaps(Vec2::ZERO, s, Vec2::new(10.0, 0.0), s));
        assert!(!overlaps(Vec2::ZERO, s, Vec2::new(5.0, 12.0), s));
    }

    #[test]
    fn test_separate_pushes_out() {
        let fixed = Body::new(Vec2::ZERO, Vec2::splat(10.0));
        let mut other = Body::new(Vec2::new(8.0, 1.0), Vec2::splat(10.0));
        other.vel = Vec2::new(-5.0, 0.0);
        assert!(separate(&fixed, &mut other));
        assert_eq!(other.pos.x, 10.0);
        assert_eq!(other.vel.x, 0.0);
        assert!(!overlaps(fixed.pos, fixed.size, other.pos, other.size));
    }

    #[test]
    fn test_velocity_toward() {
        let v = velocity_toward(Vec2::ZERO, Vec2::new(3.0, 4.0), 80.0);
        assert!((v - Vec2::new(48.0, 64.0)).length() < 1e-4);
        assert_eq!(velocity_toward(Vec2::ONE, Vec2::ONE, 80.0), Vec2::ZERO);
    }
}
