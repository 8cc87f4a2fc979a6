//! Small collision and steering helpers shared by the entities.

use glam::Vec2;

/// Axis-aligned bounding box in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }

    /// Shrinks every side by `margin`; collapses to the centre if too small
    pub fn shrink(&self, margin: f32) -> Aabb {
        self.shrink_by(Vec2::splat(margin))
    }

    /// Clamps `center` so a box of `size` centred on it stays inside `self`
    pub fn clamp_center(&self, center: Vec2, size: Vec2) -> Vec2 {
        let inner = self.shrink_by(size * 0.5);
        center.clamp(inner.min, inner.max)
    }

    fn shrink_by(&self, half: Vec2) -> Aabb {
        let c = self.center();
        Aabb {
            min: (self.min + half).min(c),
            max: (self.max - half).max(c),
        }
    }
}

/// Angle in radians from `from` toward `to`, measured like `atan2(dy, dx)`
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Wraps an angle into `-PI..=PI`
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped < -PI { wrapped + TAU } else { wrapped }
}

pub fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Moves `current` toward `target` by `factor` per 60 Hz frame, scaled to `dt`
pub fn lerp_toward(current: Vec2, target: Vec2, factor: f32, dt: f32) -> Vec2 {
    let frames = dt * 60.0;
    let keep = (1.0 - factor).clamp(0.0, 1.0).powf(frames);
    target + (current - target) * keep
}

/// Quadratic ease-out, `t` in `0..=1`
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}
