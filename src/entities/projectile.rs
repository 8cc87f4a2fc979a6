use glam::Vec2;

use crate::geometry::Aabb;

pub const PROJECTILE_RADIUS: f32 = 0.8;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: u8,
    /// Seconds left before the projectile fizzles out
    pub lifetime: f32,
}

impl Projectile {
    pub fn new(position: Vec2, angle: f32, speed: f32, lifetime: f32, damage: u8) -> Self {
        Self {
            position,
            velocity: Vec2::from_angle(angle) * speed,
            damage,
            lifetime,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.lifetime = (self.lifetime - dt).max(0.0);
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    pub fn is_out_of_bounds(&self, world: &Aabb) -> bool {
        !world.contains(self.position)
    }

    pub fn radius(&self) -> f32 {
        PROJECTILE_RADIUS
    }
}
