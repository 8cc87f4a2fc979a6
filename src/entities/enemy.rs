use glam::Vec2;
use rand::Rng;

use crate::config::EnemyConfig;
use crate::geometry::{Aabb, angle_between};

pub const ENEMY_RADIUS: f32 = 1.6;

/// How long an enemy shows the hit tint; further hits are ignored meanwhile
pub const HIT_FLASH_SECS: f32 = 0.2;

const IDLE_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyBehavior {
    Chasing,
    Wandering,
    Halted,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub hit_points: u8,
    pub detection_radius: f32,
    pub move_speed: f32,
    pub wander_speed: f32,
    pub behavior: EnemyBehavior,
    wander_heading: Vec2,
    wander_timer: f32,
    pub hit_flash: f32,
}

impl Enemy {
    pub fn new(id: u32, position: Vec2, config: &EnemyConfig) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            hit_points: config.hit_points,
            detection_radius: config.detection_radius,
            move_speed: config.move_speed,
            wander_speed: config.move_speed * config.wander_speed_factor,
            behavior: EnemyBehavior::Wandering,
            wander_heading: Vec2::ZERO,
            wander_timer: 0.0,
            hit_flash: 0.0,
        }
    }

    /// Chases the player when within detection range, wanders otherwise
    pub fn steer<R: Rng>(&mut self, player: Vec2, dt: f32, rng: &mut R) {
        if !self.is_alive() {
            self.halt();
            return;
        }

        let distance = self.position.distance(player);
        if distance <= self.detection_radius {
            self.behavior = EnemyBehavior::Chasing;
            // Already on top of the player; nothing to steer toward
            if distance <= f32::EPSILON {
                self.velocity = Vec2::ZERO;
                return;
            }
            let angle = angle_between(self.position, player);
            self.velocity = Vec2::from_angle(angle) * self.move_speed;
            return;
        }

        if self.behavior != EnemyBehavior::Wandering {
            self.behavior = EnemyBehavior::Wandering;
            self.wander_timer = 0.0;
        }

        self.wander_timer -= dt;
        if self.wander_timer <= 0.0 {
            self.wander_timer = rng.random_range(1.0..3.0);
            self.wander_heading = if rng.random_bool(IDLE_CHANCE) {
                Vec2::ZERO
            } else {
                Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU))
            };
        }
        self.velocity = self.wander_heading * self.wander_speed;
    }

    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.behavior = EnemyBehavior::Halted;
    }

    pub fn update_timers(&mut self, dt: f32) {
        self.hit_flash = (self.hit_flash - dt).max(0.0);
    }

    /// Returns false if the hit was ignored because the enemy is still
    /// flashing from the previous one, or already dead.
    pub fn take_hit(&mut self, damage: u8) -> bool {
        if self.is_flashing() || !self.is_alive() {
            return false;
        }
        self.hit_points = self.hit_points.saturating_sub(damage);
        self.hit_flash = HIT_FLASH_SECS;
        true
    }

    pub fn is_flashing(&self) -> bool {
        self.hit_flash > 0.0
    }

    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    /// Dead enemies linger until their hit flash has played out
    pub fn should_despawn(&self) -> bool {
        !self.is_alive() && !self.is_flashing()
    }

    pub fn radius(&self) -> f32 {
        ENEMY_RADIUS
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, Vec2::splat(ENEMY_RADIUS * 2.0))
    }
}
