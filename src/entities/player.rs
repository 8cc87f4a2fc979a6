use glam::Vec2;

use super::weapon::WeaponKind;
use crate::config::PlayerConfig;
use crate::geometry::{Aabb, angle_between};

/// Side length of the player's square body in world units
pub const PLAYER_SIZE: f32 = 3.2;

/// Length of one visible/hidden phase while blinking
const BLINK_PHASE_SECS: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Last non-zero movement direction, unit length
    pub facing: Vec2,
    pub health: u8,
    pub max_health: u8,
    pub invulnerable_timer: f32,
    pub knockback_timer: f32,
    pub knockback_velocity: Vec2,
    pub active_weapon: WeaponKind,
}

impl Player {
    pub fn new(position: Vec2, max_health: u8) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Vec2::X,
            health: max_health,
            max_health,
            invulnerable_timer: 0.0,
            knockback_timer: 0.0,
            knockback_velocity: Vec2::ZERO,
            active_weapon: WeaponKind::Sword,
        }
    }

    /// Sets velocity from a movement direction. Diagonals are normalized so
    /// they are no faster than straight movement.
    pub fn steer(&mut self, direction: Vec2, speed: f32) {
        let direction = direction.normalize_or_zero();
        if direction != Vec2::ZERO {
            self.facing = direction;
        }

        self.velocity = if self.knockback_timer > 0.0 {
            self.knockback_velocity
        } else {
            direction * speed
        };
    }

    pub fn update_timers(&mut self, dt: f32) {
        self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);
        self.knockback_timer = (self.knockback_timer - dt).max(0.0);
    }

    /// Applies one point of damage from an enemy at `from`.
    /// Returns false when the hit was ignored.
    pub fn take_hit(&mut self, from: Vec2, config: &PlayerConfig) -> bool {
        if self.is_invulnerable() || !self.is_alive() {
            return false;
        }

        self.health = self.health.saturating_sub(1);
        self.invulnerable_timer = config.invulnerable_secs;

        let angle = angle_between(from, self.position);
        self.knockback_velocity = Vec2::from_angle(angle) * config.knockback_speed;
        self.knockback_timer = config.knockback_secs;
        self.velocity = self.knockback_velocity;
        true
    }

    /// Returns true if health actually went up
    pub fn heal(&mut self, amount: u8) -> bool {
        if self.health >= self.max_health {
            return false;
        }
        self.health = self.health.saturating_add(amount).min(self.max_health);
        true
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Whether the sprite is drawn this frame; it blinks while invulnerable
    pub fn is_visible(&self) -> bool {
        if !self.is_invulnerable() {
            return true;
        }
        ((self.invulnerable_timer / BLINK_PHASE_SECS) as u32).is_multiple_of(2)
    }

    pub fn switch_weapon(&mut self) {
        self.active_weapon = self.active_weapon.next();
    }

    pub fn size(&self) -> Vec2 {
        Vec2::splat(PLAYER_SIZE)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlayerConfig {
        PlayerConfig::default()
    }

    #[test]
    fn test_player_new() {
        let player = Player::new(Vec2::new(120.0, 90.0), 10);
        assert_eq!(player.position, Vec2::new(120.0, 90.0));
        assert_eq!(player.health, 10);
        assert_eq!(player.max_health, 10);
        assert_eq!(player.active_weapon, WeaponKind::Sword);
        assert!(!player.is_invulnerable());
    }

    #[test]
    fn test_player_steer_diagonal_not_faster() {
        let mut player = Player::new(Vec2::ZERO, 10);
        player.steer(Vec2::new(1.0, 1.0), 20.0);
        assert!((player.velocity.length() - 20.0).abs() < 1e-4);

        player.steer(Vec2::new(-1.0, 0.0), 20.0);
        assert_eq!(player.velocity, Vec2::new(-20.0, 0.0));
        assert_eq!(player.facing, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_player_steer_zero_keeps_facing() {
        let mut player = Player::new(Vec2::ZERO, 10);
        player.steer(Vec2::new(0.0, -1.0), 20.0);
        player.steer(Vec2::ZERO, 20.0);
        assert_eq!(player.velocity, Vec2::ZERO);
        assert_eq!(player.facing, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_player_take_hit_grants_invulnerability() {
        let mut player = Player::new(Vec2::new(10.0, 10.0), 10);
        assert!(player.take_hit(Vec2::new(5.0, 10.0), &config()));
        assert_eq!(player.health, 9);
        assert!(player.is_invulnerable());

        // Second hit during invulnerability is ignored
        assert!(!player.take_hit(Vec2::new(5.0, 10.0), &config()));
        assert_eq!(player.health, 9);

        player.update_timers(1.3);
        assert!(!player.is_invulnerable());
        assert!(player.take_hit(Vec2::new(5.0, 10.0), &config()));
        assert_eq!(player.health, 8);
    }

    #[test]
    fn test_player_knockback_pushes_away_from_enemy() {
        let mut player = Player::new(Vec2::new(10.0, 10.0), 10);
        player.take_hit(Vec2::new(5.0, 10.0), &config());
        assert!(player.knockback_velocity.x > 19.9);
        assert!(player.knockback_velocity.y.abs() < 1e-4);

        // Steering is overridden while knocked back
        player.steer(Vec2::new(-1.0, 0.0), 20.0);
        assert_eq!(player.velocity, player.knockback_velocity);

        player.update_timers(0.2);
        player.steer(Vec2::new(-1.0, 0.0), 20.0);
        assert_eq!(player.velocity, Vec2::new(-20.0, 0.0));
    }

    #[test]
    fn test_player_heal_respects_max() {
        let mut player = Player::new(Vec2::ZERO, 10);
        assert!(!player.heal(1));

        player.health = 8;
        assert!(player.heal(1));
        assert_eq!(player.health, 9);
        assert!(player.heal(5));
        assert_eq!(player.health, 10);
    }

    #[test]
    fn test_player_blinks_while_invulnerable() {
        let mut player = Player::new(Vec2::ZERO, 10);
        assert!(player.is_visible());

        player.invulnerable_timer = 1.15;
        let first = player.is_visible();
        player.update_timers(0.1);
        assert_ne!(player.is_visible(), first);
    }

    #[test]
    fn test_player_dies_at_zero_health() {
        let mut player = Player::new(Vec2::ZERO, 1);
        assert!(player.take_hit(Vec2::new(1.0, 0.0), &config()));
        assert!(!player.is_alive());
        player.update_timers(2.0);
        assert!(!player.take_hit(Vec2::new(1.0, 0.0), &config()));
        assert_eq!(player.health, 0);
    }

    #[test]
    fn test_player_switch_weapon_cycles() {
        let mut player = Player::new(Vec2::ZERO, 10);
        player.switch_weapon();
        assert_eq!(player.active_weapon, WeaponKind::Gun);
        player.switch_weapon();
        assert_eq!(player.active_weapon, WeaponKind::Sword);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_player_speed_never_exceeds_move_speed(
                dx in -5.0f32..5.0,
                dy in -5.0f32..5.0,
                speed in 1.0f32..50.0
            ) {
                let mut player = Player::new(Vec2::ZERO, 10);
                player.steer(Vec2::new(dx, dy), speed);
                prop_assert!(player.velocity.length() <= speed + 1e-3);
            }

            #[test]
            fn test_player_health_stays_in_range(
                events in prop::collection::vec(prop::bool::ANY, 0..60)
            ) {
                let mut player = Player::new(Vec2::new(10.0, 10.0), 10);
                for hit in events {
                    if hit {
                        player.take_hit(Vec2::ZERO, &PlayerConfig::default());
                    } else {
                        player.heal(1);
                    }
                    player.update_timers(0.5);
                    prop_assert!(player.health <= player.max_health);
                }
            }
        }
    }
}
