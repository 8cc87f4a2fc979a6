use glam::Vec2;

use crate::config::WeaponConfig;
use crate::geometry::wrap_angle;

/// Total angle swept by the sword before it swings back
const SWORD_ARC: f32 = -120.0_f32 * (std::f32::consts::PI / 180.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Sword,
    Gun,
}

impl WeaponKind {
    pub fn get_name(&self) -> &'static str {
        match self {
            WeaponKind::Sword => "Sword",
            WeaponKind::Gun => "Gun",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            WeaponKind::Sword => WeaponKind::Gun,
            WeaponKind::Gun => WeaponKind::Sword,
        }
    }
}

/// Melee weapon. A swing sweeps the blade out and back again, and only
/// hurts enemies while it is in motion.
#[derive(Debug, Clone)]
pub struct Sword {
    pub reach: f32,
    pub damage: u8,
    swing_secs: f32,
    swing_elapsed: Option<f32>,
    base_angle: f32,
}

impl Sword {
    pub fn new(config: &WeaponConfig) -> Self {
        Self {
            reach: config.sword_reach,
            damage: config.sword_damage,
            swing_secs: config.sword_swing_secs,
            swing_elapsed: None,
            base_angle: 0.0,
        }
    }

    /// Starts a swing toward `angle`. Returns false if already swinging.
    pub fn start_swing(&mut self, angle: f32) -> bool {
        if self.is_swinging() {
            return false;
        }
        self.base_angle = angle;
        self.swing_elapsed = Some(0.0);
        true
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(elapsed) = self.swing_elapsed {
            let elapsed = elapsed + dt;
            self.swing_elapsed = (elapsed < self.swing_secs).then_some(elapsed);
        }
    }

    pub fn is_swinging(&self) -> bool {
        self.swing_elapsed.is_some()
    }

    /// Current blade angle: out to the full arc at half time, then back
    pub fn blade_angle(&self) -> Option<f32> {
        let elapsed = self.swing_elapsed?;
        let t = (elapsed / self.swing_secs).clamp(0.0, 1.0);
        let sweep = if t < 0.5 { t * 2.0 } else { (1.0 - t) * 2.0 };
        Some(self.base_angle + SWORD_ARC * sweep)
    }

    /// Blade segment from `origin`, present only mid-swing
    pub fn blade(&self, origin: Vec2) -> Option<(Vec2, Vec2)> {
        let angle = self.blade_angle()?;
        Some((origin, origin + Vec2::from_angle(angle) * self.reach))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired,
    CoolingDown,
    Reloading,
    Empty,
}

/// Ranged weapon with a magazine
#[derive(Debug, Clone)]
pub struct Gun {
    pub rounds: u8,
    pub capacity: u8,
    cooldown: f32,
    cooldown_secs: f32,
    reload_timer: Option<f32>,
    reload_secs: f32,
}

impl Gun {
    pub fn new(config: &WeaponConfig) -> Self {
        Self {
            rounds: config.magazine_size,
            capacity: config.magazine_size,
            cooldown: 0.0,
            cooldown_secs: config.gun_cooldown_secs,
            reload_timer: None,
            reload_secs: config.reload_secs,
        }
    }

    pub fn try_fire(&mut self) -> FireOutcome {
        if self.is_reloading() {
            return FireOutcome::Reloading;
        }
        if self.cooldown > 0.0 {
            return FireOutcome::CoolingDown;
        }
        if self.rounds == 0 {
            // Dry clicks are rate limited like real shots
            self.cooldown = self.cooldown_secs;
            return FireOutcome::Empty;
        }

        self.rounds -= 1;
        self.cooldown = self.cooldown_secs;
        FireOutcome::Fired
    }

    /// Returns false when the magazine is full or a reload is running
    pub fn start_reload(&mut self) -> bool {
        if self.is_reloading() || self.rounds == self.capacity {
            return false;
        }
        self.reload_timer = Some(self.reload_secs);
        true
    }

    /// Fills the magazine immediately, cancelling any reload
    pub fn refill(&mut self) {
        self.rounds = self.capacity;
        self.reload_timer = None;
    }

    /// Returns true on the frame a reload completes
    pub fn update(&mut self, dt: f32) -> bool {
        self.cooldown = (self.cooldown - dt).max(0.0);

        let Some(remaining) = self.reload_timer else {
            return false;
        };
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            self.refill();
            true
        } else {
            self.reload_timer = Some(remaining);
            false
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_timer.is_some()
    }
}

/// Special attack: a wide arc around the player
#[derive(Debug, Clone)]
pub struct Slash {
    pub radius: f32,
    pub damage: u8,
    pub angle: f32,
    half_arc: f32,
    active_secs: f32,
    active_timer: f32,
    cooldown: f32,
    cooldown_secs: f32,
    /// Enemies already struck by the current slash
    struck: Vec<u32>,
}

impl Slash {
    pub fn new(config: &WeaponConfig) -> Self {
        Self {
            radius: config.slash_radius,
            damage: config.slash_damage,
            angle: 0.0,
            half_arc: config.slash_arc_degrees.to_radians() * 0.5,
            active_secs: config.slash_secs,
            active_timer: 0.0,
            cooldown: 0.0,
            cooldown_secs: config.slash_cooldown_secs,
            struck: Vec::new(),
        }
    }

    pub fn try_start(&mut self, angle: f32) -> bool {
        if self.cooldown > 0.0 {
            return false;
        }
        self.angle = angle;
        self.active_timer = self.active_secs;
        self.cooldown = self.cooldown_secs;
        self.struck.clear();
        true
    }

    pub fn update(&mut self, dt: f32) {
        self.active_timer = (self.active_timer - dt).max(0.0);
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.active_timer > 0.0
    }

    /// Fraction of the active window already elapsed
    pub fn progress(&self) -> f32 {
        if self.active_secs <= 0.0 {
            return 1.0;
        }
        1.0 - self.active_timer / self.active_secs
    }

    pub fn half_arc(&self) -> f32 {
        self.half_arc
    }

    /// Whether a target of `target_radius` at `target` lies inside the arc
    pub fn covers(&self, origin: Vec2, target: Vec2, target_radius: f32) -> bool {
        let offset = target - origin;
        if offset.length() > self.radius + target_radius {
            return false;
        }
        let angle = offset.y.atan2(offset.x);
        wrap_angle(angle - self.angle).abs() <= self.half_arc
    }

    pub fn has_struck(&self, enemy_id: u32) -> bool {
        self.struck.contains(&enemy_id)
    }

    pub fn mark_struck(&mut self, enemy_id: u32) {
        self.struck.push(enemy_id);
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn config() -> WeaponConfig {
        WeaponConfig::default()
    }

    #[test]
    fn test_weapon_kind_names() {
        assert_eq!(WeaponKind::Sword.get_name(), "Sword");
        assert_eq!(WeaponKind::Gun.get_name(), "Gun");
        assert_eq!(WeaponKind::Sword.next(), WeaponKind::Gun);
    }

    #[test]
    fn test_sword_swing_window() {
        let mut sword = Sword::new(&config());
        assert!(sword.blade(Vec2::ZERO).is_none());
        assert!(sword.start_swing(0.0));
        assert!(!sword.start_swing(0.0));

        sword.update(0.2);
        assert!(sword.is_swinging());
        sword.update(0.2);
        assert!(!sword.is_swinging());
        assert!(sword.start_swing(0.0));
    }

    #[test]
    fn test_sword_blade_sweeps_out_and_back() {
        let mut sword = Sword::new(&config());
        sword.start_swing(0.0);
        assert_eq!(sword.blade_angle(), Some(0.0));

        sword.update(0.19);
        let peak = sword.blade_angle().expect("mid swing");
        assert!((peak - SWORD_ARC).abs() < 1e-3);

        sword.update(0.18);
        let late = sword.blade_angle().expect("still swinging");
        assert!(late.abs() < 0.2);
    }

    #[test]
    fn test_sword_blade_length_matches_reach() {
        let mut sword = Sword::new(&config());
        sword.start_swing(FRAC_PI_2);
        let (start, end) = sword.blade(Vec2::new(5.0, 5.0)).expect("blade");
        assert_eq!(start, Vec2::new(5.0, 5.0));
        assert!((start.distance(end) - sword.reach).abs() < 1e-4);
        assert!((end.y - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_gun_cooldown_and_magazine() {
        let mut gun = Gun::new(&config());
        assert_eq!(gun.try_fire(), FireOutcome::Fired);
        assert_eq!(gun.try_fire(), FireOutcome::CoolingDown);
        assert_eq!(gun.rounds, 5);

        for _ in 0..5 {
            gun.update(0.5);
            assert_eq!(gun.try_fire(), FireOutcome::Fired);
        }
        assert_eq!(gun.rounds, 0);

        gun.update(0.5);
        assert_eq!(gun.try_fire(), FireOutcome::Empty);
    }

    #[test]
    fn test_gun_reload() {
        let mut gun = Gun::new(&config());
        assert!(!gun.start_reload());

        gun.try_fire();
        assert!(gun.start_reload());
        assert!(!gun.start_reload());
        assert_eq!(gun.try_fire(), FireOutcome::Reloading);

        assert!(!gun.update(1.0));
        assert!(gun.update(0.3));
        assert_eq!(gun.rounds, gun.capacity);
        assert!(!gun.is_reloading());
    }

    #[test]
    fn test_gun_refill_cancels_reload() {
        let mut gun = Gun::new(&config());
        gun.try_fire();
        gun.start_reload();
        gun.refill();
        assert!(!gun.is_reloading());
        assert_eq!(gun.rounds, 6);
    }

    #[test]
    fn test_slash_covers_arc_only() {
        let mut slash = Slash::new(&config());
        assert!(slash.try_start(0.0));
        let origin = Vec2::ZERO;

        assert!(slash.covers(origin, Vec2::new(6.0, 0.0), 1.6));
        assert!(slash.covers(origin, Vec2::new(2.0, 5.0), 1.6));
        // Behind the player
        assert!(!slash.covers(origin, Vec2::new(-6.0, 0.0), 1.6));
        // Out of range
        assert!(!slash.covers(origin, Vec2::new(12.0, 0.0), 1.6));
    }

    #[test]
    fn test_slash_cooldown_and_struck_list() {
        let mut slash = Slash::new(&config());
        assert!(slash.try_start(0.0));
        slash.mark_struck(7);
        assert!(slash.has_struck(7));
        assert!(!slash.try_start(0.0));

        slash.update(0.3);
        assert!(!slash.is_active());
        slash.update(1.8);
        assert!(slash.try_start(1.0));
        assert!(!slash.has_struck(7));
        assert!(slash.is_active());
    }
}
