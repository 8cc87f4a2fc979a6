use glam::Vec2;
use rand::Rng;

use crate::geometry::ease_out_quad;

pub const BLOOD_LIFETIME_SECS: f32 = 1.0;

const START_ALPHA: f32 = 0.5;
const START_SCALE: f32 = 1.5;
const END_SCALE: f32 = 0.8;
/// Fraction of droplet velocity kept after one second
const DROPLET_DRAG: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct BloodDrop {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub age: f32,
    pub lifetime: f32,
}

impl BloodDrop {
    pub fn new(position: Vec2, velocity: Vec2, rotation: f32) -> Self {
        Self {
            position,
            velocity,
            rotation,
            age: 0.0,
            lifetime: BLOOD_LIFETIME_SECS,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        self.position += self.velocity * dt;
        self.velocity *= DROPLET_DRAG.powf(dt);
    }

    pub fn is_dead(&self) -> bool {
        self.age >= self.lifetime
    }

    fn progress(&self) -> f32 {
        ease_out_quad(self.age / self.lifetime)
    }

    pub fn alpha(&self) -> f32 {
        START_ALPHA * (1.0 - self.progress())
    }

    pub fn scale(&self) -> f32 {
        START_SCALE + (END_SCALE - START_SCALE) * self.progress()
    }

    /// Glyph for the current size; rotation picks between variants
    pub fn get_char(&self) -> char {
        let variant = ((self.rotation / std::f32::consts::FRAC_PI_2) as usize) % 4;
        if self.scale() > 1.2 {
            ['✶', '✷', '✸', '✹'][variant]
        } else if self.scale() > 0.95 {
            ['*', '+', 'x', '*'][variant]
        } else {
            ['.', '·', ',', '.'][variant]
        }
    }
}

/// One splat at the hit point plus a few droplets thrown outward
pub fn create_blood_splatter<R: Rng>(center: Vec2, rng: &mut R) -> Vec<BloodDrop> {
    let mut drops = Vec::with_capacity(5);

    drops.push(BloodDrop::new(
        center,
        Vec2::ZERO,
        rng.random_range(0.0..std::f32::consts::TAU),
    ));

    for _ in 0..4 {
        let direction = Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU));
        let speed = rng.random_range(3.0..8.0);
        drops.push(BloodDrop::new(
            center,
            direction * speed,
            rng.random_range(0.0..std::f32::consts::TAU),
        ));
    }

    drops
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_blood_fades_and_shrinks() {
        let mut drop = BloodDrop::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        assert_eq!(drop.alpha(), 0.5);
        assert_eq!(drop.scale(), 1.5);

        drop.update(0.5);
        assert!(drop.alpha() < 0.5 && drop.alpha() > 0.0);
        assert!(drop.scale() < 1.5 && drop.scale() > 0.8);

        drop.update(0.5);
        assert!(drop.is_dead());
        assert!(drop.alpha().abs() < 1e-6);
        assert!((drop.scale() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_droplets_slow_down() {
        let mut drop = BloodDrop::new(Vec2::ZERO, Vec2::new(8.0, 0.0), 0.0);
        drop.update(0.5);
        assert!(drop.velocity.x < 8.0);
        assert!(drop.position.x > 0.0);
    }

    #[test]
    fn test_create_blood_splatter() {
        let mut rng = StdRng::seed_from_u64(42);
        let drops = create_blood_splatter(Vec2::new(10.0, 10.0), &mut rng);
        assert_eq!(drops.len(), 5);
        assert_eq!(drops[0].velocity, Vec2::ZERO);
        for drop in &drops {
            assert_eq!(drop.position, Vec2::new(10.0, 10.0));
            assert!(drop.velocity.length() < 8.0 + 1e-4);
        }
    }

    #[test]
    fn test_blood_glyph_shrinks_with_age() {
        let mut drop = BloodDrop::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        assert_eq!(drop.get_char(), '✶');
        drop.update(0.99);
        assert_eq!(drop.get_char(), '.');
    }
}
