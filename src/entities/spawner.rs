use glam::Vec2;
use rand::Rng;

use super::terrain::{Terrain, is_blocked};
use crate::config::SpawnConfig;
use crate::geometry::Aabb;

/// Attempts made to find a spawn point before giving up
pub const MAX_SPAWN_ATTEMPTS: usize = 10;

/// Picks a random point inside `world` (minus `margin` on each side) that is
/// at least `min_distance` from `avoid` and leaves room for a body of
/// `clearance` outside terrain. Returns `None` after
/// [`MAX_SPAWN_ATTEMPTS`] misses.
pub fn pick_spawn_point<R: Rng>(
    rng: &mut R,
    world: &Aabb,
    margin: f32,
    avoid: Vec2,
    min_distance: f32,
    clearance: f32,
    terrain: &[Terrain],
) -> Option<Vec2> {
    let area = world.shrink(margin);

    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = Vec2::new(
            random_between(rng, area.min.x, area.max.x),
            random_between(rng, area.min.y, area.max.y),
        );

        if candidate.distance(avoid) < min_distance {
            continue;
        }
        if is_blocked(terrain, &Aabb::from_center_size(candidate, Vec2::splat(clearance))) {
            continue;
        }
        return Some(candidate);
    }

    None
}

fn random_between<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min { rng.random_range(min..max) } else { min }
}

/// Wave escalation and batch timing
#[derive(Debug, Clone)]
pub struct SpawnSchedule {
    timer: f32,
    interval: f32,
    wave_secs: f32,
    batch_size: u32,
    batch_growth: u32,
    max_enemies: usize,
}

impl SpawnSchedule {
    pub fn new(config: &SpawnConfig) -> Self {
        Self {
            timer: config.interval_secs,
            interval: config.interval_secs,
            wave_secs: config.wave_secs,
            batch_size: config.batch_size,
            batch_growth: config.batch_growth,
            max_enemies: config.max_enemies,
        }
    }

    /// Wave number for an encounter that has run `elapsed` seconds
    pub fn wave(&self, elapsed: f32) -> u32 {
        // Float to int casts saturate, so a tiny wave length tops out here
        ((elapsed / self.wave_secs).max(0.0) as u32).saturating_add(1)
    }

    pub fn batch_size(&self, wave: u32) -> u32 {
        wave.saturating_sub(1)
            .saturating_mul(self.batch_growth)
            .saturating_add(self.batch_size)
    }

    /// Advances the timer and returns how many enemies to spawn this frame
    pub fn tick(&mut self, dt: f32, elapsed: f32, alive: usize) -> usize {
        self.timer -= dt;
        if self.timer > 0.0 {
            return 0;
        }
        self.timer += self.interval;

        let wanted = self.batch_size(self.wave(elapsed)) as usize;
        wanted.min(self.max_enemies.saturating_sub(alive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn world() -> Aabb {
        Aabb::new(Vec2::ZERO, Vec2::new(240.0, 180.0))
    }

    #[test]
    fn test_spawn_point_respects_distance_and_margin() {
        let mut rng = StdRng::seed_from_u64(9);
        let player = Vec2::new(120.0, 90.0);
        for _ in 0..200 {
            if let Some(point) = pick_spawn_point(&mut rng, &world(), 5.0, player, 30.0, 3.2, &[]) {
                assert!(point.distance(player) >= 30.0);
                assert!(world().shrink(5.0).contains(point));
            }
        }
    }

    #[test]
    fn test_spawn_point_gives_up_when_impossible() {
        let mut rng = StdRng::seed_from_u64(1);
        let tiny = Aabb::new(Vec2::ZERO, Vec2::new(20.0, 20.0));
        let point = pick_spawn_point(&mut rng, &tiny, 1.0, Vec2::new(10.0, 10.0), 100.0, 1.0, &[]);
        assert!(point.is_none());
    }

    #[test]
    fn test_spawn_point_avoids_terrain() {
        let mut rng = StdRng::seed_from_u64(5);
        let world = Aabb::new(Vec2::ZERO, Vec2::new(40.0, 40.0));
        // Cover the left half of the world
        let wall = [Terrain::new(Vec2::new(10.0, 20.0), Vec2::new(20.0, 40.0))];
        for _ in 0..100 {
            if let Some(point) = pick_spawn_point(&mut rng, &world, 1.0, Vec2::new(-100.0, 0.0), 0.0, 2.0, &wall) {
                assert!(point.x >= 21.0);
            }
        }
    }

    #[test]
    fn test_schedule_batches_on_interval() {
        let mut schedule = SpawnSchedule::new(&SpawnConfig::default());
        assert_eq!(schedule.tick(1.0, 1.0, 0), 0);
        assert_eq!(schedule.tick(1.0, 2.0, 0), 0);
        assert_eq!(schedule.tick(1.0, 3.0, 0), 5);
        assert_eq!(schedule.tick(1.0, 4.0, 0), 0);
    }

    #[test]
    fn test_schedule_grows_with_waves() {
        let schedule = SpawnSchedule::new(&SpawnConfig::default());
        assert_eq!(schedule.wave(0.0), 1);
        assert_eq!(schedule.wave(29.9), 1);
        assert_eq!(schedule.wave(30.0), 2);
        assert_eq!(schedule.batch_size(1), 5);
        assert_eq!(schedule.batch_size(3), 7);
    }

    #[test]
    fn test_schedule_caps_alive_enemies() {
        let mut schedule = SpawnSchedule::new(&SpawnConfig::default());
        assert_eq!(schedule.tick(3.0, 3.0, 58), 2);
        assert_eq!(schedule.tick(3.0, 6.0, 60), 0);
    }

    #[test]
    fn test_schedule_saturates_on_extreme_growth() {
        let config = SpawnConfig {
            wave_secs: 0.0001,
            batch_growth: 1_000_000,
            max_enemies: 60,
            ..SpawnConfig::default()
        };
        let mut schedule = SpawnSchedule::new(&config);
        assert_eq!(schedule.wave(f32::MAX), u32::MAX);
        assert_eq!(schedule.batch_size(u32::MAX), u32::MAX);
        assert_eq!(schedule.tick(3.0, 10.0, 0), 60);
        assert_eq!(schedule.tick(3.0, 13.0, 55), 5);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_spawn_point_never_too_close(
                seed in any::<u64>(),
                px in 0.0f32..240.0,
                py in 0.0f32..180.0,
                min_distance in 0.0f32..80.0
            ) {
                let mut rng = StdRng::seed_from_u64(seed);
                let player = Vec2::new(px, py);
                if let Some(point) = pick_spawn_point(&mut rng, &world(), 5.0, player, min_distance, 3.2, &[]) {
                    prop_assert!(point.distance(player) >= min_distance);
                }
            }
        }
    }
}
