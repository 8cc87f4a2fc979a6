use glam::Vec2;

use crate::config::TerrainConfig;
use crate::geometry::Aabb;

/// Static obstacle; blocks bodies and stops projectiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Terrain {
    pub bounds: Aabb,
}

impl Terrain {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            bounds: Aabb::from_center_size(center, size),
        }
    }

    pub fn blocks(&self, body: &Aabb) -> bool {
        self.bounds.intersects(body)
    }
}

impl From<&TerrainConfig> for Terrain {
    fn from(config: &TerrainConfig) -> Self {
        Terrain::new(
            Vec2::new(config.x, config.y),
            Vec2::new(config.width, config.height),
        )
    }
}

pub fn is_blocked(terrain: &[Terrain], body: &Aabb) -> bool {
    terrain.iter().any(|t| t.blocks(body))
}

/// Moves a body of `size` by `delta`, one axis at a time, so it slides
/// along walls instead of sticking to them.
pub fn move_with_collisions(position: Vec2, size: Vec2, delta: Vec2, terrain: &[Terrain]) -> Vec2 {
    let mut position = position;

    let step_x = position + Vec2::new(delta.x, 0.0);
    if !is_blocked(terrain, &Aabb::from_center_size(step_x, size)) {
        position = step_x;
    }

    let step_y = position + Vec2::new(0.0, delta.y);
    if !is_blocked(terrain, &Aabb::from_center_size(step_y, size)) {
        position = step_y;
    }

    position
}
