use glam::Vec2;

use crate::geometry::Aabb;

/// World units covered by one terminal row. Columns are one unit wide, and a
/// terminal cell is roughly twice as tall as it is wide.
pub const CELL_ASPECT: f32 = 2.0;

/// Window onto the world, following the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Top-left corner in world units
    pub origin: Vec2,
    /// Visible extent in world units
    pub size: Vec2,
}

impl Camera {
    pub fn new(size: Vec2) -> Self {
        Self {
            origin: Vec2::ZERO,
            size,
        }
    }

    /// World extent visible through a viewport of `columns` x `rows` cells
    pub fn size_for_cells(columns: u16, rows: u16) -> Vec2 {
        Vec2::new(columns as f32, rows as f32 * CELL_ASPECT)
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Centres on `target`, keeping the view inside `world` when it fits
    pub fn follow(&mut self, target: Vec2, world: &Aabb) {
        let desired = target - self.size * 0.5;
        let max = (world.max - self.size).max(world.min);
        self.origin = desired.clamp(world.min, max);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.origin, self.origin + self.size)
    }

    /// Cell under a world point, relative to the viewport's top-left cell
    pub fn world_to_cell(&self, point: Vec2) -> Option<(u16, u16)> {
        let local = point - self.origin;
        if local.x < 0.0 || local.y < 0.0 || local.x >= self.size.x || local.y >= self.size.y {
            return None;
        }
        let column = local.x.floor();
        let row = (local.y / CELL_ASPECT).floor();
        if column > u16::MAX as f32 || row > u16::MAX as f32 {
            return None;
        }
        Some((column as u16, row as u16))
    }

    /// World point at the centre of a viewport cell
    pub fn cell_to_world(&self, column: u16, row: u16) -> Vec2 {
        self.origin + Vec2::new(column as f32 + 0.5, (row as f32 + 0.5) * CELL_ASPECT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Aabb {
        Aabb::new(Vec2::ZERO, Vec2::new(240.0, 180.0))
    }

    #[test]
    fn test_follow_centres_on_target() {
        let mut camera = Camera::new(Vec2::new(80.0, 40.0));
        camera.follow(Vec2::new(120.0, 90.0), &world());
        assert_eq!(camera.origin, Vec2::new(80.0, 70.0));
    }

    #[test]
    fn test_follow_clamps_to_world_edges() {
        let mut camera = Camera::new(Vec2::new(80.0, 40.0));
        camera.follow(Vec2::new(5.0, 5.0), &world());
        assert_eq!(camera.origin, Vec2::ZERO);

        camera.follow(Vec2::new(239.0, 179.0), &world());
        assert_eq!(camera.origin, Vec2::new(160.0, 140.0));
    }

    #[test]
    fn test_follow_with_view_larger_than_world() {
        let mut camera = Camera::new(Vec2::new(400.0, 300.0));
        camera.follow(Vec2::new(120.0, 90.0), &world());
        assert_eq!(camera.origin, Vec2::ZERO);
    }

    #[test]
    fn test_cell_mapping_round_trip() {
        let mut camera = Camera::new(Camera::size_for_cells(80, 20));
        camera.origin = Vec2::new(10.0, 30.0);

        let point = camera.cell_to_world(7, 3);
        assert_eq!(point, Vec2::new(17.5, 37.0));
        assert_eq!(camera.world_to_cell(point), Some((7, 3)));
    }

    #[test]
    fn test_points_outside_view_have_no_cell() {
        let camera = Camera::new(Camera::size_for_cells(80, 20));
        assert_eq!(camera.world_to_cell(Vec2::new(-1.0, 5.0)), None);
        assert_eq!(camera.world_to_cell(Vec2::new(10.0, 40.0)), None);
        assert_eq!(camera.world_to_cell(Vec2::new(79.9, 39.9)), Some((79, 19)));
    }
}
