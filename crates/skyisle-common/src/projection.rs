//! Isometric projection between world space, screen space and tile cells.
//!
//! World space is an unsquashed plane; the screen shows it with vertical
//! distances multiplied by [`IsometricProjection::vertical_ratio`]. Horizontal
//! distances are never scaled. Height is applied separately as a vertical
//! sprite lift and a diagonal shadow offset.

use serde::{Deserialize, Serialize};

use crate::coords::{CellCoord, WorldPoint};

/// Projection constants shared by baking, hit testing and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsometricProjection {
    /// Width of one tile diamond on screen, in pixels
    pub tile_width: f32,
    /// Height of one tile diamond on screen, in pixels
    pub tile_height: f32,
    /// Screen pixels a sprite moves vertically per unit of height
    pub sprite_lift_per_height: f32,
    /// Screen pixels a shadow moves per unit of height
    pub shadow_offset_per_height: WorldPoint,
}

impl Default for IsometricProjection {
    fn default() -> Self {
        Self {
            tile_width: 38.0,
            tile_height: 20.0,
            sprite_lift_per_height: -0.65,
            shadow_offset_per_height: WorldPoint::new(0.5, 0.25),
        }
    }
}

impl IsometricProjection {
    /// Creates a projection for the given tile diamond size.
    #[must_use]
    pub fn new(tile_width: f32, tile_height: f32) -> Self {
        Self {
            tile_width,
            tile_height,
            ..Self::default()
        }
    }

    /// Screen height over screen width of a tile.
    #[must_use]
    pub fn vertical_ratio(&self) -> f32 {
        self.tile_height / self.tile_width
    }

    /// Converts a world vertical distance to screen pixels.
    #[must_use]
    pub fn world_to_screen_vertical(&self, dy: f32) -> f32 {
        dy * self.vertical_ratio()
    }

    /// Converts a screen vertical distance back to world units.
    #[must_use]
    pub fn screen_to_world_vertical(&self, dy: f32) -> f32 {
        dy / self.vertical_ratio()
    }

    /// Squashes a world delta into a screen delta.
    #[must_use]
    pub fn world_to_screen_delta(&self, delta: WorldPoint) -> WorldPoint {
        WorldPoint::new(delta.x, self.world_to_screen_vertical(delta.y))
    }

    /// Unsquashes a screen delta into a world delta.
    #[must_use]
    pub fn screen_to_world_delta(&self, delta: WorldPoint) -> WorldPoint {
        WorldPoint::new(delta.x, self.screen_to_world_vertical(delta.y))
    }

    /// Screen offset of cell `(i, j)` relative to cell `(0, 0)`.
    ///
    /// The offset locates the left vertex of the cell's diamond.
    #[must_use]
    pub fn tile_to_local_offset(&self, i: i32, j: i32) -> WorldPoint {
        let half = self.tile_width / 2.0;
        WorldPoint::new(
            (i + j) as f32 * half,
            (j - i) as f32 * half * self.vertical_ratio(),
        )
    }

    /// Continuous inverse of [`IsometricProjection::tile_to_local_offset`].
    #[must_use]
    pub fn local_offset_to_tile(&self, offset: WorldPoint) -> WorldPoint {
        let half = self.tile_width / 2.0;
        let sum = offset.x / half;
        let diff = offset.y / (half * self.vertical_ratio());
        WorldPoint::new((sum - diff) / 2.0, (sum + diff) / 2.0)
    }

    /// The cell whose diamond contains a screen offset.
    #[must_use]
    pub fn cell_at(&self, offset: WorldPoint) -> CellCoord {
        let tile = self.local_offset_to_tile(offset);
        CellCoord::new(tile.x.floor() as i32, tile.y.floor() as i32)
    }

    /// The cell whose left vertex lies nearest to a screen offset.
    ///
    /// Inverse of [`IsometricProjection::tile_to_local_offset`] for integer cells.
    #[must_use]
    pub fn nearest_cell(&self, offset: WorldPoint) -> CellCoord {
        let tile = self.local_offset_to_tile(offset);
        CellCoord::new(tile.x.round() as i32, tile.y.round() as i32)
    }

    /// Screen position of a body relative to a world-space screen origin.
    #[must_use]
    pub fn world_to_screen(&self, point: WorldPoint, height: f32, origin: WorldPoint) -> WorldPoint {
        self.world_to_screen_delta(point - origin) + self.sprite_offset(height)
    }

    /// Screen position of a body's shadow relative to a world-space origin.
    #[must_use]
    pub fn shadow_to_screen(&self, point: WorldPoint, height: f32, origin: WorldPoint) -> WorldPoint {
        self.world_to_screen_delta(point - origin) + self.shadow_offset(height)
    }

    /// Vertical lift of a sprite flying at `height`.
    #[must_use]
    pub fn sprite_offset(&self, height: f32) -> WorldPoint {
        WorldPoint::new(0.0, height * self.sprite_lift_per_height)
    }

    /// Displacement of the shadow cast by a body at `height`.
    #[must_use]
    pub fn shadow_offset(&self, height: f32) -> WorldPoint {
        self.shadow_offset_per_height * height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tile_offset_layout() {
        let projection = IsometricProjection::default();
        // +i goes up-right, +j goes down-right
        let right_up = projection.tile_to_local_offset(1, 0);
        assert!((right_up.x - 19.0).abs() < 1e-4);
        assert!((right_up.y + 10.0).abs() < 1e-4);

        let right_down = projection.tile_to_local_offset(0, 1);
        assert!((right_down.x - 19.0).abs() < 1e-4);
        assert!((right_down.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_cell_at_interior_point() {
        let projection = IsometricProjection::default();
        // Slightly right of the left vertex of cell (2, 3) lies inside it
        let offset = projection.tile_to_local_offset(2, 3) + WorldPoint::new(4.0, 0.0);
        assert_eq!(projection.cell_at(offset), CellCoord::new(2, 3));
    }

    #[test]
    fn test_cell_at_just_inside_edge() {
        let projection = IsometricProjection::default();
        let half = projection.tile_width / 2.0;
        // Continuous tile coordinates (2.9995, 3.25) sit inside cell (2, 3)
        let (ti, tj) = (2.9995_f32, 3.25_f32);
        let offset = WorldPoint::new((ti + tj) * half, (tj - ti) * half * projection.vertical_ratio());
        assert_eq!(projection.cell_at(offset), CellCoord::new(2, 3));
        assert_eq!(projection.nearest_cell(offset), CellCoord::new(3, 3));
    }

    #[test]
    fn test_elevation_offsets() {
        let projection = IsometricProjection::default();
        let origin = WorldPoint::ZERO;
        let sprite = projection.world_to_screen(WorldPoint::new(10.0, 0.0), 100.0, origin);
        assert!((sprite.x - 10.0).abs() < 1e-4);
        assert!((sprite.y + 65.0).abs() < 1e-3);

        let shadow = projection.shadow_to_screen(WorldPoint::ZERO, 100.0, origin);
        assert!((shadow.x - 50.0).abs() < 1e-3);
        assert!((shadow.y - 25.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_integer_cells_roundtrip(i in -500i32..500, j in -500i32..500) {
            let projection = IsometricProjection::default();
            let offset = projection.tile_to_local_offset(i, j);
            prop_assert_eq!(projection.nearest_cell(offset), CellCoord::new(i, j));
        }

        #[test]
        fn prop_vertical_roundtrip(dy in -10_000.0f32..10_000.0) {
            let projection = IsometricProjection::default();
            let back = projection.screen_to_world_vertical(projection.world_to_screen_vertical(dy));
            prop_assert!((back - dy).abs() <= 1e-2);
        }
    }
}
