//! Coordinate types for world, quadrant, and tile-cell positions.

use serde::{Deserialize, Serialize};

/// Continuous world-plane position in pixels.
///
/// Altitude is never folded into this type; bodies carry their height as a
/// separate scalar.
pub type WorldPoint = glam::Vec2;

/// Dimensions of a wrapped grid (quadrant grid of the world map).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    /// Number of columns
    pub width: u32,
    /// Number of rows
    pub height: u32,
}

impl GridSize {
    /// Creates a new grid size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn len(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether the grid has no cells.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Row-major index of a coordinate, after wrapping it into range.
    #[must_use]
    pub fn index_of(self, coord: QuadrantCoord) -> usize {
        let wrapped = coord.wrapped(self);
        (wrapped.y as usize) * (self.width as usize) + (wrapped.x as usize)
    }

    /// Inverse of [`GridSize::index_of`].
    #[must_use]
    pub fn coord_of(self, index: usize) -> QuadrantCoord {
        let width = self.width as usize;
        QuadrantCoord::new((index % width) as i32, (index / width) as i32)
    }
}

/// Quadrant coordinate (identifies a quadrant in the world grid).
///
/// Unwrapped coordinates may be negative or exceed the grid; use
/// [`QuadrantCoord::wrapped`] to fold them onto the torus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuadrantCoord {
    /// X coordinate in quadrant space
    pub x: i32,
    /// Y coordinate in quadrant space
    pub y: i32,
}

impl QuadrantCoord {
    /// Creates a new quadrant coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Unwrapped quadrant containing a world point.
    #[must_use]
    pub fn from_world(point: WorldPoint, quadrant_size: WorldPoint) -> Self {
        Self {
            x: (point.x / quadrant_size.x).floor() as i32,
            y: (point.y / quadrant_size.y).floor() as i32,
        }
    }

    /// Folds this coordinate onto the grid. Always non-negative.
    #[must_use]
    pub fn wrapped(self, grid: GridSize) -> Self {
        Self {
            x: self.x.rem_euclid(grid.width as i32),
            y: self.y.rem_euclid(grid.height as i32),
        }
    }

    /// Returns the coordinate offset by the given amount.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// World position of the quadrant's top-left corner.
    #[must_use]
    pub fn to_world_origin(self, quadrant_size: WorldPoint) -> WorldPoint {
        WorldPoint::new(
            self.x as f32 * quadrant_size.x,
            self.y as f32 * quadrant_size.y,
        )
    }
}

/// Integer cell coordinate inside a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    /// Column (grows toward the upper right on screen)
    pub i: i32,
    /// Row (grows toward the lower right on screen)
    pub j: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Painter's-algorithm depth: cells with a larger diagonal are drawn first.
    #[must_use]
    pub const fn diagonal(self) -> i32 {
        self.i + self.j
    }
}

/// Size of the visible surface in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    /// Creates a new viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Screen-space diagonal length.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }

    /// Half of the visible area expressed in world units.
    ///
    /// The vertical extent is unsquashed by the projection ratio, since the
    /// screen shows more world rows than pixel rows.
    #[must_use]
    pub fn world_half_extent(&self, vertical_ratio: f32) -> WorldPoint {
        WorldPoint::new(self.width / 2.0, self.height / 2.0 / vertical_ratio)
    }

    /// Diagonal of the visible area in world units.
    #[must_use]
    pub fn world_diagonal(&self, vertical_ratio: f32) -> f32 {
        self.world_half_extent(vertical_ratio).length() * 2.0
    }
}
