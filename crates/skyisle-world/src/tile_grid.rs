//! Tile grids and their baked bitmap descriptions.
//!
//! A [`TileGrid`] is an immutable rectangle of terrain cells. Baking lays the
//! cells out in isometric screen space once, producing a [`BakedGrid`]: the
//! size of the cached bitmap, the ordered blits that compose it, and the
//! derived detection radius used for culling.

use serde::{Deserialize, Serialize};
use skyisle_common::{CellCoord, IsometricProjection, WorldError, WorldPoint};

use crate::assets::{AssetHandle, AssetProvider, BitmapSize, DEFAULT_TILE_SPRITES};

/// Sprite code of an empty (water) cell.
pub const WATER: u16 = 0;

/// A single terrain cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Sprite code; [`WATER`] means no land
    pub sprite: u16,
    /// First stack layer drawn
    pub low: u8,
    /// One past the last stack layer drawn
    pub high: u8,
}

impl Cell {
    /// Empty cell.
    pub const EMPTY: Self = Self {
        sprite: WATER,
        low: 0,
        high: 0,
    };

    /// Creates a cell stacked over `low..high`.
    #[must_use]
    pub const fn new(sprite: u16, low: u8, high: u8) -> Self {
        Self { sprite, low, high }
    }

    /// Single-layer land cell.
    #[must_use]
    pub const fn land(sprite: u16) -> Self {
        Self::new(sprite, 0, 1)
    }

    /// Whether this cell is walkable land.
    #[must_use]
    pub const fn is_land(self) -> bool {
        self.sprite != WATER
    }
}

/// Sprite names for each land code, plus the screen rise per stack layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tileset {
    /// Asset names, indexed by sprite code minus one
    pub sprites: Vec<String>,
    /// Screen pixels each stack layer rises above the one below
    pub layer_height: f32,
}

impl Default for Tileset {
    fn default() -> Self {
        Self {
            sprites: DEFAULT_TILE_SPRITES.iter().map(|s| (*s).to_string()).collect(),
            layer_height: 10.0,
        }
    }
}

impl Tileset {
    /// Asset name for a land sprite code.
    #[must_use]
    pub fn sprite_name(&self, code: u16) -> Option<&str> {
        let index = usize::from(code).checked_sub(1)?;
        self.sprites.get(index).map(String::as_str)
    }
}

/// One sprite copy in a baked bitmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileBlit {
    /// Asset to draw
    pub sprite: String,
    /// Source cell
    pub cell: CellCoord,
    /// Stack layer of this copy
    pub layer: u8,
    /// Top-left corner inside the bitmap, in pixels
    pub dest: WorldPoint,
}

/// Cached bitmap description of a tile grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedGrid {
    /// Bitmap size in pixels
    pub size: BitmapSize,
    /// Radius of the circle enclosing the bitmap
    pub detection_radius: f32,
    /// Bitmap pixel of the left vertex of cell (0, 0)
    pub origin_offset: WorldPoint,
    /// Blits in back-to-front order
    pub blits: Vec<TileBlit>,
}

impl BakedGrid {
    /// World offset from the bitmap center to the left vertex of cell (0, 0).
    #[must_use]
    pub fn anchor_from_center(&self, projection: &IsometricProjection) -> WorldPoint {
        projection.screen_to_world_delta(self.origin_offset - self.half_size())
    }

    /// World offset from the bitmap center to the middle of a cell's diamond.
    #[must_use]
    pub fn cell_center_from_center(
        &self,
        cell: CellCoord,
        projection: &IsometricProjection,
    ) -> WorldPoint {
        let diamond_center = projection.tile_to_local_offset(cell.i, cell.j)
            + WorldPoint::new(projection.tile_width / 2.0, 0.0);
        projection.screen_to_world_delta(diamond_center + self.origin_offset - self.half_size())
    }

    fn half_size(&self) -> WorldPoint {
        WorldPoint::new(self.size.width / 2.0, self.size.height / 2.0)
    }
}

/// Immutable grid of terrain cells, indexed `[i][j]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    rows: u32,
    cols: u32,
    cells: Vec<Cell>,
}

impl TileGrid {
    /// Builds a grid from a rectangular pattern (`pattern[i][j]`).
    pub fn generate(pattern: &[Vec<Cell>]) -> Result<Self, WorldError> {
        let cols = pattern.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(WorldError::EmptyPattern);
        }
        for (row, cells) in pattern.iter().enumerate() {
            if cells.len() != cols {
                return Err(WorldError::RaggedPattern {
                    row,
                    expected: cols,
                    actual: cells.len(),
                });
            }
        }

        Ok(Self {
            rows: pattern.len() as u32,
            cols: cols as u32,
            cells: pattern.iter().flatten().copied().collect(),
        })
    }

    /// Extent along `i`.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Extent along `j`.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Gets a cell, or `None` outside the grid.
    #[must_use]
    pub fn get_cell(&self, cell: CellCoord) -> Option<Cell> {
        if cell.i < 0 || cell.j < 0 {
            return None;
        }
        let (i, j) = (cell.i as u32, cell.j as u32);
        if i >= self.rows || j >= self.cols {
            return None;
        }
        self.cells.get((i * self.cols + j) as usize).copied()
    }

    /// Whether a cell is land. Out of bounds is water.
    #[must_use]
    pub fn is_land(&self, cell: CellCoord) -> bool {
        self.get_cell(cell).is_some_and(Cell::is_land)
    }

    /// Coordinates of every land cell, in row-major order.
    #[must_use]
    pub fn land_cells(&self) -> Vec<CellCoord> {
        self.coords().filter(|c| self.is_land(*c)).collect()
    }

    fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.rows as i32).flat_map(move |i| (0..self.cols as i32).map(move |j| CellCoord::new(i, j)))
    }

    /// Lays the grid out as a bitmap description.
    ///
    /// Cells are emitted with larger `i + j` first, each repeated over its
    /// stack layers bottom to top.
    pub fn bake(
        &self,
        projection: &IsometricProjection,
        tileset: &Tileset,
        assets: &dyn AssetProvider,
    ) -> Result<BakedGrid, WorldError> {
        let half_height = projection.tile_height / 2.0;
        let mut min = WorldPoint::splat(f32::INFINITY);
        let mut max = WorldPoint::splat(f32::NEG_INFINITY);
        let mut resolved: Vec<Option<AssetHandle>> = Vec::new();
        let mut blits = Vec::new();

        let mut order: Vec<CellCoord> = self.coords().collect();
        order.sort_by_key(|c| std::cmp::Reverse(c.diagonal()));

        for coord in order {
            let left = projection.tile_to_local_offset(coord.i, coord.j);
            min = min.min(left - WorldPoint::new(0.0, half_height));
            max = max.max(left + WorldPoint::new(projection.tile_width, half_height));

            let Some(cell) = self.get_cell(coord).filter(|c| c.is_land()) else {
                continue;
            };
            let handle = resolve_sprite(cell.sprite, tileset, assets, &mut resolved)?;
            let sprite_size = WorldPoint::new(handle.size.width, handle.size.height);

            for layer in cell.low..cell.high {
                let dest = left - WorldPoint::new(0.0, half_height + f32::from(layer) * tileset.layer_height);
                min = min.min(dest);
                max = max.max(dest + sprite_size);
                blits.push(TileBlit {
                    sprite: handle.name.clone(),
                    cell: coord,
                    layer,
                    dest,
                });
            }
        }

        for blit in &mut blits {
            blit.dest -= min;
        }
        let extent = max - min;
        let size = BitmapSize::new(extent.x, extent.y);

        Ok(BakedGrid {
            size,
            detection_radius: extent.x.max(extent.y) / 2.0 * std::f32::consts::SQRT_2,
            origin_offset: -min,
            blits,
        })
    }

    /// Whether a world point lies over land, given the world position of the
    /// left vertex of cell (0, 0).
    #[must_use]
    pub fn is_over_land(
        &self,
        point: WorldPoint,
        grid_origin: WorldPoint,
        projection: &IsometricProjection,
    ) -> bool {
        let local = projection.world_to_screen_delta(point - grid_origin);
        self.is_land(projection.cell_at(local))
    }
}

fn resolve_sprite(
    code: u16,
    tileset: &Tileset,
    assets: &dyn AssetProvider,
    resolved: &mut Vec<Option<AssetHandle>>,
) -> Result<AssetHandle, WorldError> {
    let slot = usize::from(code);
    if resolved.len() <= slot {
        resolved.resize(slot + 1, None);
    }
    if let Some(handle) = &resolved[slot] {
        return Ok(handle.clone());
    }

    let name = tileset
        .sprite_name(code)
        .ok_or(WorldError::UnknownTile { index: code })?;
    let handle = assets
        .get_asset(name)
        .ok_or_else(|| WorldError::MissingAsset {
            name: name.to_string(),
        })?;
    resolved[slot] = Some(handle.clone());
    Ok(handle)
}
