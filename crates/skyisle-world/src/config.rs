//! World generation settings.

use serde::{Deserialize, Serialize};
use skyisle_common::{ConfigError, GridSize, WorldPoint};

use crate::patterns::{builtin_patterns, IslandPattern};
use crate::tile_grid::Tileset;

/// Settings for the quadrant torus and island population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for island placement and scattering
    pub seed: u64,
    /// Quadrants along each axis
    pub grid: GridSize,
    /// World size of one quadrant
    pub quadrant_size: WorldPoint,
    /// World area per island a quadrant aims for
    pub target_density: f32,
    /// Placement tries per island before giving up
    pub placement_retries: u32,
    /// Upper bound on items scattered on one island
    pub max_items_per_island: u32,
    /// Upper bound on NPCs placed on one island
    pub max_npcs_per_island: u32,
    /// Names items are drawn from
    pub item_names: Vec<String>,
    /// Names NPCs are drawn from
    pub npc_names: Vec<String>,
    /// Tile sprites used for baking
    pub tileset: Tileset,
    /// Island layouts
    pub patterns: Vec<IslandPattern>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            grid: GridSize::new(8, 8),
            quadrant_size: WorldPoint::new(2400.0, 2400.0),
            target_density: 1_200_000.0,
            placement_retries: 8,
            max_items_per_island: 3,
            max_npcs_per_island: 1,
            item_names: ["shell", "feather", "crystal", "coin"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            npc_names: ["Mira", "Oskar", "Tamsin", "Bo"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            tileset: Tileset::default(),
            patterns: builtin_patterns(),
        }
    }
}

impl WorldConfig {
    /// Checks structural constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width < 3 || self.grid.height < 3 {
            return Err(ConfigError::invalid(
                "world.grid",
                format!(
                    "need at least 3x3 quadrants, got {}x{}",
                    self.grid.width, self.grid.height
                ),
            ));
        }
        if self.quadrant_size.x <= 0.0 || self.quadrant_size.y <= 0.0 {
            return Err(ConfigError::invalid(
                "world.quadrant_size",
                "must be positive",
            ));
        }
        if self.target_density <= 0.0 {
            return Err(ConfigError::invalid(
                "world.target_density",
                "must be positive",
            ));
        }
        if self.patterns.is_empty() {
            return Err(ConfigError::invalid(
                "world.patterns",
                "at least one island pattern is required",
            ));
        }
        if self.max_items_per_island > 0 && self.item_names.is_empty() {
            return Err(ConfigError::invalid(
                "world.item_names",
                "items are enabled but no names are configured",
            ));
        }
        if self.max_npcs_per_island > 0 && self.npc_names.is_empty() {
            return Err(ConfigError::invalid(
                "world.npc_names",
                "NPCs are enabled but no names are configured",
            ));
        }
        Ok(())
    }

    /// Number of islands a fully populated quadrant aims for.
    #[must_use]
    pub fn islands_per_quadrant(&self) -> usize {
        let area = self.quadrant_size.x * self.quadrant_size.y;
        (area / self.target_density).floor() as usize
    }

    /// World size of the whole torus.
    #[must_use]
    pub fn world_size(&self) -> WorldPoint {
        WorldPoint::new(
            self.quadrant_size.x * self.grid.width as f32,
            self.quadrant_size.y * self.grid.height as f32,
        )
    }
}
