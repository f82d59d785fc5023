//! Asset lookup used while baking tile grids.
//!
//! The world only needs sprite dimensions; pixel data stays with the
//! renderer. Providers are looked up by name, the same names the renderer
//! uses to draw the blits of a [`crate::tile_grid::BakedGrid`].

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of a sprite or bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BitmapSize {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl BitmapSize {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A resolved asset: its name and pixel size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHandle {
    /// Name the asset was registered under
    pub name: String,
    /// Pixel size of the sprite
    pub size: BitmapSize,
}

/// Source of sprite metadata.
pub trait AssetProvider {
    /// Looks up an asset by name.
    fn get_asset(&self, name: &str) -> Option<AssetHandle>;
}

/// Default tile sprites, indexed by sprite code minus one.
pub const DEFAULT_TILE_SPRITES: [&str; 4] = [
    "tiles/grass.png",
    "tiles/sand.png",
    "tiles/rock.png",
    "tiles/forest.png",
];

/// Default sprite size of one terrain tile (top diamond plus one side band).
pub const DEFAULT_TILE_SPRITE_SIZE: BitmapSize = BitmapSize::new(38.0, 30.0);

/// In-memory asset table.
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    assets: AHashMap<String, BitmapSize>,
}

impl StaticAssets {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the default terrain tiles.
    #[must_use]
    pub fn with_default_tiles() -> Self {
        let mut assets = Self::new();
        for name in DEFAULT_TILE_SPRITES {
            assets.insert(name, DEFAULT_TILE_SPRITE_SIZE);
        }
        assets
    }

    /// Registers (or replaces) an asset.
    pub fn insert(&mut self, name: impl Into<String>, size: BitmapSize) {
        self.assets.insert(name.into(), size);
    }

    /// Number of registered assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether no assets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetProvider for StaticAssets {
    fn get_asset(&self, name: &str) -> Option<AssetHandle> {
        self.assets.get(name).map(|size| AssetHandle {
            name: name.to_string(),
            size: *size,
        })
    }
}
