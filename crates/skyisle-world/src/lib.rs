//! # Skyisle World
//!
//! World management for Skyisle.
//!
//! This crate handles:
//! - Tile grids and their baked bitmap descriptions
//! - Islands placed from a library of layouts
//! - Lazy quadrant population with non-overlapping islands
//! - The wrapped quadrant torus and island culling around the player
//! - The live entity set

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod assets;
pub mod config;
pub mod island;
pub mod live;
pub mod patterns;
pub mod quadrant;
pub mod tile_grid;
pub mod world_map;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::assets::*;
    pub use crate::config::*;
    pub use crate::island::*;
    pub use crate::live::*;
    pub use crate::patterns::*;
    pub use crate::quadrant::*;
    pub use crate::tile_grid::*;
    pub use crate::world_map::*;
}

pub use prelude::*;
