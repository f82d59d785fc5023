//! # Skyisle Common
//!
//! Common types, utilities, and shared abstractions for Skyisle.
//!
//! This crate provides foundational types used across all Skyisle subsystems:
//! - Coordinate types (world points, quadrant and cell coordinates, viewport)
//! - Heading math (normalization, turn direction, rate-limited turning)
//! - The isometric projection shared by every geometry routine
//! - ID types (EntityId, IslandId)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod angle;
pub mod coords;
pub mod error;
pub mod ids;
pub mod projection;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::angle::*;
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::projection::*;
}

pub use prelude::*;
