//! # Skyisle Gameplay
//!
//! Gameplay systems for Skyisle.
//!
//! This crate provides everything that runs on top of the world:
//! - Input handling with rebindable actions
//! - The ground and flight movement controller
//! - Player, enemy and bullets
//! - Inventory and item pickups
//! - The damped pursuit camera
//! - A clamped frame clock
//! - The simulation that owns all state and orders each tick

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod bullet;
pub mod camera;
pub mod clock;
pub mod config;
pub mod enemy;
pub mod input;
pub mod inventory;
pub mod movement;
pub mod player;
pub mod simulation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bullet::*;
    pub use crate::camera::*;
    pub use crate::clock::*;
    pub use crate::config::*;
    pub use crate::enemy::*;
    pub use crate::input::*;
    pub use crate::inventory::*;
    pub use crate::movement::*;
    pub use crate::player::*;
    pub use crate::simulation::*;
}

pub use prelude::*;
