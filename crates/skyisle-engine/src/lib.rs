//! # Skyisle Engine
//!
//! Headless driver for Skyisle.
//!
//! - Engine configuration loaded from TOML
//! - Scripted runs through the clock, input and simulation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod headless;
