//! Error types for Skyisle.

use thiserror::Error;

/// Top-level error type for Skyisle operations.
#[derive(Debug, Error)]
pub enum SkyisleError {
    /// World construction errors
    #[error("World error: {0}")]
    World(#[from] WorldError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while building tile grids and populating the world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A pattern with no rows or no columns
    #[error("Tile pattern is empty")]
    EmptyPattern,

    /// A pattern whose rows have different lengths
    #[error("Tile pattern row {row} has {actual} cells, expected {expected}")]
    RaggedPattern {
        /// Index of the offending row
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        actual: usize,
    },

    /// A tile sprite with no registered asset
    #[error("Missing asset: {name}")]
    MissingAsset {
        /// Asset name that could not be resolved
        name: String,
    },

    /// A cell referencing a sprite index outside the tileset
    #[error("Unknown tile sprite index {index}")]
    UnknownTile {
        /// Offending sprite index
        index: u16,
    },
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field outside its accepted range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable explanation
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for Skyisle operations.
pub type SkyisleResult<T> = Result<T, SkyisleError>;
