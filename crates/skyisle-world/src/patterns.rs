//! Built-in island layouts.
//!
//! Layouts are written as text, one row per `i`, one character per `j`:
//!
//! | char | cell                    |
//! |------|-------------------------|
//! | `.`  | water                   |
//! | `g`  | grass                   |
//! | `s`  | sand                    |
//! | `r`  | rock, two layers        |
//! | `R`  | rock, three layers      |
//! | `f`  | forest                  |

use serde::{Deserialize, Serialize};
use skyisle_common::WorldError;

use crate::tile_grid::{Cell, TileGrid};

/// A named island layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslandPattern {
    /// Display name
    pub name: String,
    /// Layout rows
    pub rows: Vec<String>,
}

impl IslandPattern {
    /// Creates a pattern from text rows.
    pub fn new(name: impl Into<String>, rows: &[&str]) -> Self {
        Self {
            name: name.into(),
            rows: rows.iter().map(|r| (*r).to_string()).collect(),
        }
    }

    /// Parses the layout into cells.
    pub fn cells(&self) -> Result<Vec<Vec<Cell>>, WorldError> {
        self.rows
            .iter()
            .map(|row| row.chars().map(parse_cell).collect::<Result<Vec<_>, _>>())
            .collect()
    }

    /// Parses and validates the layout into a grid.
    pub fn to_grid(&self) -> Result<TileGrid, WorldError> {
        TileGrid::generate(&self.cells()?)
    }
}

fn parse_cell(code: char) -> Result<Cell, WorldError> {
    match code {
        '.' => Ok(Cell::EMPTY),
        'g' => Ok(Cell::land(1)),
        's' => Ok(Cell::land(2)),
        'r' => Ok(Cell::new(3, 0, 2)),
        'R' => Ok(Cell::new(3, 0, 3)),
        'f' => Ok(Cell::land(4)),
        other => Err(WorldError::UnknownTile {
            index: u16::try_from(u32::from(other)).unwrap_or(u16::MAX),
        }),
    }
}

/// The layouts islands are drawn from when no library is configured.
#[must_use]
pub fn builtin_patterns() -> Vec<IslandPattern> {
    vec![
        IslandPattern::new(
            "atoll",
            &[
                ".ssss.",
                "sgggs.",
                "sg..gs",
                "sg..gs",
                ".sgggs",
                ".ssss.",
            ],
        ),
        IslandPattern::new(
            "highland",
            &[
                "..sss...",
                ".sgggss.",
                "sggrrgs.",
                "sgrRRrgs",
                "sgrRRrgs",
                ".sgrrggs",
                ".ssgggs.",
                "...sss..",
            ],
        ),
        IslandPattern::new(
            "grove",
            &[
                ".sss.",
                "sgffs",
                "sfffs",
                "sgfgs",
                ".sss.",
            ],
        ),
        IslandPattern::new("rock", &["ss", "sr"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_patterns_parse() {
        for pattern in builtin_patterns() {
            let grid = pattern.to_grid();
            assert!(grid.is_ok(), "pattern {} failed: {grid:?}", pattern.name);
        }
    }

    #[test]
    fn test_unknown_character_rejected() {
        let pattern = IslandPattern::new("bad", &["g?"]);
        assert!(matches!(
            pattern.to_grid(),
            Err(WorldError::UnknownTile { index }) if index == u16::from(b'?')
        ));
    }

    #[test]
    fn test_ragged_text_rejected() {
        let pattern = IslandPattern::new("ragged", &["ggg", "gg"]);
        assert!(matches!(
            pattern.to_grid(),
            Err(WorldError::RaggedPattern { row: 1, .. })
        ));
    }
}
