#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tileworld terrain engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems read the immutable [`TerrainContext`]
//! produced once per session and respond exclusively with new commands.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod terrain;

pub use terrain::{
    Band, Elevation, GenerationReport, TerrainClassification, TerrainContext, TerrainReport,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tileworld.";

/// Lifecycle of a single play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// No terrain exists yet, or a regeneration is in progress.
    Uninitialized,
    /// Terrain bands were generated but obstacles and the character are not placed.
    TerrainGenerated,
    /// Obstacles are placed and the character stands on its starting cell.
    Ready,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Discards any existing session and generates a fresh one from the config.
    StartSession {
        /// Bootstrap parameters for the new session.
        config: SessionConfig,
    },
    /// Requests that the character relocate to the provided cell.
    PlaceCharacter {
        /// Destination cell proposed by the movement system.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Reports that a session could not start because its config is invalid.
    SessionRejected {
        /// Validation failure that prevented the session from starting.
        reason: ConfigError,
    },
    /// Confirms that terrain bands were generated for the new session.
    TerrainGenerated {
        /// Requested versus delivered feature counts.
        report: TerrainReport,
    },
    /// Confirms that obstacles were scattered over the terrain.
    ObstaclesPlaced {
        /// Number of obstacles the session asked for.
        requested: u32,
        /// Number of obstacles actually placed before the attempt cap.
        placed: u32,
    },
    /// Confirms that the character was positioned on its starting cell.
    CharacterPlaced {
        /// Cell the character occupies.
        cell: CellCoord,
    },
    /// Announces that the session accepts movement.
    SessionReady,
    /// Confirms that the character moved between two cells.
    CharacterMoved {
        /// Cell the character occupied before moving.
        from: CellCoord,
        /// Cell the character occupies after the move.
        to: CellCoord,
    },
    /// Reports that a relocation request was rejected.
    CharacterMoveRejected {
        /// Cell the character occupied when the request arrived, if any.
        from: Option<CellCoord>,
        /// Cell the request asked for.
        to: CellCoord,
        /// Specific reason the relocation failed.
        reason: MoveRejection,
    },
}

/// Reasons a relocation request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The session is not in the ready state.
    NotReady,
    /// The destination lies outside the grid.
    OutOfBounds,
    /// The destination holds an obstacle.
    Blocked,
}

/// Validation failures for session bootstrap parameters.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigError {
    /// The grid has no cells along at least one axis.
    #[error("grid must have at least one row and one column, got {rows}x{columns}")]
    EmptyGrid {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// The reserved starting cell lies outside the grid.
    #[error("start cell ({row}, {column}) lies outside the {rows}x{columns} grid")]
    StartOutOfBounds {
        /// Row of the requested starting cell.
        row: u32,
        /// Column of the requested starting cell.
        column: u32,
        /// Row count of the grid.
        rows: u32,
        /// Column count of the grid.
        columns: u32,
    },
}

/// Bootstrap parameters provided by the surrounding application at session start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Dimensions of the tile grid.
    pub size: GridSize,
    /// Number of obstacles to scatter over dry land.
    pub obstacle_count: u32,
    /// Reserved cell the character starts on; never receives an obstacle.
    pub start: CellCoord,
    /// Seed feeding every random draw of the session.
    pub seed: u64,
    /// Forces the river orientation when set; otherwise it is drawn at random.
    pub river: Option<Orientation>,
}

impl SessionConfig {
    /// Checks that the grid is non-empty and contains the starting cell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size.is_empty() {
            return Err(ConfigError::EmptyGrid {
                rows: self.size.rows(),
                columns: self.size.columns(),
            });
        }

        if !self.size.contains(self.start) {
            return Err(ConfigError::StartOutOfBounds {
                row: self.start.row(),
                column: self.start.column(),
                rows: self.size.rows(),
                columns: self.size.columns(),
            });
        }

        Ok(())
    }
}

/// Axis along which a river crosses the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Runs from the west edge (column 0) to the east edge.
    Horizontal,
    /// Runs from the north edge (row 0) to the south edge.
    Vertical,
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row().abs_diff(other.row()) + self.column().abs_diff(other.column())
    }

    /// Applies the delta without bounds checks, returning signed `(row, column)`.
    #[must_use]
    pub fn offset(self, delta: Delta) -> (i64, i64) {
        (
            i64::from(self.row) + i64::from(delta.rows()),
            i64::from(self.column) + i64::from(delta.columns()),
        )
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Dimensions of the tile grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    rows: u32,
    columns: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the grid has no cells at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.rows) * u64::from(self.columns);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row < self.rows && cell.column < self.columns
    }

    /// Clamps each axis independently into the grid.
    ///
    /// Returns `None` only when the grid is empty.
    #[must_use]
    pub fn clamp(&self, row: i64, column: i64) -> Option<CellCoord> {
        if self.is_empty() {
            return None;
        }

        let row = row.clamp(0, i64::from(self.rows) - 1);
        let column = column.clamp(0, i64::from(self.columns) - 1);
        Some(CellCoord::new(
            u32::try_from(row).ok()?,
            u32::try_from(column).ok()?,
        ))
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| {
            (0..columns).map(move |column| CellCoord::new(row, column))
        })
    }
}

/// Returns the in-bounds orthogonal neighbours of a cell: up, down, left, right.
#[must_use]
pub fn adjacent(cell: CellCoord, size: GridSize) -> Vec<CellCoord> {
    let row = cell.row();
    let column = cell.column();
    [
        row.checked_sub(1).map(|up| CellCoord::new(up, column)),
        row.checked_add(1).map(|down| CellCoord::new(down, column)),
        column.checked_sub(1).map(|left| CellCoord::new(row, left)),
        column.checked_add(1).map(|right| CellCoord::new(row, right)),
    ]
    .into_iter()
    .flatten()
    .filter(|neighbour| size.contains(*neighbour))
    .collect()
}

/// Signed displacement applied to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delta {
    rows: i32,
    columns: i32,
}

impl Delta {
    /// Displacement that leaves a cell where it is.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new displacement.
    #[must_use]
    pub const fn new(rows: i32, columns: i32) -> Self {
        Self { rows, columns }
    }

    /// Signed change along the row axis; positive moves south.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Signed change along the column axis; positive moves east.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }
}

/// Compass directions produced by keyboard or pointer input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Diagonal toward decreasing rows and increasing columns.
    NorthEast,
    /// Movement toward increasing column indices.
    East,
    /// Diagonal toward increasing rows and columns.
    SouthEast,
    /// Movement toward increasing row indices.
    South,
    /// Diagonal toward increasing rows and decreasing columns.
    SouthWest,
    /// Movement toward decreasing column indices.
    West,
    /// Diagonal toward decreasing rows and columns.
    NorthWest,
}

impl Direction {
    /// All eight directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Unit displacement associated with the direction.
    #[must_use]
    pub const fn delta(self) -> Delta {
        match self {
            Self::North => Delta::new(-1, 0),
            Self::NorthEast => Delta::new(-1, 1),
            Self::East => Delta::new(0, 1),
            Self::SouthEast => Delta::new(1, 1),
            Self::South => Delta::new(1, 0),
            Self::SouthWest => Delta::new(1, -1),
            Self::West => Delta::new(0, -1),
            Self::NorthWest => Delta::new(-1, -1),
        }
    }

    /// Short compass label such as `ne`.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::NorthEast => "ne",
            Self::East => "e",
            Self::SouthEast => "se",
            Self::South => "s",
            Self::SouthWest => "sw",
            Self::West => "w",
            Self::NorthWest => "nw",
        }
    }
}

/// Error returned when a direction label cannot be parsed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown direction `{0}`, expected one of n, ne, e, se, s, sw, w, nw")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "n" | "north" | "up" => Ok(Self::North),
            "ne" | "northeast" => Ok(Self::NorthEast),
            "e" | "east" | "right" => Ok(Self::East),
            "se" | "southeast" => Ok(Self::SouthEast),
            "s" | "south" | "down" => Ok(Self::South),
            "sw" | "southwest" => Ok(Self::SouthWest),
            "w" | "west" | "left" => Ok(Self::West),
            "nw" | "northwest" => Ok(Self::NorthWest),
            _ => Err(ParseDirectionError(value.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        adjacent, CellCoord, Command, ConfigError, Delta, Direction, GridSize, Orientation,
        SessionConfig,
    };

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(3, 4);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn adjacent_omits_cells_beyond_corner() {
        let size = GridSize::new(3, 3);
        assert_eq!(
            adjacent(CellCoord::new(0, 0), size),
            vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]
        );
    }

    #[test]
    fn adjacent_lists_four_interior_neighbours_in_order() {
        let size = GridSize::new(3, 3);
        assert_eq!(
            adjacent(CellCoord::new(1, 1), size),
            vec![
                CellCoord::new(0, 1),
                CellCoord::new(2, 1),
                CellCoord::new(1, 0),
                CellCoord::new(1, 2),
            ]
        );
    }

    #[test]
    fn adjacent_on_single_cell_grid_is_empty() {
        assert!(adjacent(CellCoord::new(0, 0), GridSize::new(1, 1)).is_empty());
    }

    #[test]
    fn clamp_limits_each_axis_independently() {
        let size = GridSize::new(8, 5);
        assert_eq!(size.clamp(-3, 9), Some(CellCoord::new(0, 4)));
        assert_eq!(size.clamp(12, 2), Some(CellCoord::new(7, 2)));
        assert_eq!(GridSize::new(0, 4).clamp(0, 0), None);
    }

    #[test]
    fn cells_iterate_in_row_major_order() {
        let cells: Vec<_> = GridSize::new(2, 2).cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 0),
                CellCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn direction_deltas_stay_within_unit_square() {
        for direction in Direction::ALL {
            let delta = direction.delta();
            assert!(delta.rows().abs() <= 1 && delta.columns().abs() <= 1);
            assert_ne!(delta, Delta::ZERO);
            assert_eq!(direction.abbreviation().parse::<Direction>(), Ok(direction));
        }
    }

    #[test]
    fn direction_parsing_accepts_long_names() {
        assert_eq!("North-East".parse::<Direction>(), Ok(Direction::NorthEast));
        assert_eq!(" sw ".parse::<Direction>(), Ok(Direction::SouthWest));
        assert!("up-left".parse::<Direction>().is_err());
    }

    #[test]
    fn validate_rejects_empty_grid() {
        let config = SessionConfig {
            size: GridSize::new(0, 10),
            obstacle_count: 3,
            start: CellCoord::new(0, 0),
            seed: 1,
            river: None,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                rows: 0,
                columns: 10
            })
        );
    }

    #[test]
    fn validate_rejects_start_outside_grid() {
        let config = SessionConfig {
            size: GridSize::new(4, 4),
            obstacle_count: 0,
            start: CellCoord::new(4, 1),
            seed: 1,
            river: None,
        };
        let error = config.validate().expect_err("start is out of bounds");
        assert_eq!(
            error.to_string(),
            "start cell (4, 1) lies outside the 4x4 grid"
        );
    }

    #[test]
    fn start_session_command_round_trips_through_bincode() {
        let command = Command::StartSession {
            config: SessionConfig {
                size: GridSize::new(12, 16),
                obstacle_count: 10,
                start: CellCoord::new(0, 0),
                seed: 0x5eed,
                river: Some(Orientation::Vertical),
            },
        };
        let bytes = bincode::serialize(&command).expect("serialize");
        let restored: Command = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, command);
    }
}
