//! Session parameters merged from an optional TOML file and command-line flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use tileworld_core::{CellCoord, Direction, GridSize, Orientation, SessionConfig};

const DEFAULT_ROWS: u32 = 40;
const DEFAULT_COLUMNS: u32 = 40;
const DEFAULT_OBSTACLES: u32 = 30;

/// Partially specified session parameters.
///
/// Both the TOML file and the command line produce one of these; flags
/// override file values and anything left unset falls back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SessionSettings {
    pub(crate) rows: Option<u32>,
    pub(crate) columns: Option<u32>,
    pub(crate) obstacles: Option<u32>,
    pub(crate) start_row: Option<u32>,
    pub(crate) start_column: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) river: Option<Orientation>,
    #[serde(default)]
    pub(crate) moves: Vec<String>,
}

/// Fully resolved session: the world config plus the scripted input.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SessionPlan {
    pub(crate) config: SessionConfig,
    pub(crate) moves: Vec<Direction>,
}

impl SessionSettings {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load session config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse session config toml contents")
    }

    /// Fills every unset field of `self` from `fallback`.
    #[must_use]
    pub(crate) fn or(self, fallback: Self) -> Self {
        Self {
            rows: self.rows.or(fallback.rows),
            columns: self.columns.or(fallback.columns),
            obstacles: self.obstacles.or(fallback.obstacles),
            start_row: self.start_row.or(fallback.start_row),
            start_column: self.start_column.or(fallback.start_column),
            seed: self.seed.or(fallback.seed),
            river: self.river.or(fallback.river),
            moves: if self.moves.is_empty() {
                fallback.moves
            } else {
                self.moves
            },
        }
    }

    /// Applies defaults and parses the scripted moves.
    ///
    /// `draw_seed` is consulted only when no seed was configured. The start
    /// defaults to the grid centre.
    pub(crate) fn resolve<F>(self, draw_seed: F) -> Result<SessionPlan>
    where
        F: FnOnce() -> u64,
    {
        let size = GridSize::new(
            self.rows.unwrap_or(DEFAULT_ROWS),
            self.columns.unwrap_or(DEFAULT_COLUMNS),
        );
        let start = CellCoord::new(
            self.start_row.unwrap_or(size.rows() / 2),
            self.start_column.unwrap_or(size.columns() / 2),
        );
        let config = SessionConfig {
            size,
            obstacle_count: self.obstacles.unwrap_or(DEFAULT_OBSTACLES),
            start,
            seed: self.seed.unwrap_or_else(draw_seed),
            river: self.river,
        };
        config.validate().context("invalid session parameters")?;

        let moves = self
            .moves
            .iter()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| entry.parse::<Direction>())
            .collect::<Result<Vec<_>, _>>()
            .context("invalid scripted move")?;

        Ok(SessionPlan { config, moves })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_file_contents() {
        let settings = SessionSettings::parse(
            r#"
            rows = 12
            columns = 20
            obstacles = 5
            seed = 99
            river = "vertical"
            moves = ["n", "se,e"]
            "#,
        )
        .expect("valid config");

        assert_eq!(settings.rows, Some(12));
        assert_eq!(settings.river, Some(Orientation::Vertical));
        assert_eq!(settings.moves, vec!["n".to_owned(), "se,e".to_owned()]);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(SessionSettings::parse("tile_length = 3.0").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let file = SessionSettings {
            rows: Some(12),
            columns: Some(12),
            seed: Some(1),
            moves: vec!["n".to_owned()],
            ..SessionSettings::default()
        };
        let flags = SessionSettings {
            rows: Some(30),
            ..SessionSettings::default()
        };

        let merged = flags.or(file);
        assert_eq!(merged.rows, Some(30));
        assert_eq!(merged.columns, Some(12));
        assert_eq!(merged.seed, Some(1));
        assert_eq!(merged.moves, vec!["n".to_owned()]);
    }

    #[test]
    fn resolve_applies_defaults_and_parses_moves() {
        let settings = SessionSettings {
            seed: Some(5),
            moves: vec!["ne, s".to_owned(), "west".to_owned()],
            ..SessionSettings::default()
        };
        let plan = settings
            .resolve(|| unreachable!("seed was configured"))
            .expect("valid plan");

        assert_eq!(plan.config.size, GridSize::new(DEFAULT_ROWS, DEFAULT_COLUMNS));
        assert_eq!(plan.config.start, CellCoord::new(20, 20));
        assert_eq!(plan.config.seed, 5);
        assert_eq!(
            plan.moves,
            vec![Direction::NorthEast, Direction::South, Direction::West]
        );
    }

    #[test]
    fn resolve_draws_seed_when_missing() {
        let plan = SessionSettings::default()
            .resolve(|| 1234)
            .expect("valid plan");
        assert_eq!(plan.config.seed, 1234);
    }

    #[test]
    fn resolve_rejects_invalid_parameters() {
        let start_outside = SessionSettings {
            rows: Some(4),
            start_row: Some(9),
            ..SessionSettings::default()
        };
        assert!(start_outside.resolve(|| 0).is_err());

        let bad_move = SessionSettings {
            moves: vec!["up-left".to_owned()],
            ..SessionSettings::default()
        };
        assert!(bad_move.resolve(|| 0).is_err());
    }
}
