#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Tileworld session for presentation.

use tileworld_core::{Band, Command, SessionConfig, TerrainContext};
use tileworld_world::{query, World};

/// Produces data required to greet the player and describe the terrain.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Builds the command that starts a session from validated parameters.
    #[must_use]
    pub fn start_command(&self, config: SessionConfig) -> Command {
        Command::StartSession { config }
    }

    /// Exposes the terrain of the active session for presentation purposes.
    #[must_use]
    pub fn terrain<'world>(&self, world: &'world World) -> Option<&'world TerrainContext> {
        query::terrain(world)
    }

    /// Counts cells per resolved band, in priority order, skipping empty bands.
    #[must_use]
    pub fn band_census(&self, world: &World) -> Vec<(Band, usize)> {
        let Some(terrain) = query::terrain(world) else {
            return Vec::new();
        };
        let mut counts = vec![0usize; Band::PRIORITY.len()];
        for cell in terrain.size().cells() {
            let band = terrain.band_of(cell);
            if let Some(index) = Band::PRIORITY.iter().position(|entry| *entry == band) {
                counts[index] += 1;
            }
        }
        Band::PRIORITY
            .into_iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Human readable lines describing requested versus delivered features.
    #[must_use]
    pub fn summary_lines(&self, world: &World) -> Vec<String> {
        let Some(terrain) = query::terrain(world) else {
            return vec!["no session is running".to_owned()];
        };
        let report = terrain.report();
        let size = terrain.size();
        let mut lines = vec![
            format!("grid: {} rows x {} columns", size.rows(), size.columns()),
            format!(
                "river: {:?}, {} cells",
                report.terrain.river_orientation, report.terrain.river_cells
            ),
            format!(
                "lake: {} of {} cells",
                report.terrain.lake_cells, report.terrain.lake_target
            ),
            format!(
                "mountains: {} of {} clusters, {} peaks",
                report.terrain.clusters_placed,
                report.terrain.clusters_requested,
                report.terrain.peak_cells
            ),
            format!(
                "obstacles: {} of {}",
                report.obstacles_placed, report.obstacles_requested
            ),
        ];
        if let Some(cell) = query::character(world) {
            lines.push(format!(
                "character: {cell} on {} at elevation {:+.1}",
                terrain.band_of(cell).label(),
                terrain.elevation_of(cell).steps()
            ));
        }
        if !report.is_complete() {
            lines.push("generation fell short of at least one target".to_owned());
        }
        lines
    }
}
