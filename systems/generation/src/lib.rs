#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural terrain generation for Tileworld.
//!
//! Generation runs once per session in a fixed order: the river is carved
//! first, the lake grows around it, mountain clusters keep their distance from
//! both, and the classifier derives slope rings and shorelines from the three
//! base sets. Obstacles are scattered afterwards by [`GeneratedTerrain::furnish`].
//! Every loop is bounded by an explicit attempt budget, so generation always
//! terminates and reports under-delivery through [`TerrainReport`] instead of
//! failing.

pub mod classify;
pub mod lake;
pub mod mountains;
pub mod obstacles;
pub mod river;

use std::collections::BTreeSet;

use rand::Rng;
use tileworld_core::{
    CellCoord, GenerationReport, GridSize, Orientation, TerrainClassification, TerrainContext,
    TerrainReport,
};
use tracing::{debug, info, warn};

pub use classify::classify;
pub use lake::{generate_lake, Lake, LakeTuning};
pub use mountains::{generate_mountains, MountainTuning, Mountains};
pub use obstacles::{place_obstacles, ObstacleTuning};
pub use river::{generate_river, River, RiverTuning};

/// Aggregated tuning knobs for every generation stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationTuning {
    /// Waypoint and jog limits for the river path.
    pub river: RiverTuning,
    /// Size range and budgets for lake growth.
    pub lake: LakeTuning,
    /// Cluster counts, sizes, and spacing for mountain placement.
    pub mountains: MountainTuning,
    /// Rejection-sampling budget for obstacle scattering.
    pub obstacles: ObstacleTuning,
}

/// Runs the generation stages in order using a shared random source.
#[derive(Clone, Debug, Default)]
pub struct TerrainGenerator {
    tuning: GenerationTuning,
}

impl TerrainGenerator {
    /// Creates a generator using the provided tuning.
    #[must_use]
    pub const fn new(tuning: GenerationTuning) -> Self {
        Self { tuning }
    }

    /// Tuning applied by the generator.
    #[must_use]
    pub const fn tuning(&self) -> &GenerationTuning {
        &self.tuning
    }

    /// Generates river, lake, and mountains, then classifies every band.
    ///
    /// `orientation` forces the river axis; `None` draws it with even odds.
    pub fn generate<R>(
        &self,
        size: GridSize,
        orientation: Option<Orientation>,
        rng: &mut R,
    ) -> GeneratedTerrain
    where
        R: Rng + ?Sized,
    {
        let river = generate_river(size, orientation, &self.tuning.river, rng);
        let river_cells: BTreeSet<CellCoord> = river.cells().iter().copied().collect();
        debug!(
            orientation = ?river.orientation(),
            cells = river_cells.len(),
            "carved river"
        );

        let lake = generate_lake(size, &river_cells, &self.tuning.lake, rng);
        let lake_cells: BTreeSet<CellCoord> = lake.cells().iter().copied().collect();
        debug!(
            seed = ?lake.seed(),
            target = lake.target(),
            cells = lake_cells.len(),
            "grew lake"
        );

        let water: BTreeSet<CellCoord> = river_cells.union(&lake_cells).copied().collect();
        let mountains = generate_mountains(size, &water, &self.tuning.mountains, rng);
        let peaks: BTreeSet<CellCoord> = mountains.peaks().collect();
        debug!(
            requested = mountains.requested_clusters(),
            placed = mountains.clusters().len(),
            peaks = peaks.len(),
            "placed mountain clusters"
        );

        let classification = classify(size, &peaks, &river_cells, &lake_cells);
        let report = TerrainReport {
            river_orientation: river.orientation(),
            river_cells: count_u32(river_cells.len()),
            lake_target: lake.target(),
            lake_cells: count_u32(lake_cells.len()),
            clusters_requested: mountains.requested_clusters(),
            clusters_placed: count_u32(mountains.clusters().len()),
            peak_cells: count_u32(peaks.len()),
        };

        if report.lake_cells < report.lake_target {
            warn!(
                target = report.lake_target,
                grown = report.lake_cells,
                "lake stopped short of its target size"
            );
        }
        if report.clusters_placed < report.clusters_requested {
            warn!(
                requested = report.clusters_requested,
                placed = report.clusters_placed,
                "mountain attempt budget exhausted"
            );
        }
        info!(
            rows = size.rows(),
            columns = size.columns(),
            complete = report.is_complete(),
            "terrain generated"
        );

        GeneratedTerrain {
            size,
            classification,
            report,
            obstacles: self.tuning.obstacles.clone(),
        }
    }
}

/// Classified terrain awaiting obstacle placement.
#[derive(Clone, Debug)]
pub struct GeneratedTerrain {
    size: GridSize,
    classification: TerrainClassification,
    report: TerrainReport,
    obstacles: ObstacleTuning,
}

impl GeneratedTerrain {
    /// Dimensions of the generated grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Classification sets derived for the grid.
    #[must_use]
    pub const fn classification(&self) -> &TerrainClassification {
        &self.classification
    }

    /// Requested versus delivered counts for this run.
    #[must_use]
    pub const fn report(&self) -> &TerrainReport {
        &self.report
    }

    /// Scatters obstacles over dry land and freezes the terrain.
    ///
    /// `reserved` never receives an obstacle; it is where the character starts.
    pub fn furnish<R>(self, count: u32, reserved: CellCoord, rng: &mut R) -> TerrainContext
    where
        R: Rng + ?Sized,
    {
        let classification = self.classification;
        let obstacles = place_obstacles(
            self.size,
            |cell| classification.is_water(cell),
            count,
            reserved,
            &self.obstacles,
            rng,
        );
        let placed = count_u32(obstacles.len());
        if placed < count {
            warn!(
                requested = count,
                placed,
                "obstacle attempt cap reached before every obstacle was placed"
            );
        } else {
            debug!(placed, "scattered obstacles");
        }

        let report = GenerationReport {
            terrain: self.report,
            obstacles_requested: count,
            obstacles_placed: placed,
        };
        TerrainContext::new(self.size, classification, obstacles, report)
    }
}

/// Draws uniformly from `low..=high`, returning `low` when the range is empty.
pub(crate) fn draw_inclusive<R>(rng: &mut R, low: u32, high: u32) -> u32
where
    R: Rng + ?Sized,
{
    if high <= low {
        low
    } else {
        rng.gen_range(low..=high)
    }
}

/// Draws a uniformly random cell, or `None` for an empty grid.
pub(crate) fn random_cell<R>(size: GridSize, rng: &mut R) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    if size.is_empty() {
        return None;
    }
    let row = rng.gen_range(0..size.rows());
    let column = rng.gen_range(0..size.columns());
    Some(CellCoord::new(row, column))
}

/// Range of indices that keep one cell clear of both borders along an axis.
///
/// Axes shorter than three cells have no such interior, so the whole axis is used.
pub(crate) const fn interior_bounds(length: u32) -> (u32, u32) {
    if length >= 3 {
        (1, length - 2)
    } else {
        (0, length.saturating_sub(1))
    }
}

pub(crate) fn count_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
