//! Terrain bands, elevation, and the immutable terrain context.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{CellCoord, GridSize, Orientation};

const CLASSIFIED_BANDS: usize = 8;

/// Classification band assigned to a cell for elevation purposes.
///
/// Variants are declared in resolution priority: when a cell belongs to more
/// than one band, the earliest variant wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    /// Mountain top.
    Peak,
    /// Ring directly around peaks.
    SlopeNear,
    /// Second ring around peaks.
    SlopeInner,
    /// Cell on the river path.
    River,
    /// Cell inside the lake.
    Lake,
    /// Dry cell orthogonally touching the river.
    RiverAdjacent,
    /// Dry cell orthogonally touching the lake.
    LakeAdjacent,
    /// Third ring around peaks.
    SlopeOuter,
    /// Land not claimed by any other band.
    Base,
}

impl Band {
    /// Every band in resolution order.
    pub const PRIORITY: [Band; 9] = [
        Band::Peak,
        Band::SlopeNear,
        Band::SlopeInner,
        Band::River,
        Band::Lake,
        Band::RiverAdjacent,
        Band::LakeAdjacent,
        Band::SlopeOuter,
        Band::Base,
    ];

    /// Elevation assigned to every cell resolved to this band.
    #[must_use]
    pub const fn elevation(self) -> Elevation {
        match self {
            Self::Peak => Elevation::from_half_steps(4),
            Self::SlopeNear => Elevation::from_half_steps(2),
            Self::SlopeInner => Elevation::from_half_steps(1),
            Self::River | Self::Lake | Self::RiverAdjacent | Self::LakeAdjacent => {
                Elevation::from_half_steps(-4)
            }
            Self::SlopeOuter => Elevation::from_half_steps(0),
            Self::Base => Elevation::from_half_steps(-2),
        }
    }

    /// Reports whether the band is open water.
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::River | Self::Lake)
    }

    /// Human readable band name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Peak => "peak",
            Self::SlopeNear => "slope (near)",
            Self::SlopeInner => "slope (inner)",
            Self::River => "river",
            Self::Lake => "lake",
            Self::RiverAdjacent => "riverbank",
            Self::LakeAdjacent => "lakeshore",
            Self::SlopeOuter => "slope (outer)",
            Self::Base => "land",
        }
    }

    const fn slot(self) -> Option<usize> {
        match self {
            Self::Peak => Some(0),
            Self::SlopeNear => Some(1),
            Self::SlopeInner => Some(2),
            Self::River => Some(3),
            Self::Lake => Some(4),
            Self::RiverAdjacent => Some(5),
            Self::LakeAdjacent => Some(6),
            Self::SlopeOuter => Some(7),
            Self::Base => None,
        }
    }
}

/// Discrete elevation measured in half steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Elevation(i8);

impl Elevation {
    /// Creates an elevation from a count of half steps.
    #[must_use]
    pub const fn from_half_steps(half_steps: i8) -> Self {
        Self(half_steps)
    }

    /// Elevation expressed in half steps.
    #[must_use]
    pub const fn half_steps(&self) -> i8 {
        self.0
    }

    /// Elevation expressed in whole steps, e.g. `0.5` for the inner slope.
    #[must_use]
    pub fn steps(&self) -> f32 {
        f32::from(self.0) / 2.0
    }
}

/// Named cell sets produced by terrain generation.
///
/// Sets may overlap. [`TerrainClassification::band_of`] is the single place
/// where overlaps are resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainClassification {
    sets: [BTreeSet<CellCoord>; CLASSIFIED_BANDS],
}

impl TerrainClassification {
    /// Creates a classification with every set empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell to a band, returning whether it was newly inserted.
    ///
    /// [`Band::Base`] is implicit and never stored, so inserting it returns `false`.
    pub fn insert(&mut self, band: Band, cell: CellCoord) -> bool {
        match band.slot() {
            Some(slot) => self.sets[slot].insert(cell),
            None => false,
        }
    }

    /// Adds every cell produced by the iterator to a band.
    pub fn extend<I>(&mut self, band: Band, cells: I)
    where
        I: IntoIterator<Item = CellCoord>,
    {
        if let Some(slot) = band.slot() {
            self.sets[slot].extend(cells);
        }
    }

    /// Reports whether the band's own set contains the cell, ignoring priority.
    #[must_use]
    pub fn contains(&self, band: Band, cell: CellCoord) -> bool {
        band.slot()
            .is_some_and(|slot| self.sets[slot].contains(&cell))
    }

    /// Iterates over the cells stored for a band in ascending order.
    pub fn cells(&self, band: Band) -> impl Iterator<Item = CellCoord> + '_ {
        band.slot()
            .map(|slot| &self.sets[slot])
            .into_iter()
            .flatten()
            .copied()
    }

    /// Number of cells stored for a band, ignoring priority.
    #[must_use]
    pub fn len(&self, band: Band) -> usize {
        band.slot().map_or(0, |slot| self.sets[slot].len())
    }

    /// Reports whether no cell is stored for a band.
    #[must_use]
    pub fn is_empty(&self, band: Band) -> bool {
        self.len(band) == 0
    }

    /// Resolves the effective band of a cell using [`Band::PRIORITY`].
    #[must_use]
    pub fn band_of(&self, cell: CellCoord) -> Band {
        Band::PRIORITY
            .into_iter()
            .find(|band| self.contains(*band, cell))
            .unwrap_or(Band::Base)
    }

    /// Elevation of the cell after priority resolution.
    #[must_use]
    pub fn elevation_of(&self, cell: CellCoord) -> Elevation {
        self.band_of(cell).elevation()
    }

    /// Reports whether the cell lies on the river or in the lake.
    #[must_use]
    pub fn is_water(&self, cell: CellCoord) -> bool {
        self.contains(Band::River, cell) || self.contains(Band::Lake, cell)
    }
}

/// Requested versus delivered counts for the terrain generation stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainReport {
    /// Axis the river crosses.
    pub river_orientation: Orientation,
    /// Number of cells on the river path.
    pub river_cells: u32,
    /// Lake size drawn for this run.
    pub lake_target: u32,
    /// Lake size actually grown.
    pub lake_cells: u32,
    /// Number of mountain clusters drawn for this run.
    pub clusters_requested: u32,
    /// Number of clusters that passed every spacing check.
    pub clusters_placed: u32,
    /// Total peak cells across accepted clusters.
    pub peak_cells: u32,
}

impl TerrainReport {
    /// Reports whether the lake and mountain targets were fully met.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.lake_cells >= self.lake_target && self.clusters_placed >= self.clusters_requested
    }
}

/// Generation-quality signal for a whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Terrain stage counts.
    pub terrain: TerrainReport,
    /// Number of obstacles the session asked for.
    pub obstacles_requested: u32,
    /// Number of obstacles placed before the attempt cap.
    pub obstacles_placed: u32,
}

impl GenerationReport {
    /// Reports whether every generation target was met.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.terrain.is_complete() && self.obstacles_placed >= self.obstacles_requested
    }
}

/// Immutable terrain description shared by reference with every consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainContext {
    size: GridSize,
    classification: TerrainClassification,
    obstacles: BTreeSet<CellCoord>,
    report: GenerationReport,
}

impl TerrainContext {
    /// Assembles a terrain context from generated parts.
    #[must_use]
    pub fn new(
        size: GridSize,
        classification: TerrainClassification,
        obstacles: BTreeSet<CellCoord>,
        report: GenerationReport,
    ) -> Self {
        Self {
            size,
            classification,
            obstacles,
            report,
        }
    }

    /// Dimensions of the terrain grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Underlying classification sets.
    #[must_use]
    pub const fn classification(&self) -> &TerrainClassification {
        &self.classification
    }

    /// Cells the character cannot occupy.
    #[must_use]
    pub const fn obstacles(&self) -> &BTreeSet<CellCoord> {
        &self.obstacles
    }

    /// Generation-quality signal for the session.
    #[must_use]
    pub const fn report(&self) -> &GenerationReport {
        &self.report
    }

    /// Effective band of a cell.
    #[must_use]
    pub fn band_of(&self, cell: CellCoord) -> Band {
        self.classification.band_of(cell)
    }

    /// Effective elevation of a cell.
    #[must_use]
    pub fn elevation_of(&self, cell: CellCoord) -> Elevation {
        self.classification.elevation_of(cell)
    }

    /// Reports whether the cell is river or lake.
    #[must_use]
    pub fn is_water(&self, cell: CellCoord) -> bool {
        self.classification.is_water(cell)
    }

    /// Reports whether an obstacle occupies the cell.
    #[must_use]
    pub fn is_obstacle(&self, cell: CellCoord) -> bool {
        self.obstacles.contains(&cell)
    }
}
