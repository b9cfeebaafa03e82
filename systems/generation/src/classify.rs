//! Derives slope rings and shorelines from the generated base sets.

use std::collections::BTreeSet;

use tileworld_core::{adjacent, Band, CellCoord, GridSize, TerrainClassification};

/// Builds every classification set from peaks, river, and lake.
///
/// Each derived set is computed from its own base set, so a cell may land in
/// several sets. Overlaps are resolved later by
/// [`TerrainClassification::band_of`], never here.
#[must_use]
pub fn classify(
    size: GridSize,
    peaks: &BTreeSet<CellCoord>,
    river: &BTreeSet<CellCoord>,
    lake: &BTreeSet<CellCoord>,
) -> TerrainClassification {
    let slope_near = ring(size, peaks, &[peaks]);
    let slope_inner = ring(size, &slope_near, &[peaks, &slope_near]);
    let slope_outer = ring(size, &slope_inner, &[peaks, &slope_near, &slope_inner]);
    let river_adjacent = ring(size, river, &[river, lake]);
    let lake_adjacent = ring(size, lake, &[river, lake]);

    let mut classification = TerrainClassification::new();
    classification.extend(Band::Peak, peaks.iter().copied());
    classification.extend(Band::SlopeNear, slope_near);
    classification.extend(Band::SlopeInner, slope_inner);
    classification.extend(Band::SlopeOuter, slope_outer);
    classification.extend(Band::River, river.iter().copied());
    classification.extend(Band::Lake, lake.iter().copied());
    classification.extend(Band::RiverAdjacent, river_adjacent);
    classification.extend(Band::LakeAdjacent, lake_adjacent);
    classification
}

/// Neighbours of `base` that appear in none of the `excluded` sets.
fn ring(
    size: GridSize,
    base: &BTreeSet<CellCoord>,
    excluded: &[&BTreeSet<CellCoord>],
) -> BTreeSet<CellCoord> {
    base.iter()
        .flat_map(|cell| adjacent(*cell, size))
        .filter(|cell| !excluded.iter().any(|set| set.contains(cell)))
        .collect()
}
