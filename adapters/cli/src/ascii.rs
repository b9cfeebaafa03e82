//! Plain-text terrain view.

use std::{collections::BTreeMap, fmt::Write as _};

use tileworld_core::{Band, CellCoord, Elevation, TerrainContext};

const OBSTACLE_GLYPH: char = 'T';
const CHARACTER_GLYPH: char = '@';
const HISTOGRAM_WIDTH: usize = 40;

pub(crate) const fn glyph(band: Band) -> char {
    match band {
        Band::Peak => '^',
        Band::SlopeNear => 'n',
        Band::SlopeInner => ':',
        Band::SlopeOuter => '-',
        Band::River => '~',
        Band::Lake => '=',
        Band::RiverAdjacent => ',',
        Band::LakeAdjacent => ';',
        Band::Base => '.',
    }
}

/// Draws one glyph per cell; the character wins over obstacles, which win over bands.
pub(crate) fn render_map(terrain: &TerrainContext, character: Option<CellCoord>) -> String {
    let size = terrain.size();
    let capacity = size.cell_count() + size.rows() as usize;
    let mut map = String::with_capacity(capacity);
    for row in 0..size.rows() {
        for column in 0..size.columns() {
            let cell = CellCoord::new(row, column);
            let symbol = if character == Some(cell) {
                CHARACTER_GLYPH
            } else if terrain.is_obstacle(cell) {
                OBSTACLE_GLYPH
            } else {
                glyph(terrain.band_of(cell))
            };
            map.push(symbol);
        }
        map.push('\n');
    }
    map
}

pub(crate) fn legend() -> Vec<String> {
    let mut lines: Vec<String> = Band::PRIORITY
        .into_iter()
        .map(|band| {
            format!(
                "{}  {:<14} {:+.1}",
                glyph(band),
                band.label(),
                band.elevation().steps()
            )
        })
        .collect();
    lines.push(format!("{OBSTACLE_GLYPH}  obstacle"));
    lines.push(format!("{CHARACTER_GLYPH}  character"));
    lines
}

/// Bars of cell counts per elevation level, highest level first.
pub(crate) fn elevation_histogram(census: &[(Band, usize)]) -> Vec<String> {
    let mut levels: BTreeMap<Elevation, usize> = BTreeMap::new();
    for (band, count) in census {
        *levels.entry(band.elevation()).or_default() += count;
    }
    let widest = levels.values().copied().max().unwrap_or(0).max(1);

    levels
        .into_iter()
        .rev()
        .map(|(elevation, count)| {
            let bar = "#".repeat(count * HISTOGRAM_WIDTH / widest);
            let mut line = String::new();
            let _ = write!(line, "{:+5.1} | {bar} {count}", elevation.steps());
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_core::{
        GenerationReport, GridSize, Orientation, TerrainClassification, TerrainReport,
    };

    fn terrain() -> TerrainContext {
        let mut classification = TerrainClassification::new();
        let _ = classification.insert(Band::River, CellCoord::new(0, 1));
        let _ = classification.insert(Band::Peak, CellCoord::new(1, 0));
        let report = GenerationReport {
            terrain: TerrainReport {
                river_orientation: Orientation::Vertical,
                river_cells: 1,
                lake_target: 0,
                lake_cells: 0,
                clusters_requested: 1,
                clusters_placed: 1,
                peak_cells: 1,
            },
            obstacles_requested: 1,
            obstacles_placed: 1,
        };
        TerrainContext::new(
            GridSize::new(2, 3),
            classification,
            [CellCoord::new(1, 2)].into_iter().collect(),
            report,
        )
    }

    #[test]
    fn map_layers_character_over_obstacles_over_bands() {
        let map = render_map(&terrain(), Some(CellCoord::new(0, 0)));
        assert_eq!(map, "@~.\n^.T\n");
    }

    #[test]
    fn legend_lists_every_band() {
        let lines = legend();
        assert_eq!(lines.len(), Band::PRIORITY.len() + 2);
        assert!(lines[0].starts_with("^  peak"));
    }

    #[test]
    fn histogram_merges_bands_sharing_an_elevation() {
        let census = [(Band::River, 3), (Band::LakeAdjacent, 1), (Band::Peak, 2)];
        let lines = elevation_histogram(&census);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" +2.0 |"));
        assert!(lines[1].ends_with(" 4"));
    }
}
