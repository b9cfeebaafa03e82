//! Winding river paths that cross the grid between two opposite edges.

use std::collections::BTreeSet;

use rand::Rng;
use tileworld_core::{CellCoord, GridSize, Orientation};

use crate::{draw_inclusive, interior_bounds};

/// Limits applied when planning the river's waypoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiverTuning {
    /// Fewest intermediate waypoints between the two edges.
    pub min_waypoints: u32,
    /// Most intermediate waypoints between the two edges.
    pub max_waypoints: u32,
    /// Largest perpendicular jog between consecutive waypoints.
    pub max_jog: u32,
}

impl Default for RiverTuning {
    fn default() -> Self {
        Self {
            min_waypoints: 2,
            max_waypoints: 4,
            max_jog: 2,
        }
    }
}

/// Ordered, connected path of river cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct River {
    orientation: Orientation,
    cells: Vec<CellCoord>,
}

impl River {
    /// Axis the river crosses.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// River cells from the starting edge to the opposite edge.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }
}

/// Carves a river from one edge to the opposite edge.
///
/// Waypoints advance strictly along the primary axis and jog by a bounded
/// amount along the cross axis. Consecutive waypoints are joined by a run
/// along the primary axis followed by a run along the cross axis, so every
/// step of the path is orthogonal.
pub fn generate_river<R>(
    size: GridSize,
    orientation: Option<Orientation>,
    tuning: &RiverTuning,
    rng: &mut R,
) -> River
where
    R: Rng + ?Sized,
{
    let orientation = orientation.unwrap_or_else(|| {
        if rng.gen_bool(0.5) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    });

    if size.is_empty() {
        return River {
            orientation,
            cells: Vec::new(),
        };
    }

    let axes = Axes::new(size, orientation);
    let waypoints = plan_waypoints(axes, tuning, rng);
    River {
        orientation,
        cells: trace(&waypoints, axes),
    }
}

/// Maps `(primary, cross)` positions onto grid cells for an orientation.
#[derive(Clone, Copy, Debug)]
struct Axes {
    orientation: Orientation,
    primary_len: u32,
    cross_len: u32,
}

impl Axes {
    fn new(size: GridSize, orientation: Orientation) -> Self {
        let (primary_len, cross_len) = match orientation {
            Orientation::Horizontal => (size.columns(), size.rows()),
            Orientation::Vertical => (size.rows(), size.columns()),
        };
        Self {
            orientation,
            primary_len,
            cross_len,
        }
    }

    fn cell(&self, primary: u32, cross: u32) -> CellCoord {
        match self.orientation {
            Orientation::Horizontal => CellCoord::new(cross, primary),
            Orientation::Vertical => CellCoord::new(primary, cross),
        }
    }
}

fn plan_waypoints<R>(axes: Axes, tuning: &RiverTuning, rng: &mut R) -> Vec<(u32, u32)>
where
    R: Rng + ?Sized,
{
    let (low, high) = interior_bounds(axes.cross_len);
    let mut cross = draw_inclusive(rng, low, high);
    let mut waypoints = vec![(0, cross)];

    // Capping by the axis length keeps the stride at least one cell.
    let intermediate = draw_inclusive(rng, tuning.min_waypoints, tuning.max_waypoints)
        .min(axes.primary_len.saturating_sub(1));
    let stride = axes.primary_len / (intermediate + 1);

    for index in 1..=intermediate {
        let jog = draw_inclusive(rng, 1, tuning.max_jog.max(1));
        let shifted = if rng.gen_bool(0.5) {
            cross.saturating_add(jog)
        } else {
            cross.saturating_sub(jog)
        };
        cross = shifted.clamp(low, high);
        waypoints.push((index * stride, cross));
    }

    waypoints.push((axes.primary_len - 1, cross));
    waypoints
}

fn trace(waypoints: &[(u32, u32)], axes: Axes) -> Vec<CellCoord> {
    let mut path = PathTrace::default();
    let Some(&(mut primary, mut cross)) = waypoints.first() else {
        return Vec::new();
    };
    path.visit(axes.cell(primary, cross));

    for &(next_primary, next_cross) in &waypoints[1..] {
        while primary < next_primary {
            primary += 1;
            path.visit(axes.cell(primary, cross));
        }
        while cross != next_cross {
            if cross < next_cross {
                cross += 1;
            } else {
                cross -= 1;
            }
            path.visit(axes.cell(primary, cross));
        }
    }

    path.cells
}

#[derive(Debug, Default)]
struct PathTrace {
    cells: Vec<CellCoord>,
    seen: BTreeSet<CellCoord>,
}

impl PathTrace {
    fn visit(&mut self, cell: CellCoord) {
        if self.seen.insert(cell) {
            self.cells.push(cell);
        }
    }
}
