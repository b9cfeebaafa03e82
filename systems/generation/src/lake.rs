//! Irregular lakes grown from a random seed by frontier expansion.

use std::collections::BTreeSet;

use rand::Rng;
use tileworld_core::{adjacent, CellCoord, GridSize};

use crate::{draw_inclusive, interior_bounds};

/// Size range and budgets for lake growth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LakeTuning {
    /// Smallest lake size drawn, seed included.
    pub min_size: u32,
    /// Largest lake size drawn, seed included.
    pub max_size: u32,
    /// Maximum number of frontier pops before growth stops.
    pub frontier_pop_cap: u32,
    /// Maximum number of draws while looking for a dry seed cell.
    pub seed_draw_cap: u32,
}

impl Default for LakeTuning {
    fn default() -> Self {
        Self {
            min_size: 10,
            max_size: 15,
            frontier_pop_cap: 400,
            seed_draw_cap: 100,
        }
    }
}

/// Connected blob of lake cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lake {
    seed: Option<CellCoord>,
    target: u32,
    cells: Vec<CellCoord>,
}

impl Lake {
    /// Cell the lake grew from, if a dry seed was found.
    #[must_use]
    pub const fn seed(&self) -> Option<CellCoord> {
        self.seed
    }

    /// Size the lake aimed for.
    #[must_use]
    pub const fn target(&self) -> u32 {
        self.target
    }

    /// Lake cells in acceptance order, starting with the seed.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }
}

/// Grows a lake that never overlaps the river.
///
/// Growth picks a uniformly random frontier cell on each pop. Frontier cells
/// are always neighbours of accepted cells, so the lake stays connected to
/// its seed. Growth stops at the target size, when the frontier empties, or
/// when the pop budget runs out.
pub fn generate_lake<R>(
    size: GridSize,
    river: &BTreeSet<CellCoord>,
    tuning: &LakeTuning,
    rng: &mut R,
) -> Lake
where
    R: Rng + ?Sized,
{
    let target = draw_inclusive(rng, tuning.min_size, tuning.max_size);
    let Some(seed) = pick_seed(size, river, tuning.seed_draw_cap, rng) else {
        return Lake {
            seed: None,
            target,
            cells: Vec::new(),
        };
    };

    let target_len = usize::try_from(target).unwrap_or(usize::MAX);
    let mut growth = Growth::new(seed, size);
    for _ in 0..tuning.frontier_pop_cap {
        if growth.cells.len() >= target_len || growth.frontier.is_empty() {
            break;
        }

        let index = rng.gen_range(0..growth.frontier.len());
        let candidate = growth.frontier.swap_remove(index);
        if river.contains(&candidate) || growth.accepted.contains(&candidate) {
            continue;
        }
        growth.accept(candidate, size);
    }

    Lake {
        seed: Some(seed),
        target,
        cells: growth.cells,
    }
}

fn pick_seed<R>(
    size: GridSize,
    river: &BTreeSet<CellCoord>,
    draw_cap: u32,
    rng: &mut R,
) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    if size.is_empty() {
        return None;
    }

    let (row_low, row_high) = interior_bounds(size.rows());
    let (column_low, column_high) = interior_bounds(size.columns());
    for _ in 0..draw_cap {
        let cell = CellCoord::new(
            draw_inclusive(rng, row_low, row_high),
            draw_inclusive(rng, column_low, column_high),
        );
        if !river.contains(&cell) {
            return Some(cell);
        }
    }
    None
}

#[derive(Debug)]
struct Growth {
    cells: Vec<CellCoord>,
    accepted: BTreeSet<CellCoord>,
    visited: BTreeSet<CellCoord>,
    frontier: Vec<CellCoord>,
}

impl Growth {
    fn new(seed: CellCoord, size: GridSize) -> Self {
        let mut growth = Self {
            cells: Vec::new(),
            accepted: BTreeSet::new(),
            visited: BTreeSet::from([seed]),
            frontier: Vec::new(),
        };
        growth.accept(seed, size);
        growth
    }

    fn accept(&mut self, cell: CellCoord, size: GridSize) {
        if !self.accepted.insert(cell) {
            return;
        }
        self.cells.push(cell);
        for neighbour in adjacent(cell, size) {
            if self.visited.insert(neighbour) {
                self.frontier.push(neighbour);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn lake_reaches_target_on_open_grid() {
        let size = GridSize::new(20, 20);
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let lake = generate_lake(size, &BTreeSet::new(), &LakeTuning::default(), &mut rng);

        assert!((10..=15).contains(&lake.target()));
        assert_eq!(lake.cells().len(), lake.target() as usize);
        assert_eq!(lake.cells().first().copied(), lake.seed());
    }

    #[test]
    fn lake_avoids_river_cells() {
        let size = GridSize::new(12, 12);
        let river: BTreeSet<CellCoord> = (0..12).map(|column| CellCoord::new(6, column)).collect();
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let lake = generate_lake(size, &river, &LakeTuning::default(), &mut rng);
            assert!(lake.cells().iter().all(|cell| !river.contains(cell)));
        }
    }

    #[test]
    fn enclosed_seed_stops_when_frontier_empties() {
        // A 3x3 grid whose only interior cell is ringed by river.
        let size = GridSize::new(3, 3);
        let river: BTreeSet<CellCoord> = size
            .cells()
            .filter(|cell| *cell != CellCoord::new(1, 1))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let lake = generate_lake(size, &river, &LakeTuning::default(), &mut rng);

        assert_eq!(lake.cells(), &[CellCoord::new(1, 1)]);
        assert!(lake.cells().len() < lake.target() as usize);
    }

    #[test]
    fn fully_flooded_grid_has_no_seed() {
        let size = GridSize::new(4, 4);
        let river: BTreeSet<CellCoord> = size.cells().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let lake = generate_lake(size, &river, &LakeTuning::default(), &mut rng);

        assert_eq!(lake.seed(), None);
        assert!(lake.cells().is_empty());
    }
}
