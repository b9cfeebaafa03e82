//! Rejection sampling of obstacle cells over dry land.

use std::collections::BTreeSet;

use rand::Rng;
use tileworld_core::{CellCoord, GridSize};

use crate::random_cell;

/// Rejection-sampling budget for obstacle scattering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleTuning {
    /// Maximum number of random draws before placement stops.
    pub attempt_cap: u32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self { attempt_cap: 200 }
    }
}

/// Scatters up to `count` obstacles on cells that are neither water nor `reserved`.
///
/// Draws that land on water, on the reserved cell, or on an existing
/// obstacle are discarded. When the attempt cap is reached the returned set
/// may hold fewer than `count` cells.
pub fn place_obstacles<R, F>(
    size: GridSize,
    is_water: F,
    count: u32,
    reserved: CellCoord,
    tuning: &ObstacleTuning,
    rng: &mut R,
) -> BTreeSet<CellCoord>
where
    R: Rng + ?Sized,
    F: Fn(CellCoord) -> bool,
{
    let wanted = usize::try_from(count).unwrap_or(usize::MAX);
    let mut placed = BTreeSet::new();
    for _ in 0..tuning.attempt_cap {
        if placed.len() >= wanted {
            break;
        }
        let Some(cell) = random_cell(size, rng) else {
            break;
        };
        if cell == reserved || is_water(cell) {
            continue;
        }
        let _ = placed.insert(cell);
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn places_requested_count_on_open_land() {
        let size = GridSize::new(12, 12);
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let obstacles = place_obstacles(
            size,
            |_| false,
            10,
            CellCoord::new(0, 0),
            &ObstacleTuning::default(),
            &mut rng,
        );
        assert_eq!(obstacles.len(), 10);
        assert!(!obstacles.contains(&CellCoord::new(0, 0)));
    }

    #[test]
    fn never_places_on_water() {
        let size = GridSize::new(8, 8);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let obstacles = place_obstacles(
            size,
            |cell| cell.column() < 4,
            12,
            CellCoord::new(7, 7),
            &ObstacleTuning::default(),
            &mut rng,
        );
        assert!(obstacles.iter().all(|cell| cell.column() >= 4));
        assert!(!obstacles.contains(&CellCoord::new(7, 7)));
    }

    #[test]
    fn attempt_cap_limits_placement() {
        let size = GridSize::new(3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let obstacles = place_obstacles(
            size,
            |cell| cell != CellCoord::new(1, 1),
            5,
            CellCoord::new(0, 0),
            &ObstacleTuning::default(),
            &mut rng,
        );
        assert!(obstacles.len() <= 1);
    }

    #[test]
    fn zero_cap_places_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let obstacles = place_obstacles(
            GridSize::new(5, 5),
            |_| false,
            3,
            CellCoord::new(0, 0),
            &ObstacleTuning { attempt_cap: 0 },
            &mut rng,
        );
        assert!(obstacles.is_empty());
    }
}
