//! Mountain clusters placed away from water and from each other.

use std::collections::BTreeSet;

use rand::{seq::SliceRandom, Rng};
use tileworld_core::{adjacent, CellCoord, GridSize};

use crate::{draw_inclusive, random_cell};

const GROWTH_TRIES_PER_CELL: u32 = 8;

/// Cluster counts, sizes, and spacing for mountain placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountainTuning {
    /// Fewest clusters requested per run.
    pub min_clusters: u32,
    /// Most clusters requested per run.
    pub max_clusters: u32,
    /// Smallest cluster size drawn.
    pub min_cluster_size: u32,
    /// Largest cluster size drawn.
    pub max_cluster_size: u32,
    /// Global cap on peak cells across all clusters.
    pub peak_budget: u32,
    /// Candidate clusters tried per requested cluster.
    pub attempts_per_cluster: u32,
    /// Candidates closer than or equal to this distance from an accepted peak are rejected.
    pub peak_spacing: u32,
    /// Candidates closer than this distance to any water cell are rejected.
    pub water_clearance: u32,
}

impl Default for MountainTuning {
    fn default() -> Self {
        Self {
            min_clusters: 5,
            max_clusters: 6,
            min_cluster_size: 2,
            max_cluster_size: 4,
            peak_budget: 16,
            attempts_per_cluster: 100,
            peak_spacing: 8,
            water_clearance: 5,
        }
    }
}

/// Accepted mountain clusters in placement order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mountains {
    requested: u32,
    clusters: Vec<Vec<CellCoord>>,
}

impl Mountains {
    /// Number of clusters drawn for this run.
    #[must_use]
    pub const fn requested_clusters(&self) -> u32 {
        self.requested
    }

    /// Clusters that passed every spacing check.
    #[must_use]
    pub fn clusters(&self) -> &[Vec<CellCoord>] {
        &self.clusters
    }

    /// Every peak cell across accepted clusters.
    pub fn peaks(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.clusters.iter().flatten().copied()
    }
}

/// Places mountain clusters by repeated random walks.
///
/// Candidate clusters are rejected when any cell lies within
/// [`MountainTuning::peak_spacing`] of an accepted peak, sits on water, or
/// comes closer than [`MountainTuning::water_clearance`] to water. When the
/// attempt budget runs out, fewer clusters are returned.
pub fn generate_mountains<R>(
    size: GridSize,
    water: &BTreeSet<CellCoord>,
    tuning: &MountainTuning,
    rng: &mut R,
) -> Mountains
where
    R: Rng + ?Sized,
{
    let requested = draw_inclusive(rng, tuning.min_clusters, tuning.max_clusters);
    let budget = requested.saturating_mul(tuning.attempts_per_cluster);
    let peak_budget = usize::try_from(tuning.peak_budget).unwrap_or(usize::MAX);
    let mut clusters: Vec<Vec<CellCoord>> = Vec::new();
    let mut peaks: Vec<CellCoord> = Vec::new();

    for _ in 0..budget {
        if clusters.len() >= requested as usize || peaks.len() >= peak_budget {
            break;
        }

        let Some(seed) = random_cell(size, rng) else {
            break;
        };
        let remaining = u32::try_from(peak_budget - peaks.len()).unwrap_or(u32::MAX);
        let target = draw_inclusive(rng, tuning.min_cluster_size, tuning.max_cluster_size)
            .min(remaining);
        let cluster = grow_cluster(seed, target, size, rng);
        if cluster.len() < target as usize {
            continue;
        }
        if violates_spacing(&cluster, &peaks, water, tuning) {
            continue;
        }

        peaks.extend(cluster.iter().copied());
        clusters.push(cluster);
    }

    Mountains {
        requested,
        clusters,
    }
}

fn grow_cluster<R>(seed: CellCoord, target: u32, size: GridSize, rng: &mut R) -> Vec<CellCoord>
where
    R: Rng + ?Sized,
{
    let target_len = target as usize;
    let mut cluster = vec![seed];
    for _ in 0..target.saturating_mul(GROWTH_TRIES_PER_CELL) {
        if cluster.len() >= target_len {
            break;
        }

        let Some(anchor) = cluster.choose(rng).copied() else {
            break;
        };
        let candidates: Vec<CellCoord> = adjacent(anchor, size)
            .into_iter()
            .filter(|cell| !cluster.contains(cell))
            .collect();
        if let Some(next) = candidates.choose(rng) {
            cluster.push(*next);
        }
    }
    cluster
}

fn violates_spacing(
    cluster: &[CellCoord],
    peaks: &[CellCoord],
    water: &BTreeSet<CellCoord>,
    tuning: &MountainTuning,
) -> bool {
    cluster.iter().any(|cell| {
        peaks
            .iter()
            .any(|peak| cell.manhattan_distance(*peak) <= tuning.peak_spacing)
            || water.contains(cell)
            || water
                .iter()
                .any(|wet| cell.manhattan_distance(*wet) < tuning.water_clearance)
    })
}
