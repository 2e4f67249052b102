/*!
 * Fragmentation Metrics
 * Observational summary of how the free space is split
 */

use super::MemoryManager;
use crate::core::types::{Size, StateIndex};
use serde::{Deserialize, Serialize};

/// Fragmentation ratio: `1 - largest_run / total_free`, clamped to `[0, 1]`
///
/// An empty free set is unfragmented.
pub fn compute_fragmentation_ratio(total_free: Size, largest_run: Size) -> f64 {
    if total_free == 0 {
        return 0.0;
    }
    let largest = largest_run.min(total_free) as f64;
    (1.0 - largest / total_free as f64).clamp(0.0, 1.0)
}

/// Snapshot of the pool's free-space layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentationReport {
    pub capacity: Size,
    pub free_slots: Size,
    pub free_runs: usize,
    pub largest_free_run: Size,
    pub ratio: f64,
}

impl FragmentationReport {
    /// Discretize the ratio onto `[0, capacity)`; higher means worse packing
    pub fn state_index(&self) -> StateIndex {
        if self.capacity == 0 {
            return 0;
        }
        let top = (self.capacity - 1) as f64;
        ((self.ratio * top).round() as StateIndex).min(self.capacity - 1)
    }

    pub fn is_fragmented(&self) -> bool {
        self.free_runs > 1
    }
}

impl MemoryManager {
    /// Describe the current free-space layout
    pub fn fragmentation(&self) -> FragmentationReport {
        let runs = self.pool.free_runs();
        let free_slots = self.pool.free();
        let largest_free_run = runs.iter().map(|(_, len)| *len).max().unwrap_or(0);

        FragmentationReport {
            capacity: self.pool.capacity(),
            free_slots,
            free_runs: runs.len(),
            largest_free_run,
            ratio: compute_fragmentation_ratio(free_slots, largest_free_run),
        }
    }
}
