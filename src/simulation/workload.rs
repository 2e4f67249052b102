/*!
 * Synthetic Workload
 * Random allocate/release churn whose intensity the agent can throttle
 */

use crate::core::types::Size;
use crate::memory::{Allocator, HandleId, MemoryError};
use rand::Rng;
use tracing::{debug, warn};

/// Per-cycle counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkloadCycle {
    pub allocations: usize,
    pub releases: usize,
    pub failed_allocations: usize,
}

/// Allocation workload driven through any [`Allocator`]
///
/// Handle ids survive compaction, so the live set stays usable across
/// defragmentation without re-keying.
#[derive(Debug, Clone)]
pub struct Workload {
    intensity: usize,
    initial_intensity: usize,
    max_request: Size,
    live: Vec<HandleId>,
    failed_allocations: usize,
}

impl Workload {
    pub fn new(intensity: usize, max_request: Size) -> Self {
        Self {
            intensity,
            initial_intensity: intensity,
            max_request: max_request.max(1),
            live: Vec::new(),
            failed_allocations: 0,
        }
    }

    pub fn intensity(&self) -> usize {
        self.intensity
    }

    pub fn live_handles(&self) -> &[HandleId] {
        &self.live
    }

    pub fn failed_allocations(&self) -> usize {
        self.failed_allocations
    }

    /// Halve the operations per cycle, never below one
    pub fn throttle(&mut self) {
        self.intensity = (self.intensity / 2).max(1);
        debug!(intensity = self.intensity, "workload throttled");
    }

    /// Step the intensity back toward its configured value
    pub fn recover(&mut self) {
        self.intensity = (self.intensity + 1).min(self.initial_intensity);
    }

    /// Issue `intensity` random allocate/release operations
    pub fn run_cycle<A, R>(&mut self, memory: &mut A, rng: &mut R) -> WorkloadCycle
    where
        A: Allocator,
        R: Rng,
    {
        let mut cycle = WorkloadCycle::default();
        for _ in 0..self.intensity {
            if !self.live.is_empty() && rng.gen_bool(0.5) {
                let victim = self.live.swap_remove(rng.gen_range(0..self.live.len()));
                if memory.release(victim) {
                    cycle.releases += 1;
                }
                continue;
            }

            let size = rng.gen_range(1..=self.max_request);
            match memory.allocate(size) {
                Ok(id) => {
                    self.live.push(id);
                    cycle.allocations += 1;
                }
                Err(MemoryError::AllocationFailed { .. }) => {
                    cycle.failed_allocations += 1;
                }
                Err(e) => {
                    warn!(error = %e, "workload allocation error");
                    cycle.failed_allocations += 1;
                }
            }
        }
        self.failed_allocations += cycle.failed_allocations;
        cycle
    }
}
