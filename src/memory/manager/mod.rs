/*!
 * Memory Management
 *
 * Fixed-capacity slot pool with first-fit allocation and sliding compaction.
 *
 * ## Layout
 *
 * - **Slot pool**: one occupancy flag per capacity unit. A slot is occupied
 *   iff exactly one live handle covers it.
 * - **Handle table**: generational ids pointing at `{offset, size, pinned, owner}`
 *   records. Ids are not offsets, so compaction can move data without
 *   invalidating ids held by callers.
 *
 * ## Operations
 *
 * - `allocate` scans for the lowest free run that fits (first-fit, O(capacity))
 * - `release` is idempotent: unknown or stale ids are ignored
 * - `defragment` slides every live handle toward slot 0 in address order
 * - `fragmentation` summarizes free runs for the decision loop
 */

mod allocator;
mod compactor;
mod fragmentation;
mod handle_table;
mod owners;
mod slot_pool;
mod tracking;

pub use fragmentation::{compute_fragmentation_ratio, FragmentationReport};
pub use slot_pool::SlotPool;

use super::traits::{Allocator, Compactor, MemoryInfo};
use super::types::{CompactionStats, HandleId, MemoryStats};
use crate::core::limits::{PRESSURE_CRITICAL_RATIO, PRESSURE_HIGH_RATIO};
use crate::core::types::{Owner, Size};
use ahash::HashMap;
use handle_table::HandleTable;
use log::info;
use tracking::OwnerMemoryTracking;

/// Memory manager
///
/// Owns the slot pool and handle table exclusively; every mutator takes
/// `&mut self`.
#[derive(Debug, Clone)]
pub struct MemoryManager {
    pool: SlotPool,
    table: HandleTable,
    // Memory pressure thresholds (ratio of capacity)
    warning_threshold: f64,  // 80%
    critical_threshold: f64, // 95%
    owner_tracking: HashMap<Owner, OwnerMemoryTracking>,
    failed_allocations: usize,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::with_capacity(crate::core::limits::DEFAULT_POOL_CAPACITY)
    }

    /// Create memory manager with custom capacity (useful for testing)
    pub fn with_capacity(capacity: Size) -> Self {
        info!(
            "Memory manager initialized with {} slots (first-fit allocation, sliding compaction)",
            capacity
        );
        Self {
            pool: SlotPool::new(capacity),
            table: HandleTable::new(),
            warning_threshold: PRESSURE_HIGH_RATIO,
            critical_threshold: PRESSURE_CRITICAL_RATIO,
            owner_tracking: HashMap::default(),
            failed_allocations: 0,
        }
    }

    pub fn capacity(&self) -> Size {
        self.pool.capacity()
    }

    /// Read-only view of the slot pool
    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }

    /// Number of allocation requests that could not be satisfied
    pub fn failed_allocations(&self) -> usize {
        self.failed_allocations
    }

    /// Get overall memory info: (capacity, used, available)
    pub fn info(&self) -> (Size, Size, Size) {
        (self.pool.capacity(), self.pool.occupied(), self.pool.free())
    }

    /// Get detailed memory statistics
    pub fn stats(&self) -> MemoryStats {
        let capacity = self.pool.capacity();
        let used = self.pool.occupied();
        let runs = self.pool.free_runs();
        let usage_percentage = if capacity == 0 {
            0.0
        } else {
            (used as f64 / capacity as f64) * 100.0
        };

        MemoryStats {
            capacity,
            used,
            available: capacity - used,
            usage_percentage,
            live_handles: self.table.len(),
            free_runs: runs.len(),
            largest_free_run: runs.iter().map(|(_, len)| *len).max().unwrap_or(0),
        }
    }
}

// Implement trait interfaces
impl Allocator for MemoryManager {
    fn allocate(&mut self, size: Size) -> super::types::MemoryResult<HandleId> {
        MemoryManager::allocate(self, size)
    }

    fn release(&mut self, id: HandleId) -> bool {
        MemoryManager::release(self, id)
    }

    fn is_valid(&self, id: HandleId) -> bool {
        MemoryManager::is_valid(self, id)
    }

    fn block_size(&self, id: HandleId) -> Option<Size> {
        MemoryManager::block_size(self, id)
    }
}

impl Compactor for MemoryManager {
    fn defragment(&mut self) -> CompactionStats {
        MemoryManager::defragment(self)
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn fragmentation(&self) -> FragmentationReport {
        MemoryManager::fragmentation(self)
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}
