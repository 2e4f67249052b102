/*!
 * Memory Traits
 * Slot pool abstractions
 */

use super::manager::FragmentationReport;
use super::types::*;
use crate::core::types::Size;

/// Slot allocator interface
pub trait Allocator {
    /// Reserve `size` contiguous slots
    fn allocate(&mut self, size: Size) -> MemoryResult<HandleId>;

    /// Release a handle. Unknown ids are a no-op and return false.
    fn release(&mut self, id: HandleId) -> bool;

    /// Check if a handle is live
    fn is_valid(&self, id: HandleId) -> bool;

    /// Get the size of a live handle
    fn block_size(&self, id: HandleId) -> Option<Size>;
}

/// Compaction interface
pub trait Compactor {
    /// Pack live handles into a gap-free prefix of the pool
    fn defragment(&mut self) -> CompactionStats;
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Describe how the free space is split up
    fn fragmentation(&self) -> FragmentationReport;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}

/// Allocate, and on fragmentation failure compact once and retry
///
/// The allocator itself never retries; this is the caller-level strategy.
pub fn allocate_or_compact<M>(memory: &mut M, size: Size) -> MemoryResult<HandleId>
where
    M: Allocator + Compactor,
{
    match memory.allocate(size) {
        Err(MemoryError::AllocationFailed { free, .. }) if free >= size => {
            memory.defragment();
            memory.allocate(size)
        }
        other => other,
    }
}
