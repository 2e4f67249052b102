/*!
 * Memory Allocator Implementation
 * First-fit allocation and idempotent release
 */

use super::super::types::{Handle, HandleId, MemoryError, MemoryPressure, MemoryResult};
use super::MemoryManager;
use crate::core::limits::PRESSURE_MEDIUM_RATIO;
use crate::core::types::{Owner, Size, Slot, ANONYMOUS_OWNER};
use log::{debug, error, info, warn};

impl MemoryManager {
    /// Allocate `size` contiguous slots at the lowest offset that fits
    pub fn allocate(&mut self, size: Size) -> MemoryResult<HandleId> {
        self.allocate_for(size, ANONYMOUS_OWNER)
    }

    /// Allocate `size` contiguous slots tagged with `owner`
    pub fn allocate_for(&mut self, size: Size, owner: Owner) -> MemoryResult<HandleId> {
        let capacity = self.pool.capacity();
        if size == 0 || size > capacity {
            warn!(
                "Rejected allocation of {} slots for owner {} (capacity {})",
                size, owner, capacity
            );
            return Err(MemoryError::InvalidSizeRequest {
                requested: size,
                capacity,
            });
        }

        // Candidate starts are 0..capacity - size; the final offset is never probed
        let scan_limit = capacity - size;
        let Some(offset) = self
            .pool
            .find_first_fit(size)
            .filter(|offset| *offset < scan_limit)
        else {
            self.failed_allocations += 1;
            let free = self.pool.free();
            let largest_free_run = self
                .pool
                .free_runs()
                .iter()
                .map(|(_, len)| *len)
                .max()
                .unwrap_or(0);
            warn!(
                "Allocation of {} slots for owner {} failed: {} slots free, largest run {}",
                size, owner, free, largest_free_run
            );
            return Err(MemoryError::AllocationFailed {
                requested: size,
                free,
                largest_free_run,
            });
        };

        if !self.pool.try_reserve(offset, size) {
            error!(
                "Slot pool rejected first-fit range {}..{} for owner {}",
                offset,
                offset + size,
                owner
            );
            return Err(MemoryError::CorruptionDetected(offset));
        }

        let id = self.table.insert(Handle::new(offset, size, owner));
        self.owner_tracking
            .entry(owner)
            .or_insert_with(super::tracking::OwnerMemoryTracking::new)
            .add_allocation(size);

        let used = self.pool.occupied();
        if let Some(level) = self.check_memory_pressure(used) {
            warn!(
                "Memory pressure {}: Allocated {} slots at {} as {} for owner {} ({:.1}% used: {} / {})",
                level,
                size,
                offset,
                id,
                owner,
                (used as f64 / capacity as f64) * 100.0,
                used,
                capacity
            );
        } else {
            debug!(
                "Allocated {} slots at {} as {} for owner {}",
                size, offset, id, owner
            );
        }

        Ok(id)
    }

    /// Release a handle
    ///
    /// Unknown and already-released ids are ignored; the return value tells
    /// the caller whether anything was freed.
    pub fn release(&mut self, id: HandleId) -> bool {
        let Some(handle) = self.table.remove(id) else {
            debug!("Ignoring release of unknown or stale handle {}", id);
            return false;
        };

        self.pool.release(handle.offset, handle.size);
        if let Some(track) = self.owner_tracking.get_mut(&handle.owner) {
            track.remove_allocation(handle.size);
        }

        debug!(
            "Released {} slots at {} ({}), {} slots now free",
            handle.size,
            handle.offset,
            id,
            self.pool.free()
        );
        true
    }

    /// Check if a handle is live
    pub fn is_valid(&self, id: HandleId) -> bool {
        self.table.get(id).is_some()
    }

    /// Get the size of a live handle
    pub fn block_size(&self, id: HandleId) -> Option<Size> {
        self.table.get(id).map(|handle| handle.size)
    }

    /// Current start slot of a live handle
    pub fn offset_of(&self, id: HandleId) -> Option<Slot> {
        self.table.get(id).map(|handle| handle.offset)
    }

    /// Snapshot of a live handle record
    pub fn handle(&self, id: HandleId) -> Option<Handle> {
        self.table.get(id).copied()
    }

    /// Id of the live handle whose range starts at `offset`
    pub fn handle_at(&self, offset: Slot) -> Option<HandleId> {
        self.table.at_offset(offset)
    }

    /// All live handles in ascending offset order
    pub fn live_handles(&self) -> Vec<(HandleId, Handle)> {
        self.table.iter().map(|(id, handle)| (id, *handle)).collect()
    }

    /// Set the pin flag on a live handle
    ///
    /// The flag is recorded only; compaction relocates pinned handles too.
    pub fn set_pinned(&mut self, id: HandleId, pinned: bool) -> MemoryResult<()> {
        if self.table.set_pinned(id, pinned) {
            info!("Handle {} pinned={}", id, pinned);
            Ok(())
        } else {
            Err(MemoryError::InvalidHandle(id))
        }
    }

    /// Check memory pressure level
    pub(super) fn check_memory_pressure(&self, used: Size) -> Option<MemoryPressure> {
        let usage_ratio = used as f64 / self.pool.capacity() as f64;

        if usage_ratio >= self.critical_threshold {
            Some(MemoryPressure::Critical)
        } else if usage_ratio >= self.warning_threshold {
            Some(MemoryPressure::High)
        } else if usage_ratio >= PRESSURE_MEDIUM_RATIO {
            Some(MemoryPressure::Medium)
        } else {
            None
        }
    }
}
