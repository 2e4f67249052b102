/*!
 * Owner Operations
 * Bulk release and statistics keyed by allocation owner
 */

use super::super::types::{HandleId, OwnerMemoryStats};
use super::MemoryManager;
use crate::core::types::{Owner, Size};
use log::info;

impl MemoryManager {
    /// Release every handle tagged with `owner`, returning the slots freed
    pub fn release_owner(&mut self, owner: Owner) -> Size {
        let ids = self.owner_handles(owner);
        let mut freed_slots = 0;
        for id in &ids {
            if let Some(size) = self.block_size(*id) {
                if self.release(*id) {
                    freed_slots += size;
                }
            }
        }
        self.owner_tracking.remove(&owner);

        if !ids.is_empty() {
            info!(
                "Released {} slots ({} handles) owned by {} ({} slots now free)",
                freed_slots,
                ids.len(),
                owner,
                self.pool.free()
            );
        }

        freed_slots
    }

    /// Live handles owned by `owner`, in offset order
    pub fn owner_handles(&self, owner: Owner) -> Vec<HandleId> {
        self.table
            .iter()
            .filter(|(_, handle)| handle.owner == owner)
            .map(|(id, _)| id)
            .collect()
    }

    /// Current, peak and count statistics for `owner`
    pub fn owner_stats(&self, owner: Owner) -> OwnerMemoryStats {
        self.owner_tracking
            .get(&owner)
            .map(|track| OwnerMemoryStats {
                owner,
                current_slots: track.current_slots,
                peak_slots: track.peak_slots,
                allocation_count: track.allocation_count,
            })
            .unwrap_or(OwnerMemoryStats {
                owner,
                ..OwnerMemoryStats::default()
            })
    }
}
