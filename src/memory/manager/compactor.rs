/*!
 * Compactor
 * Sliding compaction of live handles toward slot 0
 */

use super::super::types::{CompactionStats, MemoryError};
use super::MemoryManager;
use crate::core::types::Size;
use log::{error, info};

impl MemoryManager {
    /// Pack every live handle into a gap-free prefix of the pool
    ///
    /// Handles keep their relative address order and their ids; only offsets
    /// change. Pinned handles move like any other. If the table and the pool
    /// disagree about how many slots are live, nothing is moved.
    pub fn defragment(&mut self) -> CompactionStats {
        info!("Defragmenting memory...");

        let order: Vec<_> = self
            .table
            .iter()
            .map(|(id, handle)| (id, handle.offset, handle.size))
            .collect();
        let mut stats = CompactionStats {
            handles: order.len(),
            ..CompactionStats::default()
        };

        let live: Size = order.iter().map(|(_, _, size)| *size).sum();
        if live != self.pool.occupied() {
            error!(
                "{}: {} live slots in handle table, {} occupied in pool; compaction skipped",
                MemoryError::CorruptionDetected(live.min(self.pool.occupied())),
                live,
                self.pool.occupied()
            );
            return stats;
        }

        let gaps_before = self.interior_gaps();
        self.pool.reset();

        // Live sizes sum to the old occupancy, so every prefix reservation fits
        let mut cursor = 0;
        for (id, offset, size) in order {
            let reserved = self.pool.try_reserve(cursor, size);
            debug_assert!(reserved, "compaction reserve failed at {}", cursor);
            if offset != cursor {
                self.table.relocate(id, cursor);
                stats.relocated += 1;
                stats.slots_moved += size;
            }
            cursor += size;
        }

        stats.gaps_closed = gaps_before.saturating_sub(self.interior_gaps());

        info!(
            "Defragmentation executed: {} handles, {} relocated ({} slots moved), {} gaps closed",
            stats.handles, stats.relocated, stats.slots_moved, stats.gaps_closed
        );
        stats
    }

    /// Free runs lying below the end of the highest live handle
    fn interior_gaps(&self) -> usize {
        let live_end = self
            .table
            .iter()
            .last()
            .map(|(_, handle)| handle.end())
            .unwrap_or(0);
        self.pool
            .free_runs()
            .iter()
            .filter(|(start, _)| *start < live_end)
            .count()
    }
}
