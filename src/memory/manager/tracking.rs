/*!
 * Owner Memory Tracking
 * Per-owner slot usage statistics
 */

use crate::core::types::Size;

/// Per-owner memory tracking
#[derive(Debug, Clone, Default)]
pub(super) struct OwnerMemoryTracking {
    pub current_slots: Size,
    pub peak_slots: Size,
    pub allocation_count: usize,
}

impl OwnerMemoryTracking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_allocation(&mut self, size: Size) {
        self.current_slots += size;
        self.allocation_count += 1;
        if self.current_slots > self.peak_slots {
            self.peak_slots = self.current_slots;
        }
    }

    pub fn remove_allocation(&mut self, size: Size) {
        self.current_slots = self.current_slots.saturating_sub(size);
    }
}
