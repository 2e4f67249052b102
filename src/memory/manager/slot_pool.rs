/*!
 * Slot Pool
 * Fixed-length occupancy map over capacity-unit slots
 */

use crate::core::types::{Size, Slot};

/// Boolean occupancy vector with a cached occupied count
///
/// Every mutation fails closed: a range that does not fit inside the pool is
/// rejected without touching any slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPool {
    slots: Vec<bool>,
    occupied: Size,
}

impl SlotPool {
    pub fn new(capacity: Size) -> Self {
        Self {
            slots: vec![false; capacity],
            occupied: 0,
        }
    }

    pub fn capacity(&self) -> Size {
        self.slots.len()
    }

    pub fn occupied(&self) -> Size {
        self.occupied
    }

    pub fn free(&self) -> Size {
        self.capacity() - self.occupied
    }

    pub fn is_occupied(&self, slot: Slot) -> bool {
        self.slots.get(slot).copied().unwrap_or(false)
    }

    pub fn occupancy(&self) -> &[bool] {
        &self.slots
    }

    fn range(&self, start: Slot, size: Size) -> Option<std::ops::Range<Slot>> {
        let end = start.checked_add(size)?;
        (size > 0 && end <= self.capacity()).then_some(start..end)
    }

    /// True iff `[start, start + size)` lies inside the pool and is entirely free
    pub fn is_range_free(&self, start: Slot, size: Size) -> bool {
        match self.range(start, size) {
            Some(range) => self.slots[range].iter().all(|taken| !taken),
            None => false,
        }
    }

    /// Mark `size` slots from `start` occupied iff all of them are free
    pub fn try_reserve(&mut self, start: Slot, size: Size) -> bool {
        if !self.is_range_free(start, size) {
            return false;
        }
        self.slots[start..start + size].fill(true);
        self.occupied += size;
        true
    }

    /// Mark slots free unconditionally; the part of the range outside the pool is ignored
    pub fn release(&mut self, start: Slot, size: Size) {
        let end = start.saturating_add(size).min(self.capacity());
        if start >= end {
            return;
        }
        let freed = self.slots[start..end].iter().filter(|taken| **taken).count();
        self.slots[start..end].fill(false);
        self.occupied -= freed;
    }

    pub fn reset(&mut self) {
        self.slots.fill(false);
        self.occupied = 0;
    }

    /// Lowest start offset of a free run of at least `size` slots
    pub fn find_first_fit(&self, size: Size) -> Option<Slot> {
        if size == 0 || size > self.capacity() {
            return None;
        }
        let mut run_start = 0;
        let mut run_len = 0;
        for (slot, taken) in self.slots.iter().enumerate() {
            if *taken {
                run_len = 0;
                run_start = slot + 1;
                continue;
            }
            run_len += 1;
            if run_len == size {
                return Some(run_start);
            }
        }
        None
    }

    /// Maximal runs of free slots as `(start, len)`, in address order
    pub fn free_runs(&self) -> Vec<(Slot, Size)> {
        let mut runs = Vec::new();
        let mut run_start = None;
        for (slot, taken) in self.slots.iter().enumerate() {
            match (*taken, run_start) {
                (false, None) => run_start = Some(slot),
                (true, Some(start)) => {
                    runs.push((start, slot - start));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            runs.push((start, self.capacity() - start));
        }
        runs
    }
}
