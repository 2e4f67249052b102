/*!
 * Memory Types
 * Common types for slot pool management
 */

use crate::core::limits::{PRESSURE_CRITICAL_RATIO, PRESSURE_HIGH_RATIO, PRESSURE_MEDIUM_RATIO};
use crate::core::types::{Owner, Size, Slot};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Allocation failed: no run of {requested} free slots ({free} free, largest run {largest_free_run})")]
    #[diagnostic(
        code(memory::allocation_failed),
        help("The pool is fragmented or full. Defragment and retry, or release handles.")
    )]
    AllocationFailed {
        requested: Size,
        free: Size,
        largest_free_run: Size,
    },

    #[error("Invalid size request: {requested} slots (capacity {capacity})")]
    #[diagnostic(
        code(memory::invalid_size),
        help("Requests must be at least one slot and no larger than the pool.")
    )]
    InvalidSizeRequest { requested: Size, capacity: Size },

    #[error("Invalid handle: {0}")]
    #[diagnostic(code(memory::invalid_handle))]
    InvalidHandle(HandleId),

    #[error("Slot bookkeeping corrupted at offset {0}")]
    #[diagnostic(code(memory::corruption))]
    CorruptionDetected(Slot),
}

/// Opaque handle identifier
///
/// Indexes the handle table's indirection slots. The generation is bumped
/// every time a slot is recycled, so a released id never aliases a newer
/// allocation. Ids are independent of physical offsets and stay valid across
/// compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl HandleId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Live allocation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handle {
    pub offset: Slot,
    pub size: Size,
    pub pinned: bool,
    pub owner: Owner,
}

impl Handle {
    pub fn new(offset: Slot, size: Size, owner: Owner) -> Self {
        Self {
            offset,
            size,
            pinned: false,
            owner,
        }
    }

    /// One past the last slot covered by this handle
    pub fn end(&self) -> Slot {
        self.offset + self.size
    }

    pub fn overlaps(&self, other: &Handle) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub capacity: Size,
    pub used: Size,
    pub available: Size,
    pub usage_percentage: f64,
    pub live_handles: usize,
    pub free_runs: usize,
    pub largest_free_run: Size,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_percentage / 100.0)
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= PRESSURE_CRITICAL_RATIO {
            MemoryPressure::Critical
        } else if ratio >= PRESSURE_HIGH_RATIO {
            MemoryPressure::High
        } else if ratio >= PRESSURE_MEDIUM_RATIO {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Outcome of a compaction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionStats {
    /// Live handles visited
    pub handles: usize,
    /// Handles whose offset changed
    pub relocated: usize,
    /// Free runs below the last live handle eliminated
    pub gaps_closed: usize,
    /// Slots copied by relocation
    pub slots_moved: Size,
}

/// Per-owner memory statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerMemoryStats {
    pub owner: Owner,
    pub current_slots: Size,
    pub peak_slots: Size,
    pub allocation_count: usize,
}
