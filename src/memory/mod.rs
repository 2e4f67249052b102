/*!
 * Memory Module
 * Slot pool allocation, handle bookkeeping and compaction
 */

pub mod manager;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::{FragmentationReport, MemoryManager};
pub use traits::*;
pub use types::*;
