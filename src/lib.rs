/*!
 * Heap Defragmentation Simulator Library
 * Slot pool allocator, compactor and learned defragmentation policy
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod policy;
pub mod simulation;

// Re-exports
pub use crate::core::errors::{ConfigError, SimError, SimResult};
pub use memory::{
    Allocator, CompactionStats, Compactor, FragmentationReport, Handle, HandleId, MemoryError,
    MemoryInfo, MemoryManager, MemoryStats,
};
pub use monitoring::init_tracing;
pub use policy::{Action, DecisionAgent, PolicyConfig, PolicyError, ValueTable};
pub use simulation::{Simulation, SimulationConfig, SimulationSummary, StateModel};
