/*!
 * Core Types
 * Common types used across the simulator
 */

/// Slot offset inside the pool
pub type Slot = usize;

/// Size in slot units
pub type Size = usize;

/// Owner tag for an allocation (stands in for the backing allocation reference)
pub type Owner = u32;

/// Discrete fragmentation state index, always in `[0, capacity)`
pub type StateIndex = usize;

/// Reward signal fed to the decision agent
pub type Reward = f64;

/// Owner used when a caller does not tag its allocations
pub const ANONYMOUS_OWNER: Owner = 0;
