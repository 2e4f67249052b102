/*!
 * System Limits and Constants
 *
 * Centralized location for the simulator's limits, thresholds and learning
 * parameters. Grouped by domain.
 */

// =============================================================================
// POOL LIMITS
// =============================================================================

/// Default number of slots in the pool
pub const DEFAULT_POOL_CAPACITY: usize = 1024;

/// Usage ratio at which allocations log a MEDIUM pressure warning
pub const PRESSURE_MEDIUM_RATIO: f64 = 0.60;

/// Usage ratio at which allocations log a HIGH pressure warning
pub const PRESSURE_HIGH_RATIO: f64 = 0.80;

/// Usage ratio at which allocations log a CRITICAL pressure warning
pub const PRESSURE_CRITICAL_RATIO: f64 = 0.95;

// =============================================================================
// POLICY PARAMETERS
// =============================================================================

/// Number of actions available to the decision agent
pub const NUM_ACTIONS: usize = 3;

/// Learning rate (alpha)
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Discount factor (gamma)
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.9;

/// Exploration rate (epsilon)
pub const DEFAULT_EXPLORATION_RATE: f64 = 0.2;

// =============================================================================
// SIMULATION
// =============================================================================

/// Decision cycles per run
pub const DEFAULT_ITERATIONS: usize = 100;

/// Allocate/release operations per cycle in measured mode before any adjustment
pub const DEFAULT_WORKLOAD_INTENSITY: usize = 8;

/// Largest request the workload generator issues, in slots
pub const DEFAULT_WORKLOAD_MAX_REQUEST: usize = 16;
