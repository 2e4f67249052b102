/*!
 * Policy Module
 * Epsilon-greedy decision agent over a learned value table
 */

pub mod agent;
pub mod types;
pub mod value_table;

// Re-export for convenience
pub use agent::DecisionAgent;
pub use types::*;
pub use value_table::ValueTable;
