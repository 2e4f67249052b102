/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

// Re-export subsystem errors
pub use crate::memory::MemoryError;
pub use crate::policy::PolicyError;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Check the environment variable or config file entry.")
    )]
    InvalidValue { name: String, value: String },

    #[error("{name} out of range: {value} (expected {expected})")]
    #[diagnostic(code(config::out_of_range))]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Failed to read config file {path}: {reason}")]
    #[diagnostic(
        code(config::unreadable),
        help("DEFRAG_CONFIG_JSON must point to a readable JSON file.")
    )]
    Unreadable { path: String, reason: String },
}

/// Result alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Unified simulator error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SimError {
    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("Policy error: {0}")]
    #[diagnostic(transparent)]
    Policy(#[from] PolicyError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for simulator operations
pub type SimResult<T> = Result<T, SimError>;
