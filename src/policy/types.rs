/*!
 * Policy Types
 * Actions, learning parameters and policy errors
 */

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::limits::{
    DEFAULT_DISCOUNT_FACTOR, DEFAULT_EXPLORATION_RATE, DEFAULT_LEARNING_RATE, NUM_ACTIONS,
};
use crate::core::types::StateIndex;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Policy operation result
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Policy errors
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum PolicyError {
    #[error("State {state} out of range (value table has {states} states)")]
    #[diagnostic(
        code(policy::state_out_of_range),
        help("Clamp fragmentation states to [0, capacity) before consulting the agent.")
    )]
    StateOutOfRange { state: StateIndex, states: usize },

    #[error("Value table must have at least one state")]
    #[diagnostic(code(policy::empty_state_space))]
    EmptyStateSpace,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Decision agent action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Defragment = 0,
    Delay = 1,
    AdjustIntensity = 2,
}

impl Action {
    /// Every action in tag order
    pub const ALL: [Action; NUM_ACTIONS] =
        [Action::Defragment, Action::Delay, Action::AdjustIntensity];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// How far this action lowers the proxy fragmentation state
    ///
    /// Compaction's real effect shows up on the pool itself, so it grants no
    /// proxy relief; delaying and throttling allocation pressure let one and
    /// two units of backlog drain respectively.
    pub fn fragmentation_relief(self) -> StateIndex {
        match self {
            Action::Defragment => 0,
            Action::Delay => 1,
            Action::AdjustIntensity => 2,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Defragment => write!(f, "DEFRAGMENT"),
            Action::Delay => write!(f, "DELAY"),
            Action::AdjustIntensity => write!(f, "ADJUST_INTENSITY"),
        }
    }
}

/// Learning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Learning rate (alpha), in (0, 1]
    pub learning_rate: f64,
    /// Discount factor (gamma), in [0, 1)
    pub discount_factor: f64,
    /// Exploration rate (epsilon), in [0, 1]
    pub exploration_rate: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            discount_factor: DEFAULT_DISCOUNT_FACTOR,
            exploration_rate: DEFAULT_EXPLORATION_RATE,
        }
    }
}

impl PolicyConfig {
    pub fn with_learning_rate(mut self, alpha: f64) -> Self {
        self.learning_rate = alpha;
        self
    }

    pub fn with_discount_factor(mut self, gamma: f64) -> Self {
        self.discount_factor = gamma;
        self
    }

    pub fn with_exploration_rate(mut self, epsilon: f64) -> Self {
        self.exploration_rate = epsilon;
        self
    }

    /// Pure exploitation, used for deterministic policy readout
    pub fn greedy(self) -> Self {
        self.with_exploration_rate(0.0)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "learning_rate",
                value: self.learning_rate,
                expected: "(0, 1]",
            });
        }
        if !(0.0..1.0).contains(&self.discount_factor) {
            return Err(ConfigError::OutOfRange {
                name: "discount_factor",
                value: self.discount_factor,
                expected: "[0, 1)",
            });
        }
        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(ConfigError::OutOfRange {
                name: "exploration_rate",
                value: self.exploration_rate,
                expected: "[0, 1]",
            });
        }
        Ok(())
    }
}
