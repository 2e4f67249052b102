/*!
 * Simulation Configuration
 * Defaults, JSON config files and environment overrides
 */

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::limits::{
    DEFAULT_ITERATIONS, DEFAULT_POOL_CAPACITY, DEFAULT_WORKLOAD_INTENSITY,
    DEFAULT_WORKLOAD_MAX_REQUEST,
};
use crate::core::types::Size;
use crate::policy::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the fragmentation state is derived each cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateModel {
    /// Backlog counter starting at capacity / 2, drained by action relief
    #[default]
    Proxy,
    /// Measured from the pool's free runs under a synthetic workload
    Measured,
}

impl FromStr for StateModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proxy" => Ok(StateModel::Proxy),
            "measured" => Ok(StateModel::Measured),
            other => Err(ConfigError::InvalidValue {
                name: "state_model".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Slots in the pool; also the number of value-table states
    pub capacity: Size,
    /// Decision cycles per run
    pub iterations: usize,
    /// Seed for exploration and workload; `None` draws from OS entropy
    pub seed: Option<u64>,
    pub state_model: StateModel,
    pub policy: PolicyConfig,
    /// Allocate/release operations per cycle in measured mode
    pub workload_intensity: usize,
    /// Largest workload request, in slots (capped at capacity)
    pub workload_max_request: Size,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            state_model: StateModel::Proxy,
            policy: PolicyConfig::default(),
            workload_intensity: DEFAULT_WORKLOAD_INTENSITY,
            workload_max_request: DEFAULT_WORKLOAD_MAX_REQUEST,
        }
    }
}

fn env_var<T: FromStr>(name: &str) -> ConfigResult<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}

impl SimulationConfig {
    /// Load configuration from the environment
    ///
    /// Environment variables:
    /// - DEFRAG_CONFIG_JSON: JSON config file used as the base
    /// - DEFRAG_CAPACITY, DEFRAG_ITERATIONS, DEFRAG_SEED
    /// - DEFRAG_ALPHA, DEFRAG_GAMMA, DEFRAG_EPSILON
    /// - DEFRAG_STATE_MODEL: `proxy` (default) or `measured`
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = match std::env::var("DEFRAG_CONFIG_JSON") {
            Ok(path) => Self::from_json_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Some(capacity) = env_var("DEFRAG_CAPACITY")? {
            config.capacity = capacity;
        }
        if let Some(iterations) = env_var("DEFRAG_ITERATIONS")? {
            config.iterations = iterations;
        }
        if let Some(seed) = env_var("DEFRAG_SEED")? {
            config.seed = Some(seed);
        }
        if let Some(alpha) = env_var("DEFRAG_ALPHA")? {
            config.policy.learning_rate = alpha;
        }
        if let Some(gamma) = env_var("DEFRAG_GAMMA")? {
            config.policy.discount_factor = gamma;
        }
        if let Some(epsilon) = env_var("DEFRAG_EPSILON")? {
            config.policy.exploration_rate = epsilon;
        }
        if let Some(model) = env_var("DEFRAG_STATE_MODEL")? {
            config.state_model = model;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &str) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&raw).map_err(|e| match e {
            ConfigError::InvalidValue { value, .. } => ConfigError::Unreadable {
                path: path.to_string(),
                reason: value,
            },
            other => other,
        })
    }

    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::InvalidValue {
            name: "config".to_string(),
            value: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_capacity(mut self, capacity: Size) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_state_model(mut self, model: StateModel) -> Self {
        self.state_model = model;
        self
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_workload(mut self, intensity: usize, max_request: Size) -> Self {
        self.workload_intensity = intensity;
        self.workload_max_request = max_request;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.capacity == 0 {
            return Err(ConfigError::OutOfRange {
                name: "capacity",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if self.workload_max_request == 0 {
            return Err(ConfigError::OutOfRange {
                name: "workload_max_request",
                value: 0.0,
                expected: ">= 1",
            });
        }
        self.policy.validate()
    }
}
