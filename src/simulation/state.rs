/*!
 * Fragmentation State
 * Maps pool occupancy and applied actions onto value-table states
 */

use super::config::StateModel;
use crate::core::types::{Reward, Size, StateIndex};
use crate::memory::MemoryInfo;
use crate::policy::Action;

/// Clamp any candidate state into `[0, capacity)`
pub fn clamp_state(state: StateIndex, capacity: Size) -> StateIndex {
    state.min(capacity.saturating_sub(1))
}

/// Reward for reaching `next_state`: less remaining fragmentation is better
pub fn reward_for(next_state: StateIndex) -> Reward {
    -(next_state as Reward)
}

/// Fragmentation state function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentationState {
    model: StateModel,
    capacity: Size,
    current: StateIndex,
}

impl FragmentationState {
    /// Initial state for a run over `memory`
    ///
    /// The proxy model starts half-way up the range; the measured model reads
    /// the pool.
    pub fn new<M: MemoryInfo>(model: StateModel, capacity: Size, memory: &M) -> Self {
        let current = match model {
            StateModel::Proxy => capacity / 2,
            StateModel::Measured => memory.fragmentation().state_index(),
        };
        Self {
            model,
            capacity,
            current: clamp_state(current, capacity),
        }
    }

    pub fn current(&self) -> StateIndex {
        self.current
    }

    pub fn model(&self) -> StateModel {
        self.model
    }

    /// Compute and adopt the state reached after `action` took effect
    pub fn advance<M: MemoryInfo>(&mut self, action: Action, memory: &M) -> StateIndex {
        let next = match self.model {
            StateModel::Proxy => self.current.saturating_sub(action.fragmentation_relief()),
            StateModel::Measured => memory.fragmentation().state_index(),
        };
        self.current = clamp_state(next, self.capacity);
        self.current
    }
}
