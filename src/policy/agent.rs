/*!
 * Decision Agent
 * Epsilon-greedy action selection and temporal-difference learning
 */

use super::types::{Action, PolicyConfig, PolicyResult};
use super::value_table::ValueTable;
use crate::core::limits::NUM_ACTIONS;
use crate::core::types::{Reward, StateIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Decision agent
///
/// Owns its value table and the single random source used for exploration,
/// so a fixed seed reproduces every decision.
#[derive(Debug, Clone)]
pub struct DecisionAgent<R = StdRng> {
    table: ValueTable,
    config: PolicyConfig,
    rng: R,
    updates: u64,
}

impl DecisionAgent<StdRng> {
    /// Agent with a deterministic random source
    pub fn seeded(states: usize, config: PolicyConfig, seed: u64) -> PolicyResult<Self> {
        Self::new(states, config, StdRng::seed_from_u64(seed))
    }

    /// Agent seeded from OS entropy
    pub fn from_entropy(states: usize, config: PolicyConfig) -> PolicyResult<Self> {
        Self::new(states, config, StdRng::from_entropy())
    }
}

impl<R: Rng> DecisionAgent<R> {
    /// Agent over a zeroed table with `states` rows
    pub fn new(states: usize, config: PolicyConfig, rng: R) -> PolicyResult<Self> {
        Self::with_table(ValueTable::new(states)?, config, rng)
    }

    /// Agent resuming from an existing table
    pub fn with_table(table: ValueTable, config: PolicyConfig, rng: R) -> PolicyResult<Self> {
        config.validate()?;
        Ok(Self {
            table,
            config,
            rng,
            updates: 0,
        })
    }

    /// Epsilon-greedy choice for `state`
    ///
    /// Explores with probability epsilon, otherwise exploits the table. The
    /// table is never modified here.
    pub fn choose_action(&mut self, state: StateIndex) -> PolicyResult<Action> {
        self.table.check_state(state)?;

        let draw: f64 = self.rng.gen();
        if draw < self.config.exploration_rate {
            let index = self.rng.gen_range(0..NUM_ACTIONS);
            let action = Action::ALL[index];
            trace!(state, %action, "explore");
            return Ok(action);
        }

        let action = self.table.best_action(state)?;
        trace!(state, %action, "exploit");
        Ok(action)
    }

    /// Best known action for `state`, without exploration
    pub fn greedy_action(&self, state: StateIndex) -> PolicyResult<Action> {
        self.table.best_action(state)
    }

    /// Temporal-difference update for one observed transition
    ///
    /// `V[s][a] += alpha * (reward + gamma * max_a' V[s'][a'] - V[s][a])`.
    /// Returns the new value of `V[s][a]`.
    pub fn update(
        &mut self,
        state: StateIndex,
        action: Action,
        reward: Reward,
        next_state: StateIndex,
    ) -> PolicyResult<f64> {
        self.table.check_state(state)?;
        let best_next = self.table.max_value(next_state)?;
        let current = self.table.value(state, action)?;

        let target = reward + self.config.discount_factor * best_next;
        let updated = current + self.config.learning_rate * (target - current);
        self.table.set(state, action, updated);
        self.updates += 1;

        trace!(state, %action, reward, next_state, value = updated, "td update");
        Ok(updated)
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Number of updates applied so far
    pub fn updates(&self) -> u64 {
        self.updates
    }
}
