/*!
 * Value Table
 * Dense state x action matrix of learned action values
 */

use super::types::{Action, PolicyError, PolicyResult};
use crate::core::limits::NUM_ACTIONS;
use crate::core::types::StateIndex;
use serde::{Deserialize, Serialize};

/// Learned action values, one row per fragmentation state
///
/// Fixed size for its whole lifetime. Only the decision agent writes to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    rows: Vec<[f64; NUM_ACTIONS]>,
}

impl ValueTable {
    /// Zero-initialized table over `states` states
    pub fn new(states: usize) -> PolicyResult<Self> {
        Self::from_rows(vec![[0.0; NUM_ACTIONS]; states])
    }

    /// Table seeded with existing values (e.g. a warm start)
    pub fn from_rows(rows: Vec<[f64; NUM_ACTIONS]>) -> PolicyResult<Self> {
        if rows.is_empty() {
            return Err(PolicyError::EmptyStateSpace);
        }
        Ok(Self { rows })
    }

    pub fn states(&self) -> usize {
        self.rows.len()
    }

    pub fn check_state(&self, state: StateIndex) -> PolicyResult<()> {
        if state < self.rows.len() {
            Ok(())
        } else {
            Err(PolicyError::StateOutOfRange {
                state,
                states: self.rows.len(),
            })
        }
    }

    pub fn row(&self, state: StateIndex) -> PolicyResult<&[f64; NUM_ACTIONS]> {
        self.check_state(state)?;
        Ok(&self.rows[state])
    }

    pub fn value(&self, state: StateIndex, action: Action) -> PolicyResult<f64> {
        Ok(self.row(state)?[action.index()])
    }

    /// Highest-valued action; ties go to the lowest action index
    pub fn best_action(&self, state: StateIndex) -> PolicyResult<Action> {
        let row = self.row(state)?;
        let mut best = Action::ALL[0];
        for action in &Action::ALL[1..] {
            if row[action.index()] > row[best.index()] {
                best = *action;
            }
        }
        Ok(best)
    }

    pub fn max_value(&self, state: StateIndex) -> PolicyResult<f64> {
        let row = self.row(state)?;
        Ok(row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    pub(super) fn set(&mut self, state: StateIndex, action: Action, value: f64) {
        self.rows[state][action.index()] = value;
    }

    /// Number of entries that have moved away from zero
    pub fn visited_entries(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|value| **value != 0.0)
            .count()
    }
}
