/*!
 * Run Reporting
 * Per-cycle records and the end-of-run summary
 */

use crate::core::types::{Reward, StateIndex};
use crate::memory::{CompactionStats, MemoryStats};
use crate::policy::Action;
use serde::{Deserialize, Serialize};

/// One decision cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: usize,
    pub state: StateIndex,
    pub action: Action,
    pub reward: Reward,
    pub next_state: StateIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compaction: Option<CompactionStats>,
    #[serde(default)]
    pub failed_allocations: usize,
}

/// Action tallies for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    pub defragment: usize,
    pub delay: usize,
    pub adjust_intensity: usize,
}

impl ActionCounts {
    pub fn record(&mut self, action: Action) {
        match action {
            Action::Defragment => self.defragment += 1,
            Action::Delay => self.delay += 1,
            Action::AdjustIntensity => self.adjust_intensity += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.defragment + self.delay + self.adjust_intensity
    }
}

/// End-of-run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub run_id: String,
    pub iterations: usize,
    pub defragmentations: usize,
    pub action_counts: ActionCounts,
    pub final_state: StateIndex,
    pub total_reward: Reward,
    pub failed_allocations: usize,
    pub memory: MemoryStats,
}

impl SimulationSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
