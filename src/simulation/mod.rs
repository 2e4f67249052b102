/*!
 * Simulation Driver
 *
 * Runs the decision loop against a memory manager:
 *
 * ```text
 * state ──► agent.choose_action ──► apply (compact / delay / throttle)
 *   ▲                                         │
 *   │                                 workload churn (measured)
 *   │                                         ▼
 *   └──── agent.update(state, action, -next, next) ◄── next state
 * ```
 */

pub mod config;
pub mod state;
pub mod summary;
pub mod workload;

pub use config::{SimulationConfig, StateModel};
pub use state::{clamp_state, reward_for, FragmentationState};
pub use summary::{ActionCounts, CycleReport, SimulationSummary};
pub use workload::{Workload, WorkloadCycle};

use crate::core::errors::SimResult;
use crate::core::types::Reward;
use crate::memory::MemoryManager;
use crate::policy::{Action, DecisionAgent};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, info_span};
use uuid::Uuid;

/// Simulation of one decision run
pub struct Simulation {
    config: SimulationConfig,
    run_id: Uuid,
    memory: MemoryManager,
    agent: DecisionAgent<StdRng>,
    state: FragmentationState,
    workload: Workload,
    workload_rng: StdRng,
    cycle: usize,
    counts: ActionCounts,
    total_reward: Reward,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;

        // One seed fans out to the agent and the workload so runs reproduce
        let mut seeder = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let agent_rng = StdRng::seed_from_u64(seeder.next_u64());
        let workload_rng = StdRng::seed_from_u64(seeder.next_u64());

        let memory = MemoryManager::with_capacity(config.capacity);
        let agent = DecisionAgent::new(config.capacity, config.policy, agent_rng)?;
        let state = FragmentationState::new(config.state_model, config.capacity, &memory);
        let workload = Workload::new(
            config.workload_intensity,
            config.workload_max_request.min(config.capacity),
        );

        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            capacity = config.capacity,
            iterations = config.iterations,
            model = ?config.state_model,
            seed = ?config.seed,
            "simulation initialized"
        );

        Ok(Self {
            config,
            run_id,
            memory,
            agent,
            state,
            workload,
            workload_rng,
            cycle: 0,
            counts: ActionCounts::default(),
            total_reward: 0.0,
        })
    }

    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    /// Mutable pool access for callers driving their own allocations
    pub fn memory_mut(&mut self) -> &mut MemoryManager {
        &mut self.memory
    }

    pub fn agent(&self) -> &DecisionAgent<StdRng> {
        &self.agent
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    pub fn current_state(&self) -> usize {
        self.state.current()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run one decision cycle
    pub fn step(&mut self) -> SimResult<CycleReport> {
        let state = self.state.current();
        let action = self.agent.choose_action(state)?;

        let compaction = match action {
            Action::Defragment => Some(self.memory.defragment()),
            Action::Delay => {
                self.workload.recover();
                None
            }
            Action::AdjustIntensity => {
                self.workload.throttle();
                None
            }
        };

        let failed_allocations = match self.config.state_model {
            StateModel::Measured => {
                self.workload
                    .run_cycle(&mut self.memory, &mut self.workload_rng)
                    .failed_allocations
            }
            StateModel::Proxy => 0,
        };

        let next_state = self.state.advance(action, &self.memory);
        let reward = reward_for(next_state);
        self.agent.update(state, action, reward, next_state)?;

        self.counts.record(action);
        self.total_reward += reward;
        let report = CycleReport {
            cycle: self.cycle,
            state,
            action,
            reward,
            next_state,
            compaction,
            failed_allocations,
        };
        self.cycle += 1;

        debug!(
            cycle = report.cycle,
            state,
            %action,
            reward,
            next_state,
            "decision cycle"
        );
        Ok(report)
    }

    /// Run the configured number of cycles and summarize
    pub fn run(&mut self) -> SimResult<SimulationSummary> {
        let span = info_span!("simulation", run_id = %self.run_id);
        let _entered = span.enter();

        for _ in 0..self.config.iterations {
            let report = self.step()?;
            if report.compaction.is_some() {
                info!(cycle = report.cycle, "Defragmentation executed.");
            }
        }

        let summary = self.summary();
        info!(
            defragmentations = summary.defragmentations,
            final_state = summary.final_state,
            total_reward = summary.total_reward,
            failed_allocations = summary.failed_allocations,
            "simulation complete"
        );
        Ok(summary)
    }

    /// Summary of everything run so far
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            run_id: self.run_id.to_string(),
            iterations: self.cycle,
            defragmentations: self.counts.defragment,
            action_counts: self.counts,
            final_state: self.state.current(),
            total_reward: self.total_reward,
            failed_allocations: self.memory.failed_allocations(),
            memory: self.memory.stats(),
        }
    }
}
