/*!
 * Heap Defragmentation Simulator - Main Entry Point
 *
 * Runs one decision loop over a fixed-capacity slot pool and reports how
 * often the learned policy chose to defragment.
 */

use anyhow::Context;
use tracing::info;

use heap_defrag::{init_tracing, Simulation, SimulationConfig};

fn main() -> anyhow::Result<()> {
    // Initialize structured tracing
    init_tracing();

    info!("Defragmentation simulator starting...");

    let config = SimulationConfig::from_env().context("invalid simulator configuration")?;
    let mut simulation = Simulation::new(config).context("failed to set up simulation")?;
    let summary = simulation.run().context("simulation aborted")?;

    info!(
        run_id = %summary.run_id,
        iterations = summary.iterations,
        defragmentations = summary.defragmentations,
        delays = summary.action_counts.delay,
        intensity_adjustments = summary.action_counts.adjust_intensity,
        final_state = summary.final_state,
        "Simulation finished"
    );

    let print_json = std::env::var("DEFRAG_SUMMARY_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);
    if print_json {
        println!("{}", summary.to_json()?);
    }

    Ok(())
}
