use anyhow::Context;
use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::Path;

use radio_topology::common::{ScenarioConfig, load_scenario};
use radio_topology::export::write_exports;
use radio_topology::{SeededSampler, generate_layout};

/// Load the scenario named on the command line, or the built-in defaults.
fn scenario_from_args() -> anyhow::Result<ScenarioConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!("Using scenario file: {}", path);
            load_scenario(Path::new(&path)).with_context(|| format!("Failed to load scenario {}", path))
        }
        None => {
            info!("No scenario file given, using defaults");
            Ok(ScenarioConfig::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Logging setup; RUST_LOG overrides the defaults
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("radio_topology"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    let scenario = scenario_from_args()?;
    info!("Generating layout with seed {}", scenario.seed);

    let mut sampler = SeededSampler::new(scenario.seed);
    let layout = generate_layout(&scenario.layout_plan(), &mut sampler).context("Layout generation failed")?;

    write_exports(&layout, sampler.seed(), &scenario.output)
        .with_context(|| format!("Failed to write exports to {}", scenario.output.directory.display()))?;

    info!(
        "Layout complete: {} blocks, {} cells, {} terminals",
        layout.blocks.len(),
        layout.cells.len(),
        layout.terminals.len()
    );
    Ok(())
}
