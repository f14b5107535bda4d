//! Layout exports.
//!
//! - `gnuplot`: overlay scripts for buildings, cells and terminals
//! - `json`: the full layout as a JSON document

pub mod gnuplot;
pub mod json;

pub use gnuplot::GnuplotWriter;
pub use json::LayoutDocument;

use chrono::Utc;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::common::scenario::OutputConfig;
use crate::layout::Layout;

/// Write every export of `layout` into `output.directory`.
///
/// # Returns
///
/// Paths written, in the order JSON, buildings, cells, terminals.
pub fn write_exports(layout: &Layout, seed: u64, output: &OutputConfig) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(&output.directory)?;

    let mut gnuplot = GnuplotWriter::new();
    layout.install(&mut gnuplot);

    let document = LayoutDocument::new(layout, seed, Utc::now()).to_json()?;

    let files = [
        (output.path_of(&output.layout_json), document.as_str()),
        (output.path_of(&output.buildings), gnuplot.buildings()),
        (output.path_of(&output.cells), gnuplot.cells()),
        (output.path_of(&output.terminals), gnuplot.terminals()),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (path, contents) in files {
        fs::write(&path, contents)?;
        log::info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scenario::ScenarioConfig;
    use crate::layout::{SeededSampler, generate_layout};

    #[test]
    fn exports_land_in_output_directory() {
        let mut config = ScenarioConfig::default();
        config.output.directory = std::env::temp_dir().join(format!("radio-topology-export-{}", std::process::id()));
        let layout = generate_layout(&config.layout_plan(), &mut SeededSampler::new(config.seed)).unwrap();

        let written = write_exports(&layout, config.seed, &config.output).unwrap();
        assert_eq!(written.len(), 4);
        assert!(written[0].ends_with("layout.json"));

        let buildings = fs::read_to_string(&written[1]).unwrap();
        assert_eq!(buildings.lines().count(), layout.blocks.len());
        let cells = fs::read_to_string(&written[2]).unwrap();
        assert_eq!(cells.lines().count(), layout.cells.len());
        let terminals = fs::read_to_string(&written[3]).unwrap();
        assert_eq!(terminals.lines().count(), layout.terminals.len());

        fs::remove_dir_all(&config.output.directory).unwrap();
    }
}
