//! gnuplot overlay scripts for a generated layout.
//!
//! Three scripts are produced, meant to be `load`ed on top of a radio
//! environment map: one `set object ... rect` per building, and one labelled
//! point per cell (white) and per terminal (grey).

use std::fmt::Write;

use crate::install::Installer;
use crate::layout::{Block, Cell, Terminal};

/// Installer that renders every entity as a gnuplot command.
#[derive(Debug, Default)]
pub struct GnuplotWriter {
    buildings: String,
    cells: String,
    terminals: String,
    block_index: usize,
}

impl GnuplotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `set object` lines, one per block.
    pub fn buildings(&self) -> &str {
        &self.buildings
    }

    /// `set label` lines, one per cell.
    pub fn cells(&self) -> &str {
        &self.cells
    }

    /// `set label` lines, one per terminal.
    pub fn terminals(&self) -> &str {
        &self.terminals
    }
}

// Writing into a String cannot fail.
impl Installer for GnuplotWriter {
    fn install_block(&mut self, block: &Block) {
        self.block_index += 1;
        let r = &block.footprint;
        let _ = writeln!(
            self.buildings,
            "set object {} rect from {},{} to {},{} front fs empty",
            self.block_index, r.x_min, r.y_min, r.x_max, r.y_max
        );
    }

    fn install_cell(&mut self, cell: &Cell) {
        let _ = writeln!(
            self.cells,
            "set label \"{}\" at {},{} left font \"Helvetica,4\" textcolor rgb \"white\" front point pt 2 ps 0.3 lc rgb \"white\" offset 0,0",
            cell.cell_id, cell.position.x, cell.position.y
        );
    }

    fn install_terminal(&mut self, terminal: &Terminal) {
        let _ = writeln!(
            self.terminals,
            "set label \"{}\" at {},{} left font \"Helvetica,4\" textcolor rgb \"grey\" front point pt 1 ps 0.3 lc rgb \"grey\" offset 0,0",
            terminal.imsi, terminal.position.x, terminal.position.y
        );
    }
}
