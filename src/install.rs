//! Boundary between layout computation and the simulation framework.
//!
//! A finished `Layout` is pushed through an `Installer`, which is where
//! buildings, sector radios and terminals get created in whatever framework
//! consumes them. Installation is fire-and-forget: the layout never looks at
//! what the installer does with an entity.
//!
//! Going the other way, trace writers resolve identifiers to positions via
//! `PositionLookup` instead of walking every node and device.

use crate::layout::{Block, Cell, Layout, Point3, Terminal};

/// Consumer of placed entities.
pub trait Installer {
    fn install_block(&mut self, block: &Block);
    fn install_cell(&mut self, cell: &Cell);
    fn install_terminal(&mut self, terminal: &Terminal);
}

/// Identifier of an installed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Cell(u16),
    Terminal(u64),
}

/// Resolve a node identifier to its position.
pub trait PositionLookup {
    fn position_of(&self, node: NodeRef) -> Option<Point3>;
}

impl Layout {
    /// Replay the layout into `installer`: blocks, then cells (macro before
    /// small), then terminals, each in generation order.
    pub fn install(&self, installer: &mut impl Installer) {
        for block in &self.blocks {
            installer.install_block(block);
        }
        for cell in &self.cells {
            installer.install_cell(cell);
        }
        for terminal in &self.terminals {
            installer.install_terminal(terminal);
        }
        log::debug!(
            "Installed {} blocks, {} cells and {} terminals",
            self.blocks.len(),
            self.cells.len(),
            self.terminals.len()
        );
    }
}

impl PositionLookup for Layout {
    /// Terminal positions are the initial positions; movement after that is
    /// owned by the mobility model.
    fn position_of(&self, node: NodeRef) -> Option<Point3> {
        match node {
            NodeRef::Cell(cell_id) => self.cells.get((cell_id as usize).checked_sub(1)?).map(|c| c.position),
            NodeRef::Terminal(imsi) => self.terminals.get((imsi as usize).checked_sub(1)?).map(|t| t.position),
        }
    }
}

/// Installed entity, as seen by `LayoutRecorder`.
#[derive(Debug, Clone, PartialEq)]
pub enum Installed {
    Block(Block),
    Cell(Cell),
    Terminal(Terminal),
}

/// Installer that records every call in order.
#[derive(Debug, Default)]
pub struct LayoutRecorder {
    pub installed: Vec<Installed>,
}

impl LayoutRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Installer for LayoutRecorder {
    fn install_block(&mut self, block: &Block) {
        self.installed.push(Installed::Block(*block));
    }

    fn install_cell(&mut self, cell: &Cell) {
        self.installed.push(Installed::Cell(*cell));
    }

    fn install_terminal(&mut self, terminal: &Terminal) {
        self.installed.push(Installed::Terminal(*terminal));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scenario::ScenarioConfig;
    use crate::layout::{SeededSampler, generate_layout};

    fn layout() -> Layout {
        let config = ScenarioConfig::default();
        generate_layout(&config.layout_plan(), &mut SeededSampler::new(config.seed)).unwrap()
    }

    #[test]
    fn install_replays_in_generation_order() {
        let layout = layout();
        let mut recorder = LayoutRecorder::new();
        layout.install(&mut recorder);

        let expected: Vec<Installed> = layout
            .blocks
            .iter()
            .map(|b| Installed::Block(*b))
            .chain(layout.cells.iter().map(|c| Installed::Cell(*c)))
            .chain(layout.terminals.iter().map(|t| Installed::Terminal(*t)))
            .collect();
        assert_eq!(recorder.installed, expected);
    }

    #[test]
    fn positions_resolve_by_identifier() {
        let layout = layout();
        assert_eq!(layout.position_of(NodeRef::Cell(1)), Some(layout.cells[0].position));
        let last = layout.cells.len() as u16;
        assert_eq!(layout.position_of(NodeRef::Cell(last)), Some(layout.cells[last as usize - 1].position));
        assert_eq!(layout.position_of(NodeRef::Terminal(1)), Some(layout.terminals[0].position));
        assert_eq!(layout.position_of(NodeRef::Cell(0)), None);
        assert_eq!(layout.position_of(NodeRef::Cell(last + 1)), None);
        assert_eq!(layout.position_of(NodeRef::Terminal(0)), None);
        assert_eq!(layout.position_of(NodeRef::Terminal(99)), None);
    }
}
