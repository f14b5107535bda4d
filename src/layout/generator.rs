//! Layout generation driver.
//!
//! Runs the placement stages in a fixed order so a given seed always yields
//! the same layout:
//! 1) macro hex grid and topology (no randomness)
//! 2) city blocks, when the block density is positive
//! 3) small-cell sites
//! 4) terminals
//!
//! Blocks are never checked against macro or small-cell positions; a site may
//! end up inside a block.

use serde::Serialize;

use super::blocks::{BlockAllocator, BlockGrid, DEFAULT_MAX_ATTEMPTS};
use super::hex_grid::HexGrid;
use super::mobility::{TerminalPlan, place_terminals};
use super::sampler::UniformSampler;
use super::small_cells::{SmallCellPlan, place_small_cells};
use super::types::{Block, Cell, CellKind, LayoutError, MacroSite, SmallCellSite, Terminal, Topology};

/// Obstacle placement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockPlan {
    /// Fraction of grid cells to fill, in `[0, 1]`. Zero disables blocks.
    pub density: f64,
    pub block_x: f64,
    pub block_y: f64,
    pub street_width: f64,
    pub min_height: f64,
    pub max_height: f64,
    /// Rejection ceiling per placed block.
    pub max_attempts: u32,
}

impl Default for BlockPlan {
    fn default() -> Self {
        Self {
            density: 0.2,
            block_x: 80.0,
            block_y: 80.0,
            street_width: 20.0,
            min_height: 6.0,
            max_height: 15.0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Everything needed to generate a layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub hex_grid: HexGrid,
    pub blocks: BlockPlan,
    pub small_cells: SmallCellPlan,
    pub terminals: TerminalPlan,
}

/// A generated deployment layout. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub topology: Topology,
    pub hex_grid: HexGrid,
    /// Street grid used for blocks, absent when block placement is disabled.
    pub block_grid: Option<BlockGrid>,
    pub blocks: Vec<Block>,
    pub macro_sites: Vec<MacroSite>,
    pub small_cell_sites: Vec<SmallCellSite>,
    /// Macro sector cells first, then small-cell sectors, in generation order.
    pub cells: Vec<Cell>,
    pub terminals: Vec<Terminal>,
}

/// Generate a layout from `plan`, drawing all randomness from `sampler`.
///
/// # Returns
///
/// The layout, or the first `LayoutError` raised by a placement stage.
pub fn generate_layout(plan: &LayoutPlan, sampler: &mut impl UniformSampler) -> Result<Layout, LayoutError> {
    plan.hex_grid.validate()?;
    let topology = plan.hex_grid.topology();
    let macro_sites = plan.hex_grid.sites();
    log::info!(
        "Topology {:.1} x {:.1} m with {} macro sites ({} macro cells)",
        topology.area.width(),
        topology.area.height(),
        macro_sites.len(),
        plan.hex_grid.cell_count()
    );

    let (block_grid, blocks) = place_blocks(&plan.blocks, &topology, sampler)?;

    let macro_margin = plan.hex_grid.margin_factor * plan.hex_grid.spacing;
    let small_cell_sites = place_small_cells(&plan.small_cells, &topology, macro_margin, sampler)?;
    log::info!("{} small-cell sites placed ({} small cells)", small_cell_sites.len(), 3 * small_cell_sites.len());

    let cells = number_cells(&macro_sites, &small_cell_sites)?;

    let terminals = place_terminals(&plan.terminals, &small_cell_sites, &topology, sampler)?;
    if plan.terminals.is_mobile() {
        log::info!(
            "{} terminals configured with {} mobility range",
            terminals.len(),
            if plan.terminals.range_constrained { "constrained" } else { "unconstrained" }
        );
    } else {
        log::info!("{} terminals configured with constant position", terminals.len());
    }

    Ok(Layout {
        topology,
        hex_grid: plan.hex_grid,
        block_grid,
        blocks,
        macro_sites,
        small_cell_sites,
        cells,
        terminals,
    })
}

fn place_blocks(plan: &BlockPlan, topology: &Topology, sampler: &mut impl UniformSampler) -> Result<(Option<BlockGrid>, Vec<Block>), LayoutError> {
    if !(plan.density > 0.0) {
        log::debug!("Block density {} disables block placement", plan.density);
        return Ok((None, Vec::new()));
    }

    let grid = BlockGrid::fit_to(&topology.area, plan.block_x, plan.block_y, plan.street_width);
    let count = grid.block_count(plan.density);
    if count == 0 {
        log::info!(
            "No blocks placed: density {} on a {}x{} street grid asks for none",
            plan.density,
            grid.columns,
            grid.rows
        );
        return Ok((Some(grid), Vec::new()));
    }
    let mut allocator = BlockAllocator::new(*topology, grid, plan.min_height, plan.max_height)?.with_max_attempts(plan.max_attempts);
    allocator.allocate_many(count, sampler)?;
    log::info!("{} blocks placed on a {}x{} street grid", count, grid.columns, grid.rows);
    Ok((Some(grid), allocator.into_blocks()))
}

fn number_cells(macro_sites: &[MacroSite], small_cell_sites: &[SmallCellSite]) -> Result<Vec<Cell>, LayoutError> {
    let macro_cells = macro_sites.iter().flat_map(|site| {
        site.sectors
            .iter()
            .map(|sector| (CellKind::Macro, sector.position, Some(sector.orientation_deg)))
    });
    let small_cells = small_cell_sites
        .iter()
        .flat_map(|site| site.sectors.iter().map(|position| (CellKind::Small, *position, None)));

    macro_cells
        .chain(small_cells)
        .enumerate()
        .map(|(index, (kind, position, orientation_deg))| {
            let cell_id = u16::try_from(index + 1).map_err(|_| LayoutError::InvalidGeometry(format!("cell count exceeds {}", u16::MAX)))?;
            Ok(Cell {
                cell_id,
                kind,
                position,
                orientation_deg,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::{contains, overlaps, point_in_rect};
    use crate::layout::sampler::SeededSampler;
    use crate::layout::types::TerminalMobility;

    fn plan() -> LayoutPlan {
        LayoutPlan {
            hex_grid: HexGrid {
                columns: 2,
                rows: 3,
                spacing: 500.0,
                margin_factor: 0.25,
                site_height: 30.0,
                sector_offset: 0.5,
            },
            blocks: BlockPlan::default(),
            small_cells: SmallCellPlan {
                sites: 4,
                spacing: 20.0,
                site_height: 6.0,
            },
            terminals: TerminalPlan {
                count: 10,
                height: 1.75,
                min_speed: 0.5,
                max_speed: 3.5,
                range_margin: 30.0,
                range_constrained: true,
            },
        }
    }

    #[test]
    fn generated_layout_is_consistent() {
        let p = plan();
        let layout = generate_layout(&p, &mut SeededSampler::new(1)).unwrap();

        assert_eq!(layout.macro_sites.len(), 7);
        assert_eq!(layout.small_cell_sites.len(), 4);
        assert_eq!(layout.cells.len(), 3 * 7 + 3 * 4);
        assert_eq!(layout.terminals.len(), 10);

        let grid = layout.block_grid.unwrap();
        assert_eq!(layout.blocks.len() as u32, grid.block_count(0.2));
        for (i, a) in layout.blocks.iter().enumerate() {
            assert!(contains(&layout.topology.area, &a.footprint));
            for b in &layout.blocks[i + 1..] {
                assert!(!overlaps(&a.footprint, &b.footprint));
            }
        }
        for t in &layout.terminals {
            assert!(point_in_rect(&t.position, &layout.topology.area));
            assert_eq!(t.anchor_site, Some((t.imsi as usize - 1) % 4));
        }
    }

    #[test]
    fn cells_are_numbered_macro_first() {
        let layout = generate_layout(&plan(), &mut SeededSampler::new(5)).unwrap();
        for (i, cell) in layout.cells.iter().enumerate() {
            assert_eq!(cell.cell_id as usize, i + 1);
            if i < 21 {
                assert_eq!(cell.kind, CellKind::Macro);
                assert!(cell.orientation_deg.is_some());
            } else {
                assert_eq!(cell.kind, CellKind::Small);
                assert_eq!(cell.orientation_deg, None);
            }
        }
        assert_eq!(layout.cells[21].position, layout.small_cell_sites[0].sectors[0]);
        assert_eq!(layout.cells[2].position, layout.macro_sites[0].sectors[2].position);
    }

    #[test]
    fn same_seed_same_layout() {
        let a = generate_layout(&plan(), &mut SeededSampler::new(77)).unwrap();
        let b = generate_layout(&plan(), &mut SeededSampler::new(77)).unwrap();
        assert_eq!(a, b);
        let c = generate_layout(&plan(), &mut SeededSampler::new(78)).unwrap();
        assert_ne!(a.terminals, c.terminals);
    }

    #[test]
    fn zero_density_skips_blocks() {
        let mut p = plan();
        p.blocks.density = 0.0;
        let layout = generate_layout(&p, &mut SeededSampler::new(1)).unwrap();
        assert!(layout.blocks.is_empty());
        assert!(layout.block_grid.is_none());
    }

    #[test]
    fn constrained_terminals_need_small_cells() {
        let mut p = plan();
        p.small_cells.sites = 0;
        assert_eq!(generate_layout(&p, &mut SeededSampler::new(1)), Err(LayoutError::NoSmallCellSites));

        p.terminals.range_constrained = false;
        let layout = generate_layout(&p, &mut SeededSampler::new(1)).unwrap();
        assert!(
            layout
                .terminals
                .iter()
                .all(|t| matches!(t.mobility, TerminalMobility::RandomWaypoint { range, .. } if range == layout.topology.area))
        );
    }

    #[test]
    fn topology_smaller_than_one_block_cell_places_no_blocks() {
        // 90 x 82 m topology against 100 m block cells
        let mut p = plan();
        p.hex_grid.columns = 1;
        p.hex_grid.rows = 2;
        p.hex_grid.spacing = 60.0;
        p.small_cells.sites = 1;
        let layout = generate_layout(&p, &mut SeededSampler::new(1)).unwrap();

        let grid = layout.block_grid.unwrap();
        assert_eq!(grid.rows, 0);
        assert_eq!(grid.capacity(), 0);
        assert!(layout.blocks.is_empty());
        assert_eq!(layout.small_cell_sites.len(), 1);
        assert_eq!(layout.terminals.len(), 10);
    }

    #[test]
    fn full_density_fills_every_cell() {
        let mut p = plan();
        p.blocks.density = 1.0;
        let layout = generate_layout(&p, &mut SeededSampler::new(8)).unwrap();
        let grid = layout.block_grid.unwrap();
        assert_eq!(layout.blocks.len() as u64, grid.capacity());
    }
}
