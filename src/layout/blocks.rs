//! City block placement on a centered street grid.
//!
//! Blocks are placed by rejection sampling: a grid cell is drawn uniformly,
//! converted to an absolute rectangle, and redrawn if it overlaps a block
//! that was already accepted. The allocator only computes the layout; the
//! accepted blocks are handed to an `Installer` by the caller.

use std::collections::HashSet;

use super::geometry::overlaps_any;
use super::sampler::UniformSampler;
use super::types::{Block, LayoutError, Rect, Topology};

/// Default ceiling on consecutive rejections inside one `allocate_one` call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Rejections allowed per grid cell before giving up.
///
/// With a single free cell out of `C`, `32 * C` draws all miss it with
/// probability below `e^-32`.
pub const ATTEMPTS_PER_CELL: u64 = 32;

/// Street grid the blocks are snapped to.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BlockGrid {
    /// Number of cells along X.
    pub columns: u32,
    /// Number of cells along Y.
    pub rows: u32,
    /// Block footprint along X (meters).
    pub block_x: f64,
    /// Block footprint along Y (meters).
    pub block_y: f64,
    /// Street width separating adjacent cells (meters).
    pub street_width: f64,
}

impl BlockGrid {
    /// Fit as many cells as possible into `area`.
    ///
    /// Each cell takes one block plus one street width, so the cell counts are
    /// `floor(width / (block_x + street_width))` and the analogue along Y.
    pub fn fit_to(area: &Rect, block_x: f64, block_y: f64, street_width: f64) -> Self {
        Self {
            columns: (area.width() / (block_x + street_width)).floor().max(0.0) as u32,
            rows: (area.height() / (block_y + street_width)).floor().max(0.0) as u32,
            block_x,
            block_y,
            street_width,
        }
    }

    /// Total number of grid cells.
    pub fn capacity(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Number of blocks a density in `[0, 1]` asks for, truncated.
    pub fn block_count(&self, density: f64) -> u32 {
        (density * self.capacity() as f64).floor().max(0.0) as u32
    }

    /// Extent of the whole grid: blocks plus the streets between them.
    pub fn footprint(&self) -> (f64, f64) {
        let x = self.columns as f64 * self.block_x + self.columns.saturating_sub(1) as f64 * self.street_width;
        let y = self.rows as f64 * self.block_y + self.rows.saturating_sub(1) as f64 * self.street_width;
        (x, y)
    }

    /// Minimum corner of cell (0, 0) when the grid is centered in `area`.
    pub fn origin_in(&self, area: &Rect) -> (f64, f64) {
        let (fx, fy) = self.footprint();
        (area.x_min + (area.width() - fx) / 2.0, area.y_min + (area.height() - fy) / 2.0)
    }
}

/// Rejection-sampling block allocator.
pub struct BlockAllocator {
    topology: Topology,
    grid: BlockGrid,
    min_height: f64,
    max_height: f64,
    max_attempts: u32,
    placed: Vec<Block>,
    occupied: HashSet<(u32, u32)>,
}

impl BlockAllocator {
    /// Create an allocator for `grid` centered in `topology`.
    ///
    /// # Returns
    ///
    /// `Err(LayoutError::InvalidGeometry)` for a non-positive footprint, an
    /// empty grid, a negative street width, inverted height bounds, or a grid
    /// that does not fit inside the topology.
    pub fn new(topology: Topology, grid: BlockGrid, min_height: f64, max_height: f64) -> Result<Self, LayoutError> {
        if !topology.area.is_valid() {
            return Err(LayoutError::InvalidGeometry(format!("topology area {:?} is degenerate", topology.area)));
        }
        if !(grid.block_x > 0.0 && grid.block_y > 0.0) {
            return Err(LayoutError::InvalidGeometry(format!(
                "block footprint {}x{} must be positive",
                grid.block_x, grid.block_y
            )));
        }
        if grid.columns == 0 || grid.rows == 0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "block grid {}x{} has no cells",
                grid.columns, grid.rows
            )));
        }
        if !(grid.street_width >= 0.0) {
            return Err(LayoutError::InvalidGeometry(format!("street width {} is negative", grid.street_width)));
        }
        if !(min_height <= max_height) {
            return Err(LayoutError::InvalidGeometry(format!(
                "block height bounds inverted: min {} > max {}",
                min_height, max_height
            )));
        }
        let (fx, fy) = grid.footprint();
        if fx > topology.area.width() || fy > topology.area.height() {
            return Err(LayoutError::InvalidGeometry(format!(
                "block grid footprint {}x{} exceeds topology {}x{}",
                fx,
                fy,
                topology.area.width(),
                topology.area.height()
            )));
        }

        Ok(Self {
            topology,
            grid,
            min_height,
            max_height,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            placed: Vec::new(),
            occupied: HashSet::new(),
        })
    }

    /// Replace the rejection ceiling. A value of zero is raised to one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Rejections tolerated inside one `allocate_one` call.
    ///
    /// The configured ceiling, raised to `ATTEMPTS_PER_CELL` per grid cell so
    /// large grids do not give up while free cells remain.
    pub fn attempt_ceiling(&self) -> u32 {
        let scaled = self.grid.capacity().saturating_mul(ATTEMPTS_PER_CELL);
        scaled.max(self.max_attempts as u64).min(u32::MAX as u64) as u32
    }

    /// Blocks accepted so far, in acceptance order.
    pub fn placed(&self) -> &[Block] {
        &self.placed
    }

    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    /// Consume the allocator, returning the placed-block set.
    pub fn into_blocks(self) -> Vec<Block> {
        self.placed
    }

    /// Rectangle covered by grid cell `(gx, gy)`.
    pub fn cell_rect(&self, gx: u32, gy: u32) -> Rect {
        let (x0, y0) = self.grid.origin_in(&self.topology.area);
        let x_min = x0 + (self.grid.block_x + self.grid.street_width) * gx as f64;
        let y_min = y0 + (self.grid.block_y + self.grid.street_width) * gy as f64;
        Rect {
            x_min,
            x_max: x_min + self.grid.block_x,
            y_min,
            y_max: y_min + self.grid.block_y,
        }
    }

    /// Place one block.
    ///
    /// Samples the height first, then draws grid cells until one does not
    /// overlap any placed block. The height is drawn from the half-open
    /// interval `[min_height, max_height)`, like every other real draw.
    ///
    /// # Returns
    ///
    /// The accepted block, or `LayoutError::GridSaturated`. A full grid is
    /// reported at once with `attempts: 0` and consumes no draws; otherwise
    /// the error follows `attempt_ceiling()` consecutive rejections. The
    /// placed-block set is left untouched on error.
    pub fn allocate_one(&mut self, sampler: &mut impl UniformSampler) -> Result<Block, LayoutError> {
        let capacity = self.grid.capacity();
        if self.placed.len() as u64 >= capacity {
            log::warn!("Block grid full: all {} cells occupied", capacity);
            return Err(LayoutError::GridSaturated {
                placed: self.placed.len(),
                capacity,
                attempts: 0,
            });
        }

        let height = sampler.sample(self.min_height, self.max_height);
        let ceiling = self.attempt_ceiling();

        for attempt in 1..=ceiling {
            let gx = sampler.sample_index(self.grid.columns);
            let gy = sampler.sample_index(self.grid.rows);
            let candidate = self.cell_rect(gx, gy);

            // Cells are disjoint, so an occupied cell is the only way to overlap
            if self.occupied.contains(&(gx, gy)) || overlaps_any(&candidate, self.placed.iter().map(|b| &b.footprint)) {
                log::trace!("Block cell ({}, {}) occupied, attempt {}", gx, gy, attempt);
                continue;
            }

            let block = Block { footprint: candidate, height };
            log::debug!(
                "Block {} placed at cell ({}, {}) [{:.1}..{:.1}]x[{:.1}..{:.1}], height {:.2}",
                self.placed.len() + 1,
                gx,
                gy,
                candidate.x_min,
                candidate.x_max,
                candidate.y_min,
                candidate.y_max,
                height
            );
            self.placed.push(block);
            self.occupied.insert((gx, gy));
            return Ok(block);
        }

        log::warn!(
            "Block grid saturated after {} attempts with {}/{} cells occupied",
            ceiling,
            self.placed.len(),
            capacity
        );
        Err(LayoutError::GridSaturated {
            placed: self.placed.len(),
            capacity,
            attempts: ceiling,
        })
    }

    /// Place `n` blocks sequentially.
    ///
    /// # Returns
    ///
    /// The blocks accepted by this call in order, or the first saturation
    /// error. Blocks accepted before the error remain in `placed()`.
    pub fn allocate_many(&mut self, n: u32, sampler: &mut impl UniformSampler) -> Result<Vec<Block>, LayoutError> {
        let mut accepted = Vec::with_capacity(n as usize);
        for _ in 0..n {
            accepted.push(self.allocate_one(sampler)?);
        }
        Ok(accepted)
    }
}
