//! Deployment layout generation.
//!
//! Builds the static spatial arrangement a radio-network simulation starts
//! from: the topology bounding box, obstacle blocks, macro and small-cell
//! sites with their sector positions, and terminal mobility ranges.
//!
//! ## Module Organization
//!
//! - `types`: Geometric primitives, placed entities, and `LayoutError`
//! - `geometry`: Overlap predicate, containment, clipping
//! - `sampler`: Explicit, seedable randomness sources
//! - `blocks`: Rejection-sampled block placement on a street grid
//! - `hex_grid`: Macro hex grid dimensions, site count, and coordinates
//! - `small_cells`: Small-cell site and sector placement
//! - `mobility`: Terminal mobility ranges and initial positions
//! - `generator`: Runs all stages in a fixed order and returns a `Layout`

pub mod blocks;
pub mod generator;
pub mod geometry;
pub mod hex_grid;
pub mod mobility;
pub mod sampler;
pub mod small_cells;
pub mod types;

pub use generator::{BlockPlan, Layout, LayoutPlan, generate_layout};
pub use sampler::{ScriptedSampler, SeededSampler, UniformSampler};
pub use types::{Block, Cell, CellKind, LayoutError, Point3, Rect, Terminal, TerminalMobility, Topology};
