//! Procedural deployment layout for radio-network simulations.
//!
//! Generates the static spatial arrangement a simulation starts from:
//! obstacle blocks on a street grid, macro sites on a hex grid, randomly
//! placed three-sector small-cell sites, and terminals with clipped mobility
//! ranges. All randomness comes from an explicit `UniformSampler`, so a
//! layout is reproducible from its seed.
//!
//! ## Module Organization
//!
//! - `layout`: Placement algorithms and the `Layout` value they produce
//! - `install`: `Installer` and `PositionLookup` seams towards the simulator
//! - `common`: Scenario configuration (TOML)
//! - `export`: gnuplot overlays and the JSON layout document

pub mod common;
pub mod export;
pub mod install;
pub mod layout;

pub use install::{Installer, LayoutRecorder, NodeRef, PositionLookup};
pub use layout::{Layout, LayoutError, LayoutPlan, SeededSampler, UniformSampler, generate_layout};
