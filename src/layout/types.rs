//! Type definitions for layout generation.
//!
//! Contains the geometric primitives and the entities produced while
//! building a deployment layout:
//! - Points and axis-aligned rectangles in world coordinates (meters)
//! - The topology bounding volume
//! - Obstacle blocks, macro and small-cell sites, sector cells
//! - Terminals with their mobility description
//! - The error type shared by all placement operations

use serde::Serialize;

/// Point in world coordinates (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned rectangle in the horizontal plane.
///
/// Placement logic only ever produces rectangles with `x_min < x_max` and
/// `y_min < y_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self { x_min, x_max, y_min, y_max }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// True if both extents are strictly positive and all bounds are finite.
    pub fn is_valid(&self) -> bool {
        [self.x_min, self.x_max, self.y_min, self.y_max].iter().all(|v| v.is_finite()) && self.x_min < self.x_max && self.y_min < self.y_max
    }

    /// Shrink the rectangle by `margin` on every side.
    ///
    /// The result may be inverted when the margin is too large; callers check
    /// `is_valid` before sampling inside it.
    pub fn shrink(&self, margin: f64) -> Rect {
        Rect {
            x_min: self.x_min + margin,
            x_max: self.x_max - margin,
            y_min: self.y_min + margin,
            y_max: self.y_max - margin,
        }
    }
}

/// Bounding volume of the whole deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Topology {
    pub area: Rect,
    pub z_min: f64,
    pub z_max: f64,
}

/// A rectangular obstacle (building) with its sampled height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Block {
    pub footprint: Rect,
    pub height: f64,
}

/// A macro site: one tower carrying three sector radios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroSite {
    pub center: Point3,
    pub sectors: [MacroSector; 3],
}

/// Sector radio position on a macro tower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroSector {
    pub position: Point3,
    /// Antenna boresight in degrees (0, 120, -120).
    pub orientation_deg: f64,
}

/// A small-cell site with its three sector positions, in sector order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmallCellSite {
    pub center: Point3,
    /// Random base angle (radians) the sector ring was rotated by.
    pub base_angle: f64,
    pub sectors: [Point3; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Macro,
    Small,
}

/// One installed sector radio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cell {
    /// 1-based, macro cells first, then small cells.
    pub cell_id: u16,
    pub kind: CellKind,
    pub position: Point3,
    /// Only macro sectors are directional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation_deg: Option<f64>,
}

/// How a terminal is allowed to move once the simulation starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum TerminalMobility {
    /// Constant position for the whole run.
    Static,
    /// Random waypoint movement inside `range`.
    RandomWaypoint { range: Rect, min_speed: f64, max_speed: f64 },
}

/// A mobile terminal and its initial position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Terminal {
    /// 1-based, in generation order.
    pub imsi: u64,
    pub position: Point3,
    pub mobility: TerminalMobility,
    /// Index of the small-cell site this terminal is anchored to, if range-constrained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_site: Option<usize>,
}

/// Error type for layout generation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Geometry parameters that cannot produce a valid placement.
    InvalidGeometry(String),
    /// The block allocator gave up after `attempts` consecutive rejections,
    /// or found every cell occupied (`attempts == 0`).
    GridSaturated { placed: usize, capacity: u64, attempts: u32 },
    /// Range-constrained terminals were requested without any small-cell site to anchor to.
    NoSmallCellSites,
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            LayoutError::GridSaturated { placed, capacity, attempts: 0 } => {
                write!(f, "Block grid saturated: all {} cells occupied ({} blocks placed)", capacity, placed)
            }
            LayoutError::GridSaturated { placed, capacity, attempts } => write!(
                f,
                "Block grid saturated: no free cell found after {} attempts ({} blocks placed, grid capacity {})",
                attempts, placed, capacity
            ),
            LayoutError::NoSmallCellSites => write!(f, "Mobility range requires at least one small-cell site"),
        }
    }
}

impl std::error::Error for LayoutError {}
