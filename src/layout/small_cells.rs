//! Small-cell site placement.
//!
//! Site centers are drawn uniformly from the topology shrunk by the macro
//! grid margin plus one small-cell spacing on every side. Each site carries
//! three sectors on a circle of radius `spacing / sqrt(3)`, 120 degrees
//! apart, rotated by a random base angle.

use std::f64::consts::PI;

use serde::Serialize;

use super::geometry::polar_offset;
use super::sampler::UniformSampler;
use super::types::{LayoutError, Point3, Rect, SmallCellSite, Topology};

/// Parameters of the small-cell deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmallCellPlan {
    /// Number of sites to place.
    pub sites: u32,
    /// Minimum spacing between small-cell sites (meters).
    pub spacing: f64,
    /// Antenna height (meters).
    pub site_height: f64,
}

impl SmallCellPlan {
    /// Radius of the sector ring around each site center.
    pub fn sector_radius(&self) -> f64 {
        self.spacing / 3f64.sqrt()
    }

    /// Area site centers are drawn from.
    ///
    /// `macro_margin` is the macro grid's buffer (`margin_factor * d`).
    pub fn placement_area(&self, topology: &Topology, macro_margin: f64) -> Rect {
        topology.area.shrink(macro_margin + self.spacing)
    }
}

/// Sector positions of one site in sector order.
pub fn sector_positions(center: &Point3, radius: f64, base_angle: f64) -> [Point3; 3] {
    [0.0, 1.0, 2.0].map(|j| polar_offset(center, radius, base_angle + j * 2.0 * PI / 3.0))
}

/// Place `plan.sites` small-cell sites.
///
/// Draw order per site: x, y, base angle.
///
/// # Returns
///
/// Sites in generation order, or `LayoutError::InvalidGeometry` when the
/// margin-reduced placement area is empty.
pub fn place_small_cells(
    plan: &SmallCellPlan,
    topology: &Topology,
    macro_margin: f64,
    sampler: &mut impl UniformSampler,
) -> Result<Vec<SmallCellSite>, LayoutError> {
    if plan.sites == 0 {
        return Ok(Vec::new());
    }
    let area = plan.placement_area(topology, macro_margin);
    if !area.is_valid() {
        return Err(LayoutError::InvalidGeometry(format!(
            "small-cell placement area {:?} is empty after removing a {} m margin",
            area,
            macro_margin + plan.spacing
        )));
    }

    let radius = plan.sector_radius();
    let mut sites = Vec::with_capacity(plan.sites as usize);
    for index in 0..plan.sites {
        let x = sampler.sample(area.x_min, area.x_max);
        let y = sampler.sample(area.y_min, area.y_max);
        let base_angle = sampler.sample(0.0, 2.0 * PI);
        let center = Point3::new(x, y, plan.site_height);
        log::debug!("Small-cell site {} at ({:.2}, {:.2}), base angle {:.3} rad", index, x, y, base_angle);
        sites.push(SmallCellSite {
            center,
            base_angle,
            sectors: sector_positions(&center, radius, base_angle),
        });
    }
    Ok(sites)
}
