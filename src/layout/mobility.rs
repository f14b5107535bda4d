//! Terminal mobility ranges and initial positions.
//!
//! Range-constrained terminals are anchored round-robin to the small-cell
//! sites: terminal `i` gets a box of `margin` meters around
//! `site[i mod site_count]`, clipped to the topology.

use serde::Serialize;

use super::geometry::clip_to;
use super::sampler::UniformSampler;
use super::types::{LayoutError, Point3, Rect, SmallCellSite, Terminal, TerminalMobility, Topology};

/// Speeds at or below this are treated as "not moving".
const MIN_MOBILE_SPEED: f64 = 1e-6;

/// Parameters of the terminal population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerminalPlan {
    pub count: u32,
    /// Antenna height (meters).
    pub height: f64,
    /// Random waypoint speed bounds (m/s).
    pub min_speed: f64,
    pub max_speed: f64,
    /// Half-width of the mobility box around the anchor site (meters).
    pub range_margin: f64,
    /// Anchor terminals to small-cell sites instead of roaming the topology.
    pub range_constrained: bool,
}

impl TerminalPlan {
    pub fn is_mobile(&self) -> bool {
        self.min_speed > MIN_MOBILE_SPEED && self.max_speed > MIN_MOBILE_SPEED
    }
}

/// Mobility box of `margin` meters around `site_center`, clipped to `topology`.
pub fn mobility_range(site_center: &Point3, margin: f64, topology: &Topology) -> Rect {
    let unclipped = Rect {
        x_min: site_center.x - margin,
        x_max: site_center.x + margin,
        y_min: site_center.y - margin,
        y_max: site_center.y + margin,
    };
    clip_to(&unclipped, &topology.area)
}

/// Round-robin anchor assignment: site index for terminal `terminal_index`.
///
/// # Returns
///
/// `LayoutError::NoSmallCellSites` when there is nothing to anchor to.
pub fn anchor_site(terminal_index: usize, site_count: usize) -> Result<usize, LayoutError> {
    if site_count == 0 {
        return Err(LayoutError::NoSmallCellSites);
    }
    Ok(terminal_index % site_count)
}

/// Mobility ranges for `count` terminals anchored round-robin to `sites`.
pub fn constrained_ranges(count: u32, sites: &[SmallCellSite], margin: f64, topology: &Topology) -> Result<Vec<(usize, Rect)>, LayoutError> {
    (0..count as usize)
        .map(|i| {
            let site = anchor_site(i, sites.len())?;
            Ok((site, mobility_range(&sites[site].center, margin, topology)))
        })
        .collect()
}

fn sample_position(area: &Rect, z: f64, sampler: &mut impl UniformSampler) -> Point3 {
    let x = sampler.sample(area.x_min, area.x_max);
    let y = sampler.sample(area.y_min, area.y_max);
    Point3::new(x, y, z)
}

/// Create the terminal population.
///
/// Mobile terminals get a random waypoint range: around their anchor site
/// when range-constrained, otherwise the whole topology. Terminals with a
/// zero speed bound are static. Each initial position is drawn (x, then y)
/// uniformly inside the terminal's range, or the topology when static.
pub fn place_terminals(
    plan: &TerminalPlan,
    sites: &[SmallCellSite],
    topology: &Topology,
    sampler: &mut impl UniformSampler,
) -> Result<Vec<Terminal>, LayoutError> {
    let mobile = plan.is_mobile();
    let anchored = if mobile && plan.range_constrained {
        Some(constrained_ranges(plan.count, sites, plan.range_margin, topology)?)
    } else {
        None
    };

    let mut terminals = Vec::with_capacity(plan.count as usize);
    for i in 0..plan.count as usize {
        let (anchor, mobility, area) = match (&anchored, mobile) {
            (Some(ranges), _) => {
                let (site, range) = ranges[i];
                (
                    Some(site),
                    TerminalMobility::RandomWaypoint {
                        range,
                        min_speed: plan.min_speed,
                        max_speed: plan.max_speed,
                    },
                    range,
                )
            }
            (None, true) => (
                None,
                TerminalMobility::RandomWaypoint {
                    range: topology.area,
                    min_speed: plan.min_speed,
                    max_speed: plan.max_speed,
                },
                topology.area,
            ),
            (None, false) => (None, TerminalMobility::Static, topology.area),
        };

        let position = sample_position(&area, plan.height, sampler);
        let imsi = i as u64 + 1;
        log::trace!("Terminal {} at ({:.2}, {:.2}), anchor {:?}", imsi, position.x, position.y, anchor);
        terminals.push(Terminal {
            imsi,
            position,
            mobility,
            anchor_site: anchor,
        });
    }
    Ok(terminals)
}
