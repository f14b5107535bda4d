//! Hexagonal macro-cell grid.
//!
//! Derives the topology bounding box and the macro-site count from the hex
//! grid geometry, and assigns coordinates to every macro site and sector.
//! Nothing here is random.
//!
//! Rows alternate between `columns` and `columns + 1` sites: odd rows are
//! shifted left by half a spacing and carry one extra site, so every two
//! rows hold `2 * columns + 1` sites.

use std::f64::consts::PI;

use serde::Serialize;

use super::geometry::polar_offset;
use super::types::{LayoutError, MacroSector, MacroSite, Point3, Rect, Topology};

/// Sector boresights of a three-sector macro site, degrees.
pub const SECTOR_ORIENTATIONS_DEG: [f64; 3] = [0.0, 120.0, -120.0];

/// Geometry of the macro hex grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HexGrid {
    /// Sites along X in even rows (`Nx`).
    pub columns: u32,
    /// Number of rows (`Ny`).
    pub rows: u32,
    /// Inter-site distance `d` (meters).
    pub spacing: f64,
    /// Fraction of `d` added as buffer beyond the outermost sites.
    pub margin_factor: f64,
    /// Antenna height of every macro site (meters).
    pub site_height: f64,
    /// Distance of each sector node from the site center (meters).
    pub sector_offset: f64,
}

impl HexGrid {
    /// Topology width: `(Nx + 2m) * d`.
    pub fn width(&self) -> f64 {
        (self.columns as f64 + 2.0 * self.margin_factor) * self.spacing
    }

    /// Topology height: `((Ny - 1) * sqrt(3)/2 + 2m) * d`.
    pub fn height(&self) -> f64 {
        ((self.rows.saturating_sub(1)) as f64 * 3f64.sqrt() / 2.0 + 2.0 * self.margin_factor) * self.spacing
    }

    /// Bounding volume anchored at the origin, up to the macro site height.
    pub fn topology(&self) -> Topology {
        Topology {
            area: Rect::new(0.0, self.width(), 0.0, self.height()),
            z_min: 0.0,
            z_max: self.site_height,
        }
    }

    /// Number of macro sites: `Ny*Nx + (Ny - (Ny mod 2)) / 2`.
    pub fn site_count(&self) -> u32 {
        macro_site_count(self.columns, self.rows)
    }

    /// Number of macro sector radios (three per site).
    pub fn cell_count(&self) -> u32 {
        3 * self.site_count()
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "hex grid {}x{} has no sites",
                self.columns, self.rows
            )));
        }
        if !(self.spacing > 0.0) {
            return Err(LayoutError::InvalidGeometry(format!("macro site spacing {} must be positive", self.spacing)));
        }
        if !(self.margin_factor >= 0.0) {
            return Err(LayoutError::InvalidGeometry(format!("margin factor {} is negative", self.margin_factor)));
        }
        // A single row with no margin would leave a zero-height topology
        if !self.topology().area.is_valid() {
            return Err(LayoutError::InvalidGeometry(format!(
                "hex grid produces a degenerate topology {}x{}",
                self.width(),
                self.height()
            )));
        }
        Ok(())
    }

    /// Center of macro site `index`.
    pub fn site_center(&self, index: u32) -> Point3 {
        let pair = 2 * self.columns + 1;
        let mut row = (index / pair) * 2;
        let mut col = index % pair;
        if col >= self.columns {
            row += 1;
            col -= self.columns;
        }

        let mut x = (0.5 + self.margin_factor) * self.spacing + col as f64 * self.spacing;
        if row % 2 == 1 {
            x -= self.spacing / 2.0;
        }
        let y = self.margin_factor * self.spacing + row as f64 * self.spacing * 3f64.sqrt() / 2.0;
        Point3::new(x, y, self.site_height)
    }

    /// All macro sites with their three sectors, in site order.
    pub fn sites(&self) -> Vec<MacroSite> {
        (0..self.site_count())
            .map(|index| {
                let center = self.site_center(index);
                let sectors = SECTOR_ORIENTATIONS_DEG.map(|orientation_deg| MacroSector {
                    position: polar_offset(&center, self.sector_offset, orientation_deg * PI / 180.0),
                    orientation_deg,
                });
                MacroSite { center, sectors }
            })
            .collect()
    }
}

/// Closed-form macro-site count of a staggered hex grid.
pub fn macro_site_count(columns: u32, rows: u32) -> u32 {
    rows * columns + (rows - rows % 2) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::{horizontal_distance, point_in_rect};

    fn grid(columns: u32, rows: u32) -> HexGrid {
        HexGrid {
            columns,
            rows,
            spacing: 500.0,
            margin_factor: 0.25,
            site_height: 30.0,
            sector_offset: 0.5,
        }
    }

    #[test]
    fn site_count_matches_closed_form() {
        for rows in 1..=6u32 {
            for columns in 1..=4u32 {
                let expected = rows * columns + (rows - rows % 2) / 2;
                assert_eq!(macro_site_count(columns, rows), expected);
                assert_eq!(grid(columns, rows).cell_count(), 3 * expected);
            }
        }
        assert_eq!(macro_site_count(2, 3), 7);
        assert_eq!(macro_site_count(1, 2), 3);
        assert_eq!(macro_site_count(1, 1), 1);
        assert_eq!(macro_site_count(3, 4), 14);
    }

    #[test]
    fn site_count_matches_enumerated_rows() {
        // Even rows hold `columns` sites, odd rows one more.
        for rows in 1..=6u32 {
            for columns in 1..=4u32 {
                let enumerated: u32 = (0..rows).map(|r| if r % 2 == 0 { columns } else { columns + 1 }).sum();
                assert_eq!(macro_site_count(columns, rows), enumerated);
            }
        }
    }

    #[test]
    fn topology_dimensions() {
        let g = grid(1, 2);
        assert!((g.width() - 750.0).abs() < 1e-9);
        let expected_height = (3f64.sqrt() / 2.0 + 0.5) * 500.0;
        assert!((g.height() - expected_height).abs() < 1e-9);
        let t = g.topology();
        assert_eq!(t.area.x_min, 0.0);
        assert_eq!(t.area.y_min, 0.0);
        assert_eq!(t.z_max, 30.0);
    }

    #[test]
    fn site_centers_follow_staggered_rows() {
        let g = grid(2, 3);
        let row_step = 500.0 * 3f64.sqrt() / 2.0;
        let expected = [
            (375.0, 125.0),
            (875.0, 125.0),
            (125.0, 125.0 + row_step),
            (625.0, 125.0 + row_step),
            (1125.0, 125.0 + row_step),
            (375.0, 125.0 + 2.0 * row_step),
            (875.0, 125.0 + 2.0 * row_step),
        ];
        for (i, (x, y)) in expected.iter().enumerate() {
            let c = g.site_center(i as u32);
            assert!((c.x - x).abs() < 1e-9, "site {} x {} != {}", i, c.x, x);
            assert!((c.y - y).abs() < 1e-9, "site {} y {} != {}", i, c.y, y);
            assert_eq!(c.z, 30.0);
        }
    }

    #[test]
    fn every_sector_lies_inside_topology() {
        for rows in 1..=6u32 {
            for columns in 1..=4u32 {
                let g = grid(columns, rows);
                let area = g.topology().area;
                let sites = g.sites();
                assert_eq!(sites.len() as u32, g.site_count());
                for site in &sites {
                    for sector in &site.sectors {
                        assert!(point_in_rect(&sector.position, &area));
                    }
                }
            }
        }
    }

    #[test]
    fn sectors_sit_at_offset_in_boresight_direction() {
        let g = grid(1, 1);
        let site = &g.sites()[0];
        let orientations: Vec<f64> = site.sectors.iter().map(|s| s.orientation_deg).collect();
        assert_eq!(orientations, vec![0.0, 120.0, -120.0]);
        for sector in &site.sectors {
            assert!((horizontal_distance(&site.center, &sector.position) - 0.5).abs() < 1e-12);
        }
        assert!((site.sectors[0].position.x - site.center.x - 0.5).abs() < 1e-12);
        assert!((site.sectors[1].position.y - site.center.y - 0.5 * 3f64.sqrt() / 2.0).abs() < 1e-12);
        assert!((site.sectors[2].position.y - site.center.y + 0.5 * 3f64.sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn validation_catches_degenerate_grids() {
        assert!(grid(1, 2).validate().is_ok());
        assert!(grid(0, 2).validate().is_err());
        assert!(HexGrid { spacing: 0.0, ..grid(1, 2) }.validate().is_err());
        assert!(HexGrid { margin_factor: 0.0, ..grid(1, 1) }.validate().is_err());
        assert!(HexGrid { margin_factor: -0.1, ..grid(1, 2) }.validate().is_err());
    }
}
