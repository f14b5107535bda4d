//! Scenario loading, parsing, and validation logic.
//!
//! A scenario is a TOML file with one table per deployment tier. Every field
//! has a default, so an empty file (or no file at all) describes the
//! reference deployment: a 1x2 macro hex grid with one small-cell site, one
//! range-constrained terminal and 20% block density.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::layout::LayoutPlan;
use crate::layout::blocks::DEFAULT_MAX_ATTEMPTS;
use crate::layout::generator::BlockPlan;
use crate::layout::hex_grid::HexGrid;
use crate::layout::mobility::TerminalPlan;
use crate::layout::small_cells::SmallCellPlan;

/// Error type for scenario loading failures.
#[derive(Debug)]
pub enum ScenarioLoadError {
    FileReadError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ScenarioLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioLoadError::FileReadError(msg) => write!(f, "Failed to read file: {}", msg),
            ScenarioLoadError::ParseError(msg) => write!(f, "Failed to parse TOML: {}", msg),
            ScenarioLoadError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ScenarioLoadError {}

/// Macro hex grid parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroCellConfig {
    /// Number of sites along the x-axis of the hex grid.
    pub columns: u32,
    /// Number of site rows of the hex grid.
    pub rows: u32,
    /// Elevation of the macro cell air interface (m).
    pub height: f64,
    /// Distance between macro cell sites (m).
    pub spacing: f64,
    /// How much of the topology extends beyond the hex grid, as a fraction of `spacing`.
    pub margin_factor: f64,
    /// Offset of each sector node from the site center (m).
    pub sector_offset: f64,
}

impl Default for MacroCellConfig {
    fn default() -> Self {
        Self {
            columns: 1,
            rows: 2,
            height: 30.0,
            spacing: 500.0,
            margin_factor: 0.25,
            sector_offset: 0.5,
        }
    }
}

/// Small-cell deployment parameters. One site consists of three cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmallCellConfig {
    pub sites: u32,
    /// Elevation of the small-cell air interface (m).
    pub height: f64,
    /// Distance between any two small-cell sites (m).
    pub spacing: f64,
}

impl Default for SmallCellConfig {
    fn default() -> Self {
        Self {
            sites: 1,
            height: 6.0,
            spacing: 20.0,
        }
    }
}

/// Terminal population parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub count: u32,
    /// Terminal antenna height (m).
    pub height: f64,
    /// Random waypoint speed bounds (m/s). Either at zero means static terminals.
    pub min_speed: f64,
    pub max_speed: f64,
    /// How far the mobility range extends beyond the anchor small-cell site (m).
    pub range_margin: f64,
    /// Constrain terminal mobility to a box around a small-cell site.
    pub range_constrained: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            count: 1,
            height: 1.75,
            min_speed: 0.5,
            max_speed: 3.5,
            range_margin: 30.0,
            range_constrained: true,
        }
    }
}

/// City block parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Block density with respect to the street grid, `[0, 1]`.
    pub density: f64,
    pub x_dim: f64,
    pub y_dim: f64,
    pub street_width: f64,
    pub min_height: f64,
    pub max_height: f64,
    /// Rejection ceiling per block before the grid is reported saturated.
    pub max_attempts: u32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            density: 0.2,
            x_dim: 80.0,
            y_dim: 80.0,
            street_width: 20.0,
            min_height: 6.0,
            max_height: 15.0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Where the layout exports are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for all output files, relative to the working directory.
    pub directory: PathBuf,
    /// JSON layout document.
    pub layout_json: String,
    /// gnuplot overlay files.
    pub buildings: String,
    pub cells: String,
    pub terminals: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            layout_json: "layout.json".to_string(),
            buildings: "buildings.txt".to_string(),
            cells: "enbs.txt".to_string(),
            terminals: "ues.txt".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }
}

/// Root structure representing a whole scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Seed for the layout sampler. Report it to reproduce a run.
    pub seed: u64,
    pub macro_cells: MacroCellConfig,
    pub small_cells: SmallCellConfig,
    pub terminals: TerminalConfig,
    pub blocks: BlockConfig,
    pub output: OutputConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            macro_cells: MacroCellConfig::default(),
            small_cells: SmallCellConfig::default(),
            terminals: TerminalConfig::default(),
            blocks: BlockConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Translate the scenario into layout generation parameters.
    pub fn layout_plan(&self) -> LayoutPlan {
        LayoutPlan {
            hex_grid: HexGrid {
                columns: self.macro_cells.columns,
                rows: self.macro_cells.rows,
                spacing: self.macro_cells.spacing,
                margin_factor: self.macro_cells.margin_factor,
                site_height: self.macro_cells.height,
                sector_offset: self.macro_cells.sector_offset,
            },
            blocks: BlockPlan {
                density: self.blocks.density,
                block_x: self.blocks.x_dim,
                block_y: self.blocks.y_dim,
                street_width: self.blocks.street_width,
                min_height: self.blocks.min_height,
                max_height: self.blocks.max_height,
                max_attempts: self.blocks.max_attempts,
            },
            small_cells: SmallCellPlan {
                sites: self.small_cells.sites,
                spacing: self.small_cells.spacing,
                site_height: self.small_cells.height,
            },
            terminals: TerminalPlan {
                count: self.terminals.count,
                height: self.terminals.height,
                min_speed: self.terminals.min_speed,
                max_speed: self.terminals.max_speed,
                range_margin: self.terminals.range_margin,
                range_constrained: self.terminals.range_constrained,
            },
        }
    }
}

/// Parse a scenario from TOML text and validate it.
pub fn parse_scenario(text: &str) -> Result<ScenarioConfig, ScenarioLoadError> {
    let scenario: ScenarioConfig = toml::from_str(text)
        .context("Invalid TOML format")
        .map_err(|e| ScenarioLoadError::ParseError(format!("{:#}", e)))?;

    validate_scenario(&scenario).map_err(ScenarioLoadError::ValidationError)?;

    Ok(scenario)
}

/// Load, parse and validate a scenario file.
///
/// # Parameters
///
/// * `path` - Path to the scenario TOML file
///
/// # Returns
///
/// Parsed and validated scenario or an error.
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, ScenarioLoadError> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
        .map_err(|e| ScenarioLoadError::FileReadError(format!("{:#}", e)))?;

    parse_scenario(&data)
}

/// Validate scenario parameters before any placement runs.
///
/// # Returns
///
/// `Ok(())` if validation passes, `Err(String)` with error description otherwise.
pub fn validate_scenario(scenario: &ScenarioConfig) -> Result<(), String> {
    let macro_cells = &scenario.macro_cells;
    if macro_cells.columns == 0 || macro_cells.rows == 0 {
        return Err(format!(
            "Macro hex grid {}x{} must have at least one column and one row",
            macro_cells.columns, macro_cells.rows
        ));
    }
    if !(macro_cells.spacing > 0.0) {
        return Err(format!("Invalid macro_cells.spacing {}, must be positive", macro_cells.spacing));
    }
    if !(macro_cells.margin_factor >= 0.0) {
        return Err(format!("Invalid macro_cells.margin_factor {}, must be non-negative", macro_cells.margin_factor));
    }
    if macro_cells.rows == 1 && macro_cells.margin_factor == 0.0 {
        return Err("A single macro row needs a positive margin_factor, otherwise the topology has no height".to_string());
    }
    if !(macro_cells.sector_offset >= 0.0) {
        return Err(format!("Invalid macro_cells.sector_offset {}, must be non-negative", macro_cells.sector_offset));
    }

    let small_cells = &scenario.small_cells;
    if small_cells.sites > 0 && !(small_cells.spacing > 0.0) {
        return Err(format!("Invalid small_cells.spacing {}, must be positive", small_cells.spacing));
    }

    let terminals = &scenario.terminals;
    if terminals.min_speed < 0.0 || terminals.max_speed < 0.0 {
        return Err("Terminal speeds must be non-negative".to_string());
    }
    if terminals.min_speed > terminals.max_speed {
        return Err(format!(
            "Invalid terminal speeds: min {} must not exceed max {}",
            terminals.min_speed, terminals.max_speed
        ));
    }
    if !(terminals.range_margin > 0.0) {
        return Err(format!("Invalid terminals.range_margin {}, must be positive", terminals.range_margin));
    }
    let plan = scenario.layout_plan();
    if terminals.count > 0 && plan.terminals.is_mobile() && terminals.range_constrained && small_cells.sites == 0 {
        return Err("Range-constrained mobile terminals require at least one small-cell site".to_string());
    }

    let blocks = &scenario.blocks;
    if !(0.0..=1.0).contains(&blocks.density) {
        return Err(format!("Invalid blocks.density {}, must be within 0-1", blocks.density));
    }
    if blocks.density > 0.0 {
        if !(blocks.x_dim > 0.0 && blocks.y_dim > 0.0) {
            return Err(format!("Invalid block dimensions {}x{}, must be positive", blocks.x_dim, blocks.y_dim));
        }
        if !(blocks.street_width >= 0.0) {
            return Err(format!("Invalid blocks.street_width {}, must be non-negative", blocks.street_width));
        }
        if blocks.min_height > blocks.max_height {
            return Err(format!(
                "Invalid block heights: min {} must not exceed max {}",
                blocks.min_height, blocks.max_height
            ));
        }
        if blocks.max_attempts == 0 {
            return Err("blocks.max_attempts must be at least 1".to_string());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_reference_deployment() {
        let scenario = ScenarioConfig::default();
        assert!(validate_scenario(&scenario).is_ok());
        let plan = scenario.layout_plan();
        assert_eq!(plan.hex_grid.site_count(), 3);
        assert_eq!(plan.hex_grid.width(), 750.0);
        assert_eq!(plan.blocks.density, 0.2);
        assert!(plan.terminals.is_mobile());
        assert_eq!(scenario.output.path_of("ues.txt"), PathBuf::from("./ues.txt"));
    }

    #[test]
    fn empty_file_yields_defaults() {
        let scenario = parse_scenario("").unwrap();
        assert_eq!(scenario.seed, 1);
        assert_eq!(scenario.macro_cells.rows, 2);
        assert_eq!(scenario.output.layout_json, "layout.json");
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let text = r#"
            seed = 42

            [macro_cells]
            columns = 3
            rows = 4

            [blocks]
            density = 0.5
            street_width = 10.0

            [terminals]
            count = 12
            range_constrained = false
        "#;
        let scenario = parse_scenario(text).unwrap();
        assert_eq!(scenario.seed, 42);
        assert_eq!(scenario.macro_cells.columns, 3);
        assert_eq!(scenario.macro_cells.spacing, 500.0);
        assert_eq!(scenario.blocks.density, 0.5);
        assert_eq!(scenario.blocks.x_dim, 80.0);
        assert_eq!(scenario.blocks.street_width, 10.0);
        assert_eq!(scenario.terminals.count, 12);
        assert!(!scenario.terminals.range_constrained);
        assert_eq!(scenario.small_cells.sites, 1);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse_scenario("seed = \"many\"").unwrap_err();
        assert!(matches!(err, ScenarioLoadError::ParseError(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_scenario(Path::new("/nonexistent/scenario.toml")).unwrap_err();
        assert!(matches!(err, ScenarioLoadError::FileReadError(_)));
        assert!(err.to_string().starts_with("Failed to read file"));
    }

    #[test]
    fn validation_rejects_bad_parameters() {
        let reject = |mutate: fn(&mut ScenarioConfig)| {
            let mut scenario = ScenarioConfig::default();
            mutate(&mut scenario);
            validate_scenario(&scenario).unwrap_err()
        };

        assert!(reject(|s| s.macro_cells.columns = 0).contains("Macro hex grid"));
        assert!(reject(|s| s.macro_cells.spacing = 0.0).contains("spacing"));
        assert!(reject(|s| s.macro_cells.margin_factor = -0.5).contains("margin_factor"));
        assert!(reject(|s| s.blocks.density = 1.5).contains("density"));
        assert!(reject(|s| s.blocks.x_dim = 0.0).contains("dimensions"));
        assert!(reject(|s| s.blocks.min_height = 20.0).contains("heights"));
        assert!(reject(|s| s.blocks.max_attempts = 0).contains("max_attempts"));
        assert!(reject(|s| s.terminals.min_speed = 5.0).contains("speeds"));
        assert!(reject(|s| s.small_cells.sites = 0).contains("small-cell site"));
    }

    #[test]
    fn static_terminals_do_not_need_small_cells() {
        let mut scenario = ScenarioConfig::default();
        scenario.small_cells.sites = 0;
        scenario.terminals.min_speed = 0.0;
        scenario.terminals.max_speed = 0.0;
        assert!(validate_scenario(&scenario).is_ok());
    }

    #[test]
    fn validation_error_surfaces_through_parse() {
        let err = parse_scenario("[blocks]\ndensity = -1.0").unwrap_err();
        assert!(matches!(err, ScenarioLoadError::ValidationError(_)));
    }

    #[test]
    fn compact_macro_grid_generates_without_blocks() {
        let scenario = parse_scenario("[macro_cells]\nrows = 2\nspacing = 60.0").unwrap();
        let layout = crate::layout::generate_layout(&scenario.layout_plan(), &mut crate::layout::SeededSampler::new(scenario.seed)).unwrap();
        assert!(layout.blocks.is_empty());
        assert_eq!(layout.terminals.len(), 1);
    }
}
