//! Shared configuration used by the binary and the library entry points.

pub mod scenario;

pub use scenario::{ScenarioConfig, ScenarioLoadError, load_scenario, parse_scenario};
