//! Configuration types for loading scenarios from YAML.
//!
//! A scenario file carries up to two independent sections:
//!
//! - [`OrbitConfig`]     – physical constants of a two-body system and the step grid
//! - [`CatalogueConfig`] – which catalogue table to read and which columns to extract
//!
//! Both are wrapped by [`ScenarioConfig`], the top-level type loaded from YAML.
//!
//! # YAML format
//! ```yaml
//! orbit:
//!   m1: 1.989e30          # primary mass (kg)
//!   m2: 3.285e23          # secondary mass (kg)
//!   ecc: 0.21             # eccentricity, 0 <= e < 1
//!   L: 9.0e38             # angular momentum magnitude (J s)
//!   G: 6.67408e-11        # gravitational constant
//!   steps: 100            # steps per orbital period (h = T / steps)
//!   # step_size: 7.8e4    # optional fixed h in seconds, overrides `steps`
//!
//! catalogue:
//!   source: duration      # basic | flux | duration | { url: "..." }
//!   start: 1              # first line to read, 1-indexed
//!   step: 1               # physical lines per logical row
//!   timeout_secs: 30
//!   columns:
//!     - index: 5          # 1-indexed whitespace-delimited column
//!       name: t90
//! ```
//!
//! The scenario builders turn these into immutable runtime structs
//! (`OrbitalParameters`, `CatalogueQuery`).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalogue::sources::CatalogueSource;
use crate::catalogue::table::{CatalogueQuery, ColumnSpec};

fn default_steps() -> usize {
    100
}

fn default_row_step() -> usize {
    1
}

fn default_timeout() -> u64 {
    30
}

/// Physical parameters of the two-body system
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct OrbitConfig {
    pub m1: f64, // primary mass
    pub m2: f64, // secondary mass
    pub ecc: f64, // eccentricity
    pub L: f64, // angular momentum magnitude
    pub G: f64, // gravitational constant
    #[serde(default = "default_steps")]
    pub steps: usize, // steps per orbital period
    #[serde(default)]
    pub step_size: Option<f64>, // fixed step size, overrides `steps` when set
}

/// Named catalogue tables
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CataloguePreset {
    Basic, // burst positions
    Flux, // fluences and peak fluxes
    Duration, // T_50 / T_90 durations
}

/// Where a catalogue table comes from
/// `source: duration` or `source: { url: "https://..." }`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CatalogueSourceConfig {
    Preset(CataloguePreset),
    Custom { url: String }, // any other plaintext table
}

impl From<CatalogueSourceConfig> for CatalogueSource {
    fn from(cfg: CatalogueSourceConfig) -> Self {
        match cfg {
            CatalogueSourceConfig::Preset(CataloguePreset::Basic) => CatalogueSource::Basic,
            CatalogueSourceConfig::Preset(CataloguePreset::Flux) => CatalogueSource::Flux,
            CatalogueSourceConfig::Preset(CataloguePreset::Duration) => CatalogueSource::Duration,
            CatalogueSourceConfig::Custom { url } => CatalogueSource::Url(url),
        }
    }
}

/// A single column to extract
#[derive(Deserialize, Debug, Clone)]
pub struct ColumnConfig {
    pub index: usize, // 1-indexed column number
    #[serde(default)]
    pub name: Option<String>, // label used in output, defaults to `col<index>`
}

/// Catalogue table selection
#[derive(Deserialize, Debug, Clone)]
pub struct CatalogueConfig {
    pub source: CatalogueSourceConfig,
    pub columns: Vec<ColumnConfig>,
    pub start: usize, // first line, 1-indexed
    #[serde(default = "default_row_step")]
    pub step: usize, // physical lines per logical row
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64, // request timeout
}

impl CatalogueConfig {
    /// Row/column selection for the table parser
    pub fn query(&self) -> CatalogueQuery {
        let columns = self
            .columns
            .iter()
            .map(|c| match &c.name {
                Some(name) => ColumnSpec::named(c.index, name),
                None => ColumnSpec::new(c.index),
            })
            .collect();

        CatalogueQuery {
            columns,
            start: self.start,
            step: self.step,
        }
    }

    pub fn source(&self) -> CatalogueSource {
        self.source.clone().into()
    }
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub orbit: Option<OrbitConfig>, // two-body integration setup
    #[serde(default)]
    pub catalogue: Option<CatalogueConfig>, // catalogue table selection
}

/// Resolve a scenario file name: existing paths are used as given,
/// bare names are looked up in the crate's `scenarios/` directory
pub fn scenario_path(file_name: &str) -> PathBuf {
    let given = PathBuf::from(file_name);
    if given.exists() {
        return given;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name)
}

/// Read and deserialize a scenario YAML file
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let file = File::open(path)
        .with_context(|| format!("failed to open scenario {}", path.display()))?;
    let reader = BufReader::new(file);
    let cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", path.display()))?;
    Ok(cfg)
}
