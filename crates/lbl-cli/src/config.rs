//! Run configuration for the `lbl` binary.
//!
//! Every field has a serde default, so an empty file (or no file at all)
//! describes a valid run. Command-line flags are applied on top afterwards.

use anyhow::{Context, Result};
use lbl_core::{AtmosphericConditions, SpectralGrid};
use lbl_spectra::SynthesisOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LblConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub atmosphere: AtmosphereConfig,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub synthesis: SynthesisOptions,

    #[serde(default)]
    pub output: OutputConfig,
}

impl LblConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate ranges of the ambient state and grid
    pub fn validate(&self) -> Result<()> {
        self.conditions()?;
        self.spectral_grid()?;
        Ok(())
    }

    pub fn conditions(&self) -> Result<AtmosphericConditions> {
        let a = &self.atmosphere;
        AtmosphericConditions::new(a.temperature, a.pressure, a.abundance)
            .context("Invalid [atmosphere] section")
    }

    pub fn spectral_grid(&self) -> Result<SpectralGrid> {
        let g = &self.grid;
        SpectralGrid::new(g.lower, g.upper, g.density).context("Invalid [grid] section")
    }
}

// =============================================================================
// Database Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding the CSV tables
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

// =============================================================================
// Atmosphere Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereConfig {
    /// [K]
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// [Pa]
    #[serde(default = "default_pressure")]
    pub pressure: f64,

    /// Mole fraction of the absorber
    #[serde(default = "default_abundance")]
    pub abundance: f64,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            pressure: default_pressure(),
            abundance: default_abundance(),
        }
    }
}

// =============================================================================
// Grid Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Inclusive lower bound [cm-1]
    #[serde(default = "default_lower")]
    pub lower: i32,

    /// Inclusive upper bound [cm-1]
    #[serde(default = "default_upper")]
    pub upper: i32,

    /// Samples per wavenumber
    #[serde(default = "default_density")]
    pub density: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lower: default_lower(),
            upper: default_upper(),
            density: default_density(),
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON output file; stdout when unset
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            pretty: true,
        }
    }
}

// Default value functions
fn default_database_path() -> String { "data/hitran".to_string() }
fn default_temperature() -> f64 { 296.0 }
fn default_pressure() -> f64 { 101325.0 }
fn default_abundance() -> f64 { 1.0 }
fn default_lower() -> i32 { 1 }
fn default_upper() -> i32 { 3000 }
fn default_density() -> u32 { 10 }
fn default_true() -> bool { true }
