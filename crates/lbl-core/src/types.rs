//! Core data types shared by the store, the line-shape code and the driver.

use crate::constants::PA_TO_ATM;
use crate::errors::{LblError, Result};
use serde::{Deserialize, Serialize};

/// Per-line spectroscopic constants, pre-joined with the isotopologue mass.
///
/// Records are produced by value from a transition cursor and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Transition wavenumber [cm-1]
    pub center: f64,
    /// Reference line strength at 296 K [cm-1 / (molecule cm-2)]
    pub strength: f64,
    /// Air-broadened half-width [cm-1 atm-1]
    pub gamma_air: f64,
    /// Self-broadened half-width [cm-1 atm-1]
    pub gamma_self: f64,
    /// Temperature exponent of the air-broadened half-width
    pub n_air: f64,
    /// Lower-state energy [cm-1]
    pub elower: f64,
    /// Air pressure shift [cm-1 atm-1]
    pub delta_air: f64,
    /// HITRAN local isotopologue id, already normalized (0 -> 10)
    pub local_iso_id: u32,
    /// Isotopologue molecular mass [g mol-1]
    pub mass: f64,
}

/// Ambient state a spectrum is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericConditions {
    /// Temperature [K]
    pub temperature: f64,
    /// Total pressure [Pa]
    pub pressure: f64,
    /// Mole fraction of the absorbing gas [mol mol-1]
    pub abundance: f64,
}

impl AtmosphericConditions {
    pub fn new(temperature: f64, pressure: f64, abundance: f64) -> Result<Self> {
        let conditions = Self {
            temperature,
            pressure,
            abundance,
        };
        conditions.validate()?;
        Ok(conditions)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(LblError::config(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        if !(self.pressure.is_finite() && self.pressure >= 0.0) {
            return Err(LblError::config(format!(
                "pressure must be non-negative, got {}",
                self.pressure
            )));
        }
        if !(0.0..=1.0).contains(&self.abundance) {
            return Err(LblError::config(format!(
                "abundance must lie in [0, 1], got {}",
                self.abundance
            )));
        }
        Ok(())
    }

    /// Total pressure [atm].
    #[inline]
    pub fn pressure_atm(&self) -> f64 {
        self.pressure * PA_TO_ATM
    }

    /// Partial pressure of the absorber [atm].
    #[inline]
    pub fn partial_pressure_atm(&self) -> f64 {
        self.pressure_atm() * self.abundance
    }
}

/// Largest sample count of a grid: the most `f64` values one buffer can hold.
pub const MAX_SAMPLES: u64 = isize::MAX as u64 / std::mem::size_of::<f64>() as u64;

/// Equally spaced wavenumber grid with unit-fraction spacing.
///
/// Both bounds are inclusive, so the grid holds
/// `(upper - lower) * density + 1` samples and the last sample is `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectralGrid {
    /// Lower bound [cm-1]
    pub lower: i32,
    /// Upper bound [cm-1]
    pub upper: i32,
    /// Samples per wavenumber
    pub density: u32,
}

impl SpectralGrid {
    pub fn new(lower: i32, upper: i32, density: u32) -> Result<Self> {
        if density == 0 {
            return Err(LblError::grid("density must be a positive integer"));
        }
        if upper <= lower {
            return Err(LblError::grid(format!(
                "upper bound {} must exceed lower bound {}",
                upper, lower
            )));
        }
        let span = (upper as i64 - lower as i64) as u64;
        match span.checked_mul(density as u64) {
            Some(intervals) if intervals < MAX_SAMPLES => {}
            _ => {
                return Err(LblError::grid(format!(
                    "[{}, {}] at {} per cm-1 exceeds {} samples",
                    lower, upper, density, MAX_SAMPLES
                )));
            }
        }
        Ok(Self {
            lower,
            upper,
            density,
        })
    }

    /// Infers the grid from an explicit array of equally spaced samples.
    ///
    /// The first and last samples must sit on whole wavenumbers and the
    /// spacing must be `1 / density` for an integer density.
    pub fn from_wavenumbers(samples: &[f64]) -> Result<Self> {
        if samples.len() < 2 {
            return Err(LblError::grid("at least two samples are required"));
        }
        let first = samples[0];
        let last = samples[samples.len() - 1];
        let spacing = samples[1] - first;
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(LblError::grid(format!("non-positive spacing {}", spacing)));
        }

        let density = (1.0 / spacing).round();
        if density < 1.0 || ((1.0 / density) - spacing).abs() > 1e-9 * density.max(1.0) {
            return Err(LblError::grid(format!(
                "spacing {} is not a unit fraction",
                spacing
            )));
        }
        for (name, value) in [("first", first), ("last", last)] {
            if (value - value.round()).abs() > 1e-6 {
                return Err(LblError::grid(format!(
                    "{} sample {} is not a whole wavenumber",
                    name, value
                )));
            }
        }

        let grid = Self::new(first.round() as i32, last.round() as i32, density as u32)?;
        if grid.len() != samples.len() {
            return Err(LblError::grid(format!(
                "expected {} samples for [{}, {}] at {} per cm-1, got {}",
                grid.len(),
                grid.lower,
                grid.upper,
                grid.density,
                samples.len()
            )));
        }
        Ok(grid)
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        let span = (self.upper as i64 - self.lower as i64).max(0) as u64;
        span.saturating_mul(self.density as u64)
            .saturating_add(1)
            .min(MAX_SAMPLES) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sample spacing [cm-1].
    #[inline]
    pub fn spacing(&self) -> f64 {
        1.0 / self.density as f64
    }

    /// Wavenumber of sample `index` [cm-1].
    #[inline]
    pub fn wavenumber(&self, index: usize) -> f64 {
        self.lower as f64 + index as f64 / self.density as f64
    }

    /// All sample wavenumbers [cm-1].
    pub fn wavenumbers(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.wavenumber(i)).collect()
    }
}
