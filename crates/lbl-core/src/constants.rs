//! Physical constants and unit conversions used by the line-shape code.
//!
//! Values follow the HITRAN conventions the tabulated line parameters were
//! produced with, not the latest CODATA release.

/// Speed of light [m s-1].
pub const SPEED_OF_LIGHT: f64 = 2.99792458e8;

/// Pressure conversion [atm Pa-1].
pub const PA_TO_ATM: f64 = 9.86923e-6;

/// Universal gas constant [J kmol-1 K-1]; pairs with masses in g mol-1.
pub const GAS_CONSTANT: f64 = 8314.472;

/// Second radiation constant hc/k [cm K].
pub const SECOND_RADIATION_CONSTANT: f64 = 1.4387752;

/// HITRAN reference temperature [K].
pub const REFERENCE_TEMPERATURE: f64 = 296.0;

/// Line strength unit conversion [m2 cm-2].
pub const CM2_TO_M2: f64 = 0.01 * 0.01;

/// Default line-center cutoff [cm-1].
pub const DEFAULT_CUTOFF: u32 = 25;
