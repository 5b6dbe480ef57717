//! Conversion from tabulated line constants to Voigt parameters.
//!
//! All functions are pure: a transition, the ambient state and the
//! partition-function ratio go in, widths and a scaled strength come out.

use lbl_core::constants::{
    CM2_TO_M2, GAS_CONSTANT, REFERENCE_TEMPERATURE, SECOND_RADIATION_CONSTANT, SPEED_OF_LIGHT,
};
use lbl_core::{AtmosphericConditions, Transition};
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

/// Voigt-ready parameters of one transition at ambient conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineShape {
    /// Pressure-shifted center [cm-1]
    pub center: f64,
    /// Pressure-broadened HWHM [cm-1]
    pub lorentz_hwhm: f64,
    /// Doppler HWHM [cm-1]
    pub doppler_hwhm: f64,
    /// Temperature-corrected strength, unit-converted
    pub strength: f64,
}

/// Center shifted by the air pressure shift [cm-1].
#[inline]
pub fn pressure_shifted_center(line: &Transition, pressure_atm: f64) -> f64 {
    line.center + pressure_atm * line.delta_air
}

/// Pressure-broadened half-width [cm-1].
///
/// Air broadening applies to the foreign partial pressure, self broadening
/// to the absorber's own; both scale with `(296/T)^n_air`.
pub fn lorentz_hwhm(line: &Transition, conditions: &AtmosphericConditions) -> f64 {
    let p = conditions.pressure_atm();
    let partial = conditions.partial_pressure_atm();
    (line.gamma_air * (p - partial) + line.gamma_self * partial)
        * (REFERENCE_TEMPERATURE / conditions.temperature).powf(line.n_air)
}

/// Doppler half-width [cm-1] for a line at `center` and mass in g mol-1.
pub fn doppler_hwhm(center: f64, temperature: f64, mass: f64) -> f64 {
    (center / SPEED_OF_LIGHT) * (2.0 * LN_2 * GAS_CONSTANT * temperature / mass).sqrt()
}

/// Line strength at `temperature` [m2 per line-strength unit].
///
/// Applies the lower-state Boltzmann factor, the stimulated-emission factor
/// and the partition ratio `Q(296)/Q(T)` to the 296 K reference strength.
pub fn effective_strength(line: &Transition, temperature: f64, partition_ratio: f64) -> f64 {
    let c2 = SECOND_RADIATION_CONSTANT;
    let t_ref = REFERENCE_TEMPERATURE;

    let boltzmann = (line.elower * c2 * (temperature - t_ref) / (temperature * t_ref)).exp();

    let g = (-c2 * line.center / temperature).exp();
    let g_ref = (-c2 * line.center / t_ref).exp();
    let stimulated = (1.0 - g) / (1.0 - g_ref);

    line.strength * boltzmann * stimulated * partition_ratio * CM2_TO_M2
}

/// Converts one transition into Voigt parameters.
pub fn convert(
    line: &Transition,
    conditions: &AtmosphericConditions,
    partition_ratio: f64,
) -> LineShape {
    LineShape {
        center: pressure_shifted_center(line, conditions.pressure_atm()),
        lorentz_hwhm: lorentz_hwhm(line, conditions),
        doppler_hwhm: doppler_hwhm(line.center, conditions.temperature, line.mass),
        strength: effective_strength(line, conditions.temperature, partition_ratio),
    }
}
