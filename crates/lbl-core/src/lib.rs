//! # lbl-core
//!
//! Core types, constants and errors for the line-by-line absorption engine.
//!
//! - **Types**: `Transition`, `AtmosphericConditions`, `SpectralGrid`
//! - **Constants**: HITRAN-convention physical constants
//! - **Errors**: unified error handling with `LblError`
//!
//! ```text
//! ┌─────────────┐
//! │  lbl-core   │  ← types / constants / errors
//! └─────────────┘
//!        ▲
//! ┌──────┴──────┐
//! │   lbl-db    │  ← partition sums, masses, transition cursors
//! └─────────────┘
//!        ▲
//! ┌──────┴──────┐
//! │ lbl-spectra │  ← converter, Voigt evaluator, synthesis driver
//! └─────────────┘
//! ```

pub mod constants;
pub mod errors;
pub mod types;

pub use errors::{LblError, Result};
pub use types::{AtmosphericConditions, SpectralGrid, Transition};
