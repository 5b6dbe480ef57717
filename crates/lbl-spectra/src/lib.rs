//! # lbl-spectra
//!
//! Line-by-line absorption synthesis on top of `lbl-db`.
//!
//! - **Line shapes**: `lineshape::convert` turns a transition into Voigt
//!   parameters at the ambient state
//! - **Voigt**: Humlicek W4/CPF12 evaluation, additive into a buffer
//! - **Synthesis**: windowed accumulation with early termination, plus a
//!   rayon batch entry point
//!
//! ## Usage
//! ```no_run
//! use lbl_core::{AtmosphericConditions, SpectralGrid};
//! use lbl_db::SpectralDatabase;
//! use lbl_spectra::{synthesize, SynthesisRequest};
//!
//! let db = SpectralDatabase::open("data/hitran")?;
//! let request = SynthesisRequest::new(
//!     "CO2",
//!     AtmosphericConditions::new(296.0, 101325.0, 400.0e-6)?,
//!     SpectralGrid::new(600, 700, 100)?,
//! );
//! let spectrum = synthesize(&db, &request)?;
//! println!("{} lines evaluated", spectrum.report.lines_evaluated);
//! # Ok::<(), lbl_core::LblError>(())
//! ```

pub mod lineshape;
pub mod synthesis;
pub mod voigt;

pub use lineshape::LineShape;
pub use synthesis::{
    accumulate_lines, line_window, synthesize, synthesize_batch, Spectrum, SynthesisOptions,
    SynthesisReport, SynthesisRequest, Termination,
};
pub use voigt::voigt_function;
