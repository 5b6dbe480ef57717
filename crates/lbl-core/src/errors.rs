//! Error types for line-by-line synthesis.
//!
//! Lower layers return an `LblError` instead of panicking; the synthesis
//! driver is the single place that decides whether a condition aborts the
//! call. "No partition data" is not a variant: the partition loader reports
//! it as `Ok(None)` and the driver degrades to a zero spectrum.

use thiserror::Error;

/// Unified error type for all line-by-line operations.
#[derive(Error, Debug)]
pub enum LblError {
    /// The parametric store could not be opened, read or closed
    #[error("Store connection error at {location}: {message}")]
    StoreConnection { location: String, message: String },

    /// No alias row matched the requested formula
    #[error("Molecule '{0}' not found in database")]
    MoleculeNotFound(String),

    /// Partition-function rows do not form an (isotopologue x temperature) grid
    #[error("Partition table is not rectangular: {rows} rows for {isotopologues} isotopologues")]
    NonRectangularTable { rows: usize, isotopologues: usize },

    /// Temperature outside the nodes covered by the partition table
    #[error("Temperature {temperature} K outside partition table range [{min}, {max}] K")]
    TemperatureOutOfRange { temperature: f64, min: f64, max: f64 },

    /// Isotopologue with no mass or partition row
    #[error("Unknown isotopologue {local_id} for molecule {molecule_id}")]
    UnknownIsotopologue { molecule_id: i64, local_id: u32 },

    /// Spectral grid that violates the unit-fraction spacing contract
    #[error("Invalid spectral grid: {0}")]
    InvalidGrid(String),

    /// Configuration validation errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LblError {
    /// Creates a store connection error.
    pub fn connection(location: impl Into<String>, message: impl Into<String>) -> Self {
        LblError::StoreConnection {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Creates a molecule-not-found error.
    pub fn not_found(alias: impl Into<String>) -> Self {
        LblError::MoleculeNotFound(alias.into())
    }

    /// Creates an invalid grid error.
    pub fn grid(message: impl Into<String>) -> Self {
        LblError::InvalidGrid(message.into())
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        LblError::ConfigError(message.into())
    }

    /// Short, stable name of the condition that fired.
    pub fn category(&self) -> &'static str {
        match self {
            LblError::StoreConnection { .. } => "connection",
            LblError::MoleculeNotFound(_) | LblError::UnknownIsotopologue { .. } => "not-found",
            LblError::NonRectangularTable { .. } => "malformed",
            LblError::TemperatureOutOfRange { .. } => "out-of-range",
            LblError::InvalidGrid(_) | LblError::ConfigError(_) => "invalid-input",
        }
    }

    /// Returns a user-friendly error message with actionable guidance.
    pub fn user_message(&self) -> String {
        match self {
            LblError::StoreConnection { location, message } => {
                format!(
                    "Store connection error at {}: {}\n\
                     → Check that the directory exists and holds molecule.csv, molecule_alias.csv,\n\
                       isotopologue.csv, transition.csv and tips.csv.",
                    location, message
                )
            }
            LblError::MoleculeNotFound(alias) => {
                format!(
                    "Molecule '{}' not found in database\n\
                     → Run `lbl molecules` to list the formulae the store knows about.",
                    alias
                )
            }
            LblError::TemperatureOutOfRange { temperature, min, max } => {
                format!(
                    "Temperature {} K outside partition table range [{}, {}] K\n\
                     → Partition sums are tabulated, not extrapolated.",
                    temperature, min, max
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for line-by-line operations.
pub type Result<T> = std::result::Result<T, LblError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let err = LblError::connection("/data/lines", "missing tips.csv");
        assert!(matches!(err, LblError::StoreConnection { .. }));

        let err = LblError::not_found("XYZ");
        assert!(matches!(err, LblError::MoleculeNotFound(ref a) if a == "XYZ"));

        let err = LblError::grid("density must be positive");
        assert!(matches!(err, LblError::InvalidGrid(_)));
    }

    #[test]
    fn test_categories_identify_condition() {
        assert_eq!(LblError::connection("x", "y").category(), "connection");
        assert_eq!(LblError::not_found("CO2").category(), "not-found");
        assert_eq!(
            LblError::NonRectangularTable {
                rows: 7,
                isotopologues: 2
            }
            .category(),
            "malformed"
        );
        assert_eq!(
            LblError::TemperatureOutOfRange {
                temperature: 9000.0,
                min: 1.0,
                max: 5000.0
            }
            .category(),
            "out-of-range"
        );
    }

    #[test]
    fn test_user_message_mentions_alias() {
        let msg = LblError::not_found("H2O").user_message();
        assert!(msg.contains("H2O"));
        assert!(msg.contains("lbl molecules"));
    }
}
