//! Row types of the relational line database.
//!
//! Column names follow the HITRAN-derived schema: one CSV file per table,
//! with a header row naming these fields. Columns a synthesis never reads
//! are optional.

use serde::{Deserialize, Serialize};

/// `molecule` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeRow {
    pub id: i64,
    #[serde(default)]
    pub stoichiometric_formula: String,
    pub ordinary_formula: String,
    #[serde(default)]
    pub common_name: String,
}

/// `molecule_alias` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeAliasRow {
    pub alias: String,
    pub molecule: i64,
}

/// `isotopologue` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsotopologueRow {
    pub molecule_id: i64,
    /// HITRAN local isotopologue id (0 denotes the tenth)
    pub isoid: i64,
    #[serde(default)]
    pub iso_name: String,
    #[serde(default)]
    pub abundance: f64,
    pub mass: f64,
}

/// `transition` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRow {
    pub molecule_id: i64,
    #[serde(default)]
    pub global_iso_id: Option<i64>,
    pub local_iso_id: i64,
    pub nu: f64,
    pub sw: f64,
    pub gamma_air: f64,
    pub gamma_self: f64,
    pub n_air: f64,
    pub delta_air: f64,
    pub elower: f64,
}

/// `tips` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipsRow {
    pub molecule_id: i64,
    /// Zero-based isotopologue row
    pub isotopologue_id: i64,
    pub temperature: f64,
    pub data: f64,
}

/// All tables of a store, as plain rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    pub molecules: Vec<MoleculeRow>,
    pub aliases: Vec<MoleculeAliasRow>,
    pub isotopologues: Vec<IsotopologueRow>,
    pub transitions: Vec<TransitionRow>,
    pub tips: Vec<TipsRow>,
}
