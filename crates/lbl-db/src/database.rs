//! Relational line database held in memory.
//!
//! `SpectralDatabase::open` reads a directory with one CSV file per table
//! (`molecule.csv`, `molecule_alias.csv`, `isotopologue.csv`,
//! `transition.csv`, `tips.csv`). Rows are indexed once at construction:
//! transitions by (molecule, center) and TIPS rows by (molecule,
//! isotopologue, temperature), so every query is a contiguous slice.

use crate::mass::{normalize_local_iso_id, MassTable};
use crate::schema::{
    IsotopologueRow, MoleculeAliasRow, MoleculeRow, Tables, TipsRow, TransitionRow,
};
use crate::store::{MoleculeId, ParametricStore, TransitionCursor};
use crate::tips::PartitionTable;
use csv::ReaderBuilder;
use lbl_core::{LblError, Result, Transition};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const MOLECULE_TABLE: &str = "molecule.csv";
pub const ALIAS_TABLE: &str = "molecule_alias.csv";
pub const ISOTOPOLOGUE_TABLE: &str = "isotopologue.csv";
pub const TRANSITION_TABLE: &str = "transition.csv";
pub const TIPS_TABLE: &str = "tips.csv";

/// In-memory parametric store.
#[derive(Debug, Clone)]
pub struct SpectralDatabase {
    location: Option<PathBuf>,
    molecules: Vec<MoleculeRow>,
    aliases: HashMap<String, MoleculeId>,
    isotopologues: Vec<IsotopologueRow>,
    transitions: Vec<TransitionRow>,
    tips: Vec<TipsRow>,
}

/// Reads every row of one table file.
fn read_table<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>> {
    let path = dir.join(name);
    let location = path.display().to_string();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(|e| LblError::connection(&location, format!("failed to open table: {}", e)))?;

    let mut rows = Vec::new();
    for (line, record) in reader.deserialize::<T>().enumerate() {
        let row = record.map_err(|e| {
            LblError::connection(&location, format!("bad row {}: {}", line + 2, e))
        })?;
        rows.push(row);
    }
    log::debug!("Read {} rows from {}", rows.len(), location);
    Ok(rows)
}

impl SpectralDatabase {
    /// Opens a store directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LblError::connection(
                dir.display().to_string(),
                "not a directory",
            ));
        }

        let tables = Tables {
            molecules: read_table(dir, MOLECULE_TABLE)?,
            aliases: read_table(dir, ALIAS_TABLE)?,
            isotopologues: read_table(dir, ISOTOPOLOGUE_TABLE)?,
            transitions: read_table(dir, TRANSITION_TABLE)?,
            tips: read_table(dir, TIPS_TABLE)?,
        };

        let mut db = Self::from_tables(tables);
        db.location = Some(dir.to_path_buf());
        log::info!(
            "Opened line database {} ({} molecules, {} transitions)",
            dir.display(),
            db.molecules.len(),
            db.transitions.len()
        );
        Ok(db)
    }

    /// Builds a store from rows already in memory.
    pub fn from_tables(tables: Tables) -> Self {
        let Tables {
            molecules,
            aliases: alias_rows,
            isotopologues,
            mut transitions,
            mut tips,
        } = tables;

        // First alias row wins, as with a plain `select ... where alias = ?`.
        let mut aliases = HashMap::with_capacity(alias_rows.len());
        for MoleculeAliasRow { alias, molecule } in alias_rows {
            aliases.entry(alias).or_insert(molecule);
        }

        transitions.sort_by(|a, b| {
            a.molecule_id
                .cmp(&b.molecule_id)
                .then(a.nu.total_cmp(&b.nu))
        });
        tips.sort_by(|a, b| {
            a.molecule_id
                .cmp(&b.molecule_id)
                .then(a.isotopologue_id.cmp(&b.isotopologue_id))
                .then(a.temperature.total_cmp(&b.temperature))
        });

        Self {
            location: None,
            molecules,
            aliases,
            isotopologues,
            transitions,
            tips,
        }
    }

    /// Directory the store was opened from, if any.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    fn transition_rows(&self, id: MoleculeId) -> &[TransitionRow] {
        let start = self.transitions.partition_point(|r| r.molecule_id < id);
        let end = self.transitions.partition_point(|r| r.molecule_id <= id);
        &self.transitions[start..end]
    }

    fn tips_rows(&self, id: MoleculeId) -> &[TipsRow] {
        let start = self.tips.partition_point(|r| r.molecule_id < id);
        let end = self.tips.partition_point(|r| r.molecule_id <= id);
        &self.tips[start..end]
    }
}

impl ParametricStore for SpectralDatabase {
    fn molecule_id(&self, alias: &str) -> Result<MoleculeId> {
        self.aliases
            .get(alias)
            .copied()
            .ok_or_else(|| LblError::not_found(alias))
    }

    fn formula(&self, id: MoleculeId) -> Result<String> {
        self.molecules
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.ordinary_formula.clone())
            .ok_or_else(|| LblError::not_found(format!("molecule id {}", id)))
    }

    fn molecules(&self) -> Result<Vec<String>> {
        Ok(self
            .molecules
            .iter()
            .map(|m| m.ordinary_formula.clone())
            .collect())
    }

    fn partition_table(&self, id: MoleculeId) -> Result<Option<PartitionTable>> {
        PartitionTable::from_rows(
            id,
            self.tips_rows(id)
                .iter()
                .map(|r| (r.isotopologue_id, r.temperature, r.data)),
        )
    }

    fn mass_table(&self, id: MoleculeId) -> Result<MassTable> {
        Ok(MassTable::from_rows(
            id,
            self.isotopologues
                .iter()
                .filter(|r| r.molecule_id == id)
                .map(|r| (r.isoid, r.mass)),
        ))
    }

    fn transitions<'a>(
        &'a self,
        id: MoleculeId,
        masses: &'a MassTable,
    ) -> Result<Box<dyn TransitionCursor + 'a>> {
        Ok(Box::new(RowCursor {
            rows: self.transition_rows(id).iter(),
            masses,
        }))
    }
}

/// Cursor over a molecule's sorted transition rows.
struct RowCursor<'a> {
    rows: std::slice::Iter<'a, TransitionRow>,
    masses: &'a MassTable,
}

impl Iterator for RowCursor<'_> {
    type Item = Result<Transition>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(self.masses.mass(row.local_iso_id).map(|mass| Transition {
            center: row.nu,
            strength: row.sw,
            gamma_air: row.gamma_air,
            gamma_self: row.gamma_self,
            n_air: row.n_air,
            elower: row.elower,
            delta_air: row.delta_air,
            local_iso_id: normalize_local_iso_id(row.local_iso_id),
            mass,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

// Transition rows are sorted by center at construction.
impl TransitionCursor for RowCursor<'_> {
    fn ascending(&self) -> bool {
        true
    }
}
