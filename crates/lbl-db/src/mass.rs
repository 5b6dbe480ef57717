//! Isotopologue mass table.

use crate::store::MoleculeId;
use lbl_core::{LblError, Result};

/// Maps a HITRAN local isotopologue id onto its 1-based slot.
///
/// HITRAN numbers isotopologues 1..9 and then writes the tenth as `0`.
#[inline]
pub fn normalize_local_iso_id(local_iso_id: i64) -> u32 {
    match local_iso_id {
        0 => 10,
        id => u32::try_from(id).unwrap_or(u32::MAX),
    }
}

/// Largest local isotopologue id a mass row may carry.
pub const MAX_LOCAL_ISO_ID: i64 = 99;

/// Molecular mass [g mol-1] per isotopologue of one molecule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MassTable {
    molecule_id: MoleculeId,
    masses: Vec<Option<f64>>,
}

impl MassTable {
    /// Builds the table from `(local_iso_id, mass)` rows in any order.
    pub fn from_rows<I>(molecule_id: MoleculeId, rows: I) -> Self
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        let mut masses: Vec<Option<f64>> = Vec::new();
        for (local_iso_id, mass) in rows {
            if !(0..=MAX_LOCAL_ISO_ID).contains(&local_iso_id) {
                log::warn!(
                    "Skipping isotopologue id {} for molecule {}",
                    local_iso_id,
                    molecule_id
                );
                continue;
            }
            let slot = normalize_local_iso_id(local_iso_id) as usize - 1;
            if slot >= masses.len() {
                masses.resize(slot + 1, None);
            }
            if masses[slot].replace(mass).is_some() {
                log::warn!(
                    "Duplicate mass row for isotopologue {} of molecule {}",
                    local_iso_id,
                    molecule_id
                );
            }
        }
        Self {
            molecule_id,
            masses,
        }
    }

    pub fn molecule_id(&self) -> MoleculeId {
        self.molecule_id
    }

    /// Number of isotopologues with a mass.
    pub fn len(&self) -> usize {
        self.masses.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mass of isotopologue `local_iso_id` (0 -> 10).
    pub fn mass(&self, local_iso_id: i64) -> Result<f64> {
        let local_id = normalize_local_iso_id(local_iso_id);
        self.masses
            .get(local_id as usize - 1)
            .copied()
            .flatten()
            .ok_or(LblError::UnknownIsotopologue {
                molecule_id: self.molecule_id,
                local_id,
            })
    }
}
