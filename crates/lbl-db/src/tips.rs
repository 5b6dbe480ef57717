//! Total internal partition sums (TIPS).
//!
//! A molecule's table is a flat row-major grid: one contiguous slice of
//! `num_t` temperature nodes per isotopologue. Nodes are unit-spaced, which
//! lets the bracket be found by integer offset instead of a search.

use crate::mass::normalize_local_iso_id;
use crate::store::MoleculeId;
use lbl_core::constants::REFERENCE_TEMPERATURE;
use lbl_core::{LblError, Result};

/// Partition-function table for every isotopologue of one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTable {
    molecule_id: MoleculeId,
    num_iso: usize,
    num_t: usize,
    temperature: Vec<f64>,
    data: Vec<f64>,
}

impl PartitionTable {
    /// Builds a table from `(isotopologue, temperature, value)` rows ordered
    /// by isotopologue, then temperature.
    ///
    /// Returns `Ok(None)` when there are no rows at all; that is not an
    /// error, the molecule simply has no line contribution.
    pub fn from_rows<I>(molecule_id: MoleculeId, rows: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = (i64, f64, f64)>,
    {
        let mut temperature = Vec::new();
        let mut data = Vec::new();
        let mut num_iso = 0;
        let mut current_iso = None;

        for (iso, t, value) in rows {
            if current_iso != Some(iso) {
                num_iso += 1;
                current_iso = Some(iso);
            }
            temperature.push(t);
            data.push(value);
        }

        if num_iso == 0 {
            log::debug!("No partition data for molecule {}", molecule_id);
            return Ok(None);
        }

        let rows = data.len();
        if rows % num_iso != 0 {
            return Err(LblError::NonRectangularTable {
                rows,
                isotopologues: num_iso,
            });
        }

        Ok(Some(Self {
            molecule_id,
            num_iso,
            num_t: rows / num_iso,
            temperature,
            data,
        }))
    }

    pub fn molecule_id(&self) -> MoleculeId {
        self.molecule_id
    }

    /// Number of isotopologue rows.
    pub fn isotopologue_count(&self) -> usize {
        self.num_iso
    }

    /// Number of temperature nodes per isotopologue.
    pub fn temperature_count(&self) -> usize {
        self.num_t
    }

    /// Temperature nodes and values for one isotopologue (local id, 0 -> 10).
    pub fn slice(&self, local_iso_id: i64) -> Result<(&[f64], &[f64])> {
        let slot = normalize_local_iso_id(local_iso_id) as usize - 1;
        if slot >= self.num_iso {
            return Err(LblError::UnknownIsotopologue {
                molecule_id: self.molecule_id,
                local_id: normalize_local_iso_id(local_iso_id),
            });
        }
        let range = slot * self.num_t..(slot + 1) * self.num_t;
        Ok((&self.temperature[range.clone()], &self.data[range]))
    }

    /// Linearly interpolated total partition sum Q(T).
    ///
    /// Exact at table nodes. Temperatures outside the tabulated range are
    /// rejected rather than extrapolated.
    pub fn total_partition_function(&self, temperature: f64, local_iso_id: i64) -> Result<f64> {
        let (t, data) = self.slice(local_iso_id)?;
        let out_of_range = || LblError::TemperatureOutOfRange {
            temperature,
            min: t[0],
            max: t[t.len() - 1],
        };

        if !temperature.is_finite() {
            return Err(out_of_range());
        }
        let offset = temperature.floor() as i64 - t[0].floor() as i64;
        if offset < 0 || offset as usize >= t.len() {
            return Err(out_of_range());
        }

        let i = offset as usize;
        if i + 1 == t.len() {
            // Only the last node itself is covered; there is no upper bracket.
            return if temperature == t[i] {
                Ok(data[i])
            } else {
                Err(out_of_range())
            };
        }
        Ok(data[i] + (data[i + 1] - data[i]) * (temperature - t[i]) / (t[i + 1] - t[i]))
    }

    /// Q(296 K) / Q(T), the partition factor of the line-strength correction.
    pub fn partition_ratio(&self, temperature: f64, local_iso_id: i64) -> Result<f64> {
        Ok(self.total_partition_function(REFERENCE_TEMPERATURE, local_iso_id)?
            / self.total_partition_function(temperature, local_iso_id)?)
    }
}
