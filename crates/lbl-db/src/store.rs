//! Traits at the seam between the synthesis driver and the line data.

use crate::mass::MassTable;
use crate::tips::PartitionTable;
use lbl_core::{Result, Transition};

/// Stable molecule identifier of a parametric store.
pub type MoleculeId = i64;

/// Forward-only stream of transitions for one molecule.
///
/// Exhaustion is `None`. Whether a transition is still relevant to the grid
/// is the driver's decision, not the cursor's.
pub trait TransitionCursor: Iterator<Item = Result<Transition>> {
    /// True when centers are guaranteed to be non-decreasing.
    ///
    /// The driver only stops early on ascending cursors; otherwise it scans
    /// the whole stream and filters. Cursors that sort their output must
    /// override this.
    fn ascending(&self) -> bool {
        false
    }
}

/// Read-only source of per-molecule spectroscopic parameters.
///
/// Implementations must be shareable across threads: partition and mass
/// tables are read-only after construction, and every cursor is owned by the
/// call that opened it.
pub trait ParametricStore: Send + Sync {
    /// Resolves a formula or alias (e.g. `"CO2"`, `"Carbon Dioxide"`).
    fn molecule_id(&self, alias: &str) -> Result<MoleculeId>;

    /// Ordinary chemical formula of a molecule.
    fn formula(&self, id: MoleculeId) -> Result<String>;

    /// Ordinary formulae of every molecule in the store.
    fn molecules(&self) -> Result<Vec<String>>;

    /// Partition-function table, or `None` when the molecule has no TIPS rows.
    fn partition_table(&self, id: MoleculeId) -> Result<Option<PartitionTable>>;

    /// Isotopologue masses of a molecule.
    fn mass_table(&self, id: MoleculeId) -> Result<MassTable>;

    /// Transitions of a molecule ordered by center, joined with `masses`.
    fn transitions<'a>(
        &'a self,
        id: MoleculeId,
        masses: &'a MassTable,
    ) -> Result<Box<dyn TransitionCursor + 'a>>;
}
