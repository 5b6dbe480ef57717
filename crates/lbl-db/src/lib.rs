//! # lbl-db
//!
//! Parametric store behind the line-by-line engine.
//!
//! - **Partition sums**: `PartitionTable`, linear TIPS interpolation
//! - **Masses**: `MassTable`, with HITRAN's `0 -> 10` isotopologue numbering
//! - **Store seam**: `ParametricStore` / `TransitionCursor`
//! - **Relational store**: `SpectralDatabase`, CSV tables held in memory
//!
//! ## Usage
//! ```no_run
//! use lbl_db::{ParametricStore, SpectralDatabase};
//!
//! let db = SpectralDatabase::open("data/hitran")?;
//! let id = db.molecule_id("CO2")?;
//! let masses = db.mass_table(id)?;
//! for line in db.transitions(id, &masses)?.take(3) {
//!     println!("{:.6} cm-1", line?.center);
//! }
//! # Ok::<(), lbl_core::LblError>(())
//! ```

pub mod database;
pub mod mass;
pub mod schema;
pub mod store;
pub mod tips;

pub use database::SpectralDatabase;
pub use mass::{normalize_local_iso_id, MassTable};
pub use schema::Tables;
pub use store::{MoleculeId, ParametricStore, TransitionCursor};
pub use tips::PartitionTable;
