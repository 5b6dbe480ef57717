//! Line-by-line synthesis driver.
//!
//! For one molecule at one ambient state the driver
//! 1. resolves the molecule and loads its partition and mass tables,
//! 2. pulls transitions from the store cursor in order of center,
//! 3. converts each line and adds its Voigt profile over a window of
//!    `cutoff` wavenumbers around the center,
//! 4. stops as soon as an ascending cursor passes the grid.
//!
//! Every call owns its buffer and its region-coefficient caches, so
//! independent requests run concurrently against one shared store.

use crate::lineshape::{self, LineShape};
use crate::voigt;
use lbl_core::constants::DEFAULT_CUTOFF;
use lbl_core::{AtmosphericConditions, Result, SpectralGrid};
use lbl_db::{ParametricStore, PartitionTable, TransitionCursor};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Options and request
// ============================================================================

/// Tunables of a synthesis call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// Half-width of the evaluation window [whole cm-1]
    pub cutoff: u32,
    /// Subtract the smaller window-edge value after each line
    pub remove_pedestal: bool,
    /// Allow early termination when the cursor reports ascending centers
    pub assume_sorted: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            remove_pedestal: false,
            assume_sorted: true,
        }
    }
}

/// One molecule at one ambient state on one grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Formula or alias understood by the store
    pub molecule: String,
    pub conditions: AtmosphericConditions,
    pub grid: SpectralGrid,
    #[serde(default)]
    pub options: SynthesisOptions,
}

impl SynthesisRequest {
    pub fn new(
        molecule: impl Into<String>,
        conditions: AtmosphericConditions,
        grid: SpectralGrid,
    ) -> Self {
        Self {
            molecule: molecule.into(),
            conditions,
            grid,
            options: SynthesisOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SynthesisOptions) -> Self {
        self.options = options;
        self
    }
}

// ============================================================================
// Result
// ============================================================================

/// Why the driver stopped pulling transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// The cursor ran dry
    Exhausted,
    /// An ascending cursor produced a center beyond the grid plus cutoff
    PastGrid,
    /// The molecule has no partition rows; no transitions were read
    NoPartitionData,
}

/// Counters collected while accumulating lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisReport {
    /// Transitions pulled from the cursor
    pub lines_read: usize,
    /// Transitions converted and added to the buffer
    pub lines_evaluated: usize,
    /// Transitions whose window missed the grid
    pub lines_skipped: usize,
    pub termination: Termination,
}

impl SynthesisReport {
    fn empty(termination: Termination) -> Self {
        Self {
            lines_read: 0,
            lines_evaluated: 0,
            lines_skipped: 0,
            termination,
        }
    }
}

/// Absorption spectrum of one molecule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    pub molecule: String,
    pub grid: SpectralGrid,
    /// Absorption per grid sample [m2]
    pub absorption: Vec<f64>,
    pub report: SynthesisReport,
}

impl Spectrum {
    /// Grid wavenumbers matching `absorption` [cm-1].
    pub fn wavenumbers(&self) -> Vec<f64> {
        self.grid.wavenumbers()
    }

    /// Rectangle-rule integral of the spectrum over the grid.
    pub fn integrated_absorption(&self) -> f64 {
        self.absorption.iter().sum::<f64>() * self.grid.spacing()
    }
}

// ============================================================================
// Window
// ============================================================================

/// Inclusive buffer window of a line centered at `center`.
///
/// Spans `cutoff` whole wavenumbers below `floor(center)` and `cutoff + 1`
/// above it, clamped to the grid. `None` when the window lies entirely
/// below or above the grid, or when `center` is not finite.
pub fn line_window(grid: &SpectralGrid, center: f64, cutoff: u32) -> Option<(usize, usize)> {
    if !center.is_finite() {
        return None;
    }
    // Sample offsets stay in f64 until clamped, so far-off centers cannot
    // overflow the integer conversion.
    let last = (grid.len() - 1) as f64;
    let density = grid.density as f64;
    let base = center.floor() - grid.lower as f64;
    let cutoff = cutoff as f64;

    let start = (base - cutoff) * density;
    let end = (base + cutoff + 1.0) * density;
    if start > last || end < 0.0 {
        return None;
    }
    Some((start.max(0.0) as usize, end.min(last) as usize))
}

/// Raw center beyond which no line of an ascending cursor can reach the grid.
fn termination_center(grid: &SpectralGrid, cutoff: u32) -> f64 {
    (grid.upper as i64 + cutoff as i64 + 1) as f64
}

// ============================================================================
// Accumulation
// ============================================================================

/// Adds every relevant line of `cursor` into `k`.
///
/// `k` must have `grid.len()` samples. A failed cursor read or a failed
/// partition lookup aborts the call.
pub fn accumulate_lines(
    conditions: &AtmosphericConditions,
    grid: &SpectralGrid,
    partition: &PartitionTable,
    cursor: &mut dyn TransitionCursor,
    options: &SynthesisOptions,
    k: &mut [f64],
) -> Result<SynthesisReport> {
    debug_assert_eq!(k.len(), grid.len());

    let wavenumbers = grid.wavenumbers();
    let pressure_atm = conditions.pressure_atm();
    let stop_early = options.assume_sorted && cursor.ascending();
    let stop_center = termination_center(grid, options.cutoff);

    let mut ratios: HashMap<u32, f64> = HashMap::new();
    let mut report = SynthesisReport::empty(Termination::Exhausted);

    for item in cursor {
        let line = item?;
        report.lines_read += 1;

        if stop_early && line.center > stop_center {
            log::debug!(
                "Line at {} cm-1 is past the grid, stopping after {} reads",
                line.center,
                report.lines_read
            );
            report.termination = Termination::PastGrid;
            break;
        }

        let center = lineshape::pressure_shifted_center(&line, pressure_atm);
        let Some((start, end)) = line_window(grid, center, options.cutoff) else {
            report.lines_skipped += 1;
            continue;
        };

        let ratio = match ratios.get(&line.local_iso_id) {
            Some(ratio) => *ratio,
            None => {
                let ratio = partition
                    .partition_ratio(conditions.temperature, line.local_iso_id as i64)?;
                ratios.insert(line.local_iso_id, ratio);
                ratio
            }
        };

        let shape: LineShape = lineshape::convert(&line, conditions, ratio);
        voigt::evaluate(&wavenumbers, start, end, &shape, k);
        if options.remove_pedestal {
            voigt::remove_pedestal(k, start, end);
        }
        report.lines_evaluated += 1;
    }

    Ok(report)
}

/// Computes the absorption spectrum of one molecule.
///
/// A molecule without partition data yields an all-zero spectrum; every
/// other failure of the store is returned as an error.
pub fn synthesize<S>(store: &S, request: &SynthesisRequest) -> Result<Spectrum>
where
    S: ParametricStore + ?Sized,
{
    let SynthesisRequest {
        molecule,
        conditions,
        grid,
        options,
    } = request;

    conditions.validate()?;
    let grid = SpectralGrid::new(grid.lower, grid.upper, grid.density)?;

    log::debug!(
        "Synthesizing {} at {} K, {} Pa on [{}, {}] cm-1 x {}",
        molecule,
        conditions.temperature,
        conditions.pressure,
        grid.lower,
        grid.upper,
        grid.density
    );

    let id = store.molecule_id(molecule)?;
    let mut k = vec![0.0; grid.len()];

    let Some(partition) = store.partition_table(id)? else {
        log::warn!("No partition data for {}, returning zero absorption", molecule);
        return Ok(Spectrum {
            molecule: molecule.clone(),
            grid,
            absorption: k,
            report: SynthesisReport::empty(Termination::NoPartitionData),
        });
    };

    let masses = store.mass_table(id)?;
    let mut cursor = store.transitions(id, &masses)?;
    let report = accumulate_lines(conditions, &grid, &partition, &mut *cursor, options, &mut k)?;

    log::debug!(
        "{}: {} lines read, {} evaluated, {} skipped ({:?})",
        molecule,
        report.lines_read,
        report.lines_evaluated,
        report.lines_skipped,
        report.termination
    );

    Ok(Spectrum {
        molecule: molecule.clone(),
        grid,
        absorption: k,
        report,
    })
}

/// Runs independent requests in parallel against one store.
///
/// Results keep the order of `requests`; one failed request does not affect
/// the others.
pub fn synthesize_batch<S>(store: &S, requests: &[SynthesisRequest]) -> Vec<Result<Spectrum>>
where
    S: ParametricStore + ?Sized,
{
    log::info!("Synthesizing {} spectra", requests.len());
    requests
        .par_iter()
        .map(|request| synthesize(store, request))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lbl_core::{LblError, Transition};

    struct VecCursor {
        lines: std::vec::IntoIter<Transition>,
        ascending: bool,
    }

    impl Iterator for VecCursor {
        type Item = Result<Transition>;

        fn next(&mut self) -> Option<Self::Item> {
            self.lines.next().map(Ok)
        }
    }

    impl TransitionCursor for VecCursor {
        fn ascending(&self) -> bool {
            self.ascending
        }
    }

    fn cursor(centers: &[f64], ascending: bool) -> VecCursor {
        let lines: Vec<Transition> = centers
            .iter()
            .map(|&center| Transition {
                center,
                strength: 1.0e-20,
                gamma_air: 0.07,
                gamma_self: 0.09,
                n_air: 0.7,
                elower: 0.0,
                delta_air: 0.0,
                local_iso_id: 1,
                mass: 44.0,
            })
            .collect();
        VecCursor {
            lines: lines.into_iter(),
            ascending,
        }
    }

    fn flat_partition() -> PartitionTable {
        let rows = (1..=500).map(|t| (0_i64, t as f64, 100.0));
        PartitionTable::from_rows(2, rows).unwrap().unwrap()
    }

    fn conditions() -> AtmosphericConditions {
        AtmosphericConditions::new(296.0, 101325.0, 0.01).unwrap()
    }

    #[test]
    fn test_window_inside_grid() {
        let grid = SpectralGrid::new(0, 100, 4).unwrap();
        assert_eq!(line_window(&grid, 50.3, 5), Some((180, 224)));
    }

    #[test]
    fn test_window_clamped_at_both_edges() {
        let grid = SpectralGrid::new(995, 1005, 10).unwrap();
        assert_eq!(line_window(&grid, 1000.0, 10), Some((0, 100)));
        assert_eq!(line_window(&grid, 994.2, 1), Some((0, 10)));
    }

    #[test]
    fn test_window_outside_grid() {
        let grid = SpectralGrid::new(0, 25, 1).unwrap();
        // end = (-5 + 1 + 1) < 0
        assert_eq!(line_window(&grid, -4.5, 1), None);
        // start = (27 - 1) >= 26 samples
        assert_eq!(line_window(&grid, 27.0, 1), None);
        // Still touches the last sample.
        assert_eq!(line_window(&grid, 26.0, 1), Some((25, 25)));
    }

    #[test]
    fn test_window_of_far_or_non_finite_center() {
        let grid = SpectralGrid::new(-10, 10, 1000).unwrap();
        assert_eq!(line_window(&grid, 1.0e16, 25), None);
        assert_eq!(line_window(&grid, -1.0e16, 25), None);
        assert_eq!(line_window(&grid, f64::MAX, u32::MAX), None);
        assert_eq!(line_window(&grid, f64::INFINITY, 25), None);
        assert_eq!(line_window(&grid, f64::NEG_INFINITY, 25), None);
        assert_eq!(line_window(&grid, f64::NAN, 25), None);
        // A huge cutoff still clamps to the whole grid.
        assert_eq!(line_window(&grid, 0.5, u32::MAX), Some((0, 20000)));
    }

    #[test]
    fn test_default_options() {
        let options = SynthesisOptions::default();
        assert_eq!(options.cutoff, 25);
        assert!(!options.remove_pedestal);
        assert!(options.assume_sorted);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: SynthesisOptions = serde_json::from_str(r#"{"cutoff": 5}"#).unwrap();
        assert_eq!(options.cutoff, 5);
        assert!(options.assume_sorted);
    }

    #[test]
    fn test_stops_after_first_line_past_grid() {
        let grid = SpectralGrid::new(0, 25, 1).unwrap();
        let options = SynthesisOptions {
            cutoff: 1,
            ..Default::default()
        };
        let mut lines = cursor(&[10.0, 20.0, 30.0, 1000.0], true);
        let mut k = vec![0.0; grid.len()];

        let report = accumulate_lines(
            &conditions(),
            &grid,
            &flat_partition(),
            &mut lines,
            &options,
            &mut k,
        )
        .unwrap();

        assert_eq!(report.lines_read, 3);
        assert_eq!(report.lines_evaluated, 2);
        assert_eq!(report.termination, Termination::PastGrid);
        assert_eq!(lines.lines.len(), 1);
        assert!(k[10] > 0.0 && k[20] > 0.0);
    }

    #[test]
    fn test_unsorted_cursor_is_scanned_fully() {
        let grid = SpectralGrid::new(0, 25, 1).unwrap();
        let options = SynthesisOptions {
            cutoff: 1,
            ..Default::default()
        };
        let mut lines = cursor(&[30.0, 10.0, 1000.0, 20.0], false);
        let mut k = vec![0.0; grid.len()];

        let report = accumulate_lines(
            &conditions(),
            &grid,
            &flat_partition(),
            &mut lines,
            &options,
            &mut k,
        )
        .unwrap();

        assert_eq!(report.lines_read, 4);
        assert_eq!(report.lines_evaluated, 2);
        assert_eq!(report.lines_skipped, 2);
        assert_eq!(report.termination, Termination::Exhausted);
    }

    /// Cursor that keeps the trait's default ordering claim.
    struct UndeclaredCursor(std::vec::IntoIter<Transition>);

    impl Iterator for UndeclaredCursor {
        type Item = Result<Transition>;

        fn next(&mut self) -> Option<Self::Item> {
            self.0.next().map(Ok)
        }
    }

    impl TransitionCursor for UndeclaredCursor {}

    #[test]
    fn test_cursor_without_ordering_claim_is_scanned_fully() {
        let grid = SpectralGrid::new(0, 25, 1).unwrap();
        let options = SynthesisOptions {
            cutoff: 1,
            ..Default::default()
        };
        assert!(options.assume_sorted);
        let VecCursor { lines, .. } = cursor(&[30.0, 10.0, 20.0], true);
        let mut lines = UndeclaredCursor(lines);
        assert!(!lines.ascending());
        let mut k = vec![0.0; grid.len()];

        let report = accumulate_lines(
            &conditions(),
            &grid,
            &flat_partition(),
            &mut lines,
            &options,
            &mut k,
        )
        .unwrap();

        assert_eq!(report.lines_read, 3);
        assert_eq!(report.lines_evaluated, 2);
        assert_eq!(report.termination, Termination::Exhausted);
    }

    #[test]
    fn test_far_off_centers_are_skipped() {
        let grid = SpectralGrid::new(-10, 10, 1000).unwrap();
        let options = SynthesisOptions::default();
        let mut lines = cursor(&[f64::NEG_INFINITY, 1.0e16, 1.0, -1.0e16], false);
        let mut k = vec![0.0; grid.len()];

        let report = accumulate_lines(
            &conditions(),
            &grid,
            &flat_partition(),
            &mut lines,
            &options,
            &mut k,
        )
        .unwrap();

        assert_eq!(report.lines_read, 4);
        assert_eq!(report.lines_evaluated, 1);
        assert_eq!(report.lines_skipped, 3);
        assert!(k[11000] > 0.0);
    }

    #[test]
    fn test_order_does_not_change_result_without_early_stop() {
        let grid = SpectralGrid::new(0, 25, 4).unwrap();
        let options = SynthesisOptions {
            cutoff: 3,
            assume_sorted: false,
            ..Default::default()
        };

        let mut sorted = vec![0.0; grid.len()];
        let mut shuffled = vec![0.0; grid.len()];
        for (centers, k) in [
            (&[3.2, 11.7, 12.1, 24.9][..], &mut sorted),
            (&[24.9, 3.2, 12.1, 11.7][..], &mut shuffled),
        ] {
            accumulate_lines(
                &conditions(),
                &grid,
                &flat_partition(),
                &mut cursor(centers, true),
                &options,
                k,
            )
            .unwrap();
        }

        for (a, b) in sorted.iter().zip(&shuffled) {
            approx::assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_pedestal_zeroes_lower_edge() {
        let grid = SpectralGrid::new(0, 25, 2).unwrap();
        let options = SynthesisOptions {
            cutoff: 2,
            remove_pedestal: true,
            ..Default::default()
        };
        let mut k = vec![0.0; grid.len()];
        accumulate_lines(
            &conditions(),
            &grid,
            &flat_partition(),
            &mut cursor(&[12.4], true),
            &options,
            &mut k,
        )
        .unwrap();

        let (start, end) = line_window(&grid, 12.4, 2).unwrap();
        assert_eq!(k[start].min(k[end]), 0.0);
        assert!(k.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_temperature_outside_partition_table() {
        let grid = SpectralGrid::new(0, 25, 1).unwrap();
        let hot = AtmosphericConditions::new(900.0, 101325.0, 0.01).unwrap();
        let mut k = vec![0.0; grid.len()];
        let result = accumulate_lines(
            &hot,
            &grid,
            &flat_partition(),
            &mut cursor(&[10.0], true),
            &SynthesisOptions::default(),
            &mut k,
        );
        assert!(matches!(
            result,
            Err(LblError::TemperatureOutOfRange { .. })
        ));
    }
}
