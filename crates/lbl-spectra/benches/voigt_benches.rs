//! Benchmarks for the Voigt evaluator and the synthesis loop
//!
//! - Single-line evaluation across the Lorentz, W4 and CPF12 regimes
//! - Accumulation of many lines on a fine grid

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lbl_core::{AtmosphericConditions, Result, SpectralGrid, Transition};
use lbl_db::{PartitionTable, TransitionCursor};
use lbl_spectra::voigt::evaluate;
use lbl_spectra::{accumulate_lines, LineShape, SynthesisOptions};

// ============================================================================
// SINGLE-LINE EVALUATION
// ============================================================================

fn bench_single_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("Voigt single line");
    let grid = SpectralGrid::new(950, 1050, 100).unwrap();
    let wavenumbers = grid.wavenumbers();

    // y = sqrt(ln2) * gamma / alpha spans all region families.
    for (name, gamma) in [("doppler", 1.0e-5), ("mixed", 1.0e-3), ("lorentz", 0.1)] {
        let line = LineShape {
            center: 1000.0,
            lorentz_hwhm: gamma,
            doppler_hwhm: 1.0e-3,
            strength: 1.0e-24,
        };
        group.bench_with_input(BenchmarkId::new(name, wavenumbers.len()), &line, |b, line| {
            let mut k = vec![0.0; wavenumbers.len()];
            b.iter(|| {
                evaluate(&wavenumbers, 0, wavenumbers.len() - 1, line, &mut k);
                black_box(k[5000])
            });
        });
    }
    group.finish();
}

// ============================================================================
// MANY-LINE ACCUMULATION
// ============================================================================

struct BenchCursor {
    lines: std::vec::IntoIter<Transition>,
}

impl Iterator for BenchCursor {
    type Item = Result<Transition>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(Ok)
    }
}

impl TransitionCursor for BenchCursor {
    fn ascending(&self) -> bool {
        true
    }
}

fn lines(count: usize) -> Vec<Transition> {
    (0..count)
        .map(|i| Transition {
            center: 600.0 + 200.0 * i as f64 / count as f64,
            strength: 1.0e-21,
            gamma_air: 0.07,
            gamma_self: 0.09,
            n_air: 0.75,
            elower: (i % 50) as f64 * 10.0,
            delta_air: -0.001,
            local_iso_id: 1,
            mass: 44.0,
        })
        .collect()
}

fn bench_accumulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Line accumulation");
    group.sample_size(10);

    let grid = SpectralGrid::new(600, 800, 100).unwrap();
    let conditions = AtmosphericConditions::new(250.0, 50000.0, 400.0e-6).unwrap();
    let partition =
        PartitionTable::from_rows(2, (1..=500).map(|t| (0, t as f64, 1.0 + t as f64)))
            .unwrap()
            .unwrap();
    let options = SynthesisOptions::default();

    for count in [100, 1000, 5000] {
        let input = lines(count);
        group.bench_with_input(BenchmarkId::new("lines", count), &input, |b, input| {
            b.iter(|| {
                let mut k = vec![0.0; grid.len()];
                let mut cursor = BenchCursor {
                    lines: input.clone().into_iter(),
                };
                accumulate_lines(&conditions, &grid, &partition, &mut cursor, &options, &mut k)
                    .unwrap();
                black_box(k)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_line, bench_accumulation);
criterion_main!(benches);
