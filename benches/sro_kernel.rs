//! Benchmarks the SRO kernel (`sro::pair_analysis`) on a moderate supercell,
//! the hot loop each worker runs once per candidate configuration.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use indexmap::IndexMap;
use sqsforge::lattice::Lattice;
use sqsforge::shells::{self, ShellMatrix};
use sqsforge::species::Species;
use sqsforge::sro::{self, Configuration};
use sqsforge::structure::Structure;

fn cscl_supercell(n: usize) -> (Structure, ShellMatrix) {
    let unit = Structure::new(
        Lattice::cubic(4.12),
        vec![
            Species::from_symbol("Cs").unwrap(),
            Species::from_symbol("Cl").unwrap(),
        ],
        vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
    );
    let structure = unit.supercell(n, n, n).unwrap();
    let shell_distances = shells::default_shell_distances(&structure, 1e-3, 1e-5).unwrap();
    let shell_matrix = ShellMatrix::build(&structure, &shell_distances, 1e-3, 1e-5).unwrap();
    (structure, shell_matrix)
}

fn bench_pair_analysis(c: &mut Criterion) {
    let (structure, shell_matrix) = cscl_supercell(4);
    let configuration: Configuration = structure
        .species
        .iter()
        .map(|sp| if *sp == Species::from_symbol("Cs").unwrap() { 0 } else { 1 })
        .collect();
    let mut shell_weights = IndexMap::new();
    for s in 1..=shell_matrix.num_shells() {
        shell_weights.insert(s as i32, 1.0 / s as f64);
    }
    let pair_weights = sro::default_pair_weights(2);

    c.bench_function("pair_analysis_4x4x4_cscl", |b| {
        b.iter(|| {
            sro::pair_analysis(
                black_box(&shell_matrix),
                black_box(&configuration),
                2,
                black_box(&shell_weights),
                black_box(&pair_weights),
            )
        })
    });
}

criterion_group!(benches, bench_pair_analysis);
criterion_main!(benches);
