//! Shared test utilities for building crystal structures and settings.

#![allow(dead_code)]

use indexmap::IndexMap;
use sqsforge::lattice::Lattice;
use sqsforge::settings::{AllMarker, RawSettings, StructureInput, TargetObjectiveInput, WhichSelector};
use sqsforge::species::Species;
use sqsforge::structure::Structure;

/// CsCl-type binary structure: one cation site, one anion site.
pub fn make_cscl(cation: &str, anion: &str, a: f64) -> Structure {
    Structure::new(
        Lattice::cubic(a),
        vec![
            Species::from_symbol(cation).unwrap(),
            Species::from_symbol(anion).unwrap(),
        ],
        vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
    )
}

/// `n`x`n`x`n` supercell of the CsCl structure, `2n^3` sites total.
pub fn make_cscl_supercell(cation: &str, anion: &str, a: f64, n: usize) -> Structure {
    make_cscl(cation, anion, a).supercell(n, n, n).unwrap()
}

/// FCC rocksalt-type binary structure (4 cation sites, 4 anion sites).
pub fn make_rocksalt(cation: &str, anion: &str, a: f64) -> Structure {
    Structure::new(
        Lattice::cubic(a),
        vec![
            Species::from_symbol(cation).unwrap(),
            Species::from_symbol(cation).unwrap(),
            Species::from_symbol(cation).unwrap(),
            Species::from_symbol(cation).unwrap(),
            Species::from_symbol(anion).unwrap(),
            Species::from_symbol(anion).unwrap(),
            Species::from_symbol(anion).unwrap(),
            Species::from_symbol(anion).unwrap(),
        ],
        vec![
            [0.0, 0.0, 0.0],
            [0.5, 0.5, 0.0],
            [0.5, 0.0, 0.5],
            [0.0, 0.5, 0.5],
            [0.5, 0.0, 0.0],
            [0.0, 0.5, 0.0],
            [0.0, 0.0, 0.5],
            [0.5, 0.5, 0.5],
        ],
    )
}

/// A minimal `RawSettings` for a binary CsCl supercell, overridable in tests.
pub fn cscl_raw_settings(
    n: usize,
    composition: &[(&str, i64)],
    mode: &str,
    iterations: Option<i64>,
    max_output: i64,
    seed: Option<u64>,
    threads_per_rank: Vec<i32>,
) -> RawSettings {
    let structure = make_cscl_supercell("Cs", "Cl", 4.12, n);
    let mut comp = IndexMap::new();
    for (symbol, amount) in composition {
        comp.insert(symbol.to_string(), *amount);
    }
    let mut shell_weights = IndexMap::new();
    shell_weights.insert(1, 1.0);

    RawSettings {
        structure: StructureInput::Native(structure),
        composition: comp,
        which: WhichSelector::All(AllMarker::default()),
        target_objective: TargetObjectiveInput::Scalar(0.0),
        pair_weights: None,
        shell_weights: Some(shell_weights),
        iterations,
        max_output_configurations: Some(max_output),
        shell_distances: None,
        threads_per_rank: Some(threads_per_rank),
        atol: None,
        rtol: None,
        mode: Some(mode.to_string()),
        seed,
    }
}
