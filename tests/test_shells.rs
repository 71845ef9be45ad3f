//! Integration tests for coordination-shell classification at scale.

mod common;

use common::make_cscl_supercell;
use sqsforge::shells::{self, ShellMatrix};
use std::time::Instant;

#[test]
fn large_supercell_shell_matrix_builds_quickly_and_stays_symmetric() {
    // 4x4x4 CsCl supercell = 128 sites.
    let structure = make_cscl_supercell("Cs", "Cl", 4.12, 4);
    let n = structure.num_atoms();
    assert!(n >= 100, "expected at least 100 sites, got {n}");

    let start = Instant::now();
    let shell_distances = shells::default_shell_distances(&structure, 1e-3, 1e-5).unwrap();
    let matrix = ShellMatrix::build(&structure, &shell_distances, 1e-3, 1e-5).unwrap();
    let elapsed = start.elapsed();

    assert!(
        elapsed.as_secs_f64() < 10.0,
        "shell matrix build took {:.2}s for {n} sites, expected < 10s",
        elapsed.as_secs_f64()
    );

    for i in 0..n {
        assert_eq!(matrix.get(i, i), shells::NO_SHELL);
        for j in (i + 1)..n {
            assert_eq!(matrix.get(i, j), matrix.get(j, i), "shell matrix not symmetric at ({i},{j})");
        }
    }
}

#[test]
fn coordination_number_is_constant_within_the_first_shell() {
    // Every site in a CsCl lattice has 8 nearest unlike-species neighbors.
    let structure = make_cscl_supercell("Cs", "Cl", 4.12, 4);
    let shell_distances = shells::default_shell_distances(&structure, 1e-3, 1e-5).unwrap();
    let matrix = ShellMatrix::build(&structure, &shell_distances, 1e-3, 1e-5).unwrap();
    let n = structure.num_atoms();

    let mut counts = vec![0usize; n];
    for (i, count) in counts.iter_mut().enumerate() {
        for j in 0..n {
            if i != j && matrix.get(i, j) == 1 {
                *count += 1;
            }
        }
    }
    assert!(
        counts.iter().all(|&c| c == 8),
        "expected CN=8 for every site in the first CsCl shell, got {counts:?}"
    );
}

#[test]
fn shell_count_grows_with_supercell_size() {
    let unit_shells = {
        let s = make_cscl_supercell("Cs", "Cl", 4.12, 1);
        shells::default_shell_distances(&s, 1e-3, 1e-5).unwrap().len()
    };
    let super_shells = {
        let s = make_cscl_supercell("Cs", "Cl", 4.12, 3);
        shells::default_shell_distances(&s, 1e-3, 1e-5).unwrap().len()
    };
    assert!(
        super_shells > unit_shells,
        "larger supercell should resolve more distinct shells: unit={unit_shells}, super={super_shells}"
    );
}

#[test]
fn shell_assignment_is_consistent_between_unit_cell_and_supercell() {
    // The first-shell distance found in the unit cell must also appear as
    // shell 1 in a supercell built from it.
    let unit = make_cscl_supercell("Cs", "Cl", 4.12, 1);
    let unit_distances = shells::default_shell_distances(&unit, 1e-3, 1e-5).unwrap();

    let supercell = make_cscl_supercell("Cs", "Cl", 4.12, 2);
    let super_distances = shells::default_shell_distances(&supercell, 1e-3, 1e-5).unwrap();

    assert!((unit_distances[1] - super_distances[1]).abs() < 1e-6);
}
