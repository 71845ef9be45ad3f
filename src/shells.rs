//! Coordination shell classification and the pairwise shell index matrix.
//!
//! A shell is a band of interatomic distance; two sites belong to the same
//! shell when their minimum-image distance falls within `atol + rtol·d` of a
//! shell's reference distance. `ShellMatrix` is the dense `N×N` table of
//! shell indices the SRO kernel reads from on every scored configuration, so
//! it is built once per [`crate::structure::Structure`] and shared read-only
//! across workers.

use crate::error::{Result, SqsError};
use crate::structure::Structure;
use nalgebra::Vector3;

/// Shell index reserved for the self-pair and for any pair distance that
/// matches no configured shell within tolerance.
pub const NO_SHELL: i32 = 0;

/// Dense `N×N` table of coordination-shell indices, one pair at a time.
#[derive(Debug, Clone)]
pub struct ShellMatrix {
    n: usize,
    /// `d_0 = 0, d_1, ..., d_M`, strictly increasing.
    shell_distances: Vec<f64>,
    data: Vec<i32>,
}

impl ShellMatrix {
    /// Classify every site pair of `structure` against `shell_distances`
    /// (must start at `0` and be strictly increasing, length ≥ 2) using the
    /// clustering tolerance `|a-b| ≤ atol + rtol·max(a,b)`.
    pub fn build(
        structure: &Structure,
        shell_distances: &[f64],
        atol: f64,
        rtol: f64,
    ) -> Result<Self> {
        if shell_distances.len() < 2 {
            return Err(SqsError::BadSettings {
                parameter: "shell_distances".to_string(),
                reason: "must have length >= 2 (including the leading 0)".to_string(),
            });
        }
        if shell_distances[0] != 0.0 {
            return Err(SqsError::BadSettings {
                parameter: "shell_distances".to_string(),
                reason: "must start at 0".to_string(),
            });
        }
        for pair in shell_distances.windows(2) {
            if pair[1] <= pair[0] {
                return Err(SqsError::BadSettings {
                    parameter: "shell_distances".to_string(),
                    reason: "must be strictly increasing".to_string(),
                });
            }
        }

        let n = structure.num_atoms();
        let cart = cartesian_coords(structure);
        let matrix = structure.lattice.matrix();
        let mut data = vec![NO_SHELL; n * n];

        for i in 0..n {
            for j in (i + 1)..n {
                let (dist, _) = crate::pbc::minimum_image_distance(&cart[i], &cart[j], matrix, structure.pbc);
                if dist <= atol {
                    return Err(SqsError::GeometryError {
                        reason: format!("sites {i} and {j} coincide within atol ({dist})"),
                    });
                }
                let shell = classify(dist, shell_distances, atol, rtol);
                data[i * n + j] = shell;
                data[j * n + i] = shell;
            }
        }

        Ok(Self {
            n,
            shell_distances: shell_distances.to_vec(),
            data,
        })
    }

    /// Shell index of pair `(i, j)`. Zero on the diagonal.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        self.data[i * self.n + j]
    }

    /// Number of sites, N.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Highest usable shell index, M (`shell_distances.len() - 1`).
    pub fn num_shells(&self) -> usize {
        self.shell_distances.len() - 1
    }

    /// The shell reference distances this matrix was built from.
    pub fn shell_distances(&self) -> &[f64] {
        &self.shell_distances
    }
}

fn cartesian_coords(structure: &Structure) -> Vec<Vector3<f64>> {
    structure
        .frac_coords
        .iter()
        .map(|fc| structure.lattice.get_cartesian_coord(&Vector3::new(fc[0], fc[1], fc[2])))
        .collect()
}

fn classify(dist: f64, shell_distances: &[f64], atol: f64, rtol: f64) -> i32 {
    let mut best_shell = NO_SHELL;
    let mut best_diff = f64::INFINITY;
    for (s, &d_s) in shell_distances.iter().enumerate().skip(1) {
        let diff = (dist - d_s).abs();
        let tol = atol + rtol * dist.max(d_s);
        if diff <= tol && diff < best_diff {
            best_diff = diff;
            best_shell = s as i32;
        }
    }
    best_shell
}

/// Cluster the distinct nonzero minimum-image pair distances of `structure`
/// into shells under `(atol, rtol)`, returning `[0, d_1, ..., d_M]` with each
/// `d_s` the median of its cluster. Used by settings validation to supply a
/// default `shell_distances` when the caller does not provide one.
pub fn default_shell_distances(structure: &Structure, atol: f64, rtol: f64) -> Result<Vec<f64>> {
    let n = structure.num_atoms();
    let cart = cartesian_coords(structure);
    let matrix = structure.lattice.matrix();

    let mut distances = Vec::with_capacity(n * (n.saturating_sub(1)) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let (dist, _) = crate::pbc::minimum_image_distance(&cart[i], &cart[j], matrix, structure.pbc);
            if dist <= atol {
                return Err(SqsError::GeometryError {
                    reason: format!("sites {i} and {j} coincide within atol ({dist})"),
                });
            }
            distances.push(dist);
        }
    }
    if distances.is_empty() {
        return Err(SqsError::GeometryError {
            reason: "structure has fewer than two sites; no pair distances to cluster".to_string(),
        });
    }
    distances.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut shell_distances = vec![0.0];
    let mut group_start = 0usize;
    for idx in 1..=distances.len() {
        let at_end = idx == distances.len();
        let breaks = !at_end && {
            let prev = distances[idx - 1];
            let cur = distances[idx];
            (cur - prev).abs() > atol + rtol * cur.max(prev)
        };
        if at_end || breaks {
            let group = &distances[group_start..idx];
            shell_distances.push(median(group));
            group_start = idx;
        }
    }
    Ok(shell_distances)
}

fn median(sorted_slice: &[f64]) -> f64 {
    let len = sorted_slice.len();
    if len % 2 == 1 {
        sorted_slice[len / 2]
    } else {
        (sorted_slice[len / 2 - 1] + sorted_slice[len / 2]) / 2.0
    }
}
