//! Warren–Cowley short-range-order (SRO) kernel.
//!
//! Given a configuration (a species assignment to every site) and a
//! precomputed [`ShellMatrix`], computes the per-shell, per-species-pair
//! SRO parameter tensor α. This is the hot inner loop each worker calls once
//! per candidate configuration — see `worker::pair_sqs_iteration`.

#![allow(clippy::needless_range_loop)]

use crate::shells::ShellMatrix;
use indexmap::IndexMap;

/// A site-to-species assignment: `configuration[i]` is the ordinal index
/// (into a `0..K` species palette) occupying site `i`.
pub type Configuration = Vec<usize>;

/// The per-shell `K×K` SRO parameter tensor, α.
#[derive(Debug, Clone, PartialEq)]
pub struct SroTensor {
    /// Shell indices this tensor covers, ascending, matching the keys of the
    /// `shell_weights` map used to compute it.
    pub shells: Vec<i32>,
    /// Number of distinct species, K.
    pub k: usize,
    data: Vec<f64>,
}

impl SroTensor {
    /// A zero tensor over `shells` for `k` species. Used both by the SRO
    /// kernel and by settings validation to build a target tensor from a
    /// broadcastable scalar/matrix/full-tensor input.
    pub(crate) fn zeros(shells: Vec<i32>, k: usize) -> Self {
        let data = vec![0.0; shells.len() * k * k];
        Self { shells, k, data }
    }

    #[inline]
    fn offset(&self, s_pos: usize, a: usize, b: usize) -> usize {
        (s_pos * self.k + a) * self.k + b
    }

    /// α at shell-position `s_pos` (an index into `self.shells`, not a raw
    /// shell index) for species pair `(a, b)`.
    #[inline]
    pub fn get(&self, s_pos: usize, a: usize, b: usize) -> f64 {
        self.data[self.offset(s_pos, a, b)]
    }

    #[inline]
    pub(crate) fn set(&mut self, s_pos: usize, a: usize, b: usize, value: f64) {
        let idx = self.offset(s_pos, a, b);
        self.data[idx] = value;
    }

    /// Position of `shell` within `self.shells`, if present.
    pub fn shell_position(&self, shell: i32) -> Option<usize> {
        self.shells.iter().position(|&s| s == shell)
    }

    /// Raw backing slice, laid out `[shell][a][b]` row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Compute the SRO tensor α for `configuration` against `shell_matrix`.
///
/// `num_species` is K, the size of the species palette `configuration`
/// indexes into. `shell_weights` selects which shells are analyzed (only
/// its keys matter here; the objective applies the weights). `pair_weights`
/// is a `K×K` `{0,1}` mask applied to the result after computation.
pub fn pair_analysis(
    shell_matrix: &ShellMatrix,
    configuration: &Configuration,
    num_species: usize,
    shell_weights: &IndexMap<i32, f64>,
    pair_weights: &[Vec<i32>],
) -> SroTensor {
    let n = shell_matrix.n();
    let k = num_species;

    let mut shells: Vec<i32> = shell_weights.keys().copied().collect();
    shells.sort_unstable();

    let mut tensor = SroTensor::zeros(shells.clone(), k);
    if shells.is_empty() || n == 0 {
        return tensor;
    }

    let mut counts = vec![0usize; k];
    for &sp in configuration {
        counts[sp] += 1;
    }
    let mole_fraction: Vec<f64> = counts.iter().map(|&c| c as f64 / n as f64).collect();

    for (s_pos, &shell) in shells.iter().enumerate() {
        // directed[a][b]: ordered pairs (i, j), i != j, in this shell, with
        // site i of species a and site j of species b. Symmetric by
        // construction since shell_matrix.get(i, j) == shell_matrix.get(j, i).
        let mut directed = vec![vec![0u64; k]; k];
        for i in 0..n {
            let a = configuration[i];
            for j in 0..n {
                if i == j {
                    continue;
                }
                if shell_matrix.get(i, j) == shell {
                    let b = configuration[j];
                    directed[a][b] += 1;
                }
            }
        }

        let z_of: Vec<u64> = directed.iter().map(|row| row.iter().sum()).collect();

        for a in 0..k {
            for b in 0..k {
                if mole_fraction[b] <= 0.0 || z_of[a] == 0 {
                    tensor.set(s_pos, a, b, 0.0);
                    continue;
                }
                let p_b_given_a = directed[a][b] as f64 / z_of[a] as f64;
                let alpha = 1.0 - p_b_given_a / mole_fraction[b];
                tensor.set(s_pos, a, b, alpha);
            }
        }
    }

    apply_pair_weights(&mut tensor, pair_weights);
    tensor
}

fn apply_pair_weights(tensor: &mut SroTensor, pair_weights: &[Vec<i32>]) {
    let k = tensor.k;
    for s_pos in 0..tensor.shells.len() {
        for a in 0..k {
            for b in 0..k {
                if pair_weights[a][b] == 0 {
                    tensor.set(s_pos, a, b, 0.0);
                }
            }
        }
    }
}

/// `K×K` all-ones-off-diagonal mask: `1 - I`, the default `pair_weights`.
pub fn default_pair_weights(k: usize) -> Vec<Vec<i32>> {
    (0..k)
        .map(|a| (0..k).map(|b| if a == b { 0 } else { 1 }).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Lattice;
    use crate::species::Species;
    use crate::structure::Structure;

    fn cscl_shells(a: f64) -> (Structure, ShellMatrix) {
        let structure = Structure::new(
            Lattice::cubic(a),
            vec![
                Species::from_symbol("Cs").unwrap(),
                Species::from_symbol("Cl").unwrap(),
            ],
            vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
        );
        let shell_distances = crate::shells::default_shell_distances(&structure, 1e-3, 1e-5).unwrap();
        let shell_matrix = ShellMatrix::build(&structure, &shell_distances, 1e-3, 1e-5).unwrap();
        (structure, shell_matrix)
    }

    #[test]
    fn test_ordered_cscl_alpha_zero_for_unlike_pairs() {
        let (_s, shells) = cscl_shells(4.12);
        let configuration: Configuration = vec![0, 1]; // Cs at 0, Cl at 1
        let mut weights = IndexMap::new();
        weights.insert(1, 1.0);
        let pair_weights = default_pair_weights(2);
        let alpha = pair_analysis(&shells, &configuration, 2, &weights, &pair_weights);

        let pos = alpha.shell_position(1).unwrap();
        // Every shell-1 neighbor of a Cs atom is Cl and vice versa: x_b=0.5,
        // P(b|a)=1.0, so alpha = 1 - 1.0/0.5 = -1.0 (perfectly ordered).
        assert!((alpha.get(pos, 0, 1) - (-1.0)).abs() < 1e-10);
        assert!((alpha.get(pos, 1, 0) - (-1.0)).abs() < 1e-10);
    }

    #[test]
    fn test_single_species_alpha_identically_zero() {
        let (_s, shells) = cscl_shells(4.12);
        let configuration: Configuration = vec![0, 0];
        let mut weights = IndexMap::new();
        weights.insert(1, 1.0);
        let pair_weights = default_pair_weights(1);
        let alpha = pair_analysis(&shells, &configuration, 1, &weights, &pair_weights);
        let pos = alpha.shell_position(1).unwrap();
        assert_eq!(alpha.get(pos, 0, 0), 0.0);
    }

    #[test]
    fn test_pair_weights_mask_zeroes_entries() {
        let (_s, shells) = cscl_shells(4.12);
        let configuration: Configuration = vec![0, 1];
        let mut weights = IndexMap::new();
        weights.insert(1, 1.0);
        let pair_weights = vec![vec![0, 0], vec![0, 0]];
        let alpha = pair_analysis(&shells, &configuration, 2, &weights, &pair_weights);
        let pos = alpha.shell_position(1).unwrap();
        assert_eq!(alpha.get(pos, 0, 1), 0.0);
        assert_eq!(alpha.get(pos, 1, 0), 0.0);
    }

    #[test]
    fn test_symmetric_in_last_two_axes() {
        let (s, _) = cscl_shells(4.12);
        let sc = s.supercell(2, 2, 2).unwrap();
        let shell_distances = crate::shells::default_shell_distances(&sc, 1e-3, 1e-5).unwrap();
        let shells = ShellMatrix::build(&sc, &shell_distances, 1e-3, 1e-5).unwrap();
        let configuration: Configuration = sc.species.iter().map(|sp| if *sp == Species::from_symbol("Cs").unwrap() { 0 } else { 1 }).collect();
        let mut weights = IndexMap::new();
        for s in 1..=shells.num_shells() {
            weights.insert(s as i32, 1.0);
        }
        let pair_weights = default_pair_weights(2);
        let alpha = pair_analysis(&shells, &configuration, 2, &weights, &pair_weights);
        for s_pos in 0..alpha.shells.len() {
            for a in 0..2 {
                for b in 0..2 {
                    assert!(
                        (alpha.get(s_pos, a, b) - alpha.get(s_pos, b, a)).abs() < 1e-8,
                        "alpha[{s_pos},{a},{b}] != alpha[{s_pos},{b},{a}]"
                    );
                }
            }
        }
    }

    #[test]
    fn test_default_pair_weights_shape() {
        let w = default_pair_weights(3);
        assert_eq!(w[0], vec![0, 1, 1]);
        assert_eq!(w[1], vec![1, 0, 1]);
    }
}
