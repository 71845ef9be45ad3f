//! Objective function: reduces an SRO tensor and a target into one scalar.

use crate::sro::SroTensor;
use indexmap::IndexMap;

/// `O = Σ_s w[s] · Σ_{a≤b} |α[s,a,b] − T[s,a,b]|`. Lower is better; `0` means
/// the target is met exactly.
///
/// `alpha` and `target` must have been built over the same set of shells
/// (true by construction: both come from the same `shell_weights` map handed
/// to `pair_analysis`) — this is a total function over validated inputs, not
/// a recoverable error path, so a shell present in `alpha` but missing from
/// `target` is a caller bug.
pub fn score(alpha: &SroTensor, target: &SroTensor, shell_weights: &IndexMap<i32, f64>) -> f64 {
    debug_assert_eq!(alpha.k, target.k, "alpha/target species count mismatch");

    let mut total = 0.0;
    for (s_pos, &shell) in alpha.shells.iter().enumerate() {
        let weight = match shell_weights.get(&shell) {
            Some(&w) if w > 0.0 => w,
            _ => continue,
        };
        let target_pos = target
            .shell_position(shell)
            .expect("target tensor missing a shell present in alpha");

        let mut shell_sum = 0.0;
        for a in 0..alpha.k {
            for b in a..alpha.k {
                shell_sum += (alpha.get(s_pos, a, b) - target.get(target_pos, a, b)).abs();
            }
        }
        total += weight * shell_sum;
    }
    total
}
