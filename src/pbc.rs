//! Periodic boundary condition utilities.
//!
//! This module provides minimum-image distance computations under periodic
//! boundary conditions, the primitive the shell classifier and every pairwise
//! SRO sum builds on.

use nalgebra::Vector3;

/// Wrap a fractional coordinate to the range `[0, 1)`.
///
/// Uses `rem_euclid(1.0)` which computes the Euclidean remainder, correctly
/// handling negative inputs (e.g. `-0.1` wraps to `0.9`). A guard handles the
/// rare edge case where `rem_euclid` returns exactly `1.0` due to
/// floating-point rounding.
///
/// # Examples
///
/// ```
/// use sqsforge::pbc::wrap_frac_coord;
///
/// assert!((wrap_frac_coord(0.5) - 0.5).abs() < 1e-10);
/// assert!((wrap_frac_coord(-0.1) - 0.9).abs() < 1e-10);
/// assert!((wrap_frac_coord(1.3) - 0.3).abs() < 1e-10);
/// ```
#[inline]
pub fn wrap_frac_coord(coord: f64) -> f64 {
    let wrapped = coord.rem_euclid(1.0);
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap a `Vector3` of fractional coordinates to `[0, 1)`, only along
/// periodic axes.
#[inline]
pub fn wrap_frac_coords_pbc(coords: &Vector3<f64>, pbc: [bool; 3]) -> Vector3<f64> {
    Vector3::new(
        if pbc[0] { wrap_frac_coord(coords[0]) } else { coords[0] },
        if pbc[1] { wrap_frac_coord(coords[1]) } else { coords[1] },
        if pbc[2] { wrap_frac_coord(coords[2]) } else { coords[2] },
    )
}

/// Calculate the minimum image distance and displacement vector between two
/// Cartesian points, checking enough periodic images to be exact even for
/// skewed lattices.
///
/// Returns `(distance, displacement_vector)` where the vector points from
/// `pos_a` to `pos_b`.
pub fn minimum_image_distance(
    pos_a: &Vector3<f64>,
    pos_b: &Vector3<f64>,
    lattice_matrix: &nalgebra::Matrix3<f64>,
    pbc: [bool; 3],
) -> (f64, Vector3<f64>) {
    let (dist_sq, vec) = minimum_image_distance_squared(pos_a, pos_b, lattice_matrix, pbc);
    (dist_sq.sqrt(), vec)
}

/// Squared-distance variant of [`minimum_image_distance`], avoiding a square
/// root when only comparisons are needed (e.g. shell classification).
pub fn minimum_image_distance_squared(
    pos_a: &Vector3<f64>,
    pos_b: &Vector3<f64>,
    lattice_matrix: &nalgebra::Matrix3<f64>,
    pbc: [bool; 3],
) -> (f64, Vector3<f64>) {
    let lattice_vecs = [
        lattice_matrix.row(0).transpose(),
        lattice_matrix.row(1).transpose(),
        lattice_matrix.row(2).transpose(),
    ];

    let direct_vec = pos_b - pos_a;
    let mut min_dist_sq = direct_vec.norm_squared();
    let mut min_vec = direct_vec;

    let search_range = compute_search_range(lattice_matrix, &lattice_vecs);

    for shift_a in -search_range..=search_range {
        if !pbc[0] && shift_a != 0 {
            continue;
        }
        for shift_b in -search_range..=search_range {
            if !pbc[1] && shift_b != 0 {
                continue;
            }
            for shift_c in -search_range..=search_range {
                if !pbc[2] && shift_c != 0 {
                    continue;
                }
                if shift_a == 0 && shift_b == 0 && shift_c == 0 {
                    continue;
                }

                let image_offset = (shift_a as f64) * lattice_vecs[0]
                    + (shift_b as f64) * lattice_vecs[1]
                    + (shift_c as f64) * lattice_vecs[2];

                let vec = direct_vec + image_offset;
                let dist_sq = vec.norm_squared();

                if dist_sq < min_dist_sq {
                    min_dist_sq = dist_sq;
                    min_vec = vec;
                }
            }
        }
    }

    (min_dist_sq, min_vec)
}

/// Compute the search range for periodic images based on lattice skewness.
///
/// For orthogonal or nearly orthogonal cells, ±1 (27 images) is sufficient.
/// For highly skewed cells a larger range is needed to guarantee exactness.
fn compute_search_range(
    lattice_matrix: &nalgebra::Matrix3<f64>,
    lattice_vecs: &[Vector3<f64>; 3],
) -> i32 {
    let lengths = [
        lattice_vecs[0].norm(),
        lattice_vecs[1].norm(),
        lattice_vecs[2].norm(),
    ];

    if lengths[0] < 1e-10 || lengths[1] < 1e-10 || lengths[2] < 1e-10 {
        return 1;
    }

    let cos_alpha = lattice_vecs[1].dot(&lattice_vecs[2]) / (lengths[1] * lengths[2]);
    let cos_beta = lattice_vecs[0].dot(&lattice_vecs[2]) / (lengths[0] * lengths[2]);
    let cos_gamma = lattice_vecs[0].dot(&lattice_vecs[1]) / (lengths[0] * lengths[1]);

    let alpha = cos_alpha.clamp(-1.0, 1.0).acos().to_degrees();
    let beta = cos_beta.clamp(-1.0, 1.0).acos().to_degrees();
    let gamma = cos_gamma.clamp(-1.0, 1.0).acos().to_degrees();

    let is_highly_skewed =
        (alpha - 90.0).abs() > 30.0 || (beta - 90.0).abs() > 30.0 || (gamma - 90.0).abs() > 30.0;

    if !is_highly_skewed {
        return 1;
    }

    let volume = lattice_matrix.determinant().abs();
    if volume < 1e-10 {
        return 1;
    }

    let cross_bc = lattice_vecs[1].cross(&lattice_vecs[2]);
    let cross_ac = lattice_vecs[0].cross(&lattice_vecs[2]);
    let cross_ab = lattice_vecs[0].cross(&lattice_vecs[1]);

    let perp_a = volume / cross_bc.norm().max(1e-10);
    let perp_b = volume / cross_ac.norm().max(1e-10);
    let perp_c = volume / cross_ab.norm().max(1e-10);
    let min_perp = perp_a.min(perp_b).min(perp_c);

    let max_length = lengths[0].max(lengths[1]).max(lengths[2]);

    const MAX_SEARCH_RANGE: i32 = 5;
    if min_perp > 1e-10 {
        ((max_length / min_perp).ceil() as i32).clamp(1, MAX_SEARCH_RANGE)
    } else {
        2
    }
}

/// All 27 periodic image offsets as `i32` triples.
const IMAGE_OFFSETS_I32: [[i32; 3]; 27] = [
    [-1, -1, -1],
    [-1, -1, 0],
    [-1, -1, 1],
    [-1, 0, -1],
    [-1, 0, 0],
    [-1, 0, 1],
    [-1, 1, -1],
    [-1, 1, 0],
    [-1, 1, 1],
    [0, -1, -1],
    [0, -1, 0],
    [0, -1, 1],
    [0, 0, -1],
    [0, 0, 0],
    [0, 0, 1],
    [0, 1, -1],
    [0, 1, 0],
    [0, 1, 1],
    [1, -1, -1],
    [1, -1, 0],
    [1, -1, 1],
    [1, 0, -1],
    [1, 0, 0],
    [1, 0, 1],
    [1, 1, -1],
    [1, 1, 0],
    [1, 1, 1],
];

/// Generate periodic image offsets consistent with the given PBC flags: for
/// each periodic axis, offsets in `{-1, 0, 1}`; for non-periodic axes, only
/// `0`.
///
/// # Examples
///
/// ```
/// use sqsforge::pbc::periodic_image_offsets;
///
/// assert_eq!(periodic_image_offsets([true, true, true]).count(), 27);
/// assert_eq!(periodic_image_offsets([true, true, false]).count(), 9);
/// ```
pub fn periodic_image_offsets(pbc: [bool; 3]) -> impl Iterator<Item = [i32; 3]> {
    IMAGE_OFFSETS_I32.into_iter().filter(move |img| {
        (pbc[0] || img[0] == 0) && (pbc[1] || img[1] == 0) && (pbc[2] || img[2] == 0)
    })
}
