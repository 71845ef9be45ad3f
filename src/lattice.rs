//! Crystal lattice representation.
//!
//! A `Lattice` is a 3x3 matrix of row-vectors (Angstrom) used to convert
//! between fractional and Cartesian coordinates.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// A crystal lattice: 3x3 matrix of row-vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    matrix: Matrix3<f64>,
}

impl Lattice {
    /// Create a lattice from a 3x3 matrix of row-vectors.
    pub fn new(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    /// Create a lattice from nested row arrays, e.g. `[[a,0,0],[0,b,0],[0,0,c]]`.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::new(
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ))
    }

    /// Create a cubic lattice with edge length `a`.
    pub fn cubic(a: f64) -> Self {
        Self::from_rows([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    /// The underlying 3x3 matrix.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// The lattice as nested row arrays.
    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        [
            [self.matrix[(0, 0)], self.matrix[(0, 1)], self.matrix[(0, 2)]],
            [self.matrix[(1, 0)], self.matrix[(1, 1)], self.matrix[(1, 2)]],
            [self.matrix[(2, 0)], self.matrix[(2, 1)], self.matrix[(2, 2)]],
        ]
    }

    /// Unit cell volume (may be negative for a left-handed lattice).
    pub fn volume(&self) -> f64 {
        self.matrix.determinant()
    }

    /// Convert a single fractional coordinate to Cartesian.
    pub fn get_cartesian_coord(&self, frac: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.transpose() * frac
    }

    /// Convert a batch of fractional coordinates to Cartesian.
    pub fn get_cartesian_coords(&self, frac_coords: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
        frac_coords
            .iter()
            .map(|fc| self.get_cartesian_coord(fc))
            .collect()
    }

    /// Scale the lattice by a diagonal `(sa, sb, sc)` supercell factor.
    pub fn scaled(&self, sa: usize, sb: usize, sc: usize) -> Self {
        let scale = Matrix3::new(
            sa as f64, 0.0, 0.0, 0.0, sb as f64, 0.0, 0.0, 0.0, sc as f64,
        );
        Self::new(scale * self.matrix)
    }
}
