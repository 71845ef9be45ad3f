//! Crystal structure representation.
//!
//! A `Structure` is the immutable parent crystal (spec.md §3): a lattice,
//! fractional coordinates, and one species per site. Unlike the teacher
//! crate's `Structure`, sites here are always fully ordered (a single
//! species per site, no partial occupancies) — SQS configurations never
//! need disorder below the site level, only across sites.

use crate::error::{Result, SqsError};
use crate::lattice::Lattice;
use crate::pbc::wrap_frac_coord;
use crate::species::Species;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An immutable crystal structure: lattice + per-site species + fractional coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    /// The crystal lattice.
    pub lattice: Lattice,
    /// Fractional coordinates in `[0, 1)` per axis where `pbc` is true.
    pub frac_coords: Vec<[f64; 3]>,
    /// Species symbol occupying each site.
    pub species: Vec<Species>,
    /// Per-axis periodicity.
    pub pbc: [bool; 3],
}

impl Structure {
    /// Construct a new structure, canonicalizing coordinates modulo 1 on
    /// periodic axes. Fails if lengths disagree or there are zero sites.
    pub fn try_new(
        lattice: Lattice,
        species: Vec<Species>,
        frac_coords: Vec<[f64; 3]>,
        pbc: [bool; 3],
    ) -> Result<Self> {
        if species.len() != frac_coords.len() {
            return Err(SqsError::GeometryError {
                reason: format!(
                    "species and frac_coords must have same length: {} vs {}",
                    species.len(),
                    frac_coords.len()
                ),
            });
        }
        if species.is_empty() {
            return Err(SqsError::GeometryError {
                reason: "structure must contain at least one site".to_string(),
            });
        }
        let frac_coords = frac_coords
            .into_iter()
            .map(|fc| canonicalize(fc, pbc))
            .collect();
        Ok(Self {
            lattice,
            frac_coords,
            species,
            pbc,
        })
    }

    /// Construct with default (fully periodic) boundary conditions.
    ///
    /// # Panics
    /// Panics if `species` and `frac_coords` differ in length. Use
    /// [`Structure::try_new`] to handle this as a recoverable error.
    pub fn new(lattice: Lattice, species: Vec<Species>, frac_coords: Vec<[f64; 3]>) -> Self {
        Self::try_new(lattice, species, frac_coords, [true, true, true])
            .expect("species and frac_coords must have the same length")
    }

    /// Number of sites, N.
    pub fn num_atoms(&self) -> usize {
        self.species.len()
    }

    /// Ordinal atomic numbers Z, one per site.
    pub fn numbers(&self) -> Vec<u32> {
        self.species.iter().map(|sp| sp.z()).collect()
    }

    /// The set of distinct species present, sorted by Z.
    pub fn unique_species(&self) -> Vec<Species> {
        let set: BTreeSet<Species> = self.species.iter().copied().collect();
        set.into_iter().collect()
    }

    /// A new structure containing only the listed sites (lattice unchanged).
    pub fn slice(&self, indices: &[usize]) -> Result<Self> {
        for &idx in indices {
            if idx >= self.num_atoms() {
                return Err(SqsError::GeometryError {
                    reason: format!("site index {idx} out of bounds ({} sites)", self.num_atoms()),
                });
            }
        }
        let species = indices.iter().map(|&idx| self.species[idx]).collect();
        let frac_coords = indices.iter().map(|&idx| self.frac_coords[idx]).collect();
        Self::try_new(self.lattice, species, frac_coords, self.pbc)
    }

    /// A new structure identical to this one except that sites in `which`
    /// are occupied by `symbols` (same length as `which`). All other sites
    /// keep their parent species. Mirrors the original `with_species`.
    pub fn with_species(&self, symbols: &[Species], which: &[usize]) -> Result<Self> {
        if symbols.len() != which.len() {
            return Err(SqsError::GeometryError {
                reason: format!(
                    "number of species ({}) does not match number of sites ({})",
                    symbols.len(),
                    which.len()
                ),
            });
        }
        for &idx in which {
            if idx >= self.num_atoms() {
                return Err(SqsError::GeometryError {
                    reason: format!("site index {idx} out of bounds ({} sites)", self.num_atoms()),
                });
            }
        }
        let mut species = self.species.clone();
        for (&idx, &sp) in which.iter().zip(symbols) {
            species[idx] = sp;
        }
        Ok(Self {
            lattice: self.lattice,
            frac_coords: self.frac_coords.clone(),
            species,
            pbc: self.pbc,
        })
    }

    /// Structure with sites reordered by ascending Z (stable sort).
    pub fn sorted(&self) -> Self {
        let mut order: Vec<usize> = (0..self.num_atoms()).collect();
        order.sort_by_key(|&idx| self.species[idx].z());
        let species = order.iter().map(|&idx| self.species[idx]).collect();
        let frac_coords = order.iter().map(|&idx| self.frac_coords[idx]).collect();
        Self {
            lattice: self.lattice,
            frac_coords,
            species,
            pbc: self.pbc,
        }
    }

    /// Tile the structure `sa x sb x sc` times, following the original
    /// `make_supercell`: translate scaled fractional coordinates through
    /// every `(a,b,c)` shift.
    pub fn supercell(&self, sa: usize, sb: usize, sc: usize) -> Result<Self> {
        if sa == 0 || sb == 0 || sc == 0 {
            return Err(SqsError::GeometryError {
                reason: "supercell factors must be positive".to_string(),
            });
        }
        let new_lattice = self.lattice.scaled(sa, sb, sc);
        let n = self.num_atoms();
        let mut frac_coords = Vec::with_capacity(n * sa * sb * sc);
        let mut species = Vec::with_capacity(n * sa * sb * sc);

        for shift_a in 0..sa {
            for shift_b in 0..sb {
                for shift_c in 0..sc {
                    for idx in 0..n {
                        let [fa, fb, fc] = self.frac_coords[idx];
                        frac_coords.push([
                            (fa + shift_a as f64) / sa as f64,
                            (fb + shift_b as f64) / sb as f64,
                            (fc + shift_c as f64) / sc as f64,
                        ]);
                        species.push(self.species[idx]);
                    }
                }
            }
        }
        Self::try_new(new_lattice, species, frac_coords, self.pbc)
    }
}

fn canonicalize(fc: [f64; 3], pbc: [bool; 3]) -> [f64; 3] {
    [
        if pbc[0] { wrap_frac_coord(fc[0]) } else { fc[0] },
        if pbc[1] { wrap_frac_coord(fc[1]) } else { fc[1] },
        if pbc[2] { wrap_frac_coord(fc[2]) } else { fc[2] },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn sp(symbol: &str) -> Species {
        Species::from_symbol(symbol).unwrap()
    }

    fn cscl(a: f64) -> Structure {
        Structure::new(
            Lattice::cubic(a),
            vec![sp("Cs"), sp("Cl")],
            vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
        )
    }

    #[test]
    fn test_new_and_num_atoms() {
        let s = cscl(4.12);
        assert_eq!(s.num_atoms(), 2);
        assert_eq!(s.numbers(), vec![Element::Cs.atomic_number() as u32, 17]);
    }

    #[test]
    fn test_length_mismatch_errors() {
        let result = Structure::try_new(
            Lattice::cubic(4.0),
            vec![sp("Na"), sp("Cl")],
            vec![[0.0, 0.0, 0.0]],
            [true, true, true],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_canonicalization_modulo_one() {
        let s = Structure::new(Lattice::cubic(4.0), vec![sp("Fe")], vec![[-0.1, 1.3, 2.0]]);
        let fc = s.frac_coords[0];
        assert!((fc[0] - 0.9).abs() < 1e-10);
        assert!((fc[1] - 0.3).abs() < 1e-10);
        assert!((fc[2] - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_slice() {
        let s = cscl(4.12);
        let sub = s.slice(&[1]).unwrap();
        assert_eq!(sub.num_atoms(), 1);
        assert_eq!(sub.species[0], sp("Cl"));
    }

    #[test]
    fn test_with_species_replaces_only_selected() {
        let s = cscl(4.12);
        let replaced = s.with_species(&[sp("Na")], &[0]).unwrap();
        assert_eq!(replaced.num_atoms(), 2);
        assert_eq!(replaced.species[0], sp("Na"));
        assert_eq!(replaced.species[1], sp("Cl"));
    }

    #[test]
    fn test_with_species_length_mismatch() {
        let s = cscl(4.12);
        assert!(s.with_species(&[sp("Na"), sp("K")], &[0]).is_err());
    }

    #[test]
    fn test_sorted_by_z() {
        let s = Structure::new(
            Lattice::cubic(4.0),
            vec![sp("Fe"), sp("H")],
            vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
        );
        let sorted = s.sorted();
        assert_eq!(sorted.species[0], sp("H"));
        assert_eq!(sorted.species[1], sp("Fe"));
    }

    #[test]
    fn test_supercell_count_and_species() {
        let s = cscl(4.12);
        let sc = s.supercell(3, 3, 3).unwrap();
        assert_eq!(sc.num_atoms(), 2 * 27);
        assert!((sc.lattice.volume() - s.lattice.volume() * 27.0).abs() < 1e-8);
    }

    #[test]
    fn test_unique_species() {
        let s = cscl(4.12);
        let unique = s.unique_species();
        assert_eq!(unique.len(), 2);
    }
}
