//! Composition handling.
//!
//! This module provides the `Composition` type for representing target
//! compositions (species -> atom counts) with support for reduced formulas,
//! fast hashing for equality checks, and mole fractions (used by the SRO
//! kernel's `x_b` term, spec.md §4.B).

use crate::species::Species;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A chemical composition mapping species to amounts.
///
/// # Examples
///
/// ```
/// use sqsforge::composition::Composition;
/// use sqsforge::element::Element;
///
/// let comp = Composition::new([(Element::Fe.into(), 2.0), (Element::O.into(), 3.0)]);
/// assert_eq!(comp.reduced_formula(), "Fe2O3");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Composition {
    /// Species and their amounts (preserved insertion order).
    species: IndexMap<Species, f64>,
}

impl Composition {
    /// Create a new composition from species-amount pairs.
    pub fn new(species: impl IntoIterator<Item = (Species, f64)>) -> Self {
        let species: IndexMap<Species, f64> =
            species.into_iter().filter(|(_, amt)| *amt > 0.0).collect();
        Self { species }
    }

    /// Get the amount of a species in this composition.
    pub fn get(&self, species: Species) -> f64 {
        self.species.get(&species).copied().unwrap_or(0.0)
    }

    /// Get the total number of atoms.
    pub fn num_atoms(&self) -> f64 {
        self.species.values().sum()
    }

    /// Get the number of unique species.
    pub fn num_species(&self) -> usize {
        self.species.len()
    }

    /// Check if composition is empty.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Mole fraction `x_a = count(a) / total`. Zero for an unrepresented
    /// species or an empty composition.
    pub fn mole_fraction(&self, species: Species) -> f64 {
        let total = self.num_atoms();
        if total <= 0.0 {
            0.0
        } else {
            self.get(species) / total
        }
    }

    /// Get the reduced formula string.
    pub fn reduced_formula(&self) -> String {
        let gcd = self.gcd_of_amounts();
        if gcd == 0.0 {
            return String::new();
        }

        // Sort species by electronegativity (most electropositive first);
        // vacancies (no electronegativity) sort last.
        let mut sorted: Vec<_> = self.species.iter().collect();
        sorted.sort_by(|(a, _), (b, _)| {
            let en_a = electronegativity_of(a).unwrap_or(f64::MAX);
            let en_b = electronegativity_of(b).unwrap_or(f64::MAX);
            en_a.partial_cmp(&en_b).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut formula = String::new();
        for (sp, &amt) in sorted {
            let reduced_amt = amt / gcd;
            formula.push_str(sp.symbol());
            if (reduced_amt - 1.0).abs() > 1e-10 {
                if (reduced_amt - reduced_amt.round()).abs() < 1e-10 {
                    formula.push_str(&(reduced_amt.round() as i64).to_string());
                } else {
                    formula.push_str(&format!("{reduced_amt:.2}"));
                }
            }
        }
        formula
    }

    /// Get a hash of the reduced formula for fast equality checks.
    pub fn hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.reduced_formula().hash(&mut hasher);
        hasher.finish()
    }

    /// Compute GCD of all amounts (treating them as approximate integers).
    fn gcd_of_amounts(&self) -> f64 {
        if self.species.is_empty() {
            return 0.0;
        }

        let amounts: Vec<f64> = self.species.values().copied().collect();
        let mut result = amounts[0];

        for &amt in &amounts[1..] {
            result = gcd_float(result, amt);
            if result < 1e-10 {
                return 1.0;
            }
        }

        result
    }

    /// Iterate over (species, amount) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Species, &f64)> {
        self.species.iter()
    }

    /// Get species in iteration order.
    pub fn species(&self) -> Vec<Species> {
        self.species.keys().copied().collect()
    }
}

fn electronegativity_of(species: &Species) -> Option<f64> {
    match species {
        Species::Element(el) => el.electronegativity(),
        Species::Vacancy => None,
    }
}

/// Compute GCD of two floating point numbers (treating as approximate integers).
fn gcd_float(mut a: f64, mut b: f64) -> f64 {
    const EPSILON: f64 = 1e-10;
    const MAX_ITER: usize = 100;

    a = a.abs();
    b = b.abs();

    for _ in 0..MAX_ITER {
        if b < EPSILON {
            return a;
        }
        let temp = b;
        b = a % b;
        a = temp;
    }

    1.0
}

impl PartialEq for Composition {
    fn eq(&self, other: &Self) -> bool {
        self.reduced_formula() == other.reduced_formula()
    }
}

impl Eq for Composition {}

impl std::hash::Hash for Composition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reduced_formula().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn sp(symbol: &str) -> Species {
        Species::from_symbol(symbol).unwrap()
    }

    #[test]
    fn test_composition_basics() {
        let comp = Composition::new([(sp("Fe"), 2.0), (sp("O"), 3.0)]);
        assert_eq!(comp.get(sp("Fe")), 2.0);
        assert_eq!(comp.get(sp("O")), 3.0);
        assert_eq!(comp.get(sp("H")), 0.0);
        assert!((comp.num_atoms() - 5.0).abs() < 1e-10);
        assert_eq!(comp.num_species(), 2);
        assert!(!comp.is_empty());
    }

    #[test]
    fn test_mole_fraction() {
        let comp = Composition::new([(sp("Cs"), 27.0), (sp("Cl"), 27.0)]);
        assert!((comp.mole_fraction(sp("Cs")) - 0.5).abs() < 1e-10);
        assert_eq!(comp.mole_fraction(sp("Fe")), 0.0);
    }

    #[test]
    fn test_mole_fraction_empty() {
        let comp = Composition::new([]);
        assert_eq!(comp.mole_fraction(sp("Fe")), 0.0);
    }

    #[test]
    fn test_reduced_formula() {
        let cases: &[(&[(&str, f64)], &str)] = &[
            (&[("Fe", 2.0), ("O", 3.0)], "Fe2O3"),
            (&[("Na", 1.0), ("Cl", 1.0)], "NaCl"),
            (&[("H", 4.0), ("O", 2.0)], "H2O"),
            (&[("Cu", 1.0)], "Cu"),
            (&[("Cu", 4.0)], "Cu"),
        ];
        for (species, expected) in cases {
            let comp = Composition::new(species.iter().map(|(s, a)| (sp(s), *a)));
            assert_eq!(comp.reduced_formula(), *expected);
        }
    }

    #[test]
    fn test_vacancy_in_formula() {
        let comp = Composition::new([(sp("Fe"), 3.0), (Species::Vacancy, 1.0)]);
        assert!(comp.reduced_formula().starts_with("Fe3"));
    }

    #[test]
    fn test_equality_and_hashing() {
        let a = Composition::new([(sp("Fe"), 2.0), (sp("O"), 3.0)]);
        let b = Composition::new([(sp("Fe"), 4.0), (sp("O"), 6.0)]);
        assert_eq!(a, b);
        assert_eq!(a.hash(), b.hash());

        let feo = Composition::new([(sp("Fe"), 1.0), (sp("O"), 1.0)]);
        assert_ne!(a, feo);
    }

    #[test]
    fn test_empty_and_filtering() {
        let empty = Composition::new([]);
        assert!(empty.is_empty());
        assert_eq!(empty.num_atoms(), 0.0);
        assert_eq!(empty.reduced_formula(), "");

        let comp = Composition::new([(sp("Fe"), 2.0), (sp("O"), 0.0), (sp("Cu"), 3.0)]);
        assert_eq!(comp.num_species(), 2);
        assert_eq!(comp.get(sp("O")), 0.0);

        let comp2 = Composition::new([(sp("Fe"), -1.0), (sp("O"), 2.0)]);
        assert_eq!(comp2.num_species(), 1);
        assert_eq!(comp2.get(sp("Fe")), 0.0);
    }

    #[test]
    fn test_element_into_species() {
        let species: Species = Element::Fe.into();
        assert_eq!(species.symbol(), "Fe");
    }
}
