//! Settings validation: `RawSettings` (loose external shape) →
//! `IterationSettings` (the immutable, fully normalized bundle the worker
//! pool runs against).
//!
//! Validation is a chain of small reader functions, each producing one
//! field and returning `Result<T, SqsError>` tagged with the offending
//! parameter name — no singleton parser registry (see DESIGN.md).

#![allow(clippy::needless_range_loop)]

use crate::error::{check_in_range, check_non_negative, check_positive_usize, Result, SqsError};
use crate::lattice::Lattice;
use crate::shells::{self, ShellMatrix};
use crate::species::Species;
use crate::sro::SroTensor;
use crate::structure::Structure;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Narrow structure interchange shape (spec.md §6), the one intermediate
/// format external parsers/collaborators convert into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureRecord {
    /// 3x3 lattice matrix, row-vectors.
    pub lattice: [[f64; 3]; 3],
    /// Fractional coordinates, one per site.
    pub coords: Vec<[f64; 3]>,
    /// Species symbol per site.
    pub species: Vec<String>,
    /// Per-axis periodicity; defaults to fully periodic if absent.
    #[serde(default)]
    pub pbc: Option<[bool; 3]>,
}

/// Either a native `Structure` or the narrow interchange record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructureInput {
    /// An already-constructed `Structure`.
    Native(Structure),
    /// The external interchange shape, converted on validation.
    Record(StructureRecord),
}

/// Which sites the search may mutate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WhichSelector {
    /// All sites of a given species symbol.
    Symbol(String),
    /// Every site in the structure.
    All(AllMarker),
    /// An explicit index list.
    Indices(Vec<usize>),
}

/// Marker so `"all"` round-trips through serde's untagged enum matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllMarker(String);

impl Default for AllMarker {
    fn default() -> Self {
        Self("all".to_string())
    }
}

/// Target objective, accepted in any of the three broadcastable shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetObjectiveInput {
    /// One value, broadcast to every shell and species pair.
    Scalar(f64),
    /// One `K×K` matrix, broadcast over every shell in `shell_weights`.
    Matrix(Vec<Vec<f64>>),
    /// A full `[shells, K, K]` tensor, one slice per shell in `shell_weights`.
    Tensor(Vec<Vec<Vec<f64>>>),
}

/// Search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Uniform sampling of multiset permutations via shuffling.
    Random,
    /// Exhaustive enumeration of every distinct multiset permutation.
    Systematic,
}

/// Loose, externally-supplied settings. Field types are intentionally wide
/// (e.g. composition as a string-keyed map) to accept raw external shapes;
/// `validate` narrows this into an `IterationSettings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSettings {
    /// The parent structure, native or via the external interchange record.
    pub structure: StructureInput,
    /// Species symbol → count, summing to the sublattice size.
    pub composition: IndexMap<String, i64>,
    /// Selects the mutable sublattice `W`; defaults to every site.
    #[serde(default = "default_which")]
    pub which: WhichSelector,
    /// Target SRO tensor, in any broadcastable shape.
    pub target_objective: TargetObjectiveInput,
    /// `K×K` `{0,1}` species-pair mask; defaults to `1 - I`.
    pub pair_weights: Option<Vec<Vec<i32>>>,
    /// Shell index → weight in the objective; defaults to `1/s` for `s` in `1..=6`.
    pub shell_weights: Option<IndexMap<i32, f64>>,
    /// Iteration budget; defaults to 1e5 (random) or -1/"all" (systematic).
    pub iterations: Option<i64>,
    /// Result cache capacity `K_max`; defaults to 10.
    pub max_output_configurations: Option<i64>,
    /// Shell reference distances; computed from the structure if absent.
    pub shell_distances: Option<Vec<f64>>,
    /// Threads to spawn per rank (-1 = all available cores); defaults to `[-1]`.
    pub threads_per_rank: Option<Vec<i32>>,
    /// Absolute shell-classification tolerance; defaults to `1e-3`.
    pub atol: Option<f64>,
    /// Relative shell-classification tolerance; defaults to `1e-5`.
    pub rtol: Option<f64>,
    /// `"random"` or `"systematic"`; defaults to `"random"`.
    pub mode: Option<String>,
    /// RNG seed for random mode and per-worker seed derivation; defaults to `0`.
    pub seed: Option<u64>,
}

fn default_which() -> WhichSelector {
    WhichSelector::All(AllMarker::default())
}

/// The fully normalized, immutable bundle handed to `worker::pair_sqs_iteration`.
#[derive(Debug, Clone)]
pub struct IterationSettings {
    /// The parent structure.
    pub structure: Structure,
    /// Precomputed pairwise shell classification.
    pub shell_matrix: ShellMatrix,
    /// Distinct species in the full configuration, sorted by Z. Index into
    /// this is the species ordinal used throughout the generator/SRO kernel.
    pub species_palette: Vec<Species>,
    /// Full-length (N) species ordinal per site, frozen sites already final.
    pub parent_numbers: Vec<usize>,
    /// Mutable site indices, W.
    pub sublattice: Vec<usize>,
    /// Per-species-ordinal counts over W (the composition to place on W).
    pub counts: Vec<usize>,
    /// Target SRO tensor.
    pub target_objective: SroTensor,
    /// `K×K` `{0,1}` species-pair mask.
    pub pair_weights: Vec<Vec<i32>>,
    /// Shell index → weight in the objective.
    pub shell_weights: IndexMap<i32, f64>,
    /// Iteration budget (-1 means "run to completion", systematic only).
    pub iterations: i64,
    /// Result cache capacity, `K_max`.
    pub max_output_configurations: usize,
    /// Shell reference distances, `[0, d_1, ..., d_M]`.
    pub shell_distances: Vec<f64>,
    /// Threads to spawn per rank.
    pub threads_per_rank: Vec<i32>,
    /// Absolute shell-classification tolerance.
    pub atol: f64,
    /// Relative shell-classification tolerance.
    pub rtol: f64,
    /// Search mode.
    pub mode: Mode,
    /// RNG seed.
    pub seed: u64,
}

/// Validate `raw` into an `IterationSettings`, or fail with the
/// parameter-tagged `BadSettings`/`GeometryError` describing the first
/// violation found.
pub fn validate(raw: RawSettings) -> Result<IterationSettings> {
    let atol = read_atol(raw.atol)?;
    let rtol = read_rtol(raw.rtol)?;
    let mode = read_mode(raw.mode)?;
    let structure = read_structure(raw.structure)?;
    let sublattice = read_sublattice(&structure, &raw.which)?;
    let (species_palette, parent_numbers, counts) =
        read_composition(&structure, &raw.composition, &sublattice)?;
    let iterations = read_iterations(raw.iterations, mode)?;
    let max_output_configurations = read_max_output_configurations(raw.max_output_configurations)?;
    let shell_distances = read_shell_distances(raw.shell_distances, &structure, atol, rtol)?;
    let shell_weights = read_shell_weights(raw.shell_weights, shell_distances.len() - 1)?;
    let pair_weights = read_pair_weights(raw.pair_weights, species_palette.len())?;
    let target_objective = read_target_objective(raw.target_objective, &shell_weights, species_palette.len())?;
    let threads_per_rank = read_threads_per_rank(raw.threads_per_rank)?;
    let seed = raw.seed.unwrap_or(0);

    let shell_matrix = ShellMatrix::build(&structure, &shell_distances, atol, rtol)?;

    debug!(atol, rtol, ?mode, seed, "validated iteration settings");

    Ok(IterationSettings {
        structure,
        shell_matrix,
        species_palette,
        parent_numbers,
        sublattice,
        counts,
        target_objective,
        pair_weights,
        shell_weights,
        iterations,
        max_output_configurations,
        shell_distances,
        threads_per_rank,
        atol,
        rtol,
        mode,
        seed,
    })
}

fn read_atol(atol: Option<f64>) -> Result<f64> {
    let atol = atol.unwrap_or(1e-3);
    check_non_negative(atol, "atol")?;
    Ok(atol)
}

fn read_rtol(rtol: Option<f64>) -> Result<f64> {
    let rtol = rtol.unwrap_or(1e-5);
    check_non_negative(rtol, "rtol")?;
    Ok(rtol)
}

fn read_mode(mode: Option<String>) -> Result<Mode> {
    match mode.as_deref() {
        None | Some("random") => Ok(Mode::Random),
        Some("systematic") => Ok(Mode::Systematic),
        Some(other) => Err(SqsError::BadSettings {
            parameter: "mode".to_string(),
            reason: format!("must be 'random' or 'systematic', got '{other}'"),
        }),
    }
}

fn read_structure(input: StructureInput) -> Result<Structure> {
    match input {
        StructureInput::Native(s) => Ok(s),
        StructureInput::Record(record) => structure_from_record(record),
    }
}

fn structure_from_record(record: StructureRecord) -> Result<Structure> {
    let lattice = Lattice::from_rows(record.lattice);
    let pbc = record.pbc.unwrap_or([true, true, true]);
    let mut species = Vec::with_capacity(record.species.len());
    for symbol in &record.species {
        let sp = Species::from_symbol(symbol).ok_or_else(|| SqsError::BadSettings {
            parameter: "structure".to_string(),
            reason: format!("unknown species symbol '{symbol}'"),
        })?;
        species.push(sp);
    }
    Structure::try_new(lattice, species, record.coords, pbc)
}

fn read_sublattice(structure: &Structure, which: &WhichSelector) -> Result<Vec<usize>> {
    let n = structure.num_atoms();
    let mut indices: Vec<usize> = match which {
        WhichSelector::All(_) => (0..n).collect(),
        WhichSelector::Symbol(symbol) => {
            let target = Species::from_symbol(symbol).ok_or_else(|| SqsError::BadSettings {
                parameter: "which".to_string(),
                reason: format!("unknown species symbol '{symbol}'"),
            })?;
            (0..n).filter(|&i| structure.species[i] == target).collect()
        }
        WhichSelector::Indices(list) => {
            let mut seen = BTreeSet::new();
            for &idx in list {
                if idx >= n {
                    return Err(SqsError::BadSettings {
                        parameter: "which".to_string(),
                        reason: format!("site index {idx} out of bounds ({n} sites)"),
                    });
                }
                seen.insert(idx);
            }
            seen.into_iter().collect()
        }
    };
    indices.sort_unstable();
    if indices.len() < 2 {
        return Err(SqsError::BadSettings {
            parameter: "which".to_string(),
            reason: format!("sublattice must select at least 2 sites, got {}", indices.len()),
        });
    }
    Ok(indices)
}

fn read_composition(
    structure: &Structure,
    composition: &IndexMap<String, i64>,
    sublattice: &[usize],
) -> Result<(Vec<Species>, Vec<usize>, Vec<usize>)> {
    let frozen_species: BTreeSet<Species> = (0..structure.num_atoms())
        .filter(|i| !sublattice.contains(i))
        .map(|i| structure.species[i])
        .collect();

    let mut composition_species = Vec::new();
    let mut amounts = Vec::new();
    for (symbol, &amount) in composition {
        let sp = Species::from_symbol(symbol).ok_or_else(|| SqsError::BadSettings {
            parameter: "composition".to_string(),
            reason: format!("unknown species '{symbol}'"),
        })?;
        if amount < 0 {
            return Err(SqsError::BadSettings {
                parameter: "composition".to_string(),
                reason: format!("count for '{symbol}' must be non-negative, got {amount}"),
            });
        }
        composition_species.push(sp);
        amounts.push(amount as usize);
    }

    let total: usize = amounts.iter().sum();
    if total != sublattice.len() {
        return Err(SqsError::BadSettings {
            parameter: "composition".to_string(),
            reason: format!(
                "counts sum to {total}, but the sublattice has {} sites",
                sublattice.len()
            ),
        });
    }

    let mut all_species: BTreeSet<Species> = frozen_species;
    all_species.extend(composition_species.iter().copied());
    let palette: Vec<Species> = all_species.into_iter().collect();

    let ordinal_of = |sp: Species| -> usize {
        palette.iter().position(|&p| p == sp).expect("species present in palette by construction")
    };

    let mut counts = vec![0usize; palette.len()];
    for (sp, amount) in composition_species.iter().zip(&amounts) {
        counts[ordinal_of(*sp)] += amount;
    }

    // Sites in the sublattice are overwritten by the generator before
    // scoring, so their parent ordinal is a placeholder; only frozen sites
    // need a real one, and those species are guaranteed to be in the palette.
    let mut parent_numbers = vec![0usize; structure.num_atoms()];
    for i in 0..structure.num_atoms() {
        if !sublattice.contains(&i) {
            parent_numbers[i] = ordinal_of(structure.species[i]);
        }
    }

    Ok((palette, parent_numbers, counts))
}

fn read_iterations(iterations: Option<i64>, mode: Mode) -> Result<i64> {
    let iterations = match iterations {
        Some(v) => v,
        None => match mode {
            Mode::Random => 100_000,
            Mode::Systematic => -1,
        },
    };
    match mode {
        Mode::Systematic if iterations == -1 => Ok(iterations),
        _ if iterations >= 0 => Ok(iterations),
        _ => Err(SqsError::BadSettings {
            parameter: "iterations".to_string(),
            reason: format!("must be non-negative (or -1 in systematic mode), got {iterations}"),
        }),
    }
}

fn read_max_output_configurations(value: Option<i64>) -> Result<usize> {
    let value = value.unwrap_or(10);
    if value <= 0 {
        return Err(SqsError::BadSettings {
            parameter: "max_output_configurations".to_string(),
            reason: format!("must be positive, got {value}"),
        });
    }
    Ok(value as usize)
}

fn read_shell_distances(
    shell_distances: Option<Vec<f64>>,
    structure: &Structure,
    atol: f64,
    rtol: f64,
) -> Result<Vec<f64>> {
    let mut distances = match shell_distances {
        Some(d) => d,
        None => return shells::default_shell_distances(structure, atol, rtol),
    };

    if distances.first() != Some(&0.0) {
        distances.insert(0, 0.0);
    }
    if distances.len() < 2 {
        return Err(SqsError::BadSettings {
            parameter: "shell_distances".to_string(),
            reason: "must have length >= 2 including the leading 0".to_string(),
        });
    }
    for pair in distances.windows(2) {
        if pair[1] <= pair[0] {
            return Err(SqsError::BadSettings {
                parameter: "shell_distances".to_string(),
                reason: "must be strictly increasing".to_string(),
            });
        }
    }
    for &d in &distances[1..] {
        if d <= 0.0 {
            return Err(SqsError::BadSettings {
                parameter: "shell_distances".to_string(),
                reason: format!("entries after the leading 0 must be positive, got {d}"),
            });
        }
    }
    Ok(distances)
}

fn read_shell_weights(shell_weights: Option<IndexMap<i32, f64>>, num_shells: usize) -> Result<IndexMap<i32, f64>> {
    match shell_weights {
        Some(weights) => {
            for (&shell, &w) in &weights {
                if shell < 1 || shell as usize > num_shells {
                    return Err(SqsError::BadSettings {
                        parameter: "shell_weights".to_string(),
                        reason: format!("shell index {shell} out of range [1, {num_shells}]"),
                    });
                }
                if w <= 0.0 {
                    return Err(SqsError::BadSettings {
                        parameter: "shell_weights".to_string(),
                        reason: format!("weight for shell {shell} must be positive, got {w}"),
                    });
                }
            }
            Ok(weights)
        }
        None => {
            let mut weights = IndexMap::new();
            for s in 1..=num_shells.min(6) {
                weights.insert(s as i32, 1.0 / s as f64);
            }
            Ok(weights)
        }
    }
}

fn read_pair_weights(pair_weights: Option<Vec<Vec<i32>>>, k: usize) -> Result<Vec<Vec<i32>>> {
    match pair_weights {
        Some(matrix) => {
            if matrix.len() != k || matrix.iter().any(|row| row.len() != k) {
                return Err(SqsError::BadSettings {
                    parameter: "pair_weights".to_string(),
                    reason: format!("must be a {k}x{k} matrix"),
                });
            }
            for a in 0..k {
                for b in 0..k {
                    if matrix[a][b] < 0 {
                        return Err(SqsError::BadSettings {
                            parameter: "pair_weights".to_string(),
                            reason: "entries must be non-negative".to_string(),
                        });
                    }
                    if matrix[a][b] != matrix[b][a] {
                        return Err(SqsError::BadSettings {
                            parameter: "pair_weights".to_string(),
                            reason: "matrix must be symmetric".to_string(),
                        });
                    }
                }
            }
            Ok(matrix)
        }
        None => Ok(crate::sro::default_pair_weights(k)),
    }
}

fn read_target_objective(
    input: TargetObjectiveInput,
    shell_weights: &IndexMap<i32, f64>,
    k: usize,
) -> Result<SroTensor> {
    let mut shells: Vec<i32> = shell_weights.keys().copied().collect();
    shells.sort_unstable();

    let mut tensor = SroTensor::zeros(shells.clone(), k);
    match input {
        TargetObjectiveInput::Scalar(v) => {
            for s_pos in 0..shells.len() {
                for a in 0..k {
                    for b in 0..k {
                        tensor.set(s_pos, a, b, v);
                    }
                }
            }
        }
        TargetObjectiveInput::Matrix(matrix) => {
            validate_square_symmetric(&matrix, k, "target_objective")?;
            for s_pos in 0..shells.len() {
                for a in 0..k {
                    for b in 0..k {
                        tensor.set(s_pos, a, b, matrix[a][b]);
                    }
                }
            }
        }
        TargetObjectiveInput::Tensor(full) => {
            if full.len() != shells.len() {
                return Err(SqsError::BadSettings {
                    parameter: "target_objective".to_string(),
                    reason: format!(
                        "tensor has {} shell slices but shell_weights selects {}",
                        full.len(),
                        shells.len()
                    ),
                });
            }
            for (s_pos, slice) in full.iter().enumerate() {
                validate_square_symmetric(slice, k, "target_objective")?;
                for a in 0..k {
                    for b in 0..k {
                        tensor.set(s_pos, a, b, slice[a][b]);
                    }
                }
            }
        }
    }
    Ok(tensor)
}

fn validate_square_symmetric(matrix: &[Vec<f64>], k: usize, parameter: &str) -> Result<()> {
    if matrix.len() != k || matrix.iter().any(|row| row.len() != k) {
        return Err(SqsError::BadSettings {
            parameter: parameter.to_string(),
            reason: format!("must be a {k}x{k} matrix"),
        });
    }
    for a in 0..k {
        for b in 0..k {
            check_in_range(matrix[a][b], -1.0e12, 1.0e12, parameter)?;
            if (matrix[a][b] - matrix[b][a]).abs() > 1e-9 {
                return Err(SqsError::BadSettings {
                    parameter: parameter.to_string(),
                    reason: "must be symmetric in its last two axes".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn read_threads_per_rank(threads_per_rank: Option<Vec<i32>>) -> Result<Vec<i32>> {
    let threads = threads_per_rank.unwrap_or_else(|| vec![-1]);
    if threads.is_empty() {
        return Err(SqsError::BadSettings {
            parameter: "threads_per_rank".to_string(),
            reason: "must have at least one rank".to_string(),
        });
    }
    for &t in &threads {
        if t != -1 && t < 1 {
            return Err(SqsError::BadSettings {
                parameter: "threads_per_rank".to_string(),
                reason: format!("each entry must be -1 or >= 1, got {t}"),
            });
        }
    }
    check_positive_usize(threads.len(), "threads_per_rank")?;
    Ok(threads)
}
