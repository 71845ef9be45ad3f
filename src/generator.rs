//! Configuration generators: systematic enumeration and random sampling
//! over the distinct multiset permutations of a composition on a sublattice.
//!
//! Both generators honor the sublattice: sites outside `W` always carry the
//! parent structure's species; only `W` is mutated. Each worker owns one
//! generator instance, seeded/strided per spec.md §4.D so the overall search
//! is deterministic given `(settings, seed, thread_count)`.

use crate::sro::Configuration;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Multinomial coefficient `|counts|! / Π counts[k]!`, the number of
/// distinct permutations of a multiset with these per-species counts.
pub fn multinomial_coefficient(counts: &[usize]) -> u128 {
    let total: usize = counts.iter().sum();
    let mut numerator = factorial(total);
    for &c in counts {
        numerator /= factorial(c);
    }
    numerator
}

fn factorial(n: usize) -> u128 {
    (1..=n as u128).product()
}

/// The `rank`-th distinct permutation (0-indexed, lexicographic by species
/// ordinal) of the multiset described by `counts`.
fn unrank_permutation(counts: &[usize], mut rank: u128) -> Vec<usize> {
    let mut remaining = counts.to_vec();
    let len: usize = counts.iter().sum();
    let mut result = Vec::with_capacity(len);

    for _ in 0..len {
        let mut chosen = None;
        for species in 0..remaining.len() {
            if remaining[species] == 0 {
                continue;
            }
            remaining[species] -= 1;
            let block = multinomial_coefficient(&remaining);
            if rank < block {
                chosen = Some(species);
                break;
            }
            rank -= block;
            remaining[species] += 1;
        }
        result.push(chosen.expect("rank out of range for this multiset"));
    }
    result
}

fn place_on_sublattice(parent: &[usize], sublattice: &[usize], sub_config: &[usize]) -> Configuration {
    let mut full = parent.to_vec();
    for (pos, &site) in sublattice.iter().enumerate() {
        full[site] = sub_config[pos];
    }
    full
}

/// Mix a global seed with a rank and thread id into a per-worker 64-bit RNG
/// seed (splitmix64-style avalanche, so adjacent `(rank, thread_id)` pairs
/// don't produce correlated streams).
pub fn derive_seed(global_seed: u64, rank: u32, thread_id: u32) -> u64 {
    let mut x = global_seed
        ^ (rank as u64).wrapping_mul(0x9E3779B97F4A7C15)
        ^ (thread_id as u64).wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^= x >> 31;
    x
}

/// Exhaustive enumeration of distinct multiset permutations, striped across
/// workers: worker `t` of `T` visits ranks `t, t+T, t+2T, …`.
pub struct SystematicGenerator {
    counts: Vec<usize>,
    total: u128,
    stride: u128,
    next_rank: u128,
    limit: Option<u128>,
    produced: u128,
    sublattice: Vec<usize>,
    parent: Vec<usize>,
}

impl SystematicGenerator {
    /// `worker_index`/`num_workers` define the stripe; `limit` caps the
    /// number of configurations this worker will produce (`None` = run to
    /// completion of this worker's stripe).
    pub fn new(
        counts: Vec<usize>,
        sublattice: Vec<usize>,
        parent: Vec<usize>,
        worker_index: u64,
        num_workers: u64,
        limit: Option<u64>,
    ) -> Self {
        let total = multinomial_coefficient(&counts);
        Self {
            counts,
            total,
            stride: num_workers.max(1) as u128,
            next_rank: worker_index as u128,
            limit: limit.map(|l| l as u128),
            produced: 0,
            sublattice,
            parent,
        }
    }

    /// Total number of distinct permutations of the underlying multiset
    /// (across all workers, not just this one's stripe).
    pub fn total_permutations(&self) -> u128 {
        self.total
    }

    /// Produce the next `(configuration, rank)` pair, or `None` once this
    /// worker's stripe (or its `limit`) is exhausted.
    pub fn next_configuration(&mut self) -> Option<(Configuration, u64)> {
        if self.next_rank >= self.total {
            return None;
        }
        if let Some(limit) = self.limit {
            if self.produced >= limit {
                return None;
            }
        }
        let rank = self.next_rank;
        let sub_config = unrank_permutation(&self.counts, rank);
        self.next_rank += self.stride;
        self.produced += 1;
        let full = place_on_sublattice(&self.parent, &self.sublattice, &sub_config);
        Some((full, rank as u64))
    }
}

/// Uniform sampling from the same multiset-permutation set via shuffling.
pub struct RandomGenerator {
    counts: Vec<usize>,
    rng: ChaCha8Rng,
    iterations: u64,
    produced: u64,
    sublattice: Vec<usize>,
    parent: Vec<usize>,
}

impl RandomGenerator {
    /// Build a generator that draws `iterations` random samples over the
    /// given `sublattice` sites, seeded for reproducibility.
    pub fn new(
        counts: Vec<usize>,
        sublattice: Vec<usize>,
        parent: Vec<usize>,
        seed: u64,
        iterations: u64,
    ) -> Self {
        Self {
            counts,
            rng: ChaCha8Rng::seed_from_u64(seed),
            iterations,
            produced: 0,
            sublattice,
            parent,
        }
    }

    /// Produce the next `(configuration, trial_count)` pair (1-based trial
    /// index), or `None` once this worker's `iterations` budget is spent.
    pub fn next_configuration(&mut self) -> Option<(Configuration, u64)> {
        if self.produced >= self.iterations {
            return None;
        }
        let mut base = Vec::with_capacity(self.sublattice.len());
        for (species, &count) in self.counts.iter().enumerate() {
            base.extend(std::iter::repeat(species).take(count));
        }
        base.shuffle(&mut self.rng);
        self.produced += 1;
        let full = place_on_sublattice(&self.parent, &self.sublattice, &base);
        Some((full, self.produced))
    }
}
