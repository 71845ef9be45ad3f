//! Parallel worker pool: drives the generator/SRO-kernel/objective/cache
//! pipeline across threads and (notionally) ranks, and merges the results.
//!
//! A distributed deployment coordinates ranks over an external message layer
//! (out of scope here, spec.md §4.F): the interface this module honors is
//! that the total work is partitioned across every thread of every rank, and
//! the final cache merge is a tree-reduce. With no message layer present,
//! ranks are simply run one after another in-process, each owning its own
//! `rayon` thread pool sized by `threads_per_rank[rank]`.

use crate::cache::{ResultCache, SQSResult};
use crate::generator::{derive_seed, RandomGenerator, SystematicGenerator};
use crate::objective;
use crate::settings::{IterationSettings, Mode};
use crate::sro;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Shared cooperative-cancellation flag. Workers poll this between
/// iterations; once set, each worker flushes its local cache and returns.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A fresh, not-yet-cancelled token.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation; observed by running workers on their next poll.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Run the full search described by `settings` to completion. Equivalent to
/// [`pair_sqs_iteration_cancellable`] with a token that is never cancelled.
pub fn pair_sqs_iteration(settings: &IterationSettings) -> (Vec<SQSResult>, HashMap<u32, Vec<f64>>) {
    pair_sqs_iteration_cancellable(settings, &CancellationToken::new())
}

/// Run the search, honoring `cancel`: if set at any point, every worker
/// flushes its local cache and returns promptly, yielding the best partial
/// results seen so far rather than the full search.
pub fn pair_sqs_iteration_cancellable(
    settings: &IterationSettings,
    cancel: &CancellationToken,
) -> (Vec<SQSResult>, HashMap<u32, Vec<f64>>) {
    let thread_counts: Vec<usize> = settings
        .threads_per_rank
        .iter()
        .map(|&t| resolve_thread_count(t))
        .collect();
    let total_workers: u64 = thread_counts.iter().map(|&t| t as u64).sum();

    let mut global_cache = ResultCache::new(settings.max_output_configurations);
    let mut timings: HashMap<u32, Vec<f64>> = HashMap::new();
    let mut worker_offset: u64 = 0;

    for (rank, &threads) in thread_counts.iter().enumerate() {
        info!(rank, threads, total_workers, "starting rank");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("failed to build rayon thread pool");

        let rank_results: Vec<(ResultCache, Vec<f64>, u32)> = pool.install(|| {
            (0..threads)
                .into_par_iter()
                .map(|local_thread_id| {
                    let global_worker_index = worker_offset + local_thread_id as u64;
                    let (cache, thread_timings) = run_worker(
                        settings,
                        rank as u32,
                        local_thread_id as u32,
                        global_worker_index,
                        total_workers,
                        cancel,
                    );
                    (cache, thread_timings, global_worker_index as u32)
                })
                .collect()
        });

        for (cache, thread_timings, worker_id) in rank_results {
            debug!(worker_id, produced = cache.len(), "merging worker cache");
            global_cache.merge(cache);
            timings.insert(worker_id, thread_timings);
        }

        worker_offset += threads as u64;
        if cancel.is_cancelled() {
            warn!(rank, "cancellation observed, stopping before remaining ranks");
            break;
        }
    }

    if cancel.is_cancelled() {
        warn!(results = global_cache.len(), "search cancelled, returning partial results");
    } else {
        info!(results = global_cache.len(), "search completed");
    }

    (global_cache.drain(), timings)
}

fn resolve_thread_count(spec: i32) -> usize {
    if spec == -1 {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    } else {
        spec.max(1) as usize
    }
}

/// Divide `total` items as evenly as possible across `num_workers` workers;
/// the first `total % num_workers` workers get one extra item.
fn divide_iterations(total: u64, num_workers: u64, worker_index: u64) -> u64 {
    if num_workers == 0 {
        return 0;
    }
    let base = total / num_workers;
    let remainder = total % num_workers;
    base + u64::from(worker_index < remainder)
}

/// The interval (in configurations processed) after which the next wall-clock
/// sample is taken, doubling each time: 1, 2, 4, 8, …
fn next_sample_interval(current: u64) -> u64 {
    current.saturating_mul(2).max(1)
}

fn run_worker(
    settings: &IterationSettings,
    rank: u32,
    thread_id: u32,
    global_worker_index: u64,
    total_workers: u64,
    cancel: &CancellationToken,
) -> (ResultCache, Vec<f64>) {
    let mut local_cache = ResultCache::new(settings.max_output_configurations);
    let mut timings = Vec::new();

    let seed = derive_seed(settings.seed, rank, thread_id);
    let k = settings.species_palette.len();

    let mut processed: u64 = 0;
    let mut next_sample: u64 = 1;
    let mut sample_start = Instant::now();
    let mut processed_at_sample_start: u64 = 0;

    let mut score_one = |configuration: sro::Configuration| {
        let alpha = sro::pair_analysis(
            &settings.shell_matrix,
            &configuration,
            k,
            &settings.shell_weights,
            &settings.pair_weights,
        );
        let objective = objective::score(&alpha, &settings.target_objective, &settings.shell_weights);
        local_cache.offer(configuration, alpha, objective);
        processed += 1;
        if processed >= next_sample {
            let elapsed = sample_start.elapsed().as_secs_f64() * 1000.0;
            let configs = (processed - processed_at_sample_start).max(1);
            timings.push(elapsed / configs as f64);
            processed_at_sample_start = processed;
            next_sample = processed + next_sample_interval(next_sample);
            sample_start = Instant::now();
        }
    };

    match settings.mode {
        Mode::Systematic => {
            let per_worker_limit = if settings.iterations < 0 {
                None
            } else {
                Some(divide_iterations(settings.iterations as u64, total_workers, global_worker_index))
            };
            let mut generator = SystematicGenerator::new(
                settings.counts.clone(),
                settings.sublattice.clone(),
                settings.parent_numbers.clone(),
                global_worker_index,
                total_workers,
                per_worker_limit,
            );
            while let Some((configuration, _rank_id)) = generator.next_configuration() {
                if cancel.is_cancelled() {
                    break;
                }
                score_one(configuration);
            }
        }
        Mode::Random => {
            let worker_iterations = divide_iterations(settings.iterations as u64, total_workers, global_worker_index);
            let mut generator = RandomGenerator::new(
                settings.counts.clone(),
                settings.sublattice.clone(),
                settings.parent_numbers.clone(),
                seed,
                worker_iterations,
            );
            while let Some((configuration, _trial)) = generator.next_configuration() {
                if cancel.is_cancelled() {
                    break;
                }
                score_one(configuration);
            }
        }
    }

    (local_cache, timings)
}
