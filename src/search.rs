//! Parallel search over one keyspace.
//!
//! Candidate indices are cut into fixed-size chunks by a lazy queue that the
//! rayon pool pulls from. The first worker to see an accepted key raises the
//! stop flag; the queue then hands out nothing more and the other workers
//! drop out at their next candidate.
//!
//! A panic while evaluating one candidate is caught and that candidate
//! skipped. Panic messages from pool threads go to the `debug` log instead of
//! stderr.

use std::ops::RangeInclusive;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Once};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::cipher::{BlockCipherEngine, Key};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::keyspace::Keyspace;
use crate::predicate::Acceptance;
use crate::report::Reporter;
use crate::validator::Validator;

/// A candidate every sample accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundKey {
    /// Bytes as enumerated.
    pub candidate: Vec<u8>,
    /// Zero-padded key actually used for decryption.
    pub key: Key,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Found(FoundKey),
    NotFound,
    /// Stopped by a cancel token or the deadline before the space was exhausted.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct SearchReport {
    pub result: SearchResult,
    /// Candidates evaluated, including any whose evaluation panicked.
    pub evaluated: u64,
    pub chunks_dispatched: u64,
    pub elapsed: Duration,
}

/// Shared flag a caller can raise to stop a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
pub struct ParallelSearch {
    pub workers: usize,
    pub chunk_size: u64,
    pub progress_every: u64,
}

impl ParallelSearch {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            workers: config.workers,
            chunk_size: config.chunk_size,
            progress_every: config.progress_every,
        }
    }

    /// Searches `keyspace` on a fresh pool of `self.workers` threads.
    ///
    /// The pool lives only for this call. Only pool creation can fail.
    pub fn search<E, P, R>(
        &self,
        keyspace: &Keyspace,
        validator: &Validator<E, P>,
        reporter: &R,
        cancel: &CancelToken,
        deadline: Option<Instant>,
    ) -> Result<SearchReport>
    where
        E: BlockCipherEngine,
        P: Acceptance,
        R: Reporter,
    {
        let start = Instant::now();
        let length = keyspace.length();
        let progress_every = self.progress_every.max(1);

        quiet_worker_panics();
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(move |i| format!("{WORKER_PREFIX}{length}-{i}"))
            .build()?;

        let stop = AtomicBool::new(false);
        let interrupted = AtomicBool::new(false);
        let evaluated = AtomicU64::new(0);
        let dispatched = AtomicU64::new(0);

        let queue = ChunkQueue {
            next: Some(0),
            last: keyspace.last(),
            chunk: u128::from(self.chunk_size.max(1)),
            stop: &stop,
            interrupted: &interrupted,
            cancel,
            deadline,
            dispatched: &dispatched,
        };

        let found = pool.install(|| {
            queue.par_bridge().find_map_any(|chunk: RangeInclusive<u128>| {
                let mut candidates = keyspace.range_inclusive(*chunk.start(), *chunk.end());
                while let Some(candidate) = candidates.next_candidate() {
                    if stop.load(Ordering::Relaxed) || cancel.is_cancelled() {
                        return None;
                    }

                    let verdict =
                        panic::catch_unwind(AssertUnwindSafe(|| validator.evaluate(candidate)));

                    let n = evaluated.fetch_add(1, Ordering::Relaxed) + 1;
                    if n % progress_every == 0 {
                        reporter.progress(length, n);
                    }

                    match verdict {
                        Ok(Some(key)) => {
                            stop.store(true, Ordering::Release);
                            return Some(FoundKey {
                                candidate: candidate.to_vec(),
                                key,
                            });
                        }
                        Ok(None) => {}
                        Err(_) => {
                            debug!("evaluation of {} panicked, skipped", hex::encode(candidate));
                        }
                    }
                }
                None
            })
        });
        drop(pool);

        let result = match found {
            Some(key) => SearchResult::Found(key),
            None if interrupted.load(Ordering::Acquire) || cancel.is_cancelled() => {
                SearchResult::Cancelled
            }
            None => SearchResult::NotFound,
        };

        Ok(SearchReport {
            result,
            evaluated: evaluated.load(Ordering::Acquire),
            chunks_dispatched: dispatched.load(Ordering::Acquire),
            elapsed: start.elapsed(),
        })
    }
}

const WORKER_PREFIX: &str = "keysearch-";

fn is_worker_thread() -> bool {
    thread::current()
        .name()
        .is_some_and(|name| name.starts_with(WORKER_PREFIX))
}

/// Installs, once per process, a panic hook that logs panics raised on search
/// pool threads at `debug` and hands every other panic to the previous hook.
fn quiet_worker_panics() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if is_worker_thread() {
                debug!("worker panic: {info}");
            } else {
                previous(info);
            }
        }));
    });
}

/// Lazily yields index ranges until the space is covered or the search stops.
struct ChunkQueue<'a> {
    /// First index of the next chunk; `None` once the space is handed out.
    next: Option<u128>,
    last: u128,
    chunk: u128,
    stop: &'a AtomicBool,
    interrupted: &'a AtomicBool,
    cancel: &'a CancelToken,
    deadline: Option<Instant>,
    dispatched: &'a AtomicU64,
}

impl Iterator for ChunkQueue<'_> {
    type Item = RangeInclusive<u128>;

    fn next(&mut self) -> Option<RangeInclusive<u128>> {
        let start = self.next?;
        if self.stop.load(Ordering::Acquire) {
            return None;
        }
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        if expired || self.cancel.is_cancelled() {
            if expired {
                warn!("deadline reached, stopping search");
            }
            self.interrupted.store(true, Ordering::Release);
            self.stop.store(true, Ordering::Release);
            return None;
        }

        let end = start.saturating_add(self.chunk - 1).min(self.last);
        self.next = if end == self.last { None } else { Some(end + 1) };
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        Some(start..=end)
    }
}
