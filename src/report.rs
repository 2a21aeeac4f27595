//! Progress and result notifications.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::keyspace::Keyspace;
use crate::search::{FoundKey, SearchReport, SearchResult};
use crate::validator::Recovered;

/// Receives search events. `progress` is called from worker threads.
pub trait Reporter: Sync {
    fn phase_started(&self, _keyspace: &Keyspace) {}

    fn progress(&self, _length: usize, _evaluated: u64) {}

    fn phase_finished(&self, _length: usize, _report: &SearchReport) {}

    fn key_found(&self, _found: &FoundKey, _samples: &[Recovered]) {}

    fn exhausted(&self, _max_length: usize) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Reporter for Silent {}

/// Logs phase events and draws a progress bar for the running phase.
pub struct ConsoleReporter {
    /// Bar of the running phase, replaced when a phase starts.
    bar: Mutex<Option<ProgressBar>>,
    show_bar: bool,
}

impl ConsoleReporter {
    pub fn new(show_bar: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            show_bar,
        }
    }

    fn current_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|slot| slot.clone())
    }
}

fn describe_size(keyspace: &Keyspace) -> String {
    match keyspace.size() {
        Some(n) => n.to_string(),
        None => format!("{}^{}", keyspace.radix(), keyspace.length()),
    }
}

impl Reporter for ConsoleReporter {
    fn phase_started(&self, keyspace: &Keyspace) {
        info!(
            "brute-forcing keys of length {} ({} candidates)",
            keyspace.length(),
            describe_size(keyspace)
        );
        if !self.show_bar {
            return;
        }
        let len = keyspace
            .size()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(u64::MAX);
        let bar = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        ) {
            bar.set_style(style);
        }
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn progress(&self, length: usize, evaluated: u64) {
        if let Some(bar) = self.current_bar() {
            bar.set_position(evaluated);
            debug!("tested {evaluated} keys at length {length}");
        } else {
            info!("tested {evaluated} keys at length {length}");
        }
    }

    fn phase_finished(&self, length: usize, report: &SearchReport) {
        if let Some(bar) = self.bar.lock().ok().and_then(|mut slot| slot.take()) {
            bar.finish_and_clear();
        }
        match report.result {
            SearchResult::Found(_) => info!(
                "length {length}: key found after {} candidates in {:.2?}",
                report.evaluated, report.elapsed
            ),
            SearchResult::NotFound => info!(
                "no valid key at length {length} ({} candidates, {} chunks, {:.2?})",
                report.evaluated, report.chunks_dispatched, report.elapsed
            ),
            SearchResult::Cancelled => info!(
                "length {length} cancelled after {} candidates",
                report.evaluated
            ),
        }
    }

    fn key_found(&self, found: &FoundKey, samples: &[Recovered]) {
        info!("key found: {}", hex::encode(found.key));
        for s in samples {
            debug!("{} -> {}", s.encoded, s.plaintext);
        }
    }

    fn exhausted(&self, max_length: usize) {
        info!("exhausted all key lengths up to {max_length}");
    }
}
