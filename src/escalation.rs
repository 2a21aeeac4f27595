//! Tries every key length in turn until one yields a key.
//!
//! Phases are strictly sequential: a length's pool is gone before the next
//! length starts, and nothing but the length counter carries over.

use std::ops::RangeInclusive;
use std::time::Instant;

use log::warn;

use crate::cipher::BlockCipherEngine;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::keyspace::Keyspace;
use crate::predicate::Acceptance;
use crate::report::Reporter;
use crate::search::{CancelToken, FoundKey, ParallelSearch, SearchResult};
use crate::validator::{Recovered, Validator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found {
        key: FoundKey,
        samples: Vec<Recovered>,
    },
    /// Every length up to the maximum was searched without a match.
    Exhausted,
    /// Deadline or cancel token fired during the phase for `length`.
    Cancelled { length: usize },
}

pub struct Escalation<E, P> {
    config: SearchConfig,
    validator: Validator<E, P>,
    cancel: CancelToken,
}

impl<E: BlockCipherEngine, P: Acceptance> Escalation<E, P> {
    /// Fails if the configuration is invalid.
    pub fn new(config: SearchConfig, validator: Validator<E, P>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            validator,
            cancel: CancelToken::new(),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Token that stops the escalation from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Lengths searched, in order. A maximum of 0 means the single empty candidate.
    pub fn lengths(&self) -> RangeInclusive<usize> {
        match self.config.max_length {
            0 => 0..=0,
            max => 1..=max,
        }
    }

    pub fn run<R: Reporter>(&self, reporter: &R) -> Result<Outcome> {
        let deadline = self.config.timeout.map(|t| Instant::now() + t);
        let driver = ParallelSearch::from_config(&self.config);

        for length in self.lengths() {
            let keyspace = Keyspace::new(length)?;
            reporter.phase_started(&keyspace);

            let report = driver.search(&keyspace, &self.validator, reporter, &self.cancel, deadline)?;
            reporter.phase_finished(length, &report);

            match report.result {
                SearchResult::Found(key) => {
                    let samples = self.validator.reveal(&key.key).unwrap_or_else(|| {
                        warn!("found key no longer decrypts every sample");
                        Vec::new()
                    });
                    reporter.key_found(&key, &samples);
                    return Ok(Outcome::Found { key, samples });
                }
                SearchResult::Cancelled => return Ok(Outcome::Cancelled { length }),
                SearchResult::NotFound => {}
            }
        }

        reporter.exhausted(self.config.max_length);
        Ok(Outcome::Exhausted)
    }
}
