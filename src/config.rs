//! Search parameters.

use std::time::Duration;

use crate::cipher::KEY_SIZE;
use crate::error::ConfigError;

pub const DEFAULT_MAX_LENGTH: usize = 4;
pub const DEFAULT_CHUNK_SIZE: u64 = 1000;
pub const DEFAULT_PROGRESS_EVERY: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Longest candidate tried. 0 tries only the empty candidate.
    pub max_length: usize,
    pub workers: usize,
    /// Candidates per dispatched chunk.
    pub chunk_size: u64,
    /// Candidates between progress notifications.
    pub progress_every: u64,
    /// Overall budget for the whole escalation.
    pub timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            workers: num_cpus::get(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress_every: DEFAULT_PROGRESS_EVERY,
            timeout: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunk);
        }
        if self.progress_every == 0 {
            return Err(ConfigError::ZeroProgressInterval);
        }
        if self.max_length > KEY_SIZE {
            return Err(ConfigError::KeyTooLong(self.max_length, KEY_SIZE));
        }
        Ok(())
    }
}
