//! Brute-force recovery of short AES keys.
//!
//! Keys of length 1, 2, ... are zero-padded to 16 bytes and tried against a
//! fixed set of ECB ciphertexts. A key wins when every sample unpads to
//! plaintext the acceptance predicate accepts (by default, a digit string).

pub mod cipher;
pub mod config;
pub mod error;
pub mod escalation;
pub mod keyspace;
pub mod predicate;
pub mod report;
pub mod samples;
pub mod search;
pub mod validator;

pub use cipher::{Aes128Ecb, BlockCipherEngine, Key, KEY_SIZE};
pub use config::SearchConfig;
pub use error::{ConfigError, DecodeError, KeyspaceError, PaddingError, Result, SolverError};
pub use escalation::{Escalation, Outcome};
pub use keyspace::{Candidates, Keyspace};
pub use predicate::{Acceptance, DigitString};
pub use report::{ConsoleReporter, Reporter, Silent};
pub use samples::{Sample, SampleSet};
pub use search::{CancelToken, FoundKey, ParallelSearch, SearchReport, SearchResult};
pub use validator::{Recovered, Validator};
