//! Candidate validation: a key is accepted when every sample decrypts to
//! well-padded plaintext the acceptance predicate likes.

use crate::cipher::{pad_key, Aes128Ecb, BlockCipherEngine, Key};
use crate::predicate::{Acceptance, DigitString};
use crate::samples::SampleSet;

pub struct Validator<E = Aes128Ecb, P = DigitString> {
    samples: SampleSet,
    engine: E,
    predicate: P,
}

/// One sample decrypted under a found key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered {
    pub encoded: String,
    /// Unpadded plaintext, whitespace trimmed.
    pub plaintext: String,
    pub marker: Option<String>,
}

impl Validator {
    pub fn new(samples: SampleSet) -> Self {
        Self::with_parts(samples, Aes128Ecb, DigitString)
    }
}

impl<E: BlockCipherEngine, P: Acceptance> Validator<E, P> {
    pub fn with_parts(samples: SampleSet, engine: E, predicate: P) -> Self {
        Self {
            samples,
            engine,
            predicate,
        }
    }

    /// Returns the zero-padded key if `candidate` satisfies every sample.
    ///
    /// Padding and predicate failures are ordinary rejections; all samples are
    /// unpadded before any plaintext is tested, and the first bad padding
    /// stops evaluation.
    pub fn evaluate(&self, candidate: &[u8]) -> Option<Key> {
        let key = pad_key(candidate);

        let mut plaintexts = Vec::with_capacity(self.samples.len());
        for sample in &self.samples {
            let decrypted = self.engine.decrypt(&key, &sample.ciphertext);
            let len = self.engine.remove_padding(&decrypted).ok()?.len();
            plaintexts.push((decrypted, len));
        }

        plaintexts
            .iter()
            .all(|(pt, len)| self.predicate.accepts(&pt[..*len]))
            .then_some(key)
    }

    /// Decrypts every sample with `key` for display. `None` if any sample no
    /// longer unpads, which cannot happen for a key `evaluate` accepted.
    pub fn reveal(&self, key: &Key) -> Option<Vec<Recovered>> {
        self.samples
            .iter()
            .map(|sample| {
                let decrypted = self.engine.decrypt(key, &sample.ciphertext);
                let plaintext = self.engine.remove_padding(&decrypted).ok()?;
                Some(Recovered {
                    encoded: sample.encoded.clone(),
                    plaintext: String::from_utf8_lossy(plaintext).trim().to_string(),
                    marker: sample.marker.clone(),
                })
            })
            .collect()
    }
}
