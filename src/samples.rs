//! Ciphertext samples the candidate key has to decrypt.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::cipher::BLOCK_SIZE;
use crate::error::DecodeError;

/// Samples the solver ships with: base64 ciphertext and the number each one
/// is expected to hold.
pub const DEFAULT_SAMPLES: &[(&str, &str)] = &[
    ("VFVSUmVrMVVWWGhQVkUwOQ==", "2728513142"),
    ("VG1wQmVFMVVWWGhQVkUwOQ==", "2630253647"),
    ("VDFSak1VNXFhM2hQVkUwOQ==", "2171951344"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Text the ciphertext was supplied as, kept for display.
    pub encoded: String,
    pub ciphertext: Vec<u8>,
    /// Diagnostic only, never compared against plaintext.
    pub marker: Option<String>,
}

/// Immutable set of samples shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Decodes base64 ciphertexts. Fails on the first malformed sample.
    pub fn decode<I, S, M>(pairs: I) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = (S, Option<M>)>,
        S: AsRef<str>,
        M: Into<String>,
    {
        let mut samples = Vec::new();
        for (index, (encoded, marker)) in pairs.into_iter().enumerate() {
            let encoded = encoded.as_ref().trim();
            let ciphertext = STANDARD
                .decode(encoded)
                .map_err(|source| DecodeError::Base64 { index, source })?;
            samples.push(Sample {
                encoded: encoded.to_string(),
                ciphertext,
                marker: marker.map(Into::into),
            });
        }
        Self::from_samples(samples)
    }

    /// Builds a set from raw ciphertexts, checking block alignment.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self, DecodeError> {
        if samples.is_empty() {
            return Err(DecodeError::Empty);
        }
        for (index, s) in samples.iter().enumerate() {
            let len = s.ciphertext.len();
            if len == 0 || len % BLOCK_SIZE != 0 {
                return Err(DecodeError::BlockLength { index, len });
            }
        }
        Ok(Self { samples })
    }

    pub fn builtin() -> Result<Self, DecodeError> {
        Self::decode(DEFAULT_SAMPLES.iter().map(|&(b64, marker)| (b64, Some(marker))))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl Sample {
    /// Wraps raw ciphertext; the encoded form is its base64.
    pub fn raw(ciphertext: Vec<u8>, marker: Option<String>) -> Self {
        Self {
            encoded: STANDARD.encode(&ciphertext),
            ciphertext,
            marker,
        }
    }
}
