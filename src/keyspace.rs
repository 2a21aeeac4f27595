//! Enumeration of every candidate of a fixed length.
//!
//! A candidate is a number written in base `radix` with `length` digits, most
//! significant digit first, so index order is lexicographic order. Index
//! ranges can be handed to different workers without overlap.
//!
//! Indices run `0..=last`. The full 16-byte space has 2^128 candidates, one
//! more than `u128` can count, so ranges are inclusive throughout.

use crate::error::KeyspaceError;

pub const FULL_RADIX: u16 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyspace {
    length: usize,
    radix: u16,
    last: u128,
}

impl Keyspace {
    /// All byte strings of `length`.
    pub fn new(length: usize) -> Result<Self, KeyspaceError> {
        Self::with_radix(length, FULL_RADIX)
    }

    /// Byte strings of `length` whose every byte is below `radix`.
    pub fn with_radix(length: usize, radix: u16) -> Result<Self, KeyspaceError> {
        if radix == 0 || radix > FULL_RADIX {
            return Err(KeyspaceError::Radix(radix));
        }
        let too_large = KeyspaceError::TooLarge { length, radix };
        let last = match length.checked_sub(1) {
            None => 0,
            Some(exp) => {
                // radix^n - 1 = (radix - 1) * radix^(n-1) + (radix^(n-1) - 1)
                let exp = u32::try_from(exp).map_err(|_| too_large)?;
                let high = u128::from(radix).checked_pow(exp).ok_or(too_large)?;
                high.checked_mul(u128::from(radix - 1))
                    .and_then(|top| top.checked_add(high - 1))
                    .ok_or(too_large)?
            }
        };
        Ok(Self {
            length,
            radix,
            last,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn radix(&self) -> u16 {
        self.radix
    }

    /// Index of the final candidate.
    pub fn last(&self) -> u128 {
        self.last
    }

    /// Number of candidates, `radix^length`, or `None` when that is 2^128.
    /// Length 0 has exactly one, the empty candidate.
    pub fn size(&self) -> Option<u128> {
        self.last.checked_add(1)
    }

    /// Writes the candidate at `index` into `out`, which must be `length` long.
    pub fn candidate_at(&self, mut index: u128, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.length);
        debug_assert!(index <= self.last);
        let radix = u128::from(self.radix);
        for digit in out.iter_mut().rev() {
            *digit = (index % radix) as u8;
            index /= radix;
        }
    }

    /// Lazy iterator over the whole space.
    pub fn iter(&self) -> Candidates {
        self.range_inclusive(0, self.last)
    }

    /// Lazy iterator over indices `start..end`, clamped to the space.
    pub fn range(&self, start: u128, end: u128) -> Candidates {
        match end.checked_sub(1) {
            Some(last) if start <= last => self.range_inclusive(start, last),
            _ => self.empty(),
        }
    }

    /// Lazy iterator over indices `first..=last`, clamped to the space.
    pub fn range_inclusive(&self, first: u128, last: u128) -> Candidates {
        let last = last.min(self.last);
        if first > last {
            return self.empty();
        }
        let mut current = vec![0u8; self.length];
        self.candidate_at(first, &mut current);
        Candidates {
            current,
            radix: self.radix,
            left: last - first,
            started: false,
            done: false,
        }
    }

    fn empty(&self) -> Candidates {
        Candidates {
            current: vec![0u8; self.length],
            radix: self.radix,
            left: 0,
            started: false,
            done: true,
        }
    }
}

/// Odometer over a contiguous index range.
#[derive(Debug, Clone)]
pub struct Candidates {
    current: Vec<u8>,
    radix: u16,
    /// Candidates after `current`.
    left: u128,
    started: bool,
    done: bool,
}

impl Candidates {
    /// Advances and lends the next candidate without allocating.
    pub fn next_candidate(&mut self) -> Option<&[u8]> {
        if self.done {
            return None;
        }
        if self.started {
            if self.left == 0 {
                self.done = true;
                return None;
            }
            self.left -= 1;
            self.increment();
        }
        self.started = true;
        Some(&self.current)
    }

    fn increment(&mut self) {
        let top = (self.radix - 1) as u8;
        for digit in self.current.iter_mut().rev() {
            if *digit == top {
                *digit = 0;
            } else {
                *digit += 1;
                return;
            }
        }
    }
}

impl Iterator for Candidates {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        self.next_candidate().map(<[u8]>::to_vec)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match (self.done, self.started) {
            (true, _) => Some(0),
            (false, true) => Some(self.left),
            (false, false) => self.left.checked_add(1),
        };
        match remaining.and_then(|n| usize::try_from(n).ok()) {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn binary_alphabet_length_three() {
        let ks = Keyspace::with_radix(3, 2).unwrap();
        let all: Vec<Vec<u8>> = ks.iter().collect();
        assert_eq!(
            all,
            vec![
                vec![0, 0, 0],
                vec![0, 0, 1],
                vec![0, 1, 0],
                vec![0, 1, 1],
                vec![1, 0, 0],
                vec![1, 0, 1],
                vec![1, 1, 0],
                vec![1, 1, 1],
            ]
        );
    }

    #[test]
    fn full_bytes_length_two() {
        let ks = Keyspace::new(2).unwrap();
        assert_eq!(ks.size(), Some(65_536));
        let all: Vec<Vec<u8>> = ks.iter().collect();
        assert_eq!(all.len(), 65_536);
        assert_eq!(all[0], vec![0, 0]);
        assert_eq!(all[1], vec![0, 1]);
        assert_eq!(all[256], vec![1, 0]);
        assert_eq!(all[65_535], vec![255, 255]);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn length_zero_is_one_empty_candidate() {
        let ks = Keyspace::new(0).unwrap();
        assert_eq!(ks.size(), Some(1));
        let all: Vec<Vec<u8>> = ks.iter().collect();
        assert_eq!(all, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn restartable() {
        let ks = Keyspace::with_radix(2, 3).unwrap();
        let a: Vec<_> = ks.iter().collect();
        let b: Vec<_> = ks.iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn full_key_length_is_indexable() {
        let ks = Keyspace::new(16).unwrap();
        assert_eq!(ks.radix(), 256);
        assert_eq!(ks.last(), u128::MAX);
        assert_eq!(ks.size(), None);

        let mut first = ks.range(0, 3);
        assert_eq!(first.size_hint(), (3, Some(3)));
        let mut expected = vec![0u8; 16];
        for i in 0..3 {
            expected[15] = i;
            assert_eq!(first.next(), Some(expected.clone()));
        }
        assert_eq!(first.next(), None);

        let tail: Vec<_> = ks.range_inclusive(u128::MAX - 1, u128::MAX).collect();
        let mut penultimate = vec![0xff; 16];
        penultimate[15] = 0xfe;
        assert_eq!(tail, vec![penultimate, vec![0xff; 16]]);
    }

    #[test]
    fn too_large_and_bad_radix() {
        assert_eq!(
            Keyspace::new(17),
            Err(KeyspaceError::TooLarge {
                length: 17,
                radix: 256
            })
        );
        assert_eq!(Keyspace::with_radix(1, 0), Err(KeyspaceError::Radix(0)));
        assert_eq!(Keyspace::with_radix(1, 257), Err(KeyspaceError::Radix(257)));
    }

    #[test]
    fn range_is_clamped() {
        let ks = Keyspace::with_radix(2, 2).unwrap();
        assert_eq!(ks.range(3, 100).collect::<Vec<_>>(), vec![vec![1, 1]]);
        assert_eq!(ks.range(7, 9).count(), 0);
        assert_eq!(ks.range(2, 2).count(), 0);
        assert_eq!(ks.range(0, 0).count(), 0);
    }

    proptest! {
        #[test]
        fn ranges_partition_the_space(
            radix in 1u16..=6,
            length in 0usize..=4,
            chunk in 1u128..=20,
        ) {
            let ks = Keyspace::with_radix(length, radix).unwrap();
            let size = ks.size().unwrap();
            let mut seen = HashSet::new();
            let mut start = 0;
            while start < size {
                for c in ks.range(start, start + chunk) {
                    prop_assert_eq!(c.len(), length);
                    prop_assert!(c.iter().all(|&d| u16::from(d) < radix));
                    prop_assert!(seen.insert(c));
                }
                start += chunk;
            }
            prop_assert_eq!(seen.len() as u128, size);
        }

        #[test]
        fn candidate_at_matches_iteration(length in 1usize..=3, index in 0u128..16_777_216) {
            let ks = Keyspace::new(length).unwrap();
            let index = index % ks.size().unwrap();
            let mut out = vec![0u8; length];
            ks.candidate_at(index, &mut out);
            prop_assert_eq!(ks.range(index, index + 1).next(), Some(out));
        }
    }
}
