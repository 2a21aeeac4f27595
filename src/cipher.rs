//! Block-cipher engine used by the validator.
//!
//! The search only ever decrypts. `Aes128Ecb::encrypt` exists to build
//! fixtures with a known key.

use aes::cipher::consts::U16;
use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Block};
use block_padding::{Padding, Pkcs7};

use crate::error::PaddingError;

/// Native key size of the cipher; shorter candidates are zero-padded to this.
pub const KEY_SIZE: usize = 16;
pub const BLOCK_SIZE: usize = 16;

pub type Key = [u8; KEY_SIZE];

/// Right-pads `candidate` with zero bytes to `KEY_SIZE`.
///
/// Candidates longer than the key are truncated; the keyspace never produces them.
pub fn pad_key(candidate: &[u8]) -> Key {
    let mut key = [0u8; KEY_SIZE];
    let n = candidate.len().min(KEY_SIZE);
    key[..n].copy_from_slice(&candidate[..n]);
    key
}

pub trait BlockCipherEngine: Send + Sync {
    /// Decrypts whole blocks of `ciphertext`. Callers guarantee the length is
    /// a multiple of `BLOCK_SIZE`.
    fn decrypt(&self, key: &Key, ciphertext: &[u8]) -> Vec<u8>;

    /// Strips padding, failing when the trailing bytes are inconsistent with it.
    fn remove_padding<'a>(&self, buffer: &'a [u8]) -> Result<&'a [u8], PaddingError>;
}

/// AES-128 in ECB mode with PKCS#7 padding.
#[derive(Debug, Default, Clone, Copy)]
pub struct Aes128Ecb;

impl Aes128Ecb {
    pub fn encrypt(&self, key: &Key, plaintext: &[u8]) -> Vec<u8> {
        let cipher = Aes128::new(GenericArray::from_slice(key));

        let full = plaintext.len() / BLOCK_SIZE;
        let mut blocks: Vec<Block> = plaintext
            .chunks_exact(BLOCK_SIZE)
            .map(Block::clone_from_slice)
            .collect();

        let tail = &plaintext[full * BLOCK_SIZE..];
        let mut last = Block::default();
        last[..tail.len()].copy_from_slice(tail);
        <Pkcs7 as Padding<U16>>::pad(&mut last, tail.len());
        blocks.push(last);

        cipher.encrypt_blocks(&mut blocks);
        blocks.iter().flat_map(|b| b.iter().copied()).collect()
    }
}

impl BlockCipherEngine for Aes128Ecb {
    fn decrypt(&self, key: &Key, ciphertext: &[u8]) -> Vec<u8> {
        let cipher = Aes128::new(GenericArray::from_slice(key));
        let mut blocks: Vec<Block> = ciphertext
            .chunks_exact(BLOCK_SIZE)
            .map(Block::clone_from_slice)
            .collect();
        cipher.decrypt_blocks(&mut blocks);
        blocks.iter().flat_map(|b| b.iter().copied()).collect()
    }

    fn remove_padding<'a>(&self, buffer: &'a [u8]) -> Result<&'a [u8], PaddingError> {
        if buffer.is_empty() || buffer.len() % BLOCK_SIZE != 0 {
            return Err(PaddingError);
        }
        let body = buffer.len() - BLOCK_SIZE;
        let last = Block::from_slice(&buffer[body..]);
        let kept = <Pkcs7 as Padding<U16>>::unpad(last).map_err(|_| PaddingError)?;
        Ok(&buffer[..body + kept.len()])
    }
}
