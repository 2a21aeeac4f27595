//! Acceptance predicates applied to unpadded plaintext.

pub trait Acceptance: Send + Sync {
    fn accepts(&self, plaintext: &[u8]) -> bool;
}

/// Plaintext is UTF-8 and, once whitespace is trimmed, a non-empty run of
/// ASCII decimal digits.
#[derive(Debug, Default, Clone, Copy)]
pub struct DigitString;

impl Acceptance for DigitString {
    fn accepts(&self, plaintext: &[u8]) -> bool {
        match std::str::from_utf8(plaintext) {
            Ok(s) => {
                let s = s.trim();
                !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
            }
            Err(_) => false,
        }
    }
}

impl<F> Acceptance for F
where
    F: Fn(&[u8]) -> bool + Send + Sync,
{
    fn accepts(&self, plaintext: &[u8]) -> bool {
        self(plaintext)
    }
}
