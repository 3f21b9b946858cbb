//! # Cryptographically secure random bytes and strings.
//!
//! [`SecureRandom`] holds its generator explicitly instead of reaching for a
//! process-wide one; the default is the operating system source ([`OsRng`]),
//! and any [`TryCryptoRng`] (e.g. a seeded `StdRng`) can be injected.
//!
//! ## Entry points
//! - [`SecureRandom::bytes`] / [`SecureRandom::string`] return [`RandError`] on failure;
//! - [`SecureRandom::must_bytes`] / [`SecureRandom::must_string`] panic instead.
//!
//! There is no fallback to a non-cryptographic generator.

use rand::TryCryptoRng;
use rand::rngs::OsRng;

use crate::error::RandError;

/// Secure random generator handle.
///
/// # Example
/// ```
/// use sigvisor::SecureRandom;
///
/// let mut rng = SecureRandom::os();
/// let token = rng.must_string(16, &['a', 'b', 'c']);
/// assert_eq!(token.chars().count(), 16);
/// assert!(token.chars().all(|c| "abc".contains(c)));
/// ```
#[derive(Debug, Clone)]
pub struct SecureRandom<R = OsRng> {
    rng: R,
}

impl SecureRandom<OsRng> {
    /// Generator backed by the operating system.
    #[must_use]
    pub fn os() -> Self {
        Self { rng: OsRng }
    }
}

impl Default for SecureRandom<OsRng> {
    fn default() -> Self {
        Self::os()
    }
}

impl<R: TryCryptoRng> SecureRandom<R> {
    /// Wraps an explicit cryptographic generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Returns `n` uniformly distributed bytes.
    ///
    /// ### Errors
    /// [`RandError::Source`] if the generator fails.
    pub fn bytes(&mut self, n: usize) -> Result<Vec<u8>, RandError> {
        let mut buf = vec![0u8; n];
        self.rng.try_fill_bytes(&mut buf).map_err(source_error)?;
        Ok(buf)
    }

    /// Returns `n` uniformly distributed bytes.
    ///
    /// ### Panics
    /// If the generator fails.
    pub fn must_bytes(&mut self, n: usize) -> Vec<u8> {
        match self.bytes(n) {
            Ok(buf) => buf,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns `n` characters drawn uniformly, with replacement, from `alphabet`.
    ///
    /// ### Errors
    /// - [`RandError::EmptyAlphabet`] if `n > 0` and `alphabet` is empty;
    /// - [`RandError::Source`] if the generator fails.
    pub fn string(&mut self, n: usize, alphabet: &[char]) -> Result<String, RandError> {
        if n == 0 {
            return Ok(String::new());
        }
        if alphabet.is_empty() {
            return Err(RandError::EmptyAlphabet);
        }

        let mut out = String::with_capacity(n);
        for _ in 0..n {
            let idx = self.index(alphabet.len())?;
            out.push(alphabet[idx]);
        }
        Ok(out)
    }

    /// Returns `n` characters drawn uniformly, with replacement, from `alphabet`.
    ///
    /// ### Panics
    /// If the generator fails or the alphabet is empty while `n > 0`.
    pub fn must_string(&mut self, n: usize, alphabet: &[char]) -> String {
        match self.string(n, alphabet) {
            Ok(s) => s,
            Err(e) => panic!("{e}"),
        }
    }

    /// Uniform index in `0..len` (`len > 0`).
    ///
    /// Draws below the largest multiple of `len` are accepted, the rest are
    /// redrawn, so there is no modulo bias.
    fn index(&mut self, len: usize) -> Result<usize, RandError> {
        let len = len as u64;
        // 2^64 mod len
        let rem = (u64::MAX % len + 1) % len;
        let zone = u64::MAX - rem;

        loop {
            let v = self.rng.try_next_u64().map_err(source_error)?;
            if v <= zone {
                return Ok((v % len) as usize);
            }
        }
    }
}

fn source_error(e: impl std::fmt::Display) -> RandError {
    RandError::Source {
        message: e.to_string(),
    }
}
