//! Generators produce the token strings handed out to clients.
//!
//! Access tokens, refresh tokens and companion secrets are all opaque random strings. Guessing is
//! made infeasible by the entropy of the generated bytes alone, so a generator need not know
//! anything about the record it produces a token for.
use base64::{encode_config, URL_SAFE_NO_PAD};
use ring::rand::{SecureRandom, SystemRandom};

use crate::code_grant::error::{Error, Result};

/// Source of fresh token strings.
///
/// ## Requirements on implementations
///
/// Outputs MUST be indistinguishable from a random function and never repeat during the lifetime
/// of the tokens they are used for.
pub trait TokenGenerator {
    /// Produce a new, unique token.
    fn generate(&self) -> Result<String>;
}

/// Generates tokens from random bytes.
///
/// Bytes are drawn from the system random generator and encoded with url-safe base64.
pub struct RandomGenerator {
    random: SystemRandom,
    len: usize,
}

impl RandomGenerator {
    /// Generates tokens with a specific byte length.
    pub fn new(length: usize) -> RandomGenerator {
        RandomGenerator {
            random: SystemRandom::new(),
            len: length,
        }
    }
}

impl TokenGenerator for RandomGenerator {
    fn generate(&self) -> Result<String> {
        let mut result = vec![0; self.len];
        self.random
            .fill(result.as_mut_slice())
            .map_err(|_| Error::internal("system random generator failed"))?;
        Ok(encode_config(&result, URL_SAFE_NO_PAD))
    }
}

impl<G: TokenGenerator + ?Sized> TokenGenerator for Box<G> {
    fn generate(&self) -> Result<String> {
        (**self).generate()
    }
}
