//! Session-scoped random configuration.
//!
//! Values chosen once at session start and then frozen. Threading the seed
//! into catalog construction keeps every rule closure-free: a rule's
//! parameters live in its check variant, not in hidden captured state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One-time random inputs for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSeed {
    /// Two distinct lowercase letters the text may not contain.
    pub forbidden: [char; 2],
}

impl SessionSeed {
    /// Draws a seed from `rng`: two distinct letters, uniform over the
    /// alphabet.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        const ALPHABET: [char; 26] = [
            'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p',
            'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
        ];

        let first = ALPHABET[rng.gen_range(0..ALPHABET.len())];
        let mut second = first;
        while second == first {
            second = ALPHABET[rng.gen_range(0..ALPHABET.len())];
        }
        Self {
            forbidden: [first, second],
        }
    }

    /// Builds a seed from explicit letters, validating the invariant.
    pub fn from_letters(first: char, second: char) -> Result<Self, ValidationError> {
        if first == second || !first.is_ascii_lowercase() || !second.is_ascii_lowercase() {
            return Err(ValidationError::InvalidForbiddenLetters { first, second });
        }
        Ok(Self {
            forbidden: [first, second],
        })
    }
}
