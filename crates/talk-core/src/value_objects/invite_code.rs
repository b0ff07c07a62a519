//! Invite code generation
//!
//! Codes are 8 characters drawn from a 57-symbol alphabet that excludes the
//! visually ambiguous characters `0`, `1`, `I`, `O`, and `l`. The generator
//! does not guarantee uniqueness; the invite store's unique index does, and
//! creation retries on the (astronomically rare) collision.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Length of every invite code
pub const CODE_LENGTH: usize = 8;

/// URL-safe alphabet without visually ambiguous characters (57 symbols)
pub const CODE_ALPHABET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

/// Random invite code generator with an injected RNG
///
/// Shared behind the service context; the mutex serializes draws from the
/// single RNG so the generator is `Sync` without thread-local state.
#[derive(Debug)]
pub struct InviteCodeGenerator {
    rng: Mutex<StdRng>,
}

impl InviteCodeGenerator {
    /// Create a generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a deterministic generator for tests
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Generate a new 8-character code
    pub fn generate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..CODE_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..CODE_ALPHABET.len());
                CODE_ALPHABET[idx] as char
            })
            .collect()
    }
}

impl Default for InviteCodeGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
