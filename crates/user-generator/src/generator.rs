//! Main generator for producing synthetic users.

use crate::generators::{address, email, name};
use rand::rngs::StdRng;
use rand::SeedableRng;
use user_core::UserRecord;

/// Generator that produces deterministic synthetic users.
///
/// Every record draws from an RNG seeded with the base seed and the record
/// index, so user N is the same no matter which worker generates it or how
/// the index space was split.
pub struct UserGenerator {
    /// Base seed
    seed: u64,
    /// Current logical record index
    index: u64,
}

impl UserGenerator {
    /// Create a new generator with the given seed, starting at index 0.
    pub fn new(seed: u64) -> Self {
        Self { seed, index: 0 }
    }

    /// Set the starting index for generation.
    pub fn with_start_index(mut self, index: u64) -> Self {
        self.index = index;
        self
    }

    /// Get the current record index.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    /// Generate the next user.
    pub fn next_user(&mut self) -> UserRecord {
        let index = self.index;
        let mut rng = StdRng::seed_from_u64(rng_seed_for_index(self.seed, index));

        let first_name = name::first_name(&mut rng);
        let last_name = name::last_name(&mut rng);
        let email = email::email_address(&mut rng, &first_name, &last_name, index);
        let address = address::full_address(&mut rng);

        self.index += 1;

        UserRecord {
            first_name,
            last_name,
            email,
            address,
        }
    }

    /// Generate `count` users lazily.
    pub fn users(&mut self, count: u64) -> UserIterator<'_> {
        UserIterator {
            generator: self,
            remaining: count,
        }
    }
}

fn rng_seed_for_index(seed: u64, index: u64) -> u64 {
    seed.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15))
}

/// Iterator that lazily generates users.
pub struct UserIterator<'a> {
    generator: &'a mut UserGenerator,
    remaining: u64,
}

impl Iterator for UserIterator<'_> {
    type Item = UserRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.generator.next_user())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for UserIterator<'_> {}
