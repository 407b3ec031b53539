//! Uniform random choice over the eligible set.
use rand::{Rng, seq::IndexedRandom};

use pcm_model::Instance;

/// Pick one instance uniformly at random; `None` when `eligible` is empty.
///
/// Each element has probability `1/n`. The random source does not need to be
/// cryptographically strong.
pub fn pick<'a, R>(eligible: &'a [Instance], rng: &mut R) -> Option<&'a Instance>
where
    R: Rng + ?Sized,
{
    eligible.choose(rng)
}
