//! Random choice of the next station.
//!
//! Candidates are first narrowed to those within the index-proximity limit
//! of the base, then one is drawn uniformly. A single draw over the narrowed
//! set always terminates, even when nothing qualifies.

use crate::Candidate;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Pick one candidate uniformly among those index-proximate to `base_index`
///
/// Returns `None` when `candidates` is empty or none is within
/// `proximity_limit` indices of the base.
pub fn choose_next<R: Rng + ?Sized>(
    candidates: &[Candidate],
    base_index: usize,
    rng: &mut R,
    proximity_limit: usize,
) -> Option<Candidate> {
    let eligible: Vec<Candidate> = candidates
        .iter()
        .filter(|c| c.station_index.abs_diff(base_index) <= proximity_limit)
        .copied()
        .collect();

    if eligible.len() < candidates.len() {
        tracing::debug!(
            "{} of {} candidates dropped by proximity limit {}",
            candidates.len() - eligible.len(),
            candidates.len(),
            proximity_limit
        );
    }

    eligible.choose(rng).copied()
}

/// Random source for selection: deterministic when seeded, OS entropy otherwise
pub fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    }
}
