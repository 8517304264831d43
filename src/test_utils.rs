//! Helpers shared by the unit tests.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::keys_management::{random_keypair, KeyPair};
use crate::types::{Hash, PublicKey};

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// 32 bytes that do not decode to any curve point.
pub(crate) fn off_curve_key() -> PublicKey {
    (0u8..=255)
        .map(|b| PublicKey([b; 32]))
        .find(|key| key.decompress().is_none())
        .unwrap()
}

pub(crate) fn keypairs(rng: &mut StdRng, count: usize) -> Vec<KeyPair> {
    (0..count).map(|_| random_keypair(rng)).collect()
}

pub(crate) fn prefix(tag: &str) -> Hash {
    crate::hash_stream::cn_fast_hash(tag.as_bytes())
}
