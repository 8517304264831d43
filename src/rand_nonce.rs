//! Entropy for key generation and signing nonces.
//!
//! Every randomized operation in the crate takes its generator as an explicit
//! `&mut R where R: RngCore + CryptoRng`. [`SharedRng`] is a synchronized
//! handle for callers that want many signing sites to draw from one source.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::Scalar;
use rand::rngs::{OsRng, StdRng};
use rand::{CryptoRng, RngCore, SeedableRng};
use secrecy::{ExposeSecret, Secret};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Fills `buf` from the operating system; safe to call from any thread.
pub fn generate_random_bytes(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// Uniform scalar in `[1, L)`.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let scalar = Scalar::random(rng);
        if scalar != Scalar::ZERO {
            return scalar;
        }
    }
}

/// A one-time secret nonce `k` with its public commitment `k·base`.
pub struct RandomNonce {
    pub r_public: EdwardsPoint,
    pub(crate) r_private: Secret<Scalar>,
}

impl fmt::Debug for RandomNonce {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RandomNonce {{ r_public: {:?} }}", self.r_public.compress())
    }
}

impl Clone for RandomNonce {
    fn clone(&self) -> Self {
        RandomNonce {
            r_public: self.r_public,
            r_private: Secret::new(*self.r_private.expose_secret()),
        }
    }
}

impl RandomNonce {
    /// Nonce committed over the standard base point `G`.
    pub fn new_rand<R: RngCore + CryptoRng>(rng: &mut R) -> RandomNonce {
        let r_private = Secret::new(random_scalar(rng));
        let r_public = EdwardsPoint::mul_base(r_private.expose_secret());
        RandomNonce {
            r_public,
            r_private,
        }
    }

    /// Nonce committed over an arbitrary base.
    pub fn over_base<R: RngCore + CryptoRng>(rng: &mut R, base: &EdwardsPoint) -> RandomNonce {
        let r_private = Secret::new(random_scalar(rng));
        let r_public = r_private.expose_secret() * base;
        RandomNonce {
            r_public,
            r_private,
        }
    }
}

/// Cloneable, internally locked generator seeded once from the OS.
///
/// Clones share one state, so concurrent signers never observe the same
/// output twice.
#[derive(Clone)]
pub struct SharedRng {
    inner: Arc<Mutex<StdRng>>,
}

impl SharedRng {
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Wraps an existing generator, e.g. a seeded one in tests.
    pub fn from_rng(rng: StdRng) -> Self {
        SharedRng {
            inner: Arc::new(Mutex::new(rng)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic while holding the lock cannot leave StdRng half-updated.
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl fmt::Debug for SharedRng {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SharedRng")
    }
}

impl RngCore for SharedRng {
    fn next_u32(&mut self) -> u32 {
        self.with_rng(|rng| rng.next_u32())
    }

    fn next_u64(&mut self) -> u64 {
        self.with_rng(|rng| rng.next_u64())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.with_rng(|rng| rng.fill_bytes(dest))
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.with_rng(|rng| rng.try_fill_bytes(dest))
    }
}

impl CryptoRng for SharedRng {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_random_scalar_is_nonzero_and_fresh() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = random_scalar(&mut rng);
        let b = random_scalar(&mut rng);
        assert_ne!(a, Scalar::ZERO);
        assert_ne!(a, b);
    }

    #[test]
    fn test_nonce_commitment_matches_secret() {
        let mut rng = StdRng::seed_from_u64(2);
        let nonce = RandomNonce::new_rand(&mut rng);
        assert_eq!(
            nonce.r_public,
            EdwardsPoint::mul_base(nonce.r_private.expose_secret())
        );

        let base = EdwardsPoint::mul_base(&Scalar::from(9u64));
        let nonce = RandomNonce::over_base(&mut rng, &base);
        assert_eq!(nonce.r_public, nonce.r_private.expose_secret() * base);
    }

    #[test]
    fn test_generate_random_bytes_fills_buffer() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        generate_random_bytes(&mut a);
        generate_random_bytes(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_shared_rng_clones_share_state() {
        let shared = SharedRng::from_rng(StdRng::seed_from_u64(3));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mut rng = shared.clone();
                thread::spawn(move || (0..16).map(|_| random_scalar(&mut rng)).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for scalar in handle.join().unwrap() {
                assert!(seen.insert(scalar.to_bytes()));
            }
        }
        assert_eq!(seen.len(), 64);
    }
}
