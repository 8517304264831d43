//! Key pairs, key validation, key images and small point helpers.

use curve25519_dalek::constants::ED25519_BASEPOINT_COMPRESSED;
use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::Scalar;
use once_cell::sync::Lazy;
use rand::{CryptoRng, RngCore};
use secrecy::ExposeSecret;
use std::fmt;

use crate::hash_stream::{hash_to_good_point, HashStream};
use crate::rand_nonce::random_scalar;
use crate::types::{KeyImage, PublicKey, SecretKey};

/// Second generator `H`, independent of `G`: nobody knows `log_G(H)`.
pub static GENERATOR_H: Lazy<EdwardsPoint> =
    Lazy::new(|| hash_to_good_point(ED25519_BASEPOINT_COMPRESSED.as_bytes()));

pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Format the KeyPair struct without including secret_key
        write!(f, "KeyPair {{ public_key: {:?} }}", self.public_key)
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        KeyPair {
            secret_key: self.secret_key.clone(),
            public_key: self.public_key,
        }
    }
}

impl KeyPair {
    pub fn create<R: RngCore + CryptoRng>(rng: &mut R) -> KeyPair {
        KeyPair::from_secret_key(SecretKey::new(random_scalar(rng)))
    }

    pub fn from_secret_key(secret_key: SecretKey) -> KeyPair {
        let public_key = secret_key_to_public_key(&secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }
}

pub fn random_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> KeyPair {
    KeyPair::create(rng)
}

/// True iff `key` decodes to a curve point. Subgroup membership is not checked.
pub fn key_isvalid(key: &PublicKey) -> bool {
    key.decompress().is_some()
}

/// True iff `point` decodes and `L·point` is the identity.
pub fn key_in_main_subgroup(point: &[u8; 32]) -> bool {
    PublicKey(*point)
        .decompress()
        .map_or(false, |p| p.is_torsion_free())
}

pub fn secret_key_to_public_key(secret_key: &SecretKey) -> PublicKey {
    PublicKey::from_point(&EdwardsPoint::mul_base(secret_key.expose_secret()))
}

/// Byte-exact comparison of `s·G` with `expected_public_key`.
pub fn keys_match(secret_key: &SecretKey, expected_public_key: &PublicKey) -> bool {
    secret_key_to_public_key(secret_key) == *expected_public_key
}

/// `a·G + s·H`, the public key of a dual (audit, spend) secret.
pub fn secret_keys_to_public_key(audit_secret: &SecretKey, spend_secret: &SecretKey) -> PublicKey {
    PublicKey::from_point(&dual_public_point(
        audit_secret.expose_secret(),
        spend_secret.expose_secret(),
    ))
}

pub(crate) fn dual_public_point(a: &Scalar, s: &Scalar) -> EdwardsPoint {
    EdwardsPoint::mul_base(a) + s * &*GENERATOR_H
}

/// `Hp(P)`, the subgroup point key images and audit images are built over.
pub(crate) fn key_image_base(public_key: &PublicKey) -> EdwardsPoint {
    HashStream::new().append(public_key).to_good_point()
}

/// `I = s·Hp(P)`. Identical inputs always give the identical image.
pub fn generate_key_image(public_key: &PublicKey, secret_key: &SecretKey) -> KeyImage {
    KeyImage::from_point(&(secret_key.expose_secret() * key_image_base(public_key)))
}

/// `A + b·H`
pub fn a_plus_b_h(a: &PublicKey, b: &SecretKey) -> Option<PublicKey> {
    let a = a.decompress()?;
    Some(PublicKey::from_point(&(a + b.expose_secret() * &*GENERATOR_H)))
}

/// `A - b·H`
pub fn a_minus_b_h(a: &PublicKey, b: &SecretKey) -> Option<PublicKey> {
    let a = a.decompress()?;
    Some(PublicKey::from_point(&(a - b.expose_secret() * &*GENERATOR_H)))
}

/// `A + B`
pub fn a_plus_b(a: &PublicKey, b: &PublicKey) -> Option<PublicKey> {
    Some(PublicKey::from_point(&(a.decompress()? + b.decompress()?)))
}

/// `A - B`
pub fn a_minus_b(a: &PublicKey, b: &PublicKey) -> Option<PublicKey> {
    Some(PublicKey::from_point(&(a.decompress()? - b.decompress()?)))
}

/// `b·A`
pub fn a_mul_b(a: &PublicKey, b: &SecretKey) -> Option<PublicKey> {
    let a = a.decompress()?;
    Some(PublicKey::from_point(&(b.expose_secret() * a)))
}
