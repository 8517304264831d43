use crate::error::CryptoError;
use crate::hash_stream::HashStream;
use crate::keys_management::{keys_match, GENERATOR_H};
use crate::rand_nonce::RandomNonce;
use crate::types::{Hash, PublicKey, SecretKey, Signature};
use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};
use secrecy::ExposeSecret;

const TAG_SIGNATURE_G: &str = "schnorr_g";
const TAG_SIGNATURE_H: &str = "schnorr_h";

/// Signs a prefix hash with a plain key pair over `G`:
/// (c, r) = (Hs(prefix, P, kG), k - c·s)
///
/// # Arguments
///
/// * `prefix_hash` - Digest of the message being signed.
/// * `public_key` - `P = s·G`.
/// * `secret_key` - `s`.
///
/// # Returns
///
/// The signature, or `KeyMismatch` if `secret_key` does not produce `public_key`.
///
#[tracing::instrument(name = "Generating Schnorr signature", level = "debug", skip_all)]
pub fn generate_signature<R: RngCore + CryptoRng>(
    prefix_hash: &Hash,
    public_key: &PublicKey,
    secret_key: &SecretKey,
    rng: &mut R,
) -> Result<Signature, CryptoError> {
    if !keys_match(secret_key, public_key) {
        return Err(CryptoError::KeyMismatch("generate_signature"));
    }
    let nonce = RandomNonce::new_rand(rng);
    Ok(close_signature(
        TAG_SIGNATURE_G,
        prefix_hash,
        public_key,
        secret_key,
        &nonce,
    ))
}

/// Verifies a signature over `G` by recomputing kG = r·G + c·P:
/// c == Hs(prefix, P, r·G + c·P)
///
/// Undecodable keys simply fail verification.
///
#[tracing::instrument(name = "Verifying Schnorr signature", level = "debug", skip_all)]
pub fn check_signature(prefix_hash: &Hash, public_key: &PublicKey, sig: &Signature) -> bool {
    let Some(point) = public_key.decompress() else {
        tracing::debug!("public key does not decode");
        return false;
    };
    let commitment = EdwardsPoint::vartime_double_scalar_mul_basepoint(&sig.c, &point, &sig.r);
    challenge(TAG_SIGNATURE_G, prefix_hash, public_key, &commitment) == sig.c
}

/// Same proof as [`generate_signature`] for a key `P = s·H` over the second
/// generator. A signature made with one base never verifies under the other.
#[tracing::instrument(name = "Generating Schnorr signature over H", level = "debug", skip_all)]
pub fn generate_signature_h<R: RngCore + CryptoRng>(
    prefix_hash: &Hash,
    public_key: &PublicKey,
    secret_key: &SecretKey,
    rng: &mut R,
) -> Result<Signature, CryptoError> {
    let expected = PublicKey::from_point(&(secret_key.expose_secret() * &*GENERATOR_H));
    if expected != *public_key {
        return Err(CryptoError::KeyMismatch("generate_signature_h"));
    }
    let nonce = RandomNonce::over_base(rng, &GENERATOR_H);
    Ok(close_signature(
        TAG_SIGNATURE_H,
        prefix_hash,
        public_key,
        secret_key,
        &nonce,
    ))
}

#[tracing::instrument(name = "Verifying Schnorr signature over H", level = "debug", skip_all)]
pub fn check_signature_h(prefix_hash: &Hash, public_key: &PublicKey, sig: &Signature) -> bool {
    let Some(point) = public_key.decompress() else {
        tracing::debug!("public key does not decode");
        return false;
    };
    let commitment = sig.r * &*GENERATOR_H + sig.c * point;
    challenge(TAG_SIGNATURE_H, prefix_hash, public_key, &commitment) == sig.c
}

fn close_signature(
    tag: &str,
    prefix_hash: &Hash,
    public_key: &PublicKey,
    secret_key: &SecretKey,
    nonce: &RandomNonce,
) -> Signature {
    let c = challenge(tag, prefix_hash, public_key, &nonce.r_public);
    let r = nonce.r_private.expose_secret() - c * secret_key.expose_secret();
    Signature { c, r }
}

/// Calculates Hs(tag || prefix || P || kB) for the base `B` the tag names.
fn challenge(
    tag: &str,
    prefix_hash: &Hash,
    public_key: &PublicKey,
    commitment: &EdwardsPoint,
) -> Scalar {
    HashStream::new()
        .append_tag(tag)
        .append(prefix_hash)
        .append(public_key)
        .append(commitment)
        .to_scalar_wide()
}
