//! Diffie-Hellman stealth outputs.
//!
//! Sender and receiver agree on `D = 8·(r·V) = 8·(v·R)`. The output key of
//! index `i` is `Hs(D, i)·G + S`, spendable with `Hs(D, i) + s`. Nothing ties
//! the key to the transaction, so two transactions reusing `r` collide.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use secrecy::ExposeSecret;

use crate::hash_stream::HashStream;
use crate::types::{KeyDerivation, PublicKey, SecretKey};

/// `8·(secret·key)`. Works from either side: `(R, v)` for the receiver,
/// `(V, r)` for the sender. `None` if `key` does not decode.
pub fn generate_key_derivation(key: &PublicKey, secret_key: &SecretKey) -> Option<KeyDerivation> {
    let point = key.decompress()?;
    Some(KeyDerivation::from_point(
        &(secret_key.expose_secret() * point).mul_by_cofactor(),
    ))
}

/// `Hs(D ‖ varint(index))`, reduced from a 32-byte digest.
pub fn derivation_to_scalar(derivation: &KeyDerivation, output_index: usize) -> Scalar {
    HashStream::new()
        .append(derivation)
        .append(&output_index)
        .to_scalar()
}

/// `P = Hs(D, i)·G + S`
pub fn derive_output_public_key(
    derivation: &KeyDerivation,
    output_index: usize,
    address_s: &PublicKey,
) -> Option<PublicKey> {
    let spend = address_s.decompress()?;
    let scalar = derivation_to_scalar(derivation, output_index);
    Some(PublicKey::from_point(&(EdwardsPoint::mul_base(&scalar) + spend)))
}

/// `S = P - Hs(D, i)·G`. The receiver compares the result with its own spend
/// key to recognize the output.
pub fn underive_address_s(
    derivation: &KeyDerivation,
    output_index: usize,
    output_public_key: &PublicKey,
) -> Option<PublicKey> {
    let output = output_public_key.decompress()?;
    let scalar = derivation_to_scalar(derivation, output_index);
    Some(PublicKey::from_point(&(output - EdwardsPoint::mul_base(&scalar))))
}

/// `Hs(D, i) + s`
pub fn derive_output_secret_key(
    derivation: &KeyDerivation,
    output_index: usize,
    address_s: &SecretKey,
) -> SecretKey {
    SecretKey::new(derivation_to_scalar(derivation, output_index) + address_s.expose_secret())
}
