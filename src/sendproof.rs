//! Payment proof for legacy stealth outputs.
//!
//! The sender proves that the transaction key `R = r·G` produced the
//! derivation `D = r·(8·V)` toward the receiver view key `V`, without
//! revealing `r`. This is a Schnorr proof of equal discrete logs over the
//! bases `G` and `8·V`:
//! ```text
//! X = s·G   + c·R
//! Y = s·8V  + c·D
//! c = Hs(tag ‖ message ‖ R ‖ V ‖ D ‖ X ‖ Y)
//! ```

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::VartimeMultiscalarMul;
use rand::{CryptoRng, RngCore};
use secrecy::ExposeSecret;

use crate::error::CryptoError;
use crate::hash_stream::HashStream;
use crate::keys_management::keys_match;
use crate::rand_nonce::RandomNonce;
use crate::stealth::legacy::generate_key_derivation;
use crate::types::{Hash, KeyDerivation, PublicKey, SecretKey, Signature};

const TAG_SENDPROOF: &str = "sendproof";

/// Fails when `txkey_sec` does not produce `txkey_pub`, or does not produce
/// `derivation` toward `receiver_address_v`.
#[tracing::instrument(name = "Generating sendproof", level = "debug", skip_all)]
pub fn generate_sendproof<R: RngCore + CryptoRng>(
    txkey_pub: &PublicKey,
    txkey_sec: &SecretKey,
    receiver_address_v: &PublicKey,
    derivation: &KeyDerivation,
    message_hash: &Hash,
    rng: &mut R,
) -> Result<Signature, CryptoError> {
    const OP: &str = "generate_sendproof";

    if !keys_match(txkey_sec, txkey_pub) {
        return Err(CryptoError::KeyMismatch(OP));
    }
    let view = receiver_address_v
        .decompress()
        .ok_or(CryptoError::InvalidPublicKey(OP))?;
    if generate_key_derivation(receiver_address_v, txkey_sec) != Some(*derivation) {
        return Err(CryptoError::KeyMismatch(OP));
    }

    let nonce = RandomNonce::new_rand(rng);
    let k = nonce.r_private.expose_secret();
    let y = k * view.mul_by_cofactor();
    let c = challenge(
        message_hash,
        txkey_pub,
        receiver_address_v,
        derivation,
        &nonce.r_public,
        &y,
    );
    Ok(Signature {
        c,
        r: k - c * txkey_sec.expose_secret(),
    })
}

/// Undecodable or mismatched keys make the proof invalid.
#[tracing::instrument(name = "Verifying sendproof", level = "debug", skip_all)]
pub fn check_sendproof(
    txkey_pub: &PublicKey,
    receiver_address_v: &PublicKey,
    derivation: &KeyDerivation,
    message_hash: &Hash,
    proof: &Signature,
) -> bool {
    let (Some(tx_point), Some(view), Some(derived)) = (
        txkey_pub.decompress(),
        receiver_address_v.decompress(),
        derivation.decompress(),
    ) else {
        tracing::debug!("sendproof key does not decode");
        return false;
    };

    let x = EdwardsPoint::vartime_double_scalar_mul_basepoint(&proof.c, &tx_point, &proof.r);
    let y = EdwardsPoint::vartime_multiscalar_mul(
        [proof.r, proof.c],
        [view.mul_by_cofactor(), derived],
    );
    challenge(message_hash, txkey_pub, receiver_address_v, derivation, &x, &y) == proof.c
}

fn challenge(
    message_hash: &Hash,
    txkey_pub: &PublicKey,
    receiver_address_v: &PublicKey,
    derivation: &KeyDerivation,
    x: &EdwardsPoint,
    y: &EdwardsPoint,
) -> Scalar {
    HashStream::new()
        .append_tag(TAG_SENDPROOF)
        .append(message_hash)
        .append(txkey_pub)
        .append(receiver_address_v)
        .append(derivation)
        .append(x)
        .append(y)
        .to_scalar_wide()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys_management::random_keypair;
    use crate::test_utils::{off_curve_key, prefix, seeded_rng};

    #[test]
    fn test_sendproof_verifies() {
        let mut rng = seeded_rng(90);
        let tx = random_keypair(&mut rng);
        let view = random_keypair(&mut rng);
        let derivation = generate_key_derivation(&view.public_key, &tx.secret_key).unwrap();
        let message = prefix("paid invoice 17");

        let proof = generate_sendproof(
            &tx.public_key,
            &tx.secret_key,
            &view.public_key,
            &derivation,
            &message,
            &mut rng,
        )
        .unwrap();
        assert!(check_sendproof(&tx.public_key, &view.public_key, &derivation, &message, &proof));

        // The receiver sees the same derivation from its side.
        let receiver_side = generate_key_derivation(&tx.public_key, &view.secret_key).unwrap();
        assert!(check_sendproof(&tx.public_key, &view.public_key, &receiver_side, &message, &proof));
    }

    #[test]
    fn test_sendproof_rejects_other_context() {
        let mut rng = seeded_rng(91);
        let tx = random_keypair(&mut rng);
        let view = random_keypair(&mut rng);
        let other = random_keypair(&mut rng);
        let derivation = generate_key_derivation(&view.public_key, &tx.secret_key).unwrap();
        let message = prefix("message");
        let proof = generate_sendproof(
            &tx.public_key,
            &tx.secret_key,
            &view.public_key,
            &derivation,
            &message,
            &mut rng,
        )
        .unwrap();

        assert!(!check_sendproof(&tx.public_key, &view.public_key, &derivation, &prefix("x"), &proof));
        assert!(!check_sendproof(&other.public_key, &view.public_key, &derivation, &message, &proof));
        assert!(!check_sendproof(&tx.public_key, &other.public_key, &derivation, &message, &proof));
        let other_derivation =
            generate_key_derivation(&other.public_key, &tx.secret_key).unwrap();
        assert!(!check_sendproof(
            &tx.public_key,
            &view.public_key,
            &other_derivation,
            &message,
            &proof
        ));
        assert!(!check_sendproof(&off_curve_key(), &view.public_key, &derivation, &message, &proof));
    }

    #[test]
    fn test_generation_misuse() {
        let mut rng = seeded_rng(92);
        let tx = random_keypair(&mut rng);
        let view = random_keypair(&mut rng);
        let other = random_keypair(&mut rng);
        let derivation = generate_key_derivation(&view.public_key, &tx.secret_key).unwrap();
        let message = prefix("misuse");

        assert_eq!(
            generate_sendproof(
                &other.public_key,
                &tx.secret_key,
                &view.public_key,
                &derivation,
                &message,
                &mut rng
            ),
            Err(CryptoError::KeyMismatch("generate_sendproof"))
        );
        assert_eq!(
            generate_sendproof(
                &tx.public_key,
                &tx.secret_key,
                &other.public_key,
                &derivation,
                &message,
                &mut rng
            ),
            Err(CryptoError::KeyMismatch("generate_sendproof"))
        );
        assert_eq!(
            generate_sendproof(
                &tx.public_key,
                &tx.secret_key,
                &off_curve_key(),
                &derivation,
                &message,
                &mut rng
            ),
            Err(CryptoError::InvalidPublicKey("generate_sendproof"))
        );
    }
}
