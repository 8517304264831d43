//! Classic linkable ring signature.
//!
//! For ring `P_0..P_{n-1}` and key image `I`, member `i` contributes
//! ```text
//! L_i = r_i·G + c_i·P_i
//! R_i = r_i·Hp(P_i) + c_i·I
//! ```
//! and the signature is valid iff `Σ c_i = Hs(prefix, I, L_0, R_0, ..., L_{n-1}, R_{n-1})`,
//! with the commitments absorbed in ring order.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::VartimeMultiscalarMul;
use rand::{CryptoRng, RngCore};
use secrecy::ExposeSecret;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::error::CryptoError;
use crate::hash_stream::HashStream;
use crate::keys_management::{generate_key_image, key_image_base, keys_match};
use crate::rand_nonce::{random_scalar, RandomNonce};
use crate::types::{Hash, KeyImage, PublicKey, RingSignature, SecretKey, Signature};

const TAG_RING: &str = "ring_signature";

/// Proves that the signer owns `pubs[signer_index]` and that `image` is its
/// key image, without revealing the index.
///
/// Every member gets random `(c, r)` and both the decoy and the honest
/// commitments are computed for every member; the signer's position is picked
/// out with constant-time selection, so neither control flow nor the number of
/// point operations depends on `signer_index`.
#[tracing::instrument(
    name = "Generating ring signature",
    level = "debug",
    skip_all,
    fields(ring_size = pubs.len())
)]
pub fn generate_ring_signature<R: RngCore + CryptoRng>(
    prefix_hash: &Hash,
    image: &KeyImage,
    pubs: &[PublicKey],
    secret_key: &SecretKey,
    signer_index: usize,
    rng: &mut R,
) -> Result<RingSignature, CryptoError> {
    const OP: &str = "generate_ring_signature";

    let signer_key = pubs.get(signer_index).ok_or(CryptoError::IndexOutOfRange {
        operation: OP,
        index: signer_index,
        len: pubs.len(),
    })?;
    if !keys_match(secret_key, signer_key) || generate_key_image(signer_key, secret_key) != *image
    {
        return Err(CryptoError::KeyMismatch(OP));
    }
    let image_point = image.decompress().ok_or(CryptoError::InvalidPublicKey(OP))?;
    let points = pubs
        .iter()
        .map(PublicKey::decompress)
        .collect::<Option<Vec<_>>>()
        .ok_or(CryptoError::InvalidPublicKey(OP))?;

    let nonce = RandomNonce::new_rand(rng);
    let k = nonce.r_private.expose_secret();
    let mut stream = ring_stream(prefix_hash, image);
    let mut decoy_sum = Scalar::ZERO;
    let mut members = Vec::with_capacity(pubs.len());

    for (i, (key, point)) in pubs.iter().zip(&points).enumerate() {
        let is_signer = signer_choice(i, signer_index);
        let c = random_scalar(rng);
        let r = random_scalar(rng);
        let base = key_image_base(key);

        let decoy_l = EdwardsPoint::vartime_double_scalar_mul_basepoint(&c, point, &r);
        let decoy_r = EdwardsPoint::vartime_multiscalar_mul([r, c], [base, image_point]);
        let honest_r = k * base;

        let l = EdwardsPoint::conditional_select(&decoy_l, &nonce.r_public, is_signer);
        let r_point = EdwardsPoint::conditional_select(&decoy_r, &honest_r, is_signer);
        stream.append(&l).append(&r_point);

        decoy_sum += Scalar::conditional_select(&c, &Scalar::ZERO, is_signer);
        members.push(Signature { c, r });
    }

    let signer_c = stream.to_scalar_wide() - decoy_sum;
    let signer_r = k - signer_c * secret_key.expose_secret();
    for (i, member) in members.iter_mut().enumerate() {
        let is_signer = signer_choice(i, signer_index);
        member.c.conditional_assign(&signer_c, is_signer);
        member.r.conditional_assign(&signer_r, is_signer);
    }

    Ok(RingSignature(members))
}

/// Recomputes every member's commitments and accepts iff the challenges sum
/// to the hash of all of them. Any malformed input yields `false`.
#[tracing::instrument(
    name = "Verifying ring signature",
    level = "debug",
    skip_all,
    fields(ring_size = pubs.len())
)]
pub fn check_ring_signature(
    prefix_hash: &Hash,
    image: &KeyImage,
    pubs: &[PublicKey],
    sig: &RingSignature,
) -> bool {
    if pubs.is_empty() || sig.len() != pubs.len() {
        tracing::debug!(signature_size = sig.len(), "ring and signature sizes differ");
        return false;
    }
    // An image with a torsion component would let one key spend twice.
    let Some(image_point) = image.decompress().filter(EdwardsPoint::is_torsion_free) else {
        tracing::debug!("key image is not a main-subgroup point");
        return false;
    };

    let mut stream = ring_stream(prefix_hash, image);
    let mut sum = Scalar::ZERO;
    for (key, member) in pubs.iter().zip(&sig.0) {
        let Some(point) = key.decompress() else {
            tracing::debug!("ring member does not decode");
            return false;
        };
        let l = EdwardsPoint::vartime_double_scalar_mul_basepoint(&member.c, &point, &member.r);
        let r = EdwardsPoint::vartime_multiscalar_mul(
            [member.r, member.c],
            [key_image_base(key), image_point],
        );
        stream.append(&l).append(&r);
        sum += member.c;
    }

    stream.to_scalar_wide() == sum
}

fn ring_stream(prefix_hash: &Hash, image: &KeyImage) -> HashStream {
    let mut stream = HashStream::new();
    stream.append_tag(TAG_RING).append(prefix_hash).append(image);
    stream
}

fn signer_choice(index: usize, signer_index: usize) -> Choice {
    (index as u64).ct_eq(&(signer_index as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys_management::KeyPair;
    use crate::test_utils::{keypairs, off_curve_key, prefix, seeded_rng};
    use curve25519_dalek::constants::EIGHT_TORSION;

    fn sign(
        rng: &mut rand::rngs::StdRng,
        ring: &[KeyPair],
        signer_index: usize,
        prefix_hash: &Hash,
    ) -> (Vec<PublicKey>, KeyImage, RingSignature) {
        let pubs: Vec<PublicKey> = ring.iter().map(|k| k.public_key).collect();
        let signer = &ring[signer_index];
        let image = generate_key_image(&signer.public_key, &signer.secret_key);
        let sig = generate_ring_signature(
            prefix_hash,
            &image,
            &pubs,
            &signer.secret_key,
            signer_index,
            rng,
        )
        .unwrap();
        (pubs, image, sig)
    }

    #[test]
    fn test_ring_sizes_and_positions_verify() {
        let mut rng = seeded_rng(30);
        let prefix_hash = prefix("ring sizes");
        for n in 1..=16 {
            let ring = keypairs(&mut rng, n);
            let mut positions = vec![0, n / 2, n - 1];
            positions.dedup();
            for signer_index in positions {
                let (pubs, image, sig) = sign(&mut rng, &ring, signer_index, &prefix_hash);
                assert_eq!(sig.len(), n);
                assert!(
                    check_ring_signature(&prefix_hash, &image, &pubs, &sig),
                    "ring of {} signed at {}",
                    n,
                    signer_index
                );
            }
        }
    }

    #[test]
    fn test_single_member_ring() {
        let mut rng = seeded_rng(31);
        let ring = keypairs(&mut rng, 1);
        let prefix_hash = prefix("alone");
        let (pubs, image, sig) = sign(&mut rng, &ring, 0, &prefix_hash);
        assert!(check_ring_signature(&prefix_hash, &image, &pubs, &sig));
    }

    #[test]
    fn test_tampering_any_member_invalidates() {
        let mut rng = seeded_rng(32);
        let ring = keypairs(&mut rng, 5);
        let prefix_hash = prefix("tamper");
        let (pubs, image, sig) = sign(&mut rng, &ring, 2, &prefix_hash);

        for i in 0..pubs.len() {
            let mut bad = sig.clone();
            bad.0[i].c += Scalar::ONE;
            assert!(!check_ring_signature(&prefix_hash, &image, &pubs, &bad));

            let mut bad = sig.clone();
            bad.0[i].r += Scalar::ONE;
            assert!(!check_ring_signature(&prefix_hash, &image, &pubs, &bad));

            let mut bad_pubs = pubs.clone();
            bad_pubs[i] = KeyPair::create(&mut rng).public_key;
            assert!(!check_ring_signature(&prefix_hash, &image, &bad_pubs, &sig));
        }

        assert!(!check_ring_signature(&prefix("other"), &image, &pubs, &sig));
        let other_image = generate_key_image(&pubs[0], &ring[0].secret_key);
        assert!(!check_ring_signature(&prefix_hash, &other_image, &pubs, &sig));
    }

    #[test]
    fn test_malformed_inputs_are_rejected() {
        let mut rng = seeded_rng(33);
        let ring = keypairs(&mut rng, 3);
        let prefix_hash = prefix("malformed");
        let (pubs, image, sig) = sign(&mut rng, &ring, 1, &prefix_hash);

        let mut short = sig.clone();
        short.0.pop();
        assert!(!check_ring_signature(&prefix_hash, &image, &pubs, &short));
        assert!(!check_ring_signature(&prefix_hash, &image, &[], &RingSignature::default()));

        let mut bad_pubs = pubs.clone();
        bad_pubs[0] = off_curve_key();
        assert!(!check_ring_signature(&prefix_hash, &image, &bad_pubs, &sig));

        let torsioned = KeyImage::from_point(&(image.decompress().unwrap() + EIGHT_TORSION[1]));
        assert!(!check_ring_signature(&prefix_hash, &torsioned, &pubs, &sig));
    }

    #[test]
    fn test_generation_misuse_is_an_invariant_violation() {
        let mut rng = seeded_rng(34);
        let ring = keypairs(&mut rng, 3);
        let pubs: Vec<PublicKey> = ring.iter().map(|k| k.public_key).collect();
        let image = generate_key_image(&pubs[1], &ring[1].secret_key);
        let prefix_hash = prefix("misuse");

        assert_eq!(
            generate_ring_signature(&prefix_hash, &image, &pubs, &ring[1].secret_key, 3, &mut rng),
            Err(CryptoError::IndexOutOfRange {
                operation: "generate_ring_signature",
                index: 3,
                len: 3
            })
        );
        assert_eq!(
            generate_ring_signature(&prefix_hash, &image, &pubs, &ring[1].secret_key, 0, &mut rng),
            Err(CryptoError::KeyMismatch("generate_ring_signature"))
        );
        assert!(matches!(
            generate_ring_signature(&prefix_hash, &image, &[], &ring[1].secret_key, 0, &mut rng),
            Err(CryptoError::IndexOutOfRange { len: 0, .. })
        ));
    }
}
