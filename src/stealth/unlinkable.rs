//! Stealth outputs for dual-key addresses.
//!
//! An address is `(S, Sv)` with `S = a·G + s·H` and `Sv = v·S`. The sender
//! picks a random output secret point `Q`, computes
//! `ss = Hs(tag ‖ Q ‖ inputs_hash ‖ i)` and publishes
//! ```text
//! P = ss·S
//! E = Q + ss·Sv
//! ```
//! The receiver needs only `v` to compute `P_v = v·P = ss·Sv` (step 1), which
//! unmasks `Q = E - P_v` and with it `ss` and `S = ss⁻¹·P` (step 2). The
//! output is then spendable with audit secret `a·ss` and spend secret `s·ss`.
//!
//! Step 1 is the only one touching the view secret, so a constrained device
//! can run it while the host completes step 2.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use secrecy::ExposeSecret;

use super::{RecognizedOutput, StealthOutput};
use crate::error::CryptoError;
use crate::hash_stream::HashStream;
use crate::types::{Hash, PublicKey, SecretKey};

const TAG_UNLINKABLE: &str = "unlinkable_output";

fn spend_scalar(output_secret: &EdwardsPoint, tx_inputs_hash: &Hash, output_index: usize) -> Scalar {
    HashStream::new()
        .append_tag(TAG_UNLINKABLE)
        .append(output_secret)
        .append(tx_inputs_hash)
        .append(&output_index)
        .to_scalar_wide()
}

/// Sender side. Fails only when a public input does not decode.
#[tracing::instrument(
    name = "Deriving unlinkable output",
    level = "debug",
    skip_all,
    fields(output_index = output_index)
)]
pub fn unlinkable_derive_output_public_key(
    output_secret: &PublicKey,
    tx_inputs_hash: &Hash,
    output_index: usize,
    address_s: &PublicKey,
    address_sv: &PublicKey,
) -> Result<StealthOutput, CryptoError> {
    const OP: &str = "unlinkable_derive_output_public_key";

    let q = output_secret
        .decompress()
        .ok_or(CryptoError::InvalidPublicKey(OP))?;
    let spend = address_s
        .decompress()
        .ok_or(CryptoError::InvalidPublicKey(OP))?;
    let spend_view = address_sv
        .decompress()
        .ok_or(CryptoError::InvalidPublicKey(OP))?;

    let ss = spend_scalar(&q, tx_inputs_hash, output_index);
    Ok(StealthOutput {
        output_public_key: PublicKey::from_point(&(ss * spend)),
        encrypted_output_secret: PublicKey::from_point(&(q + ss * spend_view)),
    })
}

/// View-key step: `P_v = v·P`.
pub fn unlinkable_underive_address_s_step1(
    view_secret_key: &SecretKey,
    output_public_key: &PublicKey,
) -> Option<PublicKey> {
    let output = output_public_key.decompress()?;
    Some(PublicKey::from_point(&(view_secret_key.expose_secret() * output)))
}

/// Completes recognition from `P_v` and the output's public data.
pub fn unlinkable_underive_address_s_step2(
    p_v: &PublicKey,
    tx_inputs_hash: &Hash,
    output_index: usize,
    output_public_key: &PublicKey,
    encrypted_output_secret: &PublicKey,
) -> Option<RecognizedOutput> {
    let p_v = p_v.decompress()?;
    let output = output_public_key.decompress()?;
    let encrypted = encrypted_output_secret.decompress()?;

    let q = encrypted - p_v;
    let ss = spend_scalar(&q, tx_inputs_hash, output_index);
    Some(RecognizedOutput {
        address_s: PublicKey::from_point(&(ss.invert() * output)),
        spend_scalar: SecretKey::new(ss),
    })
}

/// Both receiver steps in one call, for wallets holding the view secret.
pub fn unlinkable_underive_address_s(
    view_secret_key: &SecretKey,
    tx_inputs_hash: &Hash,
    output_index: usize,
    output_public_key: &PublicKey,
    encrypted_output_secret: &PublicKey,
) -> Option<RecognizedOutput> {
    let p_v = unlinkable_underive_address_s_step1(view_secret_key, output_public_key)?;
    unlinkable_underive_address_s_step2(
        &p_v,
        tx_inputs_hash,
        output_index,
        output_public_key,
        encrypted_output_secret,
    )
}

/// `secret·ss`, for either the audit or the spend secret of the address.
pub fn unlinkable_derive_output_secret_key(address_secret: &SecretKey, spend_scalar: &SecretKey) -> SecretKey {
    SecretKey::new(address_secret.expose_secret() * spend_scalar.expose_secret())
}

/// Sender side: recovers the destination `(S, Sv)` from the output secret point.
pub fn unlinkable_underive_address(
    output_secret: &PublicKey,
    tx_inputs_hash: &Hash,
    output_index: usize,
    output_public_key: &PublicKey,
    encrypted_output_secret: &PublicKey,
) -> Option<(PublicKey, PublicKey)> {
    let q = output_secret.decompress()?;
    let output = output_public_key.decompress()?;
    let encrypted = encrypted_output_secret.decompress()?;

    let inv_ss = spend_scalar(&q, tx_inputs_hash, output_index).invert();
    let address_s = inv_ss * output;
    let address_sv = inv_ss * (encrypted - q);
    Some((PublicKey::from_point(&address_s), PublicKey::from_point(&address_sv)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys_management::{random_keypair, secret_keys_to_public_key};
    use crate::test_utils::{off_curve_key, prefix, seeded_rng};

    struct Address {
        audit: SecretKey,
        spend: SecretKey,
        view: SecretKey,
        s: PublicKey,
        sv: PublicKey,
    }

    fn address(rng: &mut rand::rngs::StdRng) -> Address {
        let audit = random_keypair(rng).secret_key;
        let spend = random_keypair(rng).secret_key;
        let view = random_keypair(rng).secret_key;
        let s = secret_keys_to_public_key(&audit, &spend);
        let sv = PublicKey::from_point(&(view.expose_secret() * s.decompress().unwrap()));
        Address {
            audit,
            spend,
            view,
            s,
            sv,
        }
    }

    #[test]
    fn test_receiver_recognizes_and_spends() {
        let mut rng = seeded_rng(70);
        let addr = address(&mut rng);
        let q = random_keypair(&mut rng).public_key;
        let inputs_hash = prefix("inputs");

        let out =
            unlinkable_derive_output_public_key(&q, &inputs_hash, 2, &addr.s, &addr.sv).unwrap();
        let recognized = unlinkable_underive_address_s(
            &addr.view,
            &inputs_hash,
            2,
            &out.output_public_key,
            &out.encrypted_output_secret,
        )
        .unwrap();
        assert_eq!(recognized.address_s, addr.s);

        let audit = unlinkable_derive_output_secret_key(&addr.audit, &recognized.spend_scalar);
        let spend = unlinkable_derive_output_secret_key(&addr.spend, &recognized.spend_scalar);
        assert_eq!(secret_keys_to_public_key(&audit, &spend), out.output_public_key);
    }

    #[test]
    fn test_two_steps_match_single_call() {
        let mut rng = seeded_rng(71);
        let addr = address(&mut rng);
        let q = random_keypair(&mut rng).public_key;
        let inputs_hash = prefix("steps");

        let out =
            unlinkable_derive_output_public_key(&q, &inputs_hash, 0, &addr.s, &addr.sv).unwrap();
        let p_v = unlinkable_underive_address_s_step1(&addr.view, &out.output_public_key).unwrap();
        let stepped = unlinkable_underive_address_s_step2(
            &p_v,
            &inputs_hash,
            0,
            &out.output_public_key,
            &out.encrypted_output_secret,
        )
        .unwrap();
        let direct = unlinkable_underive_address_s(
            &addr.view,
            &inputs_hash,
            0,
            &out.output_public_key,
            &out.encrypted_output_secret,
        )
        .unwrap();
        assert_eq!(stepped.address_s, direct.address_s);
        assert_eq!(stepped.spend_scalar.to_bytes(), direct.spend_scalar.to_bytes());
    }

    #[test]
    fn test_foreign_view_key_does_not_recognize() {
        let mut rng = seeded_rng(72);
        let addr = address(&mut rng);
        let stranger = address(&mut rng);
        let q = random_keypair(&mut rng).public_key;
        let inputs_hash = prefix("foreign");

        let out =
            unlinkable_derive_output_public_key(&q, &inputs_hash, 0, &addr.s, &addr.sv).unwrap();
        let seen = unlinkable_underive_address_s(
            &stranger.view,
            &inputs_hash,
            0,
            &out.output_public_key,
            &out.encrypted_output_secret,
        )
        .unwrap();
        assert_ne!(seen.address_s, addr.s);
        assert_ne!(seen.address_s, stranger.s);
    }

    #[test]
    fn test_sender_restores_destination() {
        let mut rng = seeded_rng(73);
        let addr = address(&mut rng);
        let q = random_keypair(&mut rng).public_key;
        let inputs_hash = prefix("restore");

        let out =
            unlinkable_derive_output_public_key(&q, &inputs_hash, 9, &addr.s, &addr.sv).unwrap();
        let restored = unlinkable_underive_address(
            &q,
            &inputs_hash,
            9,
            &out.output_public_key,
            &out.encrypted_output_secret,
        );
        assert_eq!(restored, Some((addr.s, addr.sv)));
    }

    #[test]
    fn test_bad_keys() {
        let mut rng = seeded_rng(74);
        let addr = address(&mut rng);
        let inputs_hash = prefix("bad");

        assert_eq!(
            unlinkable_derive_output_public_key(
                &off_curve_key(),
                &inputs_hash,
                0,
                &addr.s,
                &addr.sv
            ),
            Err(CryptoError::InvalidPublicKey(
                "unlinkable_derive_output_public_key"
            ))
        );
        assert!(unlinkable_underive_address_s_step1(&addr.view, &off_curve_key()).is_none());
        assert!(unlinkable_underive_address_s_step2(
            &addr.s,
            &inputs_hash,
            0,
            &addr.s,
            &off_curve_key()
        )
        .is_none());
        assert!(
            unlinkable_underive_address(&off_curve_key(), &inputs_hash, 0, &addr.s, &addr.sv)
                .is_none()
        );
    }
}
