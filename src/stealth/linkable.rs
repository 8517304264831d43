//! Stealth outputs bound to the spending transaction's inputs.
//!
//! The sender picks a fresh output secret `r` per output and publishes
//! `E = r·V`. The spend scalar is `ss = Hs(tag ‖ r·G ‖ inputs_hash ‖ i)` and
//! the output key is `P = ss·G + S`. The receiver opens `E` with `v⁻¹` to get
//! `r·G` back. Folding in the inputs hash makes output keys of distinct
//! transactions distinct even when an address and index repeat.
//!
//! Computing `ss` is the expensive part, so the receiver gets it back from
//! [`linkable_underive_address_s`] and passes it on explicitly.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use secrecy::ExposeSecret;

use super::{RecognizedOutput, StealthOutput};
use crate::error::CryptoError;
use crate::hash_stream::HashStream;
use crate::types::{Hash, PublicKey, SecretKey};

const TAG_LINKABLE: &str = "linkable_output";

fn spend_scalar(output_secret_point: &EdwardsPoint, tx_inputs_hash: &Hash, output_index: usize) -> Scalar {
    HashStream::new()
        .append_tag(TAG_LINKABLE)
        .append(output_secret_point)
        .append(tx_inputs_hash)
        .append(&output_index)
        .to_scalar_wide()
}

/// Sender side. Fails only when the receiver's address keys do not decode.
#[tracing::instrument(
    name = "Deriving linkable output",
    level = "debug",
    skip_all,
    fields(output_index = output_index)
)]
pub fn linkable_derive_output_public_key(
    output_secret: &SecretKey,
    tx_inputs_hash: &Hash,
    output_index: usize,
    address_s: &PublicKey,
    address_v: &PublicKey,
) -> Result<StealthOutput, CryptoError> {
    const OP: &str = "linkable_derive_output_public_key";

    let spend = address_s
        .decompress()
        .ok_or(CryptoError::InvalidPublicKey(OP))?;
    let view = address_v
        .decompress()
        .ok_or(CryptoError::InvalidPublicKey(OP))?;

    let r = output_secret.expose_secret();
    let ss = spend_scalar(&EdwardsPoint::mul_base(r), tx_inputs_hash, output_index);
    Ok(StealthOutput {
        output_public_key: PublicKey::from_point(&(EdwardsPoint::mul_base(&ss) + spend)),
        encrypted_output_secret: PublicKey::from_point(&(r * view)),
    })
}

/// Receiver side: recovers the spend public key the output pays to, using the
/// inverted view secret. The caller compares `address_s` with its own keys.
pub fn linkable_underive_address_s(
    inv_view_secret_key: &SecretKey,
    tx_inputs_hash: &Hash,
    output_index: usize,
    output_public_key: &PublicKey,
    encrypted_output_secret: &PublicKey,
) -> Option<RecognizedOutput> {
    let output = output_public_key.decompress()?;
    let encrypted = encrypted_output_secret.decompress()?;

    let output_secret_point = inv_view_secret_key.expose_secret() * encrypted;
    let ss = spend_scalar(&output_secret_point, tx_inputs_hash, output_index);
    Some(RecognizedOutput {
        address_s: PublicKey::from_point(&(output - EdwardsPoint::mul_base(&ss))),
        spend_scalar: SecretKey::new(ss),
    })
}

/// `s + ss`
pub fn linkable_derive_output_secret_key(address_s: &SecretKey, spend_scalar: &SecretKey) -> SecretKey {
    SecretKey::new(address_s.expose_secret() + spend_scalar.expose_secret())
}

/// Sender side: recovers the destination `(S, V)` from the output secret.
pub fn linkable_underive_address(
    output_secret: &SecretKey,
    tx_inputs_hash: &Hash,
    output_index: usize,
    output_public_key: &PublicKey,
    encrypted_output_secret: &PublicKey,
) -> Option<(PublicKey, PublicKey)> {
    let output = output_public_key.decompress()?;
    let encrypted = encrypted_output_secret.decompress()?;

    let r = output_secret.expose_secret();
    let ss = spend_scalar(&EdwardsPoint::mul_base(r), tx_inputs_hash, output_index);
    let address_s = output - EdwardsPoint::mul_base(&ss);
    let address_v = r.invert() * encrypted;
    Some((PublicKey::from_point(&address_s), PublicKey::from_point(&address_v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys_management::{keys_match, random_keypair};
    use crate::test_utils::{off_curve_key, prefix, seeded_rng};

    #[test]
    fn test_receiver_recognizes_and_spends() {
        let mut rng = seeded_rng(60);
        let spend = random_keypair(&mut rng);
        let view = random_keypair(&mut rng);
        let output_secret = random_keypair(&mut rng).secret_key;
        let inputs_hash = prefix("inputs");

        let out = linkable_derive_output_public_key(
            &output_secret,
            &inputs_hash,
            3,
            &spend.public_key,
            &view.public_key,
        )
        .unwrap();

        let recognized = linkable_underive_address_s(
            &view.secret_key.invert(),
            &inputs_hash,
            3,
            &out.output_public_key,
            &out.encrypted_output_secret,
        )
        .unwrap();
        assert_eq!(recognized.address_s, spend.public_key);

        let output_secret_key =
            linkable_derive_output_secret_key(&spend.secret_key, &recognized.spend_scalar);
        assert!(keys_match(&output_secret_key, &out.output_public_key));
    }

    #[test]
    fn test_sender_restores_destination() {
        let mut rng = seeded_rng(61);
        let spend = random_keypair(&mut rng);
        let view = random_keypair(&mut rng);
        let output_secret = random_keypair(&mut rng).secret_key;
        let inputs_hash = prefix("restore");

        let out = linkable_derive_output_public_key(
            &output_secret,
            &inputs_hash,
            0,
            &spend.public_key,
            &view.public_key,
        )
        .unwrap();
        let restored = linkable_underive_address(
            &output_secret,
            &inputs_hash,
            0,
            &out.output_public_key,
            &out.encrypted_output_secret,
        );
        assert_eq!(restored, Some((spend.public_key, view.public_key)));
    }

    #[test]
    fn test_inputs_hash_separates_outputs() {
        let mut rng = seeded_rng(62);
        let spend = random_keypair(&mut rng);
        let view = random_keypair(&mut rng);
        let output_secret = random_keypair(&mut rng).secret_key;

        let first = linkable_derive_output_public_key(
            &output_secret,
            &prefix("tx one"),
            0,
            &spend.public_key,
            &view.public_key,
        )
        .unwrap();
        let second = linkable_derive_output_public_key(
            &output_secret,
            &prefix("tx two"),
            0,
            &spend.public_key,
            &view.public_key,
        )
        .unwrap();
        assert_ne!(first.output_public_key, second.output_public_key);

        // The wrong inputs hash points at some other spend key.
        let recognized = linkable_underive_address_s(
            &view.secret_key.invert(),
            &prefix("tx two"),
            0,
            &first.output_public_key,
            &first.encrypted_output_secret,
        )
        .unwrap();
        assert_ne!(recognized.address_s, spend.public_key);
    }

    #[test]
    fn test_bad_keys() {
        let mut rng = seeded_rng(63);
        let keys = random_keypair(&mut rng);
        let inputs_hash = prefix("bad");

        assert_eq!(
            linkable_derive_output_public_key(
                &keys.secret_key,
                &inputs_hash,
                0,
                &off_curve_key(),
                &keys.public_key
            ),
            Err(CryptoError::InvalidPublicKey("linkable_derive_output_public_key"))
        );
        assert!(linkable_underive_address_s(
            &keys.secret_key,
            &inputs_hash,
            0,
            &keys.public_key,
            &off_curve_key()
        )
        .is_none());
        assert!(linkable_underive_address(
            &keys.secret_key,
            &inputs_hash,
            0,
            &off_curve_key(),
            &keys.public_key
        )
        .is_none());
    }
}
