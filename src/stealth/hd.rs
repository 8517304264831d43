//! Deterministic spend keys for unlinkable addresses.
//!
//! A wallet holds `a0` and `s` and publishes nothing but the anchor
//! `A = a0·G + s·H`. Key `i` shifts the audit part by
//! `δ_i = Hs(tag ‖ A ‖ varint(i))`:
//! ```text
//! a_i  = a0 + δ_i
//! S_i  = A + δ_i·G       = a_i·G + s·H
//! Sv_i = v·A + δ_i·V     = v·S_i
//! ```
//! so a watch-only party holding `A`, `v·A` and `V` regenerates every address
//! without any secret.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use secrecy::ExposeSecret;

use crate::error::CryptoError;
use crate::hash_stream::HashStream;
use crate::types::{PublicKey, SecretKey};

const TAG_HD: &str = "hd_spend_key";

/// Audit secret `a_i` together with the address spend key `S_i = a_i·G + s·H`.
#[derive(Debug, Clone)]
pub struct HdSpendKey {
    pub audit_secret_key: SecretKey,
    pub public_key: PublicKey,
}

fn hd_delta(anchor: &PublicKey, index: usize) -> Scalar {
    HashStream::new()
        .append_tag(TAG_HD)
        .append(anchor)
        .append(&index)
        .to_scalar_wide()
}

/// `a0 + δ_i`
pub fn generate_hd_secretkey(a0: &SecretKey, anchor: &PublicKey, index: usize) -> SecretKey {
    SecretKey::new(a0.expose_secret() + hd_delta(anchor, index))
}

/// `S_i = A + δ_i·G`, computable without any secret.
pub fn generate_hd_spend_public_key(anchor: &PublicKey, index: usize) -> Option<PublicKey> {
    let anchor_point = anchor.decompress()?;
    let delta = hd_delta(anchor, index);
    Some(PublicKey::from_point(&(anchor_point + EdwardsPoint::mul_base(&delta))))
}

/// `Sv_i = v·A + δ_i·V`, the view half of address `i` for watch-only wallets.
pub fn generate_hd_spendkey(
    v_mul_anchor: &PublicKey,
    anchor: &PublicKey,
    view_public_key: &PublicKey,
    index: usize,
) -> Option<PublicKey> {
    let v_anchor = v_mul_anchor.decompress()?;
    let view = view_public_key.decompress()?;
    let delta = hd_delta(anchor, index);
    Some(PublicKey::from_point(&(v_anchor + delta * view)))
}

/// Keys `start..start + count`. Fails when `anchor` does not decode, or when
/// the range overflows.
#[tracing::instrument(
    name = "Generating HD spend keys",
    level = "debug",
    skip_all,
    fields(start = start, count = count)
)]
pub fn generate_hd_spendkeys(
    a0: &SecretKey,
    anchor: &PublicKey,
    start: usize,
    count: usize,
) -> Result<Vec<HdSpendKey>, CryptoError> {
    const OP: &str = "generate_hd_spendkeys";

    let anchor_point = anchor
        .decompress()
        .ok_or(CryptoError::InvalidPublicKey(OP))?;
    let end = start.checked_add(count).ok_or(CryptoError::IndexOutOfRange {
        operation: OP,
        index: start,
        len: count,
    })?;

    Ok((start..end)
        .map(|index| {
            let delta = hd_delta(anchor, index);
            HdSpendKey {
                audit_secret_key: SecretKey::new(a0.expose_secret() + delta),
                public_key: PublicKey::from_point(&(anchor_point + EdwardsPoint::mul_base(&delta))),
            }
        })
        .collect())
}
