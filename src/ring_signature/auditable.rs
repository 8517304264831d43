//! Multi-input ring signature over dual-key outputs.
//!
//! An output key is `P = a·G + s·H`, where `a` is the audit secret and `s` the
//! spend secret. Spending publishes the key image `I = s·Hp(P)` and the audit
//! image `A = a·Hp(P)`. A holder of `a` alone can recognize its outputs among
//! spent inputs through `A`, but cannot produce `I` or sign.
//!
//! For ring member `j` and challenge `c` the verifier recomputes
//! ```text
//! X = ra·G + rs·H + c·P_j
//! Y = rs·Hp(P_j) + c·I
//! Z = ra·Hp(P_j) + c·A
//! ```
//! Inside one ring the challenge of member `j + 1` hashes member `j`'s
//! commitments. The last member of every ring feeds one joint hash over all
//! inputs, which yields the `c0` each ring starts from. Sub-proofs therefore
//! cannot be lifted out of one signature and combined with another.

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::VartimeMultiscalarMul;
use rand::{CryptoRng, RngCore};
use secrecy::ExposeSecret;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::hash_stream::HashStream;
use crate::keys_management::{
    dual_public_point, generate_key_image, key_image_base, secret_keys_to_public_key, GENERATOR_H,
};
use crate::rand_nonce::random_scalar;
use crate::types::{
    AuditableResponse, AuditableRingSignature, AuditableSendproof, Hash, KeyImage, PublicKey,
    SecretKey,
};

const TAG_RING_LINK: &str = "auditable_ring_link";
const TAG_RING_JOINT: &str = "auditable_ring_joint";
const TAG_SENDPROOF: &str = "auditable_sendproof";

/// One spent input: its ring, its key image and the secrets of the real member.
#[derive(Debug, Clone)]
pub struct AuditableInput<'a> {
    pub ring: &'a [PublicKey],
    pub image: KeyImage,
    pub spend_secret: &'a SecretKey,
    pub audit_secret: &'a SecretKey,
    pub signer_index: usize,
}

#[derive(Clone, Copy)]
struct Commitments {
    x: EdwardsPoint,
    y: EdwardsPoint,
    z: EdwardsPoint,
}

/// Decoded public data of one input.
struct RingContext<'a> {
    input_index: usize,
    ring: &'a [PublicKey],
    points: Vec<EdwardsPoint>,
    bases: Vec<EdwardsPoint>,
    image: KeyImage,
    image_point: EdwardsPoint,
    audit_image: PublicKey,
    audit_point: EdwardsPoint,
}

impl<'a> RingContext<'a> {
    fn decode(
        input_index: usize,
        ring: &'a [PublicKey],
        image: KeyImage,
        audit_image: PublicKey,
    ) -> Option<Self> {
        if ring.is_empty() {
            return None;
        }
        let image_point = image.decompress().filter(EdwardsPoint::is_torsion_free)?;
        let audit_point = audit_image
            .decompress()
            .filter(EdwardsPoint::is_torsion_free)?;
        let points = ring
            .iter()
            .map(PublicKey::decompress)
            .collect::<Option<Vec<_>>>()?;
        let bases = ring.iter().map(key_image_base).collect();
        Some(RingContext {
            input_index,
            ring,
            points,
            bases,
            image,
            image_point,
            audit_image,
            audit_point,
        })
    }

    fn member_commitments(&self, j: usize, response: &AuditableResponse, c: &Scalar) -> Commitments {
        let base = self.bases[j];
        Commitments {
            x: EdwardsPoint::vartime_multiscalar_mul(
                [response.ra, response.rs, *c],
                [ED25519_BASEPOINT_POINT, *GENERATOR_H, self.points[j]],
            ),
            y: EdwardsPoint::vartime_multiscalar_mul([response.rs, *c], [base, self.image_point]),
            z: EdwardsPoint::vartime_multiscalar_mul([response.ra, *c], [base, self.audit_point]),
        }
    }

    /// Challenge for member `j + 1`, from member `j`'s commitments.
    fn link_challenge(&self, prefix_hash: &Hash, j: usize, commitments: &Commitments) -> Scalar {
        HashStream::new()
            .append_tag(TAG_RING_LINK)
            .append(prefix_hash)
            .append(&self.input_index)
            .append(&j)
            .append(&self.ring[j])
            .append(&self.image)
            .append(&self.audit_image)
            .append(&commitments.x)
            .append(&commitments.y)
            .append(&commitments.z)
            .to_scalar_wide()
    }
}

/// `c0`, binding the closing commitments of every ring together.
fn joint_challenge(prefix_hash: &Hash, contexts: &[RingContext], closing: &[Commitments]) -> Scalar {
    let mut stream = HashStream::new();
    stream
        .append_tag(TAG_RING_JOINT)
        .append(prefix_hash)
        .append(&contexts.len());
    for (ctx, commitments) in contexts.iter().zip(closing) {
        stream
            .append(&ctx.ring.len())
            .append(&ctx.ring[ctx.ring.len() - 1])
            .append(&ctx.image)
            .append(&ctx.audit_image)
            .append(&commitments.x)
            .append(&commitments.y)
            .append(&commitments.z);
    }
    stream.to_scalar_wide()
}

/// `A = a·Hp(P)`, the tag an auditor holding `a` uses to recognize a spend of `P`.
pub fn generate_audit_image(output_public_key: &PublicKey, audit_secret: &SecretKey) -> PublicKey {
    PublicKey::from_point(&(audit_secret.expose_secret() * key_image_base(output_public_key)))
}

/// True iff `audit_image` was produced by spending `output_public_key`, whose
/// audit secret is `audit_secret`.
pub fn check_audit_image(
    audit_image: &PublicKey,
    output_public_key: &PublicKey,
    audit_secret: &SecretKey,
) -> bool {
    generate_audit_image(output_public_key, audit_secret) == *audit_image
}

/// Signs all inputs under one joint challenge.
///
/// Every input must name an index inside its ring whose key equals
/// `a·G + s·H` for its secrets, and carry the matching key image; anything
/// else is a caller bug and is reported as a [`CryptoError`].
///
/// Unlike [`generate_ring_signature`](super::generate_ring_signature), the
/// ring walk starts at each signer's position, so timing depends on the
/// signer indexes.
#[tracing::instrument(
    name = "Generating auditable ring signature",
    level = "debug",
    skip_all,
    fields(inputs = inputs.len())
)]
pub fn generate_ring_signature_auditable<R: RngCore + CryptoRng>(
    prefix_hash: &Hash,
    inputs: &[AuditableInput<'_>],
    rng: &mut R,
) -> Result<AuditableRingSignature, CryptoError> {
    const OP: &str = "generate_ring_signature_auditable";

    if inputs.is_empty() {
        return Err(CryptoError::NoInputs(OP));
    }

    let mut contexts = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.iter().enumerate() {
        let signer_key = input
            .ring
            .get(input.signer_index)
            .ok_or(CryptoError::IndexOutOfRange {
                operation: OP,
                index: input.signer_index,
                len: input.ring.len(),
            })?;
        if secret_keys_to_public_key(input.audit_secret, input.spend_secret) != *signer_key
            || generate_key_image(signer_key, input.spend_secret) != input.image
        {
            return Err(CryptoError::KeyMismatch(OP));
        }
        let audit_image = generate_audit_image(signer_key, input.audit_secret);
        let ctx = RingContext::decode(i, input.ring, input.image, audit_image)
            .ok_or(CryptoError::InvalidPublicKey(OP))?;
        contexts.push(ctx);
    }

    // Signer slots are overwritten once their challenges are known.
    let mut responses = Vec::with_capacity(inputs.len());
    for input in inputs {
        let mut ring_responses = Vec::with_capacity(input.ring.len());
        for _ in 0..input.ring.len() {
            ring_responses.push(AuditableResponse {
                ra: random_scalar(rng),
                rs: random_scalar(rng),
            });
        }
        responses.push(ring_responses);
    }

    let mut nonces = Vec::with_capacity(inputs.len());
    let mut closing = Vec::with_capacity(inputs.len());
    for ((ctx, input), ring_responses) in contexts.iter().zip(inputs).zip(&responses) {
        let ka = Zeroizing::new(random_scalar(rng));
        let ks = Zeroizing::new(random_scalar(rng));
        let base = ctx.bases[input.signer_index];
        let mut commitments = Commitments {
            x: dual_public_point(&ka, &ks),
            y: *ks * base,
            z: *ka * base,
        };
        for j in input.signer_index + 1..ctx.ring.len() {
            let c = ctx.link_challenge(prefix_hash, j - 1, &commitments);
            commitments = ctx.member_commitments(j, &ring_responses[j], &c);
        }
        closing.push(commitments);
        nonces.push((ka, ks));
    }

    let c0 = joint_challenge(prefix_hash, &contexts, &closing);

    for (((ctx, input), ring_responses), (ka, ks)) in contexts
        .iter()
        .zip(inputs)
        .zip(responses.iter_mut())
        .zip(&nonces)
    {
        let mut c = c0;
        for (j, response) in ring_responses.iter().enumerate().take(input.signer_index) {
            let commitments = ctx.member_commitments(j, response, &c);
            c = ctx.link_challenge(prefix_hash, j, &commitments);
        }
        ring_responses[input.signer_index] = AuditableResponse {
            ra: **ka - c * input.audit_secret.expose_secret(),
            rs: **ks - c * input.spend_secret.expose_secret(),
        };
    }

    Ok(AuditableRingSignature {
        c0,
        audit_images: contexts.iter().map(|ctx| ctx.audit_image).collect(),
        responses,
    })
}

/// Parallel-array form of [`generate_ring_signature_auditable`]. Any length
/// disagreement between the arrays is reported as `LengthMismatch`.
pub fn generate_ring_signature_auditable_from_parts<R, T>(
    prefix_hash: &Hash,
    images: &[KeyImage],
    rings: &[T],
    spend_secrets: &[SecretKey],
    audit_secrets: &[SecretKey],
    signer_indexes: &[usize],
    rng: &mut R,
) -> Result<AuditableRingSignature, CryptoError>
where
    R: RngCore + CryptoRng,
    T: AsRef<[PublicKey]>,
{
    const OP: &str = "generate_ring_signature_auditable";

    let expected = images.len();
    for (field, actual) in [
        ("rings", rings.len()),
        ("spend_secrets", spend_secrets.len()),
        ("audit_secrets", audit_secrets.len()),
        ("signer_indexes", signer_indexes.len()),
    ] {
        if actual != expected {
            return Err(CryptoError::LengthMismatch {
                operation: OP,
                field,
                expected,
                actual,
            });
        }
    }

    let inputs: Vec<AuditableInput> = images
        .iter()
        .zip(rings)
        .zip(spend_secrets.iter().zip(audit_secrets))
        .zip(signer_indexes)
        .map(
            |(((image, ring), (spend_secret, audit_secret)), signer_index)| AuditableInput {
                ring: ring.as_ref(),
                image: *image,
                spend_secret,
                audit_secret,
                signer_index: *signer_index,
            },
        )
        .collect();

    generate_ring_signature_auditable(prefix_hash, &inputs, rng)
}

/// All-or-nothing verification: one inconsistent input rejects the whole
/// signature.
#[tracing::instrument(
    name = "Verifying auditable ring signature",
    level = "debug",
    skip_all,
    fields(inputs = images.len())
)]
pub fn check_ring_signature_auditable<T: AsRef<[PublicKey]>>(
    prefix_hash: &Hash,
    images: &[KeyImage],
    rings: &[T],
    sig: &AuditableRingSignature,
) -> bool {
    let count = images.len();
    if count == 0
        || rings.len() != count
        || sig.responses.len() != count
        || sig.audit_images.len() != count
    {
        tracing::debug!("input counts disagree");
        return false;
    }

    let mut contexts = Vec::with_capacity(count);
    for (i, ((image, ring), audit_image)) in images
        .iter()
        .zip(rings)
        .zip(&sig.audit_images)
        .enumerate()
    {
        let ring = ring.as_ref();
        if ring.len() != sig.responses[i].len() {
            tracing::debug!(input = i, "ring and response sizes differ");
            return false;
        }
        let Some(ctx) = RingContext::decode(i, ring, *image, *audit_image) else {
            tracing::debug!(input = i, "input does not decode");
            return false;
        };
        contexts.push(ctx);
    }

    let mut closing = Vec::with_capacity(count);
    for (ctx, ring_responses) in contexts.iter().zip(&sig.responses) {
        let mut c = sig.c0;
        let last = ring_responses.len() - 1;
        for (j, response) in ring_responses.iter().enumerate() {
            let commitments = ctx.member_commitments(j, response, &c);
            if j == last {
                closing.push(commitments);
            } else {
                c = ctx.link_challenge(prefix_hash, j, &commitments);
            }
        }
    }

    joint_challenge(prefix_hash, &contexts, &closing) == sig.c0
}

/// Proves that `image` is the key image of the output `a·G + s·H`, outside
/// of any ring.
#[tracing::instrument(name = "Generating auditable sendproof", level = "debug", skip_all)]
pub fn generate_sendproof_signature_auditable<R: RngCore + CryptoRng>(
    prefix_hash: &Hash,
    image: &KeyImage,
    spend_secret: &SecretKey,
    audit_secret: &SecretKey,
    rng: &mut R,
) -> Result<AuditableSendproof, CryptoError> {
    let output_public_key = secret_keys_to_public_key(audit_secret, spend_secret);
    if generate_key_image(&output_public_key, spend_secret) != *image {
        return Err(CryptoError::KeyMismatch(
            "generate_sendproof_signature_auditable",
        ));
    }

    let base = key_image_base(&output_public_key);
    let ka = Zeroizing::new(random_scalar(rng));
    let ks = Zeroizing::new(random_scalar(rng));
    let x = dual_public_point(&ka, &ks);
    let y = *ks * base;

    let c = sendproof_challenge(prefix_hash, &output_public_key, image, &x, &y);
    Ok(AuditableSendproof {
        c,
        ra: *ka - c * audit_secret.expose_secret(),
        rs: *ks - c * spend_secret.expose_secret(),
    })
}

#[tracing::instrument(name = "Verifying auditable sendproof", level = "debug", skip_all)]
pub fn check_sendproof_signature_auditable(
    prefix_hash: &Hash,
    image: &KeyImage,
    output_public_key: &PublicKey,
    proof: &AuditableSendproof,
) -> bool {
    let Some(point) = output_public_key.decompress() else {
        return false;
    };
    let Some(image_point) = image.decompress().filter(EdwardsPoint::is_torsion_free) else {
        return false;
    };
    let base = key_image_base(output_public_key);
    let x = EdwardsPoint::vartime_multiscalar_mul(
        [proof.ra, proof.rs, proof.c],
        [ED25519_BASEPOINT_POINT, *GENERATOR_H, point],
    );
    let y = EdwardsPoint::vartime_multiscalar_mul([proof.rs, proof.c], [base, image_point]);

    sendproof_challenge(prefix_hash, output_public_key, image, &x, &y) == proof.c
}

fn sendproof_challenge(
    prefix_hash: &Hash,
    output_public_key: &PublicKey,
    image: &KeyImage,
    x: &EdwardsPoint,
    y: &EdwardsPoint,
) -> Scalar {
    HashStream::new()
        .append_tag(TAG_SENDPROOF)
        .append(prefix_hash)
        .append(output_public_key)
        .append(image)
        .append(x)
        .append(y)
        .to_scalar_wide()
}
