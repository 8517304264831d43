//! # Ring & Stealth Crypto Library
//!
//! This Rust library implements the cryptographic protocol layer of a privacy-preserving
//! cryptocurrency on top of the curve25519_dalek library: key handling, Schnorr and ring
//! signatures, stealth addresses and payment proofs.
//!
//! ## Building Blocks
//!
//! - Group: the Ed25519 curve with base point G, group order L and cofactor 8. A second base
//!   point H = Hp(G) is used for dual (audit + spend) keys.
//! - Hash oracle: a Keccak stream ([`hash_stream::HashStream`]) absorbing domain tags, fixed-width
//!   values and varint sizes, finalized into digests, scalars (`Hs`) or curve points (`Hp`).
//! - Key image: I = s·Hp(P). Spending the same key twice always produces the same image.
//!
//! ## Signatures
//!
//! - Schnorr over G or H: (c, r) = (Hs(prefix, P, kG), k - c·s), verified by recomputing
//!   kG = r·G + c·P.
//! - Classic ring signature: proves ownership of one key among `pubs` and binds the key image
//!   to it, without revealing which member signed.
//! - Auditable ring signature: several rings of dual keys P = a·G + s·H under one joint
//!   challenge. Each input also publishes an audit image A = a·Hp(P), so a holder of the audit
//!   secret alone can recognize its own spends.
//!
//! ## Stealth Addresses
//!
//! - Legacy: P = Hs(D, i)·G + S over the Diffie-Hellman derivation D = 8·r·V.
//! - Linkable: like legacy, but bound to the hash of the transaction's inputs.
//! - Unlinkable: P = Hs(Q, inputs, i)·S for HD-generated dual-key addresses.
//!
//! ## Error Handling
//!
//! Verification never fails loudly: malformed keys and corrupted signatures make `check_*`
//! functions return `false`, and receiver-side derivations return `None`. Only caller bugs, like
//! a signer index outside its ring, produce a [`CryptoError`].
//!
//! ## Usage
//!
//! ```
//! use rand::rngs::OsRng;
//! use ring_stealth_crypto::{
//!     check_ring_signature, generate_key_image, generate_ring_signature, random_keypair,
//!     hash_stream::cn_fast_hash, PublicKey,
//! };
//!
//! let mut rng = OsRng;
//! let ring: Vec<_> = (0..4).map(|_| random_keypair(&mut rng)).collect();
//! let pubs: Vec<PublicKey> = ring.iter().map(|k| k.public_key).collect();
//! let signer = &ring[2];
//! let image = generate_key_image(&signer.public_key, &signer.secret_key);
//! let prefix = cn_fast_hash(b"transaction prefix");
//!
//! let sig = generate_ring_signature(&prefix, &image, &pubs, &signer.secret_key, 2, &mut rng)?;
//! assert!(check_ring_signature(&prefix, &image, &pubs, &sig));
//! # Ok::<(), ring_stealth_crypto::CryptoError>(())
//! ```
//!
//! Enable the `telemetry` feature for a ready-made bunyan JSON subscriber.

pub mod error;
pub mod hash_stream;
pub mod keys_management;
pub mod rand_nonce;
pub mod ring_signature;
pub mod schnorr_single_signature;
pub mod sendproof;
pub mod stealth;
pub mod types;

#[cfg(feature = "telemetry")]
pub mod telemetry;

#[cfg(test)]
mod test_utils;

pub use crate::error::{CryptoError, EncodingError};
pub use crate::keys_management::{
    generate_key_image, key_in_main_subgroup, key_isvalid, keys_match, random_keypair,
    secret_key_to_public_key, secret_keys_to_public_key, KeyPair,
};
pub use crate::rand_nonce::SharedRng;
pub use crate::ring_signature::{
    check_ring_signature, check_ring_signature_auditable, generate_ring_signature,
    generate_ring_signature_auditable, AuditableInput,
};
pub use crate::schnorr_single_signature::{
    check_signature, check_signature_h, generate_signature, generate_signature_h,
};
pub use crate::sendproof::{check_sendproof, generate_sendproof};
pub use crate::types::{
    AuditableRingSignature, AuditableSendproof, Hash, KeyDerivation, KeyImage, PublicKey,
    RingSignature, SecretKey, Signature,
};
