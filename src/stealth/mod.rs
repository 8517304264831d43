//! One-time output keys.
//!
//! Every scheme has a sender step that derives an output public key from the
//! receiver's address, a receiver step that recognizes the output and recovers
//! what is needed to spend it, and a sender-side restore that recovers the
//! destination address from the transaction's own secret.
//!
//! - [`legacy`]: `P = Hs(D, i)·G + S` over a Diffie-Hellman derivation `D`.
//! - [`linkable`]: the derivation also binds the transaction's inputs hash.
//! - [`unlinkable`]: `P = Hs(Q, inputs, i)·S` for dual-key addresses, with a
//!   view-only first step for constrained signers.
//! - [`hd`]: deterministic spend-key sequences behind unlinkable addresses.

use crate::types::{PublicKey, SecretKey};

pub mod hd;
pub mod legacy;
pub mod linkable;
pub mod unlinkable;

pub use hd::{
    generate_hd_secretkey, generate_hd_spend_public_key, generate_hd_spendkey,
    generate_hd_spendkeys, HdSpendKey,
};
pub use legacy::{
    derivation_to_scalar, derive_output_public_key, derive_output_secret_key,
    generate_key_derivation, underive_address_s,
};
pub use linkable::{
    linkable_derive_output_public_key, linkable_derive_output_secret_key,
    linkable_underive_address, linkable_underive_address_s,
};
pub use unlinkable::{
    unlinkable_derive_output_public_key, unlinkable_derive_output_secret_key,
    unlinkable_underive_address, unlinkable_underive_address_s,
    unlinkable_underive_address_s_step1, unlinkable_underive_address_s_step2,
};

/// What the sender writes to the chain for one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StealthOutput {
    pub output_public_key: PublicKey,
    /// Output secret point masked so only the receiver's view key opens it.
    pub encrypted_output_secret: PublicKey,
}

/// A recognized output: the receiver's spend public key it was sent to, and
/// the spend scalar needed to derive its secret.
#[derive(Debug, Clone)]
pub struct RecognizedOutput {
    pub address_s: PublicKey,
    pub spend_scalar: SecretKey,
}
