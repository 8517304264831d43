//! Linkable ring signatures.
//!
//! [`classic`] proves ownership of one key among a ring and binds the
//! spender's key image to it. [`auditable`] does the same for several inputs at
//! once over dual (audit, spend) keys, tying every ring to one shared challenge.

pub mod auditable;
pub mod classic;

pub use auditable::{
    check_audit_image, check_ring_signature_auditable, check_sendproof_signature_auditable,
    generate_audit_image, generate_ring_signature_auditable,
    generate_ring_signature_auditable_from_parts, generate_sendproof_signature_auditable,
    AuditableInput,
};
pub use classic::{check_ring_signature, generate_ring_signature};
