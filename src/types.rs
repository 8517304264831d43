//! Fixed-width protocol values.
//!
//! Scalars, points, digests and key images all travel as 32-byte values. Point
//! types keep the raw encoding and are decompressed at the point of use, so a
//! value read from the chain can be carried around before anyone has decided
//! whether it is valid.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EncodingError;

fn decode_hex_32(hex_str: &str) -> Result<[u8; 32], EncodingError> {
    let bytes = hex::decode(hex_str)?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| EncodingError::Length {
        expected: 32,
        actual: bytes.len(),
    })
}

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, std::hash::Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub [u8; 32]);

        impl $name {
            /// Get the raw bytes.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Convert to hex string.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Create from hex string.
            pub fn from_hex(hex_str: &str) -> Result<Self, EncodingError> {
                decode_hex_32(hex_str).map(Self)
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }
    };
}

macro_rules! point_bytes {
    ($(#[$meta:meta])* $name:ident) => {
        fixed_bytes!($(#[$meta])* $name);

        impl $name {
            /// Compress a curve point.
            pub fn from_point(point: &EdwardsPoint) -> Self {
                Self(point.compress().to_bytes())
            }

            /// Decompress to a curve point, `None` if the bytes are not on the curve.
            pub fn decompress(&self) -> Option<EdwardsPoint> {
                CompressedEdwardsY(self.0).decompress()
            }
        }
    };
}

fixed_bytes!(
    /// A 32-byte Keccak digest, e.g. the prefix hash of a transaction.
    Hash
);

point_bytes!(
    /// A compressed Ed25519 public key.
    PublicKey
);

point_bytes!(
    /// `s·Hp(P)`, the one-time tag published when the output `P` is spent.
    KeyImage
);

point_bytes!(
    /// Cofactor-cleared Diffie-Hellman point shared by sender and receiver.
    KeyDerivation
);

/// A secret scalar, zeroized on drop and redacted from debug output.
pub struct SecretKey(Secret<Scalar>);

impl SecretKey {
    pub fn new(scalar: Scalar) -> Self {
        Self(Secret::new(scalar))
    }

    /// Accepts only canonically reduced scalars.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> Option<Self> {
        Option::from(Scalar::from_canonical_bytes(bytes)).map(Self::new)
    }

    /// # Security Warning
    /// The returned bytes contain the secret key.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.expose_secret().to_bytes()
    }

    /// Multiplicative inverse mod L.
    pub fn invert(&self) -> SecretKey {
        Self::new(self.0.expose_secret().invert())
    }
}

impl ExposeSecret<Scalar> for SecretKey {
    fn expose_secret(&self) -> &Scalar {
        self.0.expose_secret()
    }
}

impl From<Scalar> for SecretKey {
    fn from(scalar: Scalar) -> Self {
        Self::new(scalar)
    }
}

impl Clone for SecretKey {
    fn clone(&self) -> Self {
        Self::new(*self.0.expose_secret())
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SecretKey([REDACTED])")
    }
}

/// Schnorr proof `(c, r)`; also one member of a classic ring signature.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub c: Scalar,
    pub r: Scalar,
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(self.c.as_bytes());
        bytes[32..].copy_from_slice(self.r.as_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; 64]) -> Result<Self, EncodingError> {
        let mut c = [0u8; 32];
        let mut r = [0u8; 32];
        c.copy_from_slice(&bytes[..32]);
        r.copy_from_slice(&bytes[32..]);
        Ok(Signature {
            c: canonical_scalar(c)?,
            r: canonical_scalar(r)?,
        })
    }
}

pub(crate) fn canonical_scalar(bytes: [u8; 32]) -> Result<Scalar, EncodingError> {
    Option::from(Scalar::from_canonical_bytes(bytes)).ok_or(EncodingError::NonCanonicalScalar)
}

/// Classic linkable ring signature: one `(c_i, r_i)` per ring member.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RingSignature(pub Vec<Signature>);

impl RingSignature {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Responses for one ring member of an auditable ring signature.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct AuditableResponse {
    /// Response for the audit component of the member key.
    pub ra: Scalar,
    /// Response for the spend component of the member key.
    pub rs: Scalar,
}

/// Multi-input ring signature over dual-key (audit + spend) outputs.
///
/// All rings share the single starting challenge `c0`; `audit_images[i]` and
/// `responses[i]` belong to input `i`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuditableRingSignature {
    pub c0: Scalar,
    pub audit_images: Vec<PublicKey>,
    pub responses: Vec<Vec<AuditableResponse>>,
}

/// Proof that a key image belongs to a dual-key output, outside any ring.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct AuditableSendproof {
    pub c: Scalar,
    pub ra: Scalar,
    pub rs: Scalar,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_hex_roundtrip() {
        let key = PublicKey::from_point(&EdwardsPoint::mul_base(&Scalar::from(7u64)));
        let recovered = PublicKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key, recovered);
        assert!(recovered.decompress().is_some());
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        let err = Hash::from_hex("abcd").unwrap_err();
        assert!(matches!(
            err,
            EncodingError::Length {
                expected: 32,
                actual: 2
            }
        ));
        assert!(matches!(
            Hash::from_hex("zz").unwrap_err(),
            EncodingError::Hex(_)
        ));
    }

    #[test]
    fn test_secret_key_rejects_non_canonical_bytes() {
        assert!(SecretKey::from_canonical_bytes([0xff; 32]).is_none());
        let key = SecretKey::from_canonical_bytes([1; 32]).unwrap();
        assert_eq!(key.to_bytes(), [1; 32]);
    }

    #[test]
    fn test_secret_key_debug_is_redacted() {
        let key = SecretKey::new(Scalar::from(42u64));
        assert_eq!(format!("{:?}", key), "SecretKey([REDACTED])");
    }

    #[test]
    fn test_signature_bytes_reject_non_canonical() {
        let sig = Signature {
            c: Scalar::from(3u64),
            r: Scalar::from(5u64),
        };
        assert_eq!(Signature::from_bytes(&sig.to_bytes()).unwrap(), sig);

        let mut bytes = sig.to_bytes();
        bytes[63] = 0xff;
        assert!(matches!(
            Signature::from_bytes(&bytes),
            Err(EncodingError::NonCanonicalScalar)
        ));
    }
}
