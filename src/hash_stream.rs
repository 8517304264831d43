//! Streaming Keccak oracle behind every challenge, derivation and hash-to-point.
//!
//! Values are absorbed in order through [`Appendable`], one serialization per
//! type, and the stream can then be finalized into a digest, a scalar or a
//! curve point. Sizes and indexes are absorbed as little-endian base-128
//! varints, the encoding used by the surrounding transaction format; changing
//! it changes every hash, signature and key image.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use sha3::{Digest, Keccak256Full};

use crate::types::{Hash, KeyDerivation, KeyImage, PublicKey};

/// Longest varint a `u64` can produce.
const MAX_VARINT_LEN: usize = 10;

/// A value with exactly one canonical byte encoding inside a [`HashStream`].
pub trait Appendable {
    fn append_to(&self, stream: &mut HashStream);
}

/// Ordered byte accumulator over one Keccak state.
///
/// The state is absorbed into `Keccak256Full`, whose squeeze starts with the
/// plain Keccak-256 digest, so the 32-byte and 64-byte finalizers read
/// prefixes of the same output.
#[derive(Clone, Default)]
pub struct HashStream {
    hasher: Keccak256Full,
}

impl HashStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.hasher.update(bytes);
        self
    }

    /// Literal domain tag, absorbed without a length prefix.
    pub fn append_tag(&mut self, tag: &str) -> &mut Self {
        self.append_bytes(tag.as_bytes())
    }

    pub fn append_byte(&mut self, byte: u8) -> &mut Self {
        self.append_bytes(&[byte])
    }

    pub fn append_varint(&mut self, value: u64) -> &mut Self {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let len = encode_varint(value, &mut buf);
        self.append_bytes(&buf[..len])
    }

    pub fn append<T: Appendable + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.append_to(self);
        self
    }

    fn squeeze(&self) -> [u8; 64] {
        let full = self.hasher.clone().finalize();
        let mut out = [0u8; 64];
        out.copy_from_slice(&full[..64]);
        out
    }

    /// Keccak-256 of everything absorbed so far.
    pub fn digest(&self) -> Hash {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.squeeze()[..32]);
        Hash(out)
    }

    /// The 32-byte digest reduced mod L.
    pub fn to_scalar(&self) -> Scalar {
        Scalar::from_bytes_mod_order(self.digest().0)
    }

    /// 64 bytes of output reduced mod L; bias is negligible over the whole range.
    pub fn to_scalar_wide(&self) -> Scalar {
        Scalar::from_bytes_mod_order_wide(&self.squeeze())
    }

    pub fn to_bad_point(&self) -> EdwardsPoint {
        bytes_to_bad_point(&self.digest())
    }

    pub fn to_good_point(&self) -> EdwardsPoint {
        self.to_bad_point().mul_by_cofactor()
    }
}

/// Writes `value` as a little-endian base-128 varint and returns its length.
pub fn encode_varint(mut value: u64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut len = 0;
    while value >= 0x80 {
        buf[len] = (value as u8 & 0x7f) | 0x80;
        value >>= 7;
        len += 1;
    }
    buf[len] = value as u8;
    len + 1
}

impl Appendable for [u8] {
    fn append_to(&self, stream: &mut HashStream) {
        stream.append_bytes(self);
    }
}

impl Appendable for Hash {
    fn append_to(&self, stream: &mut HashStream) {
        stream.append_bytes(&self.0);
    }
}

impl Appendable for PublicKey {
    fn append_to(&self, stream: &mut HashStream) {
        stream.append_bytes(&self.0);
    }
}

impl Appendable for KeyImage {
    fn append_to(&self, stream: &mut HashStream) {
        stream.append_bytes(&self.0);
    }
}

impl Appendable for KeyDerivation {
    fn append_to(&self, stream: &mut HashStream) {
        stream.append_bytes(&self.0);
    }
}

impl Appendable for Scalar {
    fn append_to(&self, stream: &mut HashStream) {
        stream.append_bytes(self.as_bytes());
    }
}

impl Appendable for EdwardsPoint {
    fn append_to(&self, stream: &mut HashStream) {
        stream.append_bytes(self.compress().as_bytes());
    }
}

impl Appendable for u64 {
    fn append_to(&self, stream: &mut HashStream) {
        stream.append_varint(*self);
    }
}

impl Appendable for usize {
    fn append_to(&self, stream: &mut HashStream) {
        stream.append_varint(*self as u64);
    }
}

/// Keccak-256 of `data`.
pub fn cn_fast_hash(data: &[u8]) -> Hash {
    HashStream::new().append_bytes(data).digest()
}

pub fn hash_to_scalar(data: &[u8]) -> Scalar {
    HashStream::new().append_bytes(data).to_scalar()
}

pub fn hash_to_scalar64(data: &[u8]) -> Scalar {
    HashStream::new().append_bytes(data).to_scalar_wide()
}

/// Maps any 32 bytes to a curve point, possibly outside the main subgroup.
///
/// The bytes are tried as a compressed y-coordinate; candidates that do not
/// decode are replaced by their own Keccak digest until one does. Roughly half
/// of all candidates decode, and the result is a deterministic function of `h`.
pub fn bytes_to_bad_point(h: &Hash) -> EdwardsPoint {
    let mut candidate = h.0;
    loop {
        if let Some(point) = CompressedEdwardsY(candidate).decompress() {
            return point;
        }
        candidate = cn_fast_hash(&candidate).0;
    }
}

pub fn hash_to_bad_point(data: &[u8]) -> EdwardsPoint {
    bytes_to_bad_point(&cn_fast_hash(data))
}

/// Like [`hash_to_bad_point`], then multiplied by the cofactor so the result
/// always lies in the prime-order subgroup.
pub fn hash_to_good_point(data: &[u8]) -> EdwardsPoint {
    hash_to_bad_point(data).mul_by_cofactor()
}
