#![no_main]

use libfuzzer_sys::fuzz_target;

use curve25519_dalek::scalar::Scalar;
use ring_stealth_crypto::ring_signature::check_ring_signature;
use ring_stealth_crypto::{Hash, KeyImage, PublicKey, RingSignature, Signature};

fuzz_target!(|data: &[u8]| {
    // image || (public key || c || r)*
    if data.len() < 32 {
        return;
    }
    let mut image = [0u8; 32];
    image.copy_from_slice(&data[..32]);

    let mut pubs = Vec::new();
    let mut members = Vec::new();
    for chunk in data[32..].chunks_exact(96) {
        let mut key = [0u8; 32];
        let mut c = [0u8; 32];
        let mut r = [0u8; 32];
        key.copy_from_slice(&chunk[..32]);
        c.copy_from_slice(&chunk[32..64]);
        r.copy_from_slice(&chunk[64..]);
        pubs.push(PublicKey(key));
        members.push(Signature {
            c: Scalar::from_bytes_mod_order(c),
            r: Scalar::from_bytes_mod_order(r),
        });
    }

    let verified = check_ring_signature(
        &Hash([0u8; 32]),
        &KeyImage(image),
        &pubs,
        &RingSignature(members),
    );
    // Random data never closes a ring
    assert!(!verified);
});
