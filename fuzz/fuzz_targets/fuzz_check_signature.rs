#![no_main]

use libfuzzer_sys::fuzz_target;

use ring_stealth_crypto::schnorr_single_signature::{check_signature, check_signature_h};
use ring_stealth_crypto::sendproof::check_sendproof;
use ring_stealth_crypto::{Hash, KeyDerivation, PublicKey, Signature};

fuzz_target!(|data: &[u8]| {
    // prefix || public key || signature, all attacker controlled
    if data.len() < 160 {
        return;
    }
    let mut prefix = [0u8; 32];
    let mut key = [0u8; 32];
    let mut sig = [0u8; 64];
    let mut extra = [0u8; 32];
    prefix.copy_from_slice(&data[..32]);
    key.copy_from_slice(&data[32..64]);
    sig.copy_from_slice(&data[64..128]);
    extra.copy_from_slice(&data[128..160]);

    // Must answer, never panic
    if let Ok(sig) = Signature::from_bytes(&sig) {
        let prefix = Hash(prefix);
        let key = PublicKey(key);
        let _ = check_signature(&prefix, &key, &sig);
        let _ = check_signature_h(&prefix, &key, &sig);
        let _ = check_sendproof(&key, &PublicKey(extra), &KeyDerivation(extra), &prefix, &sig);
    }
});
