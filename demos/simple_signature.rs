use rand_core::OsRng;
use ring_stealth_crypto::hash_stream::cn_fast_hash;
use ring_stealth_crypto::keys_management::KeyPair;
use ring_stealth_crypto::schnorr_single_signature::{check_signature, generate_signature};

fn main() {
    let mut csprng = OsRng;
    // Create signer keys
    let keys = KeyPair::create(&mut csprng);

    // Digest of the message to be signed
    let prefix_hash = cn_fast_hash(b"Hello World");

    // Signature generation
    let signature = generate_signature(&prefix_hash, &keys.public_key, &keys.secret_key, &mut csprng)
        .expect("Error");

    // Verification of the signature
    let result = check_signature(&prefix_hash, &keys.public_key, &signature);

    println!("Verification result: {:?}", result);
    assert!(result);
}
