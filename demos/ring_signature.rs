use rand_core::OsRng;
use ring_stealth_crypto::hash_stream::cn_fast_hash;
use ring_stealth_crypto::keys_management::{generate_key_image, KeyPair};
use ring_stealth_crypto::ring_signature::{check_ring_signature, generate_ring_signature};
use ring_stealth_crypto::PublicKey;

fn main() {
    let mut csprng = OsRng;

    // Ring of eight keys; the signer owns the one at index 5
    let ring: Vec<KeyPair> = (0..8).map(|_| KeyPair::create(&mut csprng)).collect();
    let pubs: Vec<PublicKey> = ring.iter().map(|keys| keys.public_key).collect();
    let signer_index = 5;
    let signer = &ring[signer_index];

    // Key image published with the spend
    let image = generate_key_image(&signer.public_key, &signer.secret_key);
    let prefix_hash = cn_fast_hash(b"transaction prefix");

    let signature = generate_ring_signature(
        &prefix_hash,
        &image,
        &pubs,
        &signer.secret_key,
        signer_index,
        &mut csprng,
    )
    .expect("Error");

    let result = check_ring_signature(&prefix_hash, &image, &pubs, &signature);
    println!("Key image: {}", image.to_hex());
    println!("Verification result: {:?}", result);
    assert!(result);
}
