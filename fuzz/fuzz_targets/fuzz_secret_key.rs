#![no_main]

use libfuzzer_sys::fuzz_target;

use rand::rngs::StdRng;
use rand::SeedableRng;
use ring_stealth_crypto::hash_stream::{cn_fast_hash, hash_to_scalar64};
use ring_stealth_crypto::keys_management::{generate_key_image, KeyPair};
use ring_stealth_crypto::ring_signature::{check_ring_signature, generate_ring_signature};
use ring_stealth_crypto::schnorr_single_signature::{check_signature, generate_signature};
use ring_stealth_crypto::SecretKey;

fuzz_target!(|data: &[u8]| {
    // Randomness source
    let mut seeded_rng = StdRng::seed_from_u64(123);

    let secret_key = SecretKey::new(hash_to_scalar64(data));
    let keys = KeyPair::from_secret_key(secret_key);
    let prefix = cn_fast_hash(data);

    let sig = generate_signature(&prefix, &keys.public_key, &keys.secret_key, &mut seeded_rng)
        .expect("Error");
    assert!(check_signature(&prefix, &keys.public_key, &sig));

    let decoy = KeyPair::create(&mut seeded_rng);
    let pubs = [decoy.public_key, keys.public_key];
    let image = generate_key_image(&keys.public_key, &keys.secret_key);
    let ring_sig =
        generate_ring_signature(&prefix, &image, &pubs, &keys.secret_key, 1, &mut seeded_rng)
            .expect("Error");
    assert!(check_ring_signature(&prefix, &image, &pubs, &ring_sig));
});
