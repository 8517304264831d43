use rand_core::OsRng;
use ring_stealth_crypto::hash_stream::cn_fast_hash;
use ring_stealth_crypto::keys_management::{a_mul_b, random_keypair, secret_keys_to_public_key};
use ring_stealth_crypto::stealth::{
    generate_hd_spendkey, generate_hd_spendkeys, unlinkable_derive_output_public_key,
    unlinkable_derive_output_secret_key, unlinkable_underive_address_s,
};

fn main() {
    let mut csprng = OsRng;

    // Receiver wallet: audit seed a0, spend secret s, view key v
    let a0 = random_keypair(&mut csprng).secret_key;
    let s = random_keypair(&mut csprng).secret_key;
    let view = random_keypair(&mut csprng);
    let anchor = secret_keys_to_public_key(&a0, &s);
    let v_anchor = a_mul_b(&anchor, &view.secret_key).expect("Error");

    // First HD address
    let spend_keys = generate_hd_spendkeys(&a0, &anchor, 0, 1).expect("Error");
    let address_s = spend_keys[0].public_key;
    let address_sv = generate_hd_spendkey(&v_anchor, &anchor, &view.public_key, 0).expect("Error");

    // Sender pays output 0 of a transaction
    let output_secret = random_keypair(&mut csprng).public_key;
    let inputs_hash = cn_fast_hash(b"inputs of the paying transaction");
    let output = unlinkable_derive_output_public_key(
        &output_secret,
        &inputs_hash,
        0,
        &address_s,
        &address_sv,
    )
    .expect("Error");

    // Receiver scans with the view key only
    let recognized = unlinkable_underive_address_s(
        &view.secret_key,
        &inputs_hash,
        0,
        &output.output_public_key,
        &output.encrypted_output_secret,
    )
    .expect("Error");
    println!("Output is ours: {:?}", recognized.address_s == address_s);

    // ... and derives the secrets needed to spend it
    let audit = unlinkable_derive_output_secret_key(&spend_keys[0].audit_secret_key, &recognized.spend_scalar);
    let spend = unlinkable_derive_output_secret_key(&s, &recognized.spend_scalar);
    let result = secret_keys_to_public_key(&audit, &spend) == output.output_public_key;

    println!("Spendable: {:?}", result);
    assert!(result);
}
