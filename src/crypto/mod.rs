//! Cryptographic primitives over the BN254 scalar field
//!
//! Poseidon hashing, the SHA-256 collision hash, Baby Jubjub keys,
//! EdDSA-Poseidon signatures and the Poseidon cipher. Every value that enters
//! or leaves these functions is a [`FieldElement`](crate::FieldElement).

pub mod babyjub;
pub mod cipher;
pub mod eddsa;
pub mod hasher;
pub mod keys;
pub mod poseidon;
pub mod sha256;

pub use cipher::{decrypt, encrypt};
pub use eddsa::{sign, verify_signature, Signature};
pub use hasher::{HashFunction, PoseidonHasher};
pub use keys::{
    gen_ecdh_shared_key, gen_priv_key, gen_pub_key, gen_random_salt, Keypair, PrivateKey,
    PublicKey, SharedKey,
};
pub use poseidon::{
    hash13, hash2, hash3, hash4, hash5, hash_left_right, hash_one, hash_up_to_n, poseidon,
    poseidon_perm,
};
pub use sha256::sha256_hash;
