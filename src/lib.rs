#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Quin Accumulator
//!
//! Off-chain accumulator core for anti-collusion voting: incremental n-ary
//! Merkle trees and a two-phase accumulator queue whose roots match the
//! on-chain accumulator, built on circom-compatible Poseidon over the BN254
//! scalar field, with Baby Jubjub keys, EdDSA-Poseidon signatures and the
//! Poseidon cipher.

// Accumulator queue: subtree batching and root merging
pub mod accqueue;

// Hashes, keys, signatures and the cipher
pub mod crypto;

// Error types for all components
pub mod errors;

// Incremental Merkle tree and inclusion proofs
pub mod tree;

// Field element alias and protocol constants
pub mod types;

// Integer and field element conversions
pub mod utils;

// Re-export commonly used types and functions
pub use accqueue::{AccQueue, AccQueueConfig};
pub use crypto::{HashFunction, Keypair, PoseidonHasher, PrivateKey, PublicKey, Signature};
pub use errors::{AccQueueError, CryptoError, Error, Result, TreeError};
pub use tree::{IncrementalQuinTree, MerkleProof};
pub use types::{Bytes32, FieldElement, MAX_DEPTH, NOTHING_UP_MY_SLEEVE, SNARK_FIELD_SIZE};
