//! Incremental Merkle trees
//!
//! An n-ary append-only tree with sparse node storage, inclusion proofs and
//! subroot proofs for aligned leaf ranges.

mod proof;
mod quin_tree;

pub use proof::{verify_merkle_proof, MerkleProof};
pub use quin_tree::IncrementalQuinTree;
