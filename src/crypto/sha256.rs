//! Field-truncated SHA-256
//!
//! Used where a digest must be recomputed by a contract from packed `uint256`
//! words (Solidity `sha256(abi.encodePacked(...))`) and then fed into a circuit.

use ark_ff::PrimeField;
use sha2::{Digest, Sha256};

use crate::types::FieldElement;
use crate::utils::field_to_be_bytes;

/// Hashes field elements as packed 32-byte big-endian words and reduces the
/// digest modulo the field prime
pub fn sha256_hash(elements: &[FieldElement]) -> FieldElement {
    let mut hasher = Sha256::new();
    for element in elements {
        hasher.update(field_to_be_bytes(element));
    }
    FieldElement::from_be_bytes_mod_order(&hasher.finalize())
}
