//! Core type definitions for the accumulator library
//!
//! This module defines fundamental types and protocol constants used across
//! multiple modules.

use ark_ff::PrimeField;
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use sha3::{Digest, Keccak256};

// ============================================================================
// Fundamental Types
// ============================================================================

/// An element of the BN254 scalar field (the SNARK field)
///
/// Every hash input and output, key coordinate and tree node is a field element.
pub type FieldElement = ark_bn254::Fr;

/// Type alias for 32-byte arrays used at the byte boundary
pub type Bytes32 = [u8; 32];

/// The field modulus as an arbitrary-precision integer
pub static SNARK_FIELD_SIZE: Lazy<BigUint> = Lazy::new(|| FieldElement::MODULUS.into());

// ============================================================================
// Accumulator Domain
// ============================================================================

/// Maximum depth of any main tree produced by the accumulator queue
pub const MAX_DEPTH: usize = 32;

/// Supported numbers of leaves per node in the accumulator queue
pub const SUPPORTED_HASH_LENGTHS: [usize; 2] = [2, 5];

/// Domain string hashed to derive [`NOTHING_UP_MY_SLEEVE`]
pub const NOTHING_UP_MY_SLEEVE_PREIMAGE: &[u8] = b"Maci";

/// Zero value of the signup accumulator
///
/// Keccak-256 of `"Maci"` reduced modulo the field prime. Using a value with no
/// known preimage under Poseidon prevents an empty slot from being claimed.
pub static NOTHING_UP_MY_SLEEVE: Lazy<FieldElement> = Lazy::new(|| {
    let digest = Keccak256::digest(NOTHING_UP_MY_SLEEVE_PREIMAGE);
    FieldElement::from_be_bytes_mod_order(&digest)
});
