//! Arbitrary-precision integer conversions and string encodings
//!
//! Field elements cross the boundary to contracts, proof generators and
//! persistence layers as 32-byte words or as decimal/hex strings. The checked
//! conversions here reject values at or above the field modulus instead of
//! reducing them.

use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use num_traits::Num;

use crate::errors::CryptoError;
use crate::types::{Bytes32, FieldElement, SNARK_FIELD_SIZE};

/// Encodes an integer as a 32-byte big-endian word, truncating to the low 256 bits
pub fn bigint_to_be_bytes32(value: &BigUint) -> Bytes32 {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    let take = bytes.len().min(32);
    out[32 - take..].copy_from_slice(&bytes[bytes.len() - take..]);
    out
}

/// Encodes an integer as a 32-byte little-endian word, truncating to the low 256 bits
pub fn bigint_to_le_bytes32(value: &BigUint) -> Bytes32 {
    let mut out = bigint_to_be_bytes32(value);
    out.reverse();
    out
}

/// Decodes a big-endian byte string
pub fn be_bytes_to_bigint(bytes: &[u8]) -> BigUint { BigUint::from_bytes_be(bytes) }

/// Decodes a little-endian byte string
pub fn le_bytes_to_bigint(bytes: &[u8]) -> BigUint { BigUint::from_bytes_le(bytes) }

/// Converts a field element into an arbitrary-precision integer
pub fn field_to_biguint(value: &FieldElement) -> BigUint { value.into_bigint().into() }

/// Converts an integer into a field element, rejecting values `>= p`
pub fn field_from_biguint(value: &BigUint) -> Result<FieldElement, CryptoError> {
    if *value >= *SNARK_FIELD_SIZE {
        return Err(CryptoError::NotInField(value.to_string()));
    }
    Ok(FieldElement::from(value.clone()))
}

/// Encodes a field element as a 32-byte big-endian word
pub fn field_to_be_bytes(value: &FieldElement) -> Bytes32 {
    let mut out = [0u8; 32];
    out.copy_from_slice(&value.into_bigint().to_bytes_be());
    out
}

/// Decodes a 32-byte big-endian word, rejecting values `>= p`
pub fn field_from_be_bytes(bytes: &Bytes32) -> Result<FieldElement, CryptoError> {
    field_from_biguint(&be_bytes_to_bigint(bytes))
}

/// Formats a field element as a decimal string
pub fn field_to_string(value: &FieldElement) -> String { field_to_biguint(value).to_string() }

/// Formats a field element as a `0x`-prefixed, zero-padded 64-digit hex string
pub fn field_to_hex(value: &FieldElement) -> String {
    format!("0x{}", hex::encode(field_to_be_bytes(value)))
}

/// Parses a decimal or `0x`-prefixed hex string into a field element
///
/// # Errors
/// * [`CryptoError::MalformedInteger`] if the string is not an integer
/// * [`CryptoError::NotInField`] if the integer is not below the modulus
pub fn field_from_str(s: &str) -> Result<FieldElement, CryptoError> {
    let trimmed = s.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(digits) => BigUint::from_str_radix(digits, 16),
        None => BigUint::from_str_radix(trimmed, 10),
    };
    let value = parsed.map_err(|_| CryptoError::MalformedInteger(s.to_string()))?;
    field_from_biguint(&value)
}

/// Formats every element of a slice as a decimal string
pub fn stringify_fields(values: &[FieldElement]) -> Vec<String> {
    values.iter().map(field_to_string).collect()
}

/// Parses a list of decimal or hex strings into field elements
pub fn unstringify_fields<S: AsRef<str>>(values: &[S]) -> Result<Vec<FieldElement>, CryptoError> {
    values.iter().map(|s| field_from_str(s.as_ref())).collect()
}

/// Serde adapter encoding a field element as a decimal string
pub mod serde_field {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{field_from_str, field_to_string};
    use crate::types::FieldElement;

    /// Serializes a field element as a decimal string
    pub fn serialize<S: Serializer>(value: &FieldElement, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&field_to_string(value))
    }

    /// Deserializes a decimal or hex string into a field element
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FieldElement, D::Error> {
        let s = String::deserialize(deserializer)?;
        field_from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter encoding a vector of field elements as decimal strings
pub mod serde_field_vec {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{stringify_fields, unstringify_fields};
    use crate::types::FieldElement;

    /// Serializes each element as a decimal string
    pub fn serialize<S: Serializer>(
        values: &[FieldElement],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(stringify_fields(values))
    }

    /// Deserializes a sequence of decimal or hex strings
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<FieldElement>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        unstringify_fields(&strings).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter encoding nested vectors of field elements as decimal strings
pub mod serde_field_vec2 {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{stringify_fields, unstringify_fields};
    use crate::types::FieldElement;

    /// Serializes each inner vector as a sequence of decimal strings
    pub fn serialize<S: Serializer>(
        values: &[Vec<FieldElement>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|level| stringify_fields(level)))
    }

    /// Deserializes nested sequences of decimal or hex strings
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<FieldElement>>, D::Error> {
        let strings = Vec::<Vec<String>>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|level| unstringify_fields(level))
            .collect::<Result<_, _>>()
            .map_err(serde::de::Error::custom)
    }
}
