//! EdDSA-Poseidon signatures over Baby Jubjub
//!
//! Compatible with circomlib's `EdDSAPoseidonVerifier`: the challenge is
//! `Poseidon(R8.x, R8.y, A.x, A.y, msg)` and verification checks
//! `S·Base8 == R8 + 8·hm·A`.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::crypto::babyjub::{add_point, in_curve, mul_point_escalar, Point, BASE8, SUB_ORDER};
use crate::crypto::keys::{blake512, secret_scalar, PrivateKey, PublicKey};
use crate::crypto::poseidon::poseidon_t6;
use crate::errors::CryptoError;
use crate::types::FieldElement;
use crate::utils::{field_to_biguint, field_to_be_bytes, le_bytes_to_bigint};

/// An EdDSA-Poseidon signature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// The commitment point `R8 = r·Base8`
    #[serde(with = "crate::crypto::babyjub::serde_point")]
    pub r8: Point,
    /// The response scalar, below the subgroup order
    #[serde(with = "crate::utils::serde_field")]
    pub s: FieldElement,
}

fn challenge(r8: &Point, public_key: &Point, message: FieldElement) -> Result<BigUint, CryptoError> {
    let hm = poseidon_t6(&[r8.x, r8.y, public_key.x, public_key.y, message])?;
    Ok(field_to_biguint(&hm))
}

/// Signs a field element
///
/// The nonce `r` is derived deterministically from the upper half of
/// `BLAKE512(sk)` and the little-endian message, so signing the same message
/// twice yields the same signature.
pub fn sign(private_key: &PrivateKey, message: FieldElement) -> Result<Signature, CryptoError> {
    sign_with_secret(&private_key.to_buffer(), message)
}

/// Signs with a raw EdDSA secret, the bytes fed to BLAKE-512
pub(crate) fn sign_with_secret(
    secret: &[u8],
    message: FieldElement,
) -> Result<Signature, CryptoError> {
    let (digest, s) = secret_scalar(secret);
    let public_key = mul_point_escalar(&BASE8, &(&s >> 3u32));

    let mut message_le = field_to_be_bytes(&message);
    message_le.reverse();
    let mut nonce_input = Vec::with_capacity(64);
    nonce_input.extend_from_slice(&digest[32..]);
    nonce_input.extend_from_slice(&message_le);
    let r = le_bytes_to_bigint(&blake512(&nonce_input)) % &*SUB_ORDER;

    let r8 = mul_point_escalar(&BASE8, &r);
    let hm = challenge(&r8, &public_key, message)?;
    let response = (r + hm * s) % &*SUB_ORDER;

    Ok(Signature { r8, s: FieldElement::from(response) })
}

/// Verifies a signature over a field element
///
/// Returns `Ok(false)` for off-curve points, an out-of-range response or a
/// signature that does not match.
pub fn verify_signature(
    message: FieldElement,
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<bool, CryptoError> {
    let a = public_key.point();
    if !in_curve(&signature.r8) || !in_curve(a) {
        return Ok(false);
    }
    let response = field_to_biguint(&signature.s);
    if response >= *SUB_ORDER {
        return Ok(false);
    }

    let hm = challenge(&signature.r8, a, message)?;
    let left = mul_point_escalar(&BASE8, &response);
    let right = add_point(&signature.r8, &mul_point_escalar(a, &(hm * 8u32)));

    Ok(left == right)
}
