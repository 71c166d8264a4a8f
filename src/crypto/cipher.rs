//! Poseidon authenticated encryption
//!
//! A duplex sponge over the width-4 Poseidon permutation, keyed by an ECDH
//! shared point. Plaintexts are padded with zeros to a multiple of three and
//! the ciphertext carries one extra element, the authentication tag.

use ark_ff::Zero;
use num_bigint::BigUint;

use crate::crypto::keys::SharedKey;
use crate::crypto::poseidon::poseidon_perm;
use crate::errors::CryptoError;
use crate::types::FieldElement;

/// Elements absorbed per permutation
const RATE: usize = 3;

fn padded_len(len: usize) -> usize { len.div_ceil(RATE) * RATE }

fn initial_state(key: &SharedKey, nonce: u128, len: usize) -> [FieldElement; RATE + 1] {
    let domain = BigUint::from(nonce) + (BigUint::from(len) << 128u32);
    [FieldElement::zero(), key.x, key.y, FieldElement::from(domain)]
}

fn permute(state: &[FieldElement; RATE + 1]) -> Result<[FieldElement; RATE + 1], CryptoError> {
    let out = poseidon_perm(state)?;
    let mut next = [FieldElement::zero(); RATE + 1];
    next.copy_from_slice(&out);
    Ok(next)
}

/// Encrypts `plaintext` under a shared key and nonce
///
/// # Arguments
/// * `plaintext` - Field elements to encrypt
/// * `key` - Shared key from [`gen_ecdh_shared_key`](crate::crypto::keys::gen_ecdh_shared_key)
/// * `nonce` - Must never be reused with the same key
///
/// # Returns
/// `padded_len(plaintext) + 1` elements, the last being the tag
pub fn encrypt(
    plaintext: &[FieldElement],
    key: &SharedKey,
    nonce: u128,
) -> Result<Vec<FieldElement>, CryptoError> {
    let mut message = plaintext.to_vec();
    message.resize(padded_len(plaintext.len()), FieldElement::zero());

    let mut state = initial_state(key, nonce, plaintext.len());
    let mut ciphertext = Vec::with_capacity(message.len() + 1);

    for block in message.chunks(RATE) {
        state = permute(&state)?;
        for (lane, value) in state[1..].iter_mut().zip(block) {
            *lane += value;
        }
        ciphertext.extend_from_slice(&state[1..]);
    }

    state = permute(&state)?;
    ciphertext.push(state[1]);
    Ok(ciphertext)
}

/// Decrypts a ciphertext produced by [`encrypt`]
///
/// # Arguments
/// * `ciphertext` - Output of [`encrypt`]
/// * `key` - The same shared key
/// * `nonce` - The same nonce
/// * `len` - Length of the original plaintext
///
/// # Errors
/// [`CryptoError::DecryptionFailed`] if the ciphertext length does not match
/// `len`, the padding is not zero or the tag does not verify
pub fn decrypt(
    ciphertext: &[FieldElement],
    key: &SharedKey,
    nonce: u128,
    len: usize,
) -> Result<Vec<FieldElement>, CryptoError> {
    let padded = padded_len(len);
    if ciphertext.len() != padded + 1 {
        return Err(CryptoError::DecryptionFailed(format!(
            "expected {} ciphertext elements for length {len}, got {}",
            padded + 1,
            ciphertext.len()
        )));
    }

    let mut state = initial_state(key, nonce, len);
    let mut message = Vec::with_capacity(padded);

    for block in ciphertext[..padded].chunks(RATE) {
        state = permute(&state)?;
        for (lane, value) in state[1..].iter_mut().zip(block) {
            message.push(*value - *lane);
            *lane = *value;
        }
    }

    if message[len..].iter().any(|value| !value.is_zero()) {
        return Err(CryptoError::DecryptionFailed("non-zero padding".to_string()));
    }

    state = permute(&state)?;
    if state[1] != ciphertext[padded] {
        return Err(CryptoError::DecryptionFailed("invalid authentication tag".to_string()));
    }

    message.truncate(len);
    Ok(message)
}
